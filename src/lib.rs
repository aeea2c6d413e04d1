//! Monte Carlo projection of the final standings of a round-robin football league.
//! Plays out the outstanding fixtures of a season many times over, ranks every simulated table
//! under a deterministic tie-break chain, and reports each team's distribution of finishing
//! positions and points.

pub mod distribution;
pub mod domain;
pub mod error;
pub mod file;
pub mod mc;
pub mod model;
pub mod print;
pub mod ranking;
pub mod reconcile;
pub mod resolve;
pub mod roster;
pub mod sampler;
pub mod season;
pub mod stats;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
