//! Errors raised while assembling and simulating a season.

use thiserror::Error;

use crate::domain::TeamId;

#[derive(Debug, Error)]
pub enum MalformedInput {
    #[error("invalid score {score} for {team} in {home} vs {away}")]
    InvalidScore {
        home: TeamId,
        away: TeamId,
        team: TeamId,
        score: i64,
    },

    #[error("unknown team {team}")]
    UnknownTeam { team: TeamId },

    #[error("{team} cannot play itself")]
    SelfMatch { team: TeamId },

    #[error("invalid probability {value} in {home} vs {away}")]
    InvalidProbability {
        home: TeamId,
        away: TeamId,
        value: f64,
    },

    #[error("{0}")]
    WrongBooksum(#[from] WrongBooksum),

    #[error("no teams in season")]
    EmptySeason,
}

#[derive(Debug, Error)]
#[error("expected booksum of 1, got {actual} in {home} vs {away}")]
pub struct WrongBooksum {
    pub home: TeamId,
    pub away: TeamId,
    pub actual: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no history from which to model {home} vs {away}")]
pub struct UndefinedProbability {
    pub home: TeamId,
    pub away: TeamId,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{team} has played {played} fixtures, expected {expected}")]
pub struct IncompleteSeason {
    pub team: TeamId,
    pub played: u32,
    pub expected: u32,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("{0}")]
    UndefinedProbability(#[from] UndefinedProbability),

    #[error("{0}")]
    IncompleteSeason(#[from] IncompleteSeason),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("simulation interrupted")]
    Interrupted,

    #[error("{0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
