//! Estimation of head-to-head probabilities from the form of the two teams, for fixtures that lack
//! externally quoted odds.

use crate::domain::{HeadToHead, TeamId};
use crate::error::UndefinedProbability;
use crate::stats::TeamStatistics;

/// Unnormalised strength of each outcome, as implied by the teams' results to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Power {
    pub home: u32,
    pub draw: u32,
    pub away: u32,
}
impl Power {
    pub fn of(home: &TeamStatistics, away: &TeamStatistics) -> Self {
        Self {
            home: home.overall.won + home.home.won + away.overall.lost + away.away.lost,
            draw: home.overall.drawn + home.home.drawn + away.overall.drawn + away.away.drawn,
            away: away.overall.won + away.away.won + home.overall.lost + home.home.lost,
        }
    }

    pub fn total(&self) -> u32 {
        self.home + self.draw + self.away
    }

    pub fn normalise(&self) -> Option<HeadToHead> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some(HeadToHead::new(
            self.home as f64 / total,
            self.draw as f64 / total,
            self.away as f64 / total,
        ))
    }
}

/// Estimates the outcome probabilities of a fixture between two teams. Teams without any
/// statistics are treated as having played no matches.
pub fn estimate(
    home: (&TeamId, Option<&TeamStatistics>),
    away: (&TeamId, Option<&TeamStatistics>),
) -> Result<HeadToHead, UndefinedProbability> {
    let blank = TeamStatistics::default();
    let power = Power::of(home.1.unwrap_or(&blank), away.1.unwrap_or(&blank));
    power.normalise().ok_or_else(|| UndefinedProbability {
        home: home.0.clone(),
        away: away.0.clone(),
    })
}
