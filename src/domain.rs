//! Core records exchanged with the engine: teams, scores, completed matches and pending fixtures.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::error::{MalformedInput, WrongBooksum};

pub const WIN_POINTS: u32 = 3;
pub const DRAW_POINTS: u32 = 1;

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);
impl TeamId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TeamId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}
impl Score {
    pub fn new(home: u16, away: u16) -> Self {
        Self { home, away }
    }

    pub fn outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Outcome::Win(Side::Home),
            std::cmp::Ordering::Less => Outcome::Win(Side::Away),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// A completed fixture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub home: TeamId,
    pub away: TeamId,
    pub score: Score,
}
impl Match {
    pub fn new(home: impl Into<TeamId>, away: impl Into<TeamId>, score: Score) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            score,
        }
    }

    pub fn validate(&self) -> Result<(), MalformedInput> {
        if self.home == self.away {
            return Err(MalformedInput::SelfMatch {
                team: self.home.clone(),
            });
        }
        Ok(())
    }
}

/// A completed fixture as supplied by an upstream feed, before the scores are known to be sane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home: TeamId,
    pub away: TeamId,
    pub home_score: i64,
    pub away_score: i64,
}

impl TryFrom<MatchRecord> for Match {
    type Error = MalformedInput;

    fn try_from(record: MatchRecord) -> Result<Self, Self::Error> {
        let home = checked_score(&record, &record.home, record.home_score)?;
        let away = checked_score(&record, &record.away, record.away_score)?;
        let m = Match {
            home: record.home,
            away: record.away,
            score: Score::new(home, away),
        };
        m.validate()?;
        Ok(m)
    }
}

fn checked_score(record: &MatchRecord, team: &TeamId, score: i64) -> Result<u16, MalformedInput> {
    u16::try_from(score).map_err(|_| MalformedInput::InvalidScore {
        home: record.home.clone(),
        away: record.away.clone(),
        team: team.clone(),
        score,
    })
}

/// Head-to-head probabilities from the home side's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}
impl HeadToHead {
    pub const BOOKSUM_TOLERANCE: f64 = 1e-6;

    pub fn new(win: f64, draw: f64, loss: f64) -> Self {
        Self { win, draw, loss }
    }

    pub fn uniform() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }

    pub fn booksum(&self) -> f64 {
        self.win + self.draw + self.loss
    }

    pub fn check(&self, home: &TeamId, away: &TeamId) -> Result<(), MalformedInput> {
        for value in [self.win, self.draw, self.loss] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MalformedInput::InvalidProbability {
                    home: home.clone(),
                    away: away.clone(),
                    value,
                });
            }
        }
        let actual = self.booksum();
        if (actual - 1.0).abs() > Self::BOOKSUM_TOLERANCE {
            return Err(WrongBooksum {
                home: home.clone(),
                away: away.clone(),
                actual,
            }
            .into());
        }
        Ok(())
    }
}

/// A fixture yet to be played, with its outcome probabilities resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingFixture {
    pub home: TeamId,
    pub away: TeamId,
    pub probs: HeadToHead,
}
impl PendingFixture {
    pub fn new(home: impl Into<TeamId>, away: impl Into<TeamId>, probs: HeadToHead) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            probs,
        }
    }

    pub fn validate(&self) -> Result<(), MalformedInput> {
        if self.home == self.away {
            return Err(MalformedInput::SelfMatch {
                team: self.home.clone(),
            });
        }
        self.probs.check(&self.home, &self.away)
    }
}

/// A fixture on the schedule, optionally carrying externally quoted odds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledFixture {
    pub home: TeamId,
    pub away: TeamId,
    #[serde(default)]
    pub odds: Option<HeadToHead>,
}
impl ScheduledFixture {
    pub fn new(home: impl Into<TeamId>, away: impl Into<TeamId>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            odds: None,
        }
    }

    pub fn with_odds(mut self, odds: HeadToHead) -> Self {
        self.odds = Some(odds);
        self
    }
}

/// How to proceed when a fixture's probabilities cannot be modelled from the available history.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Assign equal probability to each outcome.
    #[default]
    Uniform,
    /// Fail the run.
    Reject,
}
