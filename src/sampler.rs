//! Sampling of concrete score lines from head-to-head probabilities.
//!
//! The losing (or drawing) side's goals follow a geometric distribution; the winner's goals exceed
//! the loser's by one plus a second, independent geometric draw. Every sampled home win therefore
//! has a strictly greater home score, and every sampled draw has equal scores.

use std::ops::RangeInclusive;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tinyrand::Rand;

use crate::domain::{HeadToHead, Score};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    /// Success probability of the geometric draw for the losing side's goals.
    pub base_goals: f64,
    /// Success probability of the geometric draw for the winner's surplus over one goal.
    pub winning_margin: f64,
}
impl ScoreModel {
    const VALID_PROBS: RangeInclusive<f64> = 0.05..=1.0;

    pub fn validate(&self) -> anyhow::Result<()> {
        if !Self::VALID_PROBS.contains(&self.base_goals) {
            bail!("base goals probability must be in the range {:?}", Self::VALID_PROBS);
        }
        if !Self::VALID_PROBS.contains(&self.winning_margin) {
            bail!("winning margin probability must be in the range {:?}", Self::VALID_PROBS);
        }
        Ok(())
    }

    #[inline]
    pub fn sample(&self, probs: &HeadToHead, rand: &mut impl Rand) -> Score {
        let u = random_f64(rand);
        if u < probs.win {
            let (winner, loser) = self.decisive(rand);
            Score::new(winner, loser)
        } else if u < probs.win + probs.draw {
            let goals = geometric(self.base_goals, rand);
            Score::new(goals, goals)
        } else {
            let (winner, loser) = self.decisive(rand);
            Score::new(loser, winner)
        }
    }

    #[inline]
    fn decisive(&self, rand: &mut impl Rand) -> (u16, u16) {
        let loser = geometric(self.base_goals, rand);
        let winner = geometric(self.winning_margin, rand) + loser + 1;
        (winner, loser)
    }
}

impl Default for ScoreModel {
    fn default() -> Self {
        Self {
            base_goals: 0.3,
            winning_margin: 0.5,
        }
    }
}

/// Number of failures before the first success in Bernoulli trials with success probability `p`,
/// capped at [MAX_GOALS]. The cap is unreachable for the probabilities a [ScoreModel] admits.
#[inline]
pub(crate) fn geometric(p: f64, rand: &mut impl Rand) -> u16 {
    debug_assert!(p > 0.0 && p <= 1.0, "invalid probability {p}");
    if p == 1.0 {
        return 0;
    }
    let r = random_open_f64(rand);
    (r.ln() / (1.0 - p).ln()).floor().min(MAX_GOALS) as u16
}

/// Upper bound of a single geometric draw, so that degenerate random streams cannot overflow a
/// score.
const MAX_GOALS: f64 = 1_000.0;

/// Uniform in [0, 1).
#[inline]
pub fn random_f64(rand: &mut impl Rand) -> f64 {
    (rand.next_u64() >> 11) as f64 * UNIT
}

/// Uniform in (0, 1).
#[inline]
pub fn random_open_f64(rand: &mut impl Rand) -> f64 {
    ((rand.next_u64() >> 11) as f64 + 0.5) * UNIT
}

const UNIT: f64 = 1.0 / (1u64 << 53) as f64;

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use tinyrand::{Seeded, StdRand};
    use tinyrand_alloc::{fixed, Mock};

    use super::*;

    const SAMPLES: usize = 100_000;

    #[test]
    fn certain_home_win() {
        let model = ScoreModel::default();
        let probs = HeadToHead::new(1.0, 0.0, 0.0);
        let mut rand = StdRand::seed(7);
        for _ in 0..SAMPLES {
            let score = model.sample(&probs, &mut rand);
            assert!(score.home > score.away, "{score}");
        }
    }

    #[test]
    fn certain_draw() {
        let model = ScoreModel::default();
        let probs = HeadToHead::new(0.0, 1.0, 0.0);
        let mut rand = StdRand::seed(7);
        for _ in 0..SAMPLES {
            let score = model.sample(&probs, &mut rand);
            assert_eq!(score.home, score.away, "{score}");
        }
    }

    #[test]
    fn certain_away_win() {
        let model = ScoreModel::default();
        let probs = HeadToHead::new(0.0, 0.0, 1.0);
        let mut rand = StdRand::seed(7);
        for _ in 0..SAMPLES {
            let score = model.sample(&probs, &mut rand);
            assert!(score.home < score.away, "{score}");
        }
    }

    #[test]
    fn outcome_frequencies() {
        let model = ScoreModel::default();
        let probs = HeadToHead::new(0.5, 0.3, 0.2);
        let mut rand = StdRand::seed(42);
        let mut counts = [0usize; 3];
        for _ in 0..SAMPLES {
            let score = model.sample(&probs, &mut rand);
            let index = match score.home.cmp(&score.away) {
                std::cmp::Ordering::Greater => 0,
                std::cmp::Ordering::Equal => 1,
                std::cmp::Ordering::Less => 2,
            };
            counts[index] += 1;
        }
        let freqs: Vec<_> = counts.iter().map(|&count| count as f64 / SAMPLES as f64).collect();
        assert_float_absolute_eq!(0.5, freqs[0], 0.01);
        assert_float_absolute_eq!(0.3, freqs[1], 0.01);
        assert_float_absolute_eq!(0.2, freqs[2], 0.01);
    }

    #[test]
    fn geometric_degenerate() {
        let mut rand = StdRand::seed(0);
        for _ in 0..1_000 {
            assert_eq!(0, geometric(1.0, &mut rand));
        }
    }

    #[test]
    fn geometric_mean() {
        // mean of failures before success is (1 - p) / p
        let mut rand = StdRand::seed(3);
        for p in [0.3, 0.5, 0.8] {
            let sum: u64 = (0..SAMPLES).map(|_| geometric(p, &mut rand) as u64).sum();
            let mean = sum as f64 / SAMPLES as f64;
            assert_float_relative_eq!((1.0 - p) / p, mean, 0.05);
        }
    }

    #[test]
    fn geometric_capped() {
        // the smallest uniform draw yields the longest run of failures
        let mut rand = Mock::default().with_next_u128(fixed(0));
        assert_eq!(729, geometric(0.05, &mut rand));
        assert_eq!(MAX_GOALS as u16, geometric(1e-9, &mut rand));
    }

    #[test]
    fn random_f64_bounds() {
        let mut rand = StdRand::seed(11);
        for _ in 0..SAMPLES {
            let closed = random_f64(&mut rand);
            assert!((0.0..1.0).contains(&closed), "{closed}");
            let open = random_open_f64(&mut rand);
            assert!(open > 0.0 && open < 1.0, "{open}");
        }
    }

    #[test]
    fn validate() {
        ScoreModel::default().validate().unwrap();
        let model = ScoreModel {
            base_goals: 0.0,
            ..ScoreModel::default()
        };
        assert_eq!(
            "base goals probability must be in the range 0.05..=1.0",
            model.validate().unwrap_err().to_string()
        );
        let model = ScoreModel {
            winning_margin: 1.5,
            ..ScoreModel::default()
        };
        assert_eq!(
            "winning margin probability must be in the range 0.05..=1.0",
            model.validate().unwrap_err().to_string()
        );
    }
}
