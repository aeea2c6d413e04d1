//! Monte Carlo projection of final standings.
//!
//! Each trial plays out every pending fixture of a [Season], ranks the completed table and records
//! the outcome in a [Distribution]. Trials are split into contiguous blocks, one per worker, and
//! every trial draws from its own random stream derived from the master seed and the trial's
//! index. The merged result is therefore the same regardless of the number of workers.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::bail;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tinyrand::{Rand, Seeded, Wyrand};
use tracing::debug;

use crate::distribution::{Distribution, Frequencies};
use crate::domain::{FallbackPolicy, Match, ScheduledFixture, TeamId};
use crate::error::SimulationError;
use crate::resolve;
use crate::roster::Roster;
use crate::sampler::ScoreModel;
use crate::season::Season;
use crate::stats::StatisticsTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trials: u64,
    pub seed: u64,
    pub workers: usize,
    /// 1-based positions whose points distributions are reported.
    pub boundaries: Vec<usize>,
    pub score_model: ScoreModel,
    pub fallback: FallbackPolicy,
    pub retain_trials: bool,
}
impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.trials == 0 {
            bail!("at least one trial is required");
        }
        if self.workers == 0 {
            bail!("at least one worker is required");
        }
        if self.boundaries.contains(&0) {
            bail!("boundary positions are 1-based");
        }
        self.score_model.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: 0,
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            boundaries: vec![],
            score_model: Default::default(),
            fallback: Default::default(),
            retain_trials: false,
        }
    }
}

/// Standing of one team at the end of a single trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Roster index of the team.
    pub team: usize,
    pub name: TeamId,
    /// 1-based.
    pub position: usize,
    pub points: u32,
    pub goal_difference: i32,
}

/// The final table of a single trial, first to last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: u64,
    pub standings: Vec<TrialRecord>,
}
impl TrialOutcome {
    fn new(trial: u64, roster: &Roster, order: &[usize], table: &StatisticsTable) -> Self {
        let standings = order
            .iter()
            .enumerate()
            .map(|(rank, &team)| {
                let stats = &table.teams()[team];
                TrialRecord {
                    team,
                    name: roster[team].clone(),
                    position: rank + 1,
                    points: stats.points(),
                    goal_difference: stats.goal_difference(),
                }
            })
            .collect();
        Self { trial, standings }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    roster: Roster,
    distribution: Distribution,
    boundaries: Vec<usize>,
    trials: Option<Vec<TrialOutcome>>,
}
impl Projection {
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn index_of(&self, team: &TeamId) -> Option<usize> {
        self.roster.index_of(team)
    }

    pub fn first_place_probability(&self, team: usize) -> f64 {
        self.distribution.position_probability(team, 1)
    }

    pub fn last_place_probability(&self, team: usize) -> f64 {
        self.distribution
            .position_probability(team, self.distribution.teams())
    }

    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Points distribution of whichever team finished at each boundary position.
    pub fn boundary_points(&self) -> Vec<(usize, &Frequencies)> {
        self.boundaries
            .iter()
            .map(|&position| (position, self.distribution.points_at_position(position)))
            .collect()
    }

    /// Per-trial outcomes ordered by trial index, if they were retained.
    pub fn trials(&self) -> Option<&[TrialOutcome]> {
        self.trials.as_deref()
    }
}

struct Batch {
    distribution: Distribution,
    trials: Vec<TrialOutcome>,
}

#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: Config,
}
impl Simulator {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn with_trials(mut self, trials: u64) -> Self {
        self.config.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn with_boundaries(mut self, boundaries: Vec<usize>) -> Self {
        self.config.boundaries = boundaries;
        self
    }

    pub fn with_retain_trials(mut self, retain_trials: bool) -> Self {
        self.config.retain_trials = retain_trials;
        self
    }

    /// Resolves the probabilities of the scheduled fixtures under the configured fallback policy
    /// and assembles the season.
    pub fn prepare(
        &self,
        completed: Vec<Match>,
        scheduled: &[ScheduledFixture],
    ) -> Result<Season, SimulationError> {
        let pending = resolve::resolve_fixtures(&completed, scheduled, self.config.fallback)?;
        Season::new(completed, pending)
    }

    pub fn run(&self, season: &Season) -> Result<Projection, SimulationError> {
        self.run_interruptible(season, &AtomicBool::new(false))
    }

    /// As [Simulator::run], checking `interrupt` between trials and abandoning the run once it is
    /// set.
    pub fn run_interruptible(
        &self,
        season: &Season,
        interrupt: &AtomicBool,
    ) -> Result<Projection, SimulationError> {
        self.config
            .validate()
            .map_err(|err| SimulationError::InvalidConfig(err.to_string()))?;
        let teams = season.roster().len();
        if let Some(&position) = self.config.boundaries.iter().find(|&&position| position > teams) {
            return Err(SimulationError::InvalidConfig(format!(
                "boundary position {position} out of range 1..={teams}"
            )));
        }

        let blocks = split(self.config.trials, self.config.workers);
        debug!(
            "running {} trials in {} block(s) for {teams} teams and {} pending fixtures",
            self.config.trials,
            blocks.len(),
            season.pending().len()
        );
        let batches: Vec<_> = if blocks.len() == 1 {
            blocks
                .into_iter()
                .map(|block| self.run_block(season, block, interrupt))
                .collect::<Result<_, _>>()?
        } else {
            let pool = ThreadPoolBuilder::new().num_threads(blocks.len()).build()?;
            pool.install(|| {
                blocks
                    .into_par_iter()
                    .map(|block| self.run_block(season, block, interrupt))
                    .collect::<Result<_, _>>()
            })?
        };

        let mut distribution = Distribution::new(teams);
        let mut trials = self.config.retain_trials.then(Vec::new);
        for batch in batches {
            distribution += batch.distribution;
            if let Some(trials) = &mut trials {
                trials.extend(batch.trials);
            }
        }
        debug!("completed {} trials", distribution.trials());

        Ok(Projection {
            roster: season.roster().clone(),
            distribution,
            boundaries: self.config.boundaries.clone(),
            trials,
        })
    }

    fn run_block(
        &self,
        season: &Season,
        block: Range<u64>,
        interrupt: &AtomicBool,
    ) -> Result<Batch, SimulationError> {
        let mut distribution = Distribution::new(season.roster().len());
        let mut trials = vec![];
        for trial in block {
            if interrupt.load(Ordering::Relaxed) {
                return Err(SimulationError::Interrupted);
            }
            let mut rand = trial_rand(self.config.seed, trial);
            let (order, table) = season.play_out(&self.config.score_model, &mut rand);
            distribution.record(&order, &table);
            if self.config.retain_trials {
                trials.push(TrialOutcome::new(trial, season.roster(), &order, &table));
            }
        }
        Ok(Batch {
            distribution,
            trials,
        })
    }
}

impl TryFrom<Config> for Simulator {
    type Error = SimulationError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config
            .validate()
            .map_err(|err| SimulationError::InvalidConfig(err.to_string()))?;
        Ok(Self { config })
    }
}

/// Splits `trials` into at most `workers` contiguous, non-empty blocks of near-equal size.
fn split(trials: u64, workers: usize) -> Vec<Range<u64>> {
    let workers = (workers as u64).clamp(1, trials.max(1));
    let block = trials.div_ceil(workers);
    (0..workers)
        .map(|worker| worker * block..((worker + 1) * block).min(trials))
        .filter(|range| !range.is_empty())
        .collect()
}

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// A random stream unique to the given trial.
#[inline]
fn trial_rand(seed: u64, trial: u64) -> Wyrand {
    let mut seeder = Wyrand::seed(seed ^ trial.wrapping_mul(GOLDEN_GAMMA));
    Wyrand::seed(seeder.next_u64())
}
