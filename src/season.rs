//! A validated, immutable description of a league season: the results so far and the fixtures
//! still to be played, with their outcome probabilities.

use tinyrand::Rand;

use crate::domain::{HeadToHead, Match, PendingFixture, TeamId};
use crate::error::{IncompleteSeason, MalformedInput, SimulationError};
use crate::ranking;
use crate::roster::Roster;
use crate::sampler::ScoreModel;
use crate::stats::{Aggregator, StatisticsTable, TeamStatistics};

#[derive(Debug, Clone, PartialEq)]
struct IndexedFixture {
    home: usize,
    away: usize,
    probs: HeadToHead,
}

#[derive(Debug, Clone)]
pub struct Season {
    roster: Roster,
    completed: Vec<Match>,
    pending: Vec<PendingFixture>,
    indexed_pending: Vec<IndexedFixture>,
    baseline: Aggregator,
}
impl Season {
    /// Assembles a season, rejecting malformed records and schedules in which teams would end up
    /// playing unequal numbers of fixtures.
    pub fn new(completed: Vec<Match>, pending: Vec<PendingFixture>) -> Result<Self, SimulationError> {
        for fixture in &pending {
            fixture.validate()?;
        }
        let roster: Roster = completed
            .iter()
            .map(|m| (&m.home, &m.away))
            .chain(pending.iter().map(|fixture| (&fixture.home, &fixture.away)))
            .flat_map(|(home, away)| [home, away])
            .collect();
        if roster.is_empty() {
            return Err(MalformedInput::EmptySeason.into());
        }

        let mut baseline = Aggregator::new(roster.len());
        baseline.fold_matches(&roster, &completed)?;

        let index_of = |team: &TeamId| {
            roster
                .index_of(team)
                .ok_or_else(|| MalformedInput::UnknownTeam { team: team.clone() })
        };
        let indexed_pending = pending
            .iter()
            .map(|fixture| -> Result<_, MalformedInput> {
                Ok(IndexedFixture {
                    home: index_of(&fixture.home)?,
                    away: index_of(&fixture.away)?,
                    probs: fixture.probs,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let season = Self {
            roster,
            completed,
            pending,
            indexed_pending,
            baseline,
        };
        season.check_schedule()?;
        Ok(season)
    }

    fn check_schedule(&self) -> Result<(), IncompleteSeason> {
        let mut fixtures: Vec<_> = self
            .current_table()
            .teams()
            .iter()
            .map(TeamStatistics::played)
            .collect();
        for fixture in &self.indexed_pending {
            fixtures[fixture.home] += 1;
            fixtures[fixture.away] += 1;
        }
        let expected = fixtures[0];
        match fixtures.iter().position(|&played| played != expected) {
            None => Ok(()),
            Some(team) => Err(IncompleteSeason {
                team: self.roster[team].clone(),
                played: fixtures[team],
                expected,
            }),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn completed(&self) -> &[Match] {
        &self.completed
    }

    pub fn pending(&self) -> &[PendingFixture] {
        &self.pending
    }

    /// Statistics from the completed matches only.
    pub fn current_table(&self) -> StatisticsTable {
        self.baseline.clone().finish()
    }

    /// Plays out every pending fixture once and returns the final statistics, along with the
    /// roster indices of the teams in finishing order.
    pub fn play_out(&self, model: &ScoreModel, rand: &mut impl Rand) -> (Vec<usize>, StatisticsTable) {
        let mut aggregator = self.baseline.clone();
        for fixture in &self.indexed_pending {
            let score = model.sample(&fixture.probs, rand);
            aggregator.fold(fixture.home, fixture.away, score);
        }
        let table = aggregator.finish();
        debug_assert!(ranking::check_complete(&self.roster, &table).is_ok());
        (ranking::order(&table), table)
    }
}
