//! Ranking of a league table under the tie-break chain.
//!
//! The chain, applied in order until two teams differ:
//!
//! 1. points,
//! 2. goal difference,
//! 3. goals for,
//! 4. away goals for,
//! 5. matches won,
//! 6. away matches won,
//! 7. opponents' points,
//! 8. opponents' goal difference,
//! 9. opponents' goals for,
//! 10. team name (ascending).
//!
//! All numeric criteria rank the larger value first. Because roster indices follow name order, the
//! last criterion compares indices and the resulting order is total.

use std::cmp::Ordering;

use crate::error::IncompleteSeason;
use crate::roster::Roster;
use crate::stats::{StatisticsTable, TeamStatistics};

pub fn compare(a: &TeamStatistics, b: &TeamStatistics) -> Ordering {
    b.overall
        .points
        .cmp(&a.overall.points)
        .then_with(|| b.overall.goal_difference().cmp(&a.overall.goal_difference()))
        .then_with(|| b.overall.goals_for.cmp(&a.overall.goals_for))
        .then_with(|| b.away.goals_for.cmp(&a.away.goals_for))
        .then_with(|| b.overall.won.cmp(&a.overall.won))
        .then_with(|| b.away.won.cmp(&a.away.won))
        .then_with(|| b.opponent_points.cmp(&a.opponent_points))
        .then_with(|| b.opponent_goal_difference.cmp(&a.opponent_goal_difference))
        .then_with(|| b.opponent_goals_for.cmp(&a.opponent_goals_for))
        .then_with(|| a.team.cmp(&b.team))
}

/// Roster indices of all teams in the table, ordered first to last.
pub fn order(table: &StatisticsTable) -> Vec<usize> {
    let mut order: Vec<_> = (0..table.len()).collect();
    order.sort_unstable_by(|&a, &b| compare(&table.teams()[a], &table.teams()[b]));
    order
}

/// Verifies that every team in the table has played the same number of fixtures.
pub fn check_complete(roster: &Roster, table: &StatisticsTable) -> Result<(), IncompleteSeason> {
    let mut teams = table.teams().iter();
    if let Some(first) = teams.next() {
        let expected = first.played();
        if let Some(uneven) = teams.find(|stats| stats.played() != expected) {
            return Err(IncompleteSeason {
                team: roster[uneven.team].clone(),
                played: uneven.played(),
                expected,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingEntry<'a> {
    /// 1-based.
    pub position: usize,
    pub stats: &'a TeamStatistics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standings<'a> {
    entries: Vec<StandingEntry<'a>>,
}
impl<'a> Standings<'a> {
    /// Ranks a finished season, failing if teams have played unequal numbers of fixtures.
    pub fn rank(roster: &Roster, table: &'a StatisticsTable) -> Result<Self, IncompleteSeason> {
        check_complete(roster, table)?;
        Ok(Self::interim(table))
    }

    /// Ranks a season that may still be in progress.
    pub fn interim(table: &'a StatisticsTable) -> Self {
        let entries = order(table)
            .into_iter()
            .enumerate()
            .map(|(rank, team)| StandingEntry {
                position: rank + 1,
                stats: &table.teams()[team],
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[StandingEntry<'a>] {
        &self.entries
    }

    pub fn position_of(&self, team: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.stats.team == team)
            .map(|entry| entry.position)
    }
}
