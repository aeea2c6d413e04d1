//! Folding of match results into per-team statistics.
//!
//! Aggregation happens in two phases. An [Aggregator] folds raw match results; it may be cloned
//! midway so that a common prefix of matches (the completed ones) is only folded once. Calling
//! [Aggregator::finish] then computes the opponent-strength aggregates from the final tallies and
//! yields an immutable [StatisticsTable].

use std::cmp::Ordering;

use crate::domain::{Match, Score, TeamId, DRAW_POINTS, WIN_POINTS};
use crate::error::MalformedInput;
use crate::roster::Roster;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}
impl Tally {
    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    #[inline]
    fn record(&mut self, goals_for: u16, goals_against: u16) {
        self.played += 1;
        self.goals_for += goals_for as u32;
        self.goals_against += goals_against as u32;
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => {
                self.won += 1;
                self.points += WIN_POINTS;
            }
            Ordering::Less => {
                self.lost += 1;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += DRAW_POINTS;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamStatistics {
    /// Roster index of the team.
    pub team: usize,
    pub overall: Tally,
    pub home: Tally,
    pub away: Tally,
    /// Roster indices of the opponents faced, one per fixture, in match order.
    pub opponents: Vec<usize>,
    pub opponent_points: u32,
    pub opponent_goal_difference: i32,
    pub opponent_goals_for: u32,
}
impl TeamStatistics {
    fn new(team: usize) -> Self {
        Self {
            team,
            ..Self::default()
        }
    }

    pub fn points(&self) -> u32 {
        self.overall.points
    }

    pub fn played(&self) -> u32 {
        self.overall.played
    }

    pub fn goal_difference(&self) -> i32 {
        self.overall.goal_difference()
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    teams: Vec<TeamStatistics>,
}
impl Aggregator {
    pub fn new(teams: usize) -> Self {
        Self {
            teams: (0..teams).map(TeamStatistics::new).collect(),
        }
    }

    /// Folds a single result between the teams at the given roster indices.
    #[inline]
    pub fn fold(&mut self, home: usize, away: usize, score: Score) {
        debug_assert_ne!(home, away);
        let home_stats = &mut self.teams[home];
        home_stats.overall.record(score.home, score.away);
        home_stats.home.record(score.home, score.away);
        home_stats.opponents.push(away);

        let away_stats = &mut self.teams[away];
        away_stats.overall.record(score.away, score.home);
        away_stats.away.record(score.away, score.home);
        away_stats.opponents.push(home);
    }

    pub fn fold_matches(&mut self, roster: &Roster, matches: &[Match]) -> Result<(), MalformedInput> {
        let indexed = index_matches(roster, matches)?;
        for (home, away, score) in indexed {
            self.fold(home, away, score);
        }
        Ok(())
    }

    pub fn finish(mut self) -> StatisticsTable {
        let sums: Vec<_> = self
            .teams
            .iter()
            .map(|stats| {
                stats.opponents.iter().fold((0, 0, 0), |(points, gd, gf), &opponent| {
                    let opponent = &self.teams[opponent].overall;
                    (
                        points + opponent.points,
                        gd + opponent.goal_difference(),
                        gf + opponent.goals_for,
                    )
                })
            })
            .collect();
        for (stats, (points, gd, gf)) in self.teams.iter_mut().zip(sums) {
            stats.opponent_points = points;
            stats.opponent_goal_difference = gd;
            stats.opponent_goals_for = gf;
        }
        StatisticsTable { teams: self.teams }
    }
}

/// Maps matches onto roster indices, rejecting the batch outright if any match is malformed.
fn index_matches(
    roster: &Roster,
    matches: &[Match],
) -> Result<Vec<(usize, usize, Score)>, MalformedInput> {
    let index_of = |team: &TeamId| {
        roster
            .index_of(team)
            .ok_or_else(|| MalformedInput::UnknownTeam { team: team.clone() })
    };
    matches
        .iter()
        .map(|m| -> Result<_, MalformedInput> {
            m.validate()?;
            Ok((index_of(&m.home)?, index_of(&m.away)?, m.score))
        })
        .collect()
}

/// Per-team statistics for one season, indexed by roster position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsTable {
    teams: Vec<TeamStatistics>,
}
impl StatisticsTable {
    pub fn aggregate(roster: &Roster, matches: &[Match]) -> Result<Self, MalformedInput> {
        let mut aggregator = Aggregator::new(roster.len());
        aggregator.fold_matches(roster, matches)?;
        Ok(aggregator.finish())
    }

    pub fn get(&self, index: usize) -> Option<&TeamStatistics> {
        self.teams.get(index)
    }

    pub fn teams(&self) -> &[TeamStatistics] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Aggregates a standalone list of matches, deriving the roster from the teams that appear in it.
pub fn aggregate(matches: &[Match]) -> Result<(Roster, StatisticsTable), MalformedInput> {
    let roster: Roster = matches
        .iter()
        .flat_map(|m| [&m.home, &m.away])
        .collect();
    let table = StatisticsTable::aggregate(&roster, matches)?;
    Ok((roster, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(home: &str, away: &str, home_score: u16, away_score: u16) -> Match {
        Match::new(home, away, Score::new(home_score, away_score))
    }

    fn sample_matches() -> Vec<Match> {
        vec![
            m("Porto", "Celtic", 3, 1),
            m("Celtic", "Lazio", 2, 2),
            m("Lazio", "Porto", 1, 0),
            m("Porto", "Lazio", 4, 4),
            m("Celtic", "Porto", 0, 2),
            m("Lazio", "Celtic", 0, 5),
        ]
    }

    #[test]
    fn single_match() {
        let (roster, table) = aggregate(&[m("Porto", "Celtic", 3, 1)]).unwrap();
        let porto = table.get(roster.index_of(&"Porto".into()).unwrap()).unwrap();
        let celtic = table.get(roster.index_of(&"Celtic".into()).unwrap()).unwrap();

        assert_eq!(
            Tally {
                played: 1,
                won: 1,
                drawn: 0,
                lost: 0,
                points: 3,
                goals_for: 3,
                goals_against: 1,
            },
            porto.overall
        );
        assert_eq!(porto.overall, porto.home);
        assert_eq!(Tally::default(), porto.away);
        assert_eq!(2, porto.goal_difference());

        assert_eq!(1, celtic.away.lost);
        assert_eq!(0, celtic.points());
        assert_eq!(-2, celtic.away.goal_difference());
        assert_eq!(Tally::default(), celtic.home);

        assert_eq!(vec![celtic.team], porto.opponents);
        assert_eq!(vec![porto.team], celtic.opponents);
        assert_eq!(0, porto.opponent_points);
        assert_eq!(-2, porto.opponent_goal_difference);
        assert_eq!(1, porto.opponent_goals_for);
        assert_eq!(3, celtic.opponent_points);
        assert_eq!(2, celtic.opponent_goal_difference);
        assert_eq!(3, celtic.opponent_goals_for);
    }

    #[test]
    fn draw_awards_one_point_each() {
        let (_, table) = aggregate(&[m("Porto", "Celtic", 1, 1)]).unwrap();
        for stats in table.teams() {
            assert_eq!(1, stats.points());
            assert_eq!(1, stats.overall.drawn);
            assert_eq!(0, stats.goal_difference());
        }
    }

    #[test]
    fn sums_are_conserved() {
        let (_, table) = aggregate(&sample_matches()).unwrap();
        let won: u32 = table.teams().iter().map(|stats| stats.overall.won).sum();
        let lost: u32 = table.teams().iter().map(|stats| stats.overall.lost).sum();
        let drawn: u32 = table.teams().iter().map(|stats| stats.overall.drawn).sum();
        assert_eq!(won, lost);
        assert_eq!(4, won);
        assert_eq!(4, drawn);

        let goals_for: u32 = table.teams().iter().map(|stats| stats.overall.goals_for).sum();
        let goals_against: u32 = table.teams().iter().map(|stats| stats.overall.goals_against).sum();
        assert_eq!(goals_for, goals_against);

        let goal_difference: i32 = table.teams().iter().map(TeamStatistics::goal_difference).sum();
        assert_eq!(0, goal_difference);

        let points: u32 = table.teams().iter().map(TeamStatistics::points).sum();
        assert_eq!(4 * WIN_POINTS + 4 * DRAW_POINTS, points);
    }

    #[test]
    fn splits_add_up() {
        let (_, table) = aggregate(&sample_matches()).unwrap();
        for stats in table.teams() {
            assert_eq!(stats.overall.played, stats.home.played + stats.away.played);
            assert_eq!(stats.overall.won, stats.home.won + stats.away.won);
            assert_eq!(stats.overall.drawn, stats.home.drawn + stats.away.drawn);
            assert_eq!(stats.overall.lost, stats.home.lost + stats.away.lost);
            assert_eq!(stats.overall.points, stats.home.points + stats.away.points);
            assert_eq!(stats.overall.goals_for, stats.home.goals_for + stats.away.goals_for);
            assert_eq!(stats.played() as usize, stats.opponents.len());
        }
    }

    #[test]
    fn opponent_aggregates_use_final_tallies() {
        let matches = sample_matches();
        let (roster, table) = aggregate(&matches).unwrap();
        let porto = table.get(roster.index_of(&"Porto".into()).unwrap()).unwrap();

        let expected_points: u32 = porto
            .opponents
            .iter()
            .map(|&opponent| table.get(opponent).unwrap().points())
            .sum();
        let expected_gd: i32 = porto
            .opponents
            .iter()
            .map(|&opponent| table.get(opponent).unwrap().goal_difference())
            .sum();
        assert_eq!(expected_points, porto.opponent_points);
        assert_eq!(expected_gd, porto.opponent_goal_difference);
        assert_eq!(4, porto.opponents.len());
    }

    #[test]
    fn opponents_in_match_order() {
        let (roster, table) = aggregate(&sample_matches()).unwrap();
        let porto = table.get(roster.index_of(&"Porto".into()).unwrap()).unwrap();
        let names: Vec<_> = porto
            .opponents
            .iter()
            .map(|&opponent| roster[opponent].as_str())
            .collect();
        assert_eq!(vec!["Celtic", "Lazio", "Lazio", "Celtic"], names);
    }

    #[test]
    fn cloned_prefix_matches_full_fold() {
        let matches = sample_matches();
        let (roster, expected) = aggregate(&matches).unwrap();

        let mut prefix = Aggregator::new(roster.len());
        prefix.fold_matches(&roster, &matches[..3]).unwrap();
        let mut resumed = prefix.clone();
        resumed.fold_matches(&roster, &matches[3..]).unwrap();
        assert_eq!(expected, resumed.finish());
    }

    #[test]
    fn self_match_rejected() {
        let err = aggregate(&[m("Porto", "Celtic", 1, 0), m("Porto", "Porto", 1, 0)]).unwrap_err();
        assert!(matches!(err, MalformedInput::SelfMatch { .. }), "{err:?}");
    }

    #[test]
    fn unknown_team_rejected() {
        let roster: Roster = [TeamId::from("Porto")].iter().collect();
        let err = StatisticsTable::aggregate(&roster, &[m("Porto", "Celtic", 1, 0)]).unwrap_err();
        assert_eq!("unknown team Celtic", err.to_string());
    }
}
