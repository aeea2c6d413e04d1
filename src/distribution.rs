//! Frequency tables of simulated outcomes.
//!
//! A [Distribution] is accumulated privately by each worker and the partials are merged by
//! addition, which is commutative and associative; the merged result is therefore independent of
//! how trials were scheduled.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use crate::stats::StatisticsTable;

pub type Frequencies = BTreeMap<u32, u64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    teams: usize,
    trials: u64,
    /// Row-major: `positions[team * teams + position_index]`.
    positions: Vec<u64>,
    points: Vec<Frequencies>,
    points_by_position: Vec<Frequencies>,
    goal_difference_sums: Vec<i64>,
}
impl Distribution {
    pub fn new(teams: usize) -> Self {
        Self {
            teams,
            trials: 0,
            positions: vec![0; teams * teams],
            points: vec![Frequencies::default(); teams],
            points_by_position: vec![Frequencies::default(); teams],
            goal_difference_sums: vec![0; teams],
        }
    }

    /// Records one realised season, given the roster indices of the teams in finishing order.
    pub fn record(&mut self, order: &[usize], table: &StatisticsTable) {
        debug_assert_eq!(self.teams, order.len());
        self.trials += 1;
        for (position_index, &team) in order.iter().enumerate() {
            let stats = &table.teams()[team];
            self.positions[team * self.teams + position_index] += 1;
            *self.points[team].entry(stats.points()).or_default() += 1;
            *self.points_by_position[position_index]
                .entry(stats.points())
                .or_default() += 1;
            self.goal_difference_sums[team] += stats.goal_difference() as i64;
        }
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Number of trials in which `team` finished at the 1-based `position`.
    pub fn position_count(&self, team: usize, position: usize) -> u64 {
        assert!(
            (1..=self.teams).contains(&position),
            "position {position} out of range 1..={}",
            self.teams
        );
        self.positions[team * self.teams + position - 1]
    }

    /// Finishing-position counts for `team`, indexed from the 1st position.
    pub fn position_counts(&self, team: usize) -> &[u64] {
        &self.positions[team * self.teams..(team + 1) * self.teams]
    }

    pub fn position_probability(&self, team: usize, position: usize) -> f64 {
        self.position_count(team, position) as f64 / self.trials as f64
    }

    pub fn points(&self, team: usize) -> &Frequencies {
        &self.points[team]
    }

    /// Points held by whichever team finished at the 1-based `position`.
    pub fn points_at_position(&self, position: usize) -> &Frequencies {
        &self.points_by_position[position - 1]
    }

    pub fn expected_points(&self, team: usize) -> f64 {
        mean(&self.points[team], self.trials)
    }

    pub fn expected_position(&self, team: usize) -> f64 {
        let weighted: u64 = self
            .position_counts(team)
            .iter()
            .enumerate()
            .map(|(position_index, &count)| (position_index as u64 + 1) * count)
            .sum();
        weighted as f64 / self.trials as f64
    }

    pub fn expected_goal_difference(&self, team: usize) -> f64 {
        self.goal_difference_sums[team] as f64 / self.trials as f64
    }
}

fn mean(frequencies: &Frequencies, trials: u64) -> f64 {
    let sum: u64 = frequencies
        .iter()
        .map(|(&value, &count)| value as u64 * count)
        .sum();
    sum as f64 / trials as f64
}

fn merge(target: &mut Frequencies, source: &Frequencies) {
    for (&value, &count) in source {
        *target.entry(value).or_default() += count;
    }
}

impl AddAssign<&Distribution> for Distribution {
    fn add_assign(&mut self, rhs: &Distribution) {
        assert_eq!(self.teams, rhs.teams, "cannot merge distributions of different leagues");
        self.trials += rhs.trials;
        for (count, &other) in self.positions.iter_mut().zip(rhs.positions.iter()) {
            *count += other;
        }
        for (points, other) in self.points.iter_mut().zip(rhs.points.iter()) {
            merge(points, other);
        }
        for (points, other) in self
            .points_by_position
            .iter_mut()
            .zip(rhs.points_by_position.iter())
        {
            merge(points, other);
        }
        for (sum, &other) in self
            .goal_difference_sums
            .iter_mut()
            .zip(rhs.goal_difference_sums.iter())
        {
            *sum += other;
        }
    }
}

impl AddAssign for Distribution {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl Add for Distribution {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}
