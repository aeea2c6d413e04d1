//! The set of teams in a season, each assigned a dense index.
//!
//! Indices are issued in ascending lexicographic order of team name, so comparing two indices is
//! equivalent to comparing the names they refer to. The ranking relies on this as its final
//! tiebreaker.

use std::collections::BTreeSet;
use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::domain::TeamId;

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    team_to_index: FxHashMap<TeamId, usize>,
    index_to_team: Vec<TeamId>,
}
impl Roster {
    pub fn index_of(&self, team: &TeamId) -> Option<usize> {
        self.team_to_index.get(team).copied()
    }

    pub fn team_at(&self, index: usize) -> Option<&TeamId> {
        self.index_to_team.get(index)
    }

    pub fn len(&self) -> usize {
        self.index_to_team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_team.is_empty()
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.index_to_team
    }
}

impl Index<usize> for Roster {
    type Output = TeamId;

    fn index(&self, index: usize) -> &Self::Output {
        self.team_at(index)
            .unwrap_or_else(|| panic!("no team at index {index}"))
    }
}

impl<'a> FromIterator<&'a TeamId> for Roster {
    fn from_iter<I: IntoIterator<Item = &'a TeamId>>(iter: I) -> Self {
        let sorted: BTreeSet<&TeamId> = iter.into_iter().collect();
        let index_to_team: Vec<TeamId> = sorted.into_iter().cloned().collect();
        let mut team_to_index =
            FxHashMap::with_capacity_and_hasher(index_to_team.len(), Default::default());
        for (index, team) in index_to_team.iter().enumerate() {
            team_to_index.insert(team.clone(), index);
        }
        Self {
            team_to_index,
            index_to_team,
        }
    }
}
