//! Reconciliation of team names between independently sourced data sets, such as a results feed
//! and a bookmaker's quotes, where the same team may be spelled differently.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::domain::{PendingFixture, TeamId};

/// Ratcliff/Obershelp similarity of two strings: twice the number of matching characters divided
/// by the total number of characters. Identical strings score 1; strings with nothing in common
/// score 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<_> = a.chars().collect();
    let b: Vec<_> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// The longest common contiguous block, preferring the earliest start in `a`, then in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j + 1] is the length of the common block ending at a[i] and b[j]
    let mut lengths = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut next = vec![0; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = lengths[j] + 1;
                next[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        lengths = next;
    }
    best
}

#[derive(Debug)]
struct Candidate<'a> {
    similarity: f64,
    canonical: &'a TeamId,
    foreign: &'a TeamId,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    /// Higher similarity first; ties go to the lexicographically smaller names.
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity
            .total_cmp(&other.similarity)
            .then_with(|| other.canonical.cmp(self.canonical))
            .then_with(|| other.foreign.cmp(self.foreign))
    }
}

/// Maps each foreign name onto a distinct canonical name, greedily taking the most similar
/// remaining pair until either side runs out. Pairs sharing no characters are never matched.
pub fn reconcile<'a>(
    canonical: impl IntoIterator<Item = &'a TeamId>,
    foreign: impl IntoIterator<Item = &'a TeamId>,
) -> FxHashMap<TeamId, TeamId> {
    let canonical: FxHashSet<_> = canonical.into_iter().collect();
    let foreign: FxHashSet<_> = foreign.into_iter().collect();

    let mut candidates = BinaryHeap::with_capacity(canonical.len() * foreign.len());
    for &canonical in &canonical {
        for &foreign in &foreign {
            let similarity = similarity(canonical.as_str(), foreign.as_str());
            if similarity > 0.0 {
                candidates.push(Candidate {
                    similarity,
                    canonical,
                    foreign,
                });
            }
        }
    }

    let mut assigned_canonical = FxHashSet::default();
    let mut mapping = FxHashMap::default();
    let pairs = canonical.len().min(foreign.len());
    while mapping.len() < pairs {
        let Some(candidate) = candidates.pop() else {
            break;
        };
        if mapping.contains_key(candidate.foreign) || assigned_canonical.contains(candidate.canonical) {
            continue;
        }
        if candidate.canonical != candidate.foreign {
            debug!(
                "reconciled {} as {} (similarity {:.3})",
                candidate.foreign, candidate.canonical, candidate.similarity
            );
        }
        assigned_canonical.insert(candidate.canonical);
        mapping.insert(candidate.foreign.clone(), candidate.canonical.clone());
    }
    mapping
}

/// Rewrites the team names in `quotes` through `mapping`. Names absent from the mapping are kept.
pub fn rename_quotes(quotes: Vec<PendingFixture>, mapping: &FxHashMap<TeamId, TeamId>) -> Vec<PendingFixture> {
    let rename = |team: TeamId| mapping.get(&team).cloned().unwrap_or(team);
    quotes
        .into_iter()
        .map(|quote| PendingFixture {
            home: rename(quote.home),
            away: rename(quote.away),
            probs: quote.probs,
        })
        .collect()
}
