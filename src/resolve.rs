//! Resolution of scheduled fixtures into pending fixtures with concrete outcome probabilities.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::domain::{FallbackPolicy, HeadToHead, Match, PendingFixture, ScheduledFixture, TeamId};
use crate::error::SimulationError;
use crate::model;
use crate::stats;

/// Assigns probabilities to every scheduled fixture. Quoted odds are used when present; otherwise
/// the probabilities are estimated from the completed matches, falling back per `policy` where no
/// estimate is possible.
pub fn resolve_fixtures(
    completed: &[Match],
    scheduled: &[ScheduledFixture],
    policy: FallbackPolicy,
) -> Result<Vec<PendingFixture>, SimulationError> {
    let (roster, table) = stats::aggregate(completed)?;
    let lookup = |team: &TeamId| roster.index_of(team).and_then(|index| table.get(index));

    let mut modelled = 0;
    let mut fallbacks = 0;
    let pending = scheduled
        .iter()
        .map(|fixture| -> Result<_, SimulationError> {
            let probs = match fixture.odds {
                Some(odds) => odds,
                None => {
                    modelled += 1;
                    match model::estimate(
                        (&fixture.home, lookup(&fixture.home)),
                        (&fixture.away, lookup(&fixture.away)),
                    ) {
                        Ok(probs) => probs,
                        Err(err) => match policy {
                            FallbackPolicy::Uniform => {
                                warn!("{err}; assuming uniform probabilities");
                                fallbacks += 1;
                                HeadToHead::uniform()
                            }
                            FallbackPolicy::Reject => return Err(err.into()),
                        },
                    }
                }
            };
            let pending = PendingFixture {
                home: fixture.home.clone(),
                away: fixture.away.clone(),
                probs,
            };
            pending.validate()?;
            Ok(pending)
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "resolved {} fixtures: {} quoted, {modelled} modelled, {fallbacks} by fallback",
        pending.len(),
        pending.len() - modelled
    );
    Ok(pending)
}

/// Pairs each scheduled fixture lacking odds with a quote for the same home and away teams. Where
/// several quotes exist for a pairing, the first one is used.
pub fn attach_odds(scheduled: Vec<ScheduledFixture>, quotes: &[PendingFixture]) -> Vec<ScheduledFixture> {
    let mut by_pairing = FxHashMap::default();
    for quote in quotes {
        by_pairing
            .entry((&quote.home, &quote.away))
            .or_insert(quote.probs);
    }
    scheduled
        .into_iter()
        .map(|fixture| {
            if fixture.odds.is_some() {
                return fixture;
            }
            let quoted = by_pairing.get(&(&fixture.home, &fixture.away)).copied();
            match quoted {
                Some(odds) => fixture.with_odds(odds),
                None => fixture,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;
    use crate::domain::Score;
    use crate::error::MalformedInput;

    fn m(home: &str, away: &str, home_score: u16, away_score: u16) -> Match {
        Match::new(home, away, Score::new(home_score, away_score))
    }

    #[test]
    fn quoted_odds_used_verbatim() {
        let odds = HeadToHead::new(0.6, 0.25, 0.15);
        let pending = resolve_fixtures(
            &[],
            &[ScheduledFixture::new("Roma", "Genk").with_odds(odds)],
            FallbackPolicy::Reject,
        )
        .unwrap();
        assert_eq!(vec![PendingFixture::new("Roma", "Genk", odds)], pending);
    }

    #[test]
    fn modelled_from_completed() {
        let completed = vec![m("Roma", "Genk", 2, 0), m("Genk", "Roma", 1, 1)];
        let pending = resolve_fixtures(
            &completed,
            &[ScheduledFixture::new("Roma", "Genk")],
            FallbackPolicy::Reject,
        )
        .unwrap();
        // roma: won 1 (home), drawn 1 (away); genk: lost 1 (away), drawn 1 (home)
        // home: 1 + 1 + 1 + 1, draw: 1 + 0 + 1 + 0, away: 0
        let probs = pending[0].probs;
        assert_f64_near!(4.0 / 6.0, probs.win);
        assert_f64_near!(2.0 / 6.0, probs.draw);
        assert_f64_near!(0.0, probs.loss);
    }

    #[test]
    fn uniform_fallback() {
        let pending = resolve_fixtures(
            &[],
            &[ScheduledFixture::new("Roma", "Genk")],
            FallbackPolicy::Uniform,
        )
        .unwrap();
        assert_eq!(HeadToHead::uniform(), pending[0].probs);
    }

    #[test]
    fn rejected_fallback() {
        let err = resolve_fixtures(
            &[],
            &[ScheduledFixture::new("Roma", "Genk")],
            FallbackPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::UndefinedProbability(_)), "{err:?}");
    }

    #[test]
    fn malformed_odds_rejected() {
        let err = resolve_fixtures(
            &[],
            &[ScheduledFixture::new("Roma", "Genk").with_odds(HeadToHead::new(0.6, 0.6, 0.0))],
            FallbackPolicy::Uniform,
        )
        .unwrap_err();
        assert!(
            matches!(err, SimulationError::MalformedInput(MalformedInput::WrongBooksum(_))),
            "{err:?}"
        );
    }

    #[test]
    fn odds_attached_by_exact_pairing() {
        let quoted = HeadToHead::new(0.5, 0.3, 0.2);
        let existing = HeadToHead::new(0.2, 0.3, 0.5);
        let scheduled = vec![
            ScheduledFixture::new("Roma", "Genk"),
            ScheduledFixture::new("Genk", "Roma"),
            ScheduledFixture::new("Lyon", "Roma").with_odds(existing),
        ];
        let quotes = vec![
            PendingFixture::new("Roma", "Genk", quoted),
            PendingFixture::new("Roma", "Genk", HeadToHead::uniform()),
            PendingFixture::new("Lyon", "Roma", quoted),
        ];
        let attached = attach_odds(scheduled, &quotes);
        assert_eq!(Some(quoted), attached[0].odds);
        assert_eq!(None, attached[1].odds);
        assert_eq!(Some(existing), attached[2].odds);
    }
}
