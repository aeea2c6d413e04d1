//! JSON input and output.

use std::fs::File;
use std::io::Error;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use tracing::debug;

use crate::domain::{Match, MatchRecord, PendingFixture, ScheduledFixture, TeamId};
use crate::error::MalformedInput;
use crate::reconcile;
use crate::resolve;

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, Error> {
    let file = File::open(path)?;
    Ok(from_reader(file)?)
}

/// JSON-encodes the `value` in pretty-printed form and writes it to a given `path`.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), Error> {
    let file = File::create(path)?;
    Ok(to_writer_pretty(file, value)?)
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error> {
        read_json(path)
    }
}

/// A season as stored on disk. The `quotes` are externally sourced odds, whose team names may be
/// spelled differently to those in the results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonFile {
    pub completed: Vec<MatchRecord>,
    pub scheduled: Vec<ScheduledFixture>,
    #[serde(default)]
    pub quotes: Vec<PendingFixture>,
}
impl SeasonFile {
    /// Validates the completed results and attaches the quoted odds to the scheduled fixtures,
    /// reconciling the quoted team names first.
    pub fn into_inputs(self) -> Result<(Vec<Match>, Vec<ScheduledFixture>), MalformedInput> {
        let completed = self
            .completed
            .into_iter()
            .map(Match::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if self.quotes.is_empty() {
            return Ok((completed, self.scheduled));
        }

        let canonical: Vec<&TeamId> = completed
            .iter()
            .flat_map(|m| [&m.home, &m.away])
            .chain(self.scheduled.iter().flat_map(|fixture| [&fixture.home, &fixture.away]))
            .collect();
        let foreign: Vec<&TeamId> = self
            .quotes
            .iter()
            .flat_map(|quote| [&quote.home, &quote.away])
            .collect();
        let mapping = reconcile::reconcile(canonical, foreign);
        debug!("reconciled {} quoted team names", mapping.len());
        let quotes = reconcile::rename_quotes(self.quotes, &mapping);
        Ok((completed, resolve::attach_odds(self.scheduled, &quotes)))
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::domain::{HeadToHead, Score};

    fn record(home: &str, away: &str, home_score: i64, away_score: i64) -> MatchRecord {
        MatchRecord {
            home: home.into(),
            away: away.into(),
            home_score,
            away_score,
        }
    }

    #[test]
    fn parse_season() {
        let json = r#"{
            "completed": [{"home": "Lazio", "away": "Porto", "home_score": 2, "away_score": 1}],
            "scheduled": [
                {"home": "Porto", "away": "Lazio"},
                {"home": "Lazio", "away": "Porto", "odds": {"win": 0.5, "draw": 0.3, "loss": 0.2}}
            ]
        }"#;
        let file: SeasonFile = serde_json::from_str(json).unwrap();
        assert_eq!(vec![record("Lazio", "Porto", 2, 1)], file.completed);
        assert_eq!(None, file.scheduled[0].odds);
        assert_eq!(Some(HeadToHead::new(0.5, 0.3, 0.2)), file.scheduled[1].odds);
        assert!(file.quotes.is_empty());
    }

    #[test]
    fn write_then_read() {
        let file = SeasonFile {
            completed: vec![record("Lazio", "Porto", 2, 1)],
            scheduled: vec![ScheduledFixture::new("Porto", "Lazio")],
            quotes: vec![],
        };
        let path = env::temp_dir().join(format!("standings-season-{}.json", std::process::id()));
        write_json(&path, &file).unwrap();
        let read = SeasonFile::read_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(file, read);
    }

    #[test]
    fn missing_file() {
        let result = SeasonFile::read_json_file("no/such/season.json");
        assert!(result.is_err());
    }

    #[test]
    fn quotes_reconciled_and_attached() {
        let file = SeasonFile {
            completed: vec![record("Internazionale", "Lyon", 1, 1)],
            scheduled: vec![ScheduledFixture::new("Lyon", "Internazionale")],
            quotes: vec![PendingFixture::new(
                "Olympique Lyon",
                "Inter",
                HeadToHead::new(0.4, 0.3, 0.3),
            )],
        };
        let (completed, scheduled) = file.into_inputs().unwrap();
        assert_eq!(vec![Match::new("Internazionale", "Lyon", Score::new(1, 1))], completed);
        assert_eq!(Some(HeadToHead::new(0.4, 0.3, 0.3)), scheduled[0].odds);
    }

    #[test]
    fn invalid_score_rejected() {
        let file = SeasonFile {
            completed: vec![record("Lazio", "Porto", -2, 1)],
            ..SeasonFile::default()
        };
        let err = file.into_inputs().unwrap_err();
        assert!(matches!(err, MalformedInput::InvalidScore { .. }), "{err:?}");
    }
}
