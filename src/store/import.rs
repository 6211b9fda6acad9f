//! Validation of externally supplied match lists.
//!
//! Input is untrusted JSON. It is accepted only as a whole: one bad field in
//! any record rejects the entire list.

use std::{fmt, str::FromStr};

use serde_json::{Map, Value};
use thiserror::Error;

use super::CounterPath;
use crate::models::{CollectorRole, HalfStats, Match, MatchMeta, MatchStats, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Union by id; incoming records win.
    Merge,
    /// Discard the current collection.
    Replace,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportMode::Merge => "merge",
            ImportMode::Replace => "replace",
        })
    }
}

impl FromStr for ImportMode {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "merge" => Ok(ImportMode::Merge),
            "replace" => Ok(ImportMode::Replace),
            other => Err(ParseError::UnknownImportMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("import must be a JSON array of matches")]
    NotAnArray,
    #[error("match #{index}: `{field}` is missing or not {expected}")]
    InvalidField {
        index: usize,
        field: String,
        expected: &'static str,
    },
}

impl ImportError {
    /// True when the text parsed as JSON but did not describe matches.
    pub fn is_schema_error(&self) -> bool {
        !matches!(self, ImportError::Syntax(_))
    }
}

pub fn parse_import(text: &str) -> Result<Vec<Match>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    validate_matches(&value)
}

/// Every record checked, or nothing returned.
pub fn validate_matches(raw: &Value) -> Result<Vec<Match>, ImportError> {
    let items = raw.as_array().ok_or(ImportError::NotAnArray)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| RecordReader { index }.read_match(item))
        .collect()
}

struct RecordReader {
    index: usize,
}

impl RecordReader {
    fn invalid(&self, field: impl Into<String>, expected: &'static str) -> ImportError {
        ImportError::InvalidField {
            index: self.index,
            field: field.into(),
            expected,
        }
    }

    fn object<'a>(&self, value: Option<&'a Value>, field: &str) -> Result<&'a Map<String, Value>, ImportError> {
        value
            .and_then(Value::as_object)
            .ok_or_else(|| self.invalid(field, "an object"))
    }

    fn string(&self, object: &Map<String, Value>, key: &str, field: &str) -> Result<String, ImportError> {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    fn read_match(&self, item: &Value) -> Result<Match, ImportError> {
        let record = self.object(Some(item), "match")?;
        let id = self.string(record, "id", "id")?;
        let created_at = self.string(record, "createdAt", "createdAt")?;
        let updated_at = self.string(record, "updatedAt", "updatedAt")?;
        let meta = self.read_meta(record.get("meta"))?;

        let stats = self.object(record.get("stats"), "stats")?;
        let first = self.read_half(stats.get("first"), "stats.first")?;
        let second = self.read_half(stats.get("second"), "stats.second")?;

        Ok(Match {
            id,
            created_at,
            updated_at,
            meta,
            stats: MatchStats { first, second },
        })
    }

    fn read_meta(&self, value: Option<&Value>) -> Result<MatchMeta, ImportError> {
        let meta = self.object(value, "meta")?;
        Ok(MatchMeta {
            date_time: self.string(meta, "dateTime", "meta.dateTime")?,
            location: self.string(meta, "location", "meta.location")?,
            home_team: self.string(meta, "homeTeam", "meta.homeTeam")?,
            away_team: self.string(meta, "awayTeam", "meta.awayTeam")?,
            notes: self.string(meta, "notes", "meta.notes")?,
            collector_role: CollectorRole::from_value(meta.get("collectorRole")),
        })
    }

    fn read_half(&self, value: Option<&Value>, field: &str) -> Result<HalfStats, ImportError> {
        let half = value.ok_or_else(|| self.invalid(field, "an object"))?;
        let mut stats = HalfStats::default();
        for path in CounterPath::ALL {
            let leaf = path
                .segments()
                .try_fold(half, |node, key| node.as_object().and_then(|o| o.get(key)))
                .and_then(Value::as_f64)
                .filter(|number| number.is_finite())
                .ok_or_else(|| self.invalid(format!("{field}.{path}"), "a finite number"))?;
            *path.slot_mut(&mut stats) = to_counter(leaf);
        }
        Ok(stats)
    }
}

/// Fractions truncate, negatives become zero, oversized values saturate.
fn to_counter(value: f64) -> u32 {
    value.trunc().clamp(0.0, f64::from(u32::MAX)) as u32
}
