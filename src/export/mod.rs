//! Files produced for download or sharing. None of these are read back by
//! the app; re-entry goes through `store::import`.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};

use crate::{
    i18n::Lang,
    models::{Match, ParseError},
    store::AppState,
};

mod match_csv;
mod share;

pub use match_csv::{match_csv, HEADER as CSV_HEADER};
pub use share::share_text;

pub const ALL_MATCHES_FILENAME: &str = "ottelut.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(ParseError::UnknownExportFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "text",
        })
    }
}

/// A named blob ready to hand to a download or save mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub contents: String,
}

pub fn all_matches_json(state: &AppState) -> Result<String> {
    serde_json::to_string_pretty(&state.matches).context("failed to serialize matches")
}

pub fn match_json(record: &Match) -> Result<String> {
    serde_json::to_string_pretty(record).context("failed to serialize match")
}

pub fn all_matches_file(state: &AppState) -> Result<ExportFile> {
    Ok(ExportFile {
        filename: ALL_MATCHES_FILENAME.to_string(),
        mime: "application/json",
        contents: all_matches_json(state)?,
    })
}

pub fn match_file(record: &Match, format: ExportFormat, lang: Lang) -> Result<ExportFile> {
    let file = match format {
        ExportFormat::Json => ExportFile {
            filename: format!("ottelu-{}.json", record.id),
            mime: "application/json",
            contents: match_json(record)?,
        },
        ExportFormat::Csv => ExportFile {
            filename: format!("ottelu-{}.csv", record.id),
            mime: "text/csv",
            contents: match_csv(record)?,
        },
        ExportFormat::Text => ExportFile {
            filename: format!("ottelu-{}.txt", record.id),
            mime: "text/plain",
            contents: share_text(record, lang),
        },
    };
    Ok(file)
}

/// Saves `file` under `dir` and returns the written path.
pub fn write_export(dir: &Path, file: &ExportFile) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(&file.filename);
    std::fs::write(&path, &file.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchMeta;

    #[test]
    fn collection_export_is_a_pretty_array() {
        let state = AppState::new(vec![Match::new(MatchMeta::default())]);
        let json = all_matches_json(&state).unwrap();
        assert!(json.starts_with("[\n"));
        let parsed: Vec<Match> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state.matches);
    }

    #[test]
    fn match_files_are_named_by_id() {
        let record = Match::new(MatchMeta::default());
        let csv = match_file(&record, ExportFormat::Csv, Lang::En).unwrap();
        assert_eq!(csv.filename, format!("ottelu-{}.csv", record.id));
        assert_eq!(csv.mime, "text/csv");

        let json = match_file(&record, ExportFormat::Json, Lang::En).unwrap();
        assert!(json.contents.contains("\n  \"id\""));
    }

    #[test]
    fn write_export_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = all_matches_file(&AppState::default()).unwrap();
        let path = write_export(&dir.path().join("out"), &file).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
