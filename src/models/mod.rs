//! Match data model.
//!
//! The JSON shape of these types is the persisted and exported format, so
//! field names stay camelCase on the wire.

mod match_record;
mod stats;

pub use match_record::{timestamp_now, CollectorRole, Half, Match, MatchMeta, MetaPatch};
pub use stats::{
    pct, EntryStats, HalfStats, MatchStats, PassStats, PassingStats, ShotSideStats, ShotStats,
};

use thiserror::Error;

/// Failure to parse one of the model's text forms (CLI arguments, import fields).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown half '{0}' (expected first or second)")]
    UnknownHalf(String),
    #[error("unknown collector role '{0}'")]
    UnknownRole(String),
    #[error("unknown counter path '{0}'")]
    UnknownCounterPath(String),
    #[error("unknown section '{0}'")]
    UnknownSection(String),
    #[error("unknown import mode '{0}' (expected merge or replace)")]
    UnknownImportMode(String),
    #[error("unknown language '{0}' (expected fi or en)")]
    UnknownLanguage(String),
    #[error("unknown export format '{0}' (expected json, csv or text)")]
    UnknownExportFormat(String),
}
