//! Match records and their descriptive metadata.

use std::{fmt, str::FromStr};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{HalfStats, MatchStats, ParseError};
use crate::store::Section;

/// One of the two recording periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    First,
    Second,
}

impl Half {
    pub const ALL: [Half; 2] = [Half::First, Half::Second];

    pub fn as_str(&self) -> &'static str {
        match self {
            Half::First => "first",
            Half::Second => "second",
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Half {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "first" | "1" => Ok(Half::First),
            "second" | "2" => Ok(Half::Second),
            other => Err(ParseError::UnknownHalf(other.to_string())),
        }
    }
}

/// The statistic category a match session is set up to collect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectorRole {
    #[default]
    Passing,
    AttackThird,
    BoxEntry,
    Shots,
}

impl CollectorRole {
    pub const ALL: [CollectorRole; 4] = [
        CollectorRole::Passing,
        CollectorRole::AttackThird,
        CollectorRole::BoxEntry,
        CollectorRole::Shots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorRole::Passing => "passing",
            CollectorRole::AttackThird => "attackThird",
            CollectorRole::BoxEntry => "boxEntry",
            CollectorRole::Shots => "shots",
        }
    }

    /// A known role name, or `Passing` for anything else (missing, null,
    /// `false`, unknown names).
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .and_then(|role| role.parse().ok())
            .unwrap_or_default()
    }

    pub fn section(&self) -> Section {
        match self {
            CollectorRole::Passing => Section::Passing,
            CollectorRole::AttackThird => Section::AttackThird,
            CollectorRole::BoxEntry => Section::BoxEntry,
            CollectorRole::Shots => Section::Shots,
        }
    }
}

impl fmt::Display for CollectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectorRole {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CollectorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| ParseError::UnknownRole(value.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMeta {
    pub date_time: String,
    pub location: String,
    pub home_team: String,
    pub away_team: String,
    pub notes: String,
    /// Older records predate this field.
    #[serde(default, deserialize_with = "lenient_role")]
    pub collector_role: CollectorRole,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<CollectorRole, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(CollectorRole::from_value(value.as_ref()))
}

/// Partial metadata update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPatch {
    pub date_time: Option<String>,
    pub location: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub notes: Option<String>,
    pub collector_role: Option<CollectorRole>,
}

impl MetaPatch {
    pub fn is_empty(&self) -> bool {
        self == &MetaPatch::default()
    }

    pub fn apply(self, meta: &mut MatchMeta) {
        if let Some(value) = self.date_time {
            meta.date_time = value;
        }
        if let Some(value) = self.location {
            meta.location = value;
        }
        if let Some(value) = self.home_team {
            meta.home_team = value;
        }
        if let Some(value) = self.away_team {
            meta.away_team = value;
        }
        if let Some(value) = self.notes {
            meta.notes = value;
        }
        if let Some(value) = self.collector_role {
            meta.collector_role = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub meta: MatchMeta,
    pub stats: MatchStats,
}

impl Match {
    /// Fresh record with all-zero stats for both halves.
    pub fn new(meta: MatchMeta) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now.clone(),
            updated_at: now,
            meta,
            stats: MatchStats {
                first: HalfStats::default(),
                second: HalfStats::default(),
            },
        }
    }

    /// `updatedAt`, or `createdAt` for records that never stored one.
    pub fn last_touched(&self) -> &str {
        if self.updated_at.is_empty() {
            &self.created_at
        } else {
            &self.updated_at
        }
    }

    pub fn title(&self) -> String {
        format!("{} – {}", self.meta.home_team, self.meta.away_team)
    }
}

/// Current UTC time in the `2024-05-01T18:30:00.000Z` shape stored on records.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
