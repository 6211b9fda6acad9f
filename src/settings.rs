use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{i18n::Lang, store::StoreOptions};

pub const DATA_DIR_ENV: &str = "MATCH_TRACKER_DATA_DIR";

/// Timing knobs, stored as `settings.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerSettings {
    pub save_debounce_ms: u64,
    pub saved_toast_throttle_ms: u64,
    pub toast_ttl_ms: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            save_debounce_ms: 200,
            saved_toast_throttle_ms: 2000,
            toast_ttl_ms: 1800,
        }
    }
}

impl TrackerSettings {
    pub fn store_options(&self, lang: Lang) -> StoreOptions {
        StoreOptions {
            save_debounce: Duration::from_millis(self.save_debounce_ms),
            saved_toast_throttle: Duration::from_millis(self.saved_toast_throttle_ms),
            lang,
        }
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<TrackerSettings>,
}

impl SettingsStore {
    /// A missing or unparsable file yields the defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed settings at {}: {err}", path.display());
                TrackerSettings::default()
            })
        } else {
            TrackerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> TrackerSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: TrackerSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &TrackerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

/// `explicit`, then `$MATCH_TRACKER_DATA_DIR`, then the XDG data home, then `~/.local/share`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let env_dir = |name: &str| {
        std::env::var_os(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    };
    if let Some(dir) = env_dir(DATA_DIR_ENV) {
        return dir;
    }
    if let Some(base) = env_dir("XDG_DATA_HOME") {
        return base.join("match-tracker");
    }
    match env_dir("HOME") {
        Some(home) => home.join(".local").join("share").join("match-tracker"),
        None => PathBuf::from(".match-tracker"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.current(), TrackerSettings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"saveDebounceMs": 50}"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().current();
        assert_eq!(settings.save_debounce_ms, 50);
        assert_eq!(settings.saved_toast_throttle_ms, 2000);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{oops").unwrap();
        assert_eq!(
            SettingsStore::new(path).unwrap().current(),
            TrackerSettings::default()
        );
    }

    #[test]
    fn update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();
        let settings = TrackerSettings {
            toast_ttl_ms: 900,
            ..TrackerSettings::default()
        };
        store.update(settings.clone()).unwrap();

        assert_eq!(SettingsStore::new(path).unwrap().current(), settings);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let dir = Path::new("/tmp/tracker-explicit");
        assert_eq!(resolve_data_dir(Some(dir)), dir.to_path_buf());
    }
}
