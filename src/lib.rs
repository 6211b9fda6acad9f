pub mod cli;
pub mod commands;
pub mod db;
pub mod export;
pub mod i18n;
pub mod models;
pub mod notify;
pub mod settings;
pub mod store;
mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;

use db::{SlotStorage, SqliteSlots};
use i18n::{Key, Lang};
use notify::{Notifier, ToastCenter, ToastKind};
use settings::{SettingsStore, TrackerSettings};
use store::MatchStore;

pub const DATABASE_FILE: &str = "match-tracker.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// Everything a front end needs: the store, its backing slots, the toast
/// center and the active language.
pub struct App {
    pub store: MatchStore,
    pub storage: Arc<dyn SlotStorage>,
    pub toasts: Arc<ToastCenter>,
    pub lang: Lang,
    pub settings: TrackerSettings,
}

impl App {
    /// Opens the SQLite slots and settings under `data_dir`. Toasts are shown
    /// through `display`.
    pub fn open(data_dir: &Path, display: Arc<dyn Notifier>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?.current();
        let storage = SqliteSlots::open(data_dir.join(DATABASE_FILE))
            .context("Failed to open match storage")?;
        Ok(Self::with_storage(Arc::new(storage), display, &settings))
    }

    pub fn with_storage(
        storage: Arc<dyn SlotStorage>,
        display: Arc<dyn Notifier>,
        settings: &TrackerSettings,
    ) -> Self {
        let lang = i18n::resolve_language(storage.as_ref());
        let toasts = Arc::new(ToastCenter::with_display(settings.toast_ttl(), display));
        let store = MatchStore::open(
            Arc::clone(&storage),
            settings.store_options(lang),
            toasts.clone(),
        );
        Self {
            store,
            storage,
            toasts,
            lang,
            settings: settings.clone(),
        }
    }

    /// Stores the preference and switches the strings used from now on.
    pub fn set_language(&mut self, lang: Lang) -> Result<()> {
        i18n::store_language(self.storage.as_ref(), lang)?;
        self.lang = lang;
        Ok(())
    }

    pub fn toast(&self, key: Key, kind: ToastKind) {
        self.toasts.notify(i18n::t(self.lang, key), kind);
    }
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = cli::Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(cli::dispatch(args))
}
