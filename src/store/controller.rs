use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use super::{
    persistence::{PersistOptions, Persistence},
    AppState, CounterPath, ImportMode, Section,
};
use crate::{
    db::SlotStorage,
    i18n::{self, Key, Lang},
    log_info,
    models::{Half, Match, MatchMeta, MetaPatch},
    notify::Notifier,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub save_debounce: Duration,
    pub saved_toast_throttle: Duration,
    pub lang: Lang,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            save_debounce: Duration::from_millis(200),
            saved_toast_throttle: Duration::from_secs(2),
            lang: Lang::default(),
        }
    }
}

struct StoreInner {
    state: watch::Sender<Arc<AppState>>,
    persistence: Persistence,
}

/// Owner of the match collection.
///
/// Every mutation swaps in a fresh `Arc<AppState>`; snapshots handed out
/// earlier are never touched. Changed snapshots are queued for a debounced
/// write, and subscribers see each one through a watch channel.
#[derive(Clone)]
pub struct MatchStore {
    inner: Arc<StoreInner>,
}

impl MatchStore {
    /// Seeds from storage. The loaded snapshot itself is never written back.
    pub fn open(
        storage: Arc<dyn SlotStorage>,
        options: StoreOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let persistence = Persistence::new(
            storage,
            notifier,
            PersistOptions {
                debounce: options.save_debounce,
                saved_toast_throttle: options.saved_toast_throttle,
                saved_message: i18n::t(options.lang, Key::ToastSaved).to_string(),
            },
        );
        let initial = persistence.load();
        let (state, _) = watch::channel(Arc::new(initial));

        Self {
            inner: Arc::new(StoreInner { state, persistence }),
        }
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Receiver that observes every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.inner.state.subscribe()
    }

    pub fn find(&self, id: &str) -> Option<Match> {
        self.inner.state.borrow().find(id).cloned()
    }

    pub fn recent_matches(&self) -> Vec<Match> {
        self.inner
            .state
            .borrow()
            .recent()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Inserts a zeroed match at the front and returns its id.
    pub fn create_match(&self, meta: MatchMeta) -> String {
        let record = Match::new(meta);
        let id = record.id.clone();
        self.commit(|state| Some(state.with_prepended(record)));
        log_info!("Created match {id}");
        id
    }

    pub fn delete_match(&self, id: &str) {
        if self.commit(|state| state.without(id)) {
            log_info!("Deleted match {id}");
        }
    }

    pub fn update_meta(&self, id: &str, patch: MetaPatch) {
        self.commit(|state| state.with_updated(id, |record| patch.apply(&mut record.meta)));
    }

    pub fn update_counter(&self, id: &str, half: Half, path: CounterPath, delta: i64) {
        self.commit(|state| {
            state.with_updated(id, |record| {
                path.apply(record.stats.half_mut(half), delta);
            })
        });
    }

    pub fn reset_section(&self, id: &str, half: Half, section: Section) {
        self.commit(|state| {
            state.with_updated(id, |record| section.reset(record.stats.half_mut(half)))
        });
    }

    /// `matches` must already have passed validation.
    pub fn import_matches(&self, matches: Vec<Match>, mode: ImportMode) {
        let count = matches.len();
        self.commit(|state| {
            Some(match mode {
                ImportMode::Replace => AppState::new(matches),
                ImportMode::Merge => state.merged(matches),
            })
        });
        log_info!("Imported {count} matches ({mode})");
    }

    /// Writes any pending change immediately.
    pub fn flush(&self) -> bool {
        self.inner.persistence.flush()
    }

    pub fn has_pending_write(&self) -> bool {
        self.inner.persistence.has_pending_write()
    }

    /// Applies `next` atomically. `None` from `next` means nothing changed.
    fn commit<F>(&self, next: F) -> bool
    where
        F: FnOnce(&AppState) -> Option<AppState>,
    {
        let persistence = &self.inner.persistence;
        let mut committed = None;
        self.inner.state.send_if_modified(|current| match next(current.as_ref()) {
            Some(state) => {
                let snapshot = Arc::new(state);
                *current = Arc::clone(&snapshot);
                committed = Some((persistence.next_generation(), snapshot));
                true
            }
            None => false,
        });

        match committed {
            Some((generation, snapshot)) => {
                persistence.schedule(generation, snapshot);
                true
            }
            None => false,
        }
    }
}
