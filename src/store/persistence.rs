//! Reads and writes the match collection slot.
//!
//! Writes are debounced: every change replaces the one pending write, and only
//! the last snapshot of a burst reaches storage.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{runtime::Handle, time::Instant};
use tokio_util::sync::CancellationToken;

use super::AppState;
use crate::{
    db::{SlotStorage, MATCHES_KEY},
    log_debug, log_error, log_info, log_warn,
    notify::{Notifier, ToastKind},
};

const ENABLE_LOGS: bool = true;

/// Why the stored collection was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    Absent,
    Unreadable(String),
    Corrupt(String),
}

/// Outcome of decoding the stored collection. Corruption is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovered {
    Loaded(AppState),
    UseDefault(DefaultReason),
}

pub fn decode_state(raw: Option<&str>) -> Recovered {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Recovered::UseDefault(DefaultReason::Absent),
    };
    match serde_json::from_str::<AppState>(raw) {
        Ok(state) => Recovered::Loaded(AppState::new(state.matches)),
        Err(err) => Recovered::UseDefault(DefaultReason::Corrupt(err.to_string())),
    }
}

pub fn encode_state(state: &AppState) -> Result<String> {
    serde_json::to_string(state).context("failed to serialize match collection")
}

#[derive(Debug, Clone)]
pub struct PersistOptions {
    pub debounce: Duration,
    pub saved_toast_throttle: Duration,
    pub saved_message: String,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            saved_toast_throttle: Duration::from_secs(2),
            saved_message: "Saved".into(),
        }
    }
}

struct PendingWrite {
    generation: u64,
    snapshot: Arc<AppState>,
    cancel: CancellationToken,
}

/// Performs the actual slot writes; shared with the deferred write tasks.
struct SlotWriter {
    storage: Arc<dyn SlotStorage>,
    notifier: Arc<dyn Notifier>,
    saved_message: String,
    throttle: Duration,
    last_toast: Mutex<Option<Instant>>,
    written_generation: Mutex<u64>,
}

impl SlotWriter {
    fn save(&self, state: &AppState) -> Result<()> {
        let serialized = encode_state(state)?;
        self.storage
            .write(MATCHES_KEY, &serialized)
            .context("failed to write match collection")
    }

    /// Writes `snapshot` unless a newer generation already landed.
    fn write(&self, generation: u64, snapshot: &AppState) -> bool {
        let mut written = lock(&self.written_generation);
        if generation <= *written {
            return false;
        }
        if let Err(err) = self.save(snapshot) {
            log_error!("Failed to persist {} matches: {err:#}", snapshot.matches.len());
            return false;
        }
        *written = generation;
        drop(written);

        self.saved_toast();
        true
    }

    fn saved_toast(&self) {
        let mut last = lock(&self.last_toast);
        let now = Instant::now();
        if last.map_or(true, |at| now.duration_since(at) > self.throttle) {
            self.notifier.notify(&self.saved_message, ToastKind::Info);
            *last = Some(now);
        }
    }
}

pub struct Persistence {
    writer: Arc<SlotWriter>,
    debounce: Duration,
    generation: AtomicU64,
    pending: Mutex<Option<PendingWrite>>,
    runtime: Option<Handle>,
}

impl Persistence {
    pub fn new(
        storage: Arc<dyn SlotStorage>,
        notifier: Arc<dyn Notifier>,
        options: PersistOptions,
    ) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            log_warn!("No async runtime available; match writes will not be debounced");
        }

        Self {
            writer: Arc::new(SlotWriter {
                storage,
                notifier,
                saved_message: options.saved_message,
                throttle: options.saved_toast_throttle,
                last_toast: Mutex::new(None),
                written_generation: Mutex::new(0),
            }),
            debounce: options.debounce,
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
            runtime,
        }
    }

    /// Stored collection, or the empty one when it is missing or unusable.
    pub fn load(&self) -> AppState {
        let raw = match self.writer.storage.read(MATCHES_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                log_warn!("Match storage unreadable, starting empty: {err:#}");
                return AppState::default();
            }
        };

        match decode_state(raw.as_deref()) {
            Recovered::Loaded(state) => {
                log_info!("Loaded {} stored matches", state.matches.len());
                state
            }
            Recovered::UseDefault(DefaultReason::Absent) => AppState::default(),
            Recovered::UseDefault(reason) => {
                log_warn!("Discarding stored matches: {reason:?}");
                AppState::default()
            }
        }
    }

    /// Stamp for the next committed snapshot. Taken while the snapshot is
    /// published, so generations follow commit order.
    pub fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replaces any older pending write with one for `snapshot`. A snapshot
    /// older than the pending one is dropped.
    pub fn schedule(&self, generation: u64, snapshot: Arc<AppState>) {
        let mut pending = lock(&self.pending);
        if pending
            .as_ref()
            .is_some_and(|current| current.generation > generation)
        {
            log_debug!("Dropping superseded snapshot {generation}");
            return;
        }
        if let Some(previous) = pending.take() {
            previous.cancel.cancel();
        }

        let Some(runtime) = &self.runtime else {
            drop(pending);
            self.writer.write(generation, &snapshot);
            return;
        };

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let writer = Arc::clone(&self.writer);
        let delay = self.debounce;
        let deferred = Arc::clone(&snapshot);
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    writer.write(generation, &deferred);
                }
            }
        });

        *pending = Some(PendingWrite {
            generation,
            snapshot,
            cancel,
        });
    }

    /// Writes the pending snapshot now. Returns whether anything was written.
    pub fn flush(&self) -> bool {
        let Some(pending) = lock(&self.pending).take() else {
            return false;
        };
        pending.cancel.cancel();
        self.writer.write(pending.generation, &pending.snapshot)
    }

    pub fn has_pending_write(&self) -> bool {
        let pending = lock(&self.pending);
        match pending.as_ref() {
            Some(write) => write.generation > *lock(&self.writer.written_generation),
            None => false,
        }
    }
}

impl Drop for Persistence {
    fn drop(&mut self) {
        self.flush();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemorySlots,
        models::{Match, MatchMeta},
    };

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Notifier for Recorder {
        fn notify(&self, message: &str, _kind: ToastKind) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    fn state_with(count: usize) -> Arc<AppState> {
        Arc::new(AppState::new(
            (0..count).map(|_| Match::new(MatchMeta::default())).collect(),
        ))
    }

    fn stored_len(slots: &MemorySlots) -> usize {
        let raw = slots.read(MATCHES_KEY).unwrap().unwrap();
        match decode_state(Some(&raw)) {
            Recovered::Loaded(state) => state.matches.len(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn absent_and_blank_slots_use_default() {
        assert_eq!(decode_state(None), Recovered::UseDefault(DefaultReason::Absent));
        assert_eq!(
            decode_state(Some("  ")),
            Recovered::UseDefault(DefaultReason::Absent)
        );
    }

    #[test]
    fn corrupt_slots_use_default() {
        for raw in ["{not json", "[]", r#"{"matches": 3}"#, r#"{"matches":[{"id":1}]}"#] {
            assert!(
                matches!(
                    decode_state(Some(raw)),
                    Recovered::UseDefault(DefaultReason::Corrupt(_))
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn load_never_fails_on_corruption() {
        let slots = Arc::new(MemorySlots::with_value(MATCHES_KEY, "{{{"));
        let persistence = Persistence::new(slots, Arc::new(Recorder::default()), PersistOptions::default());
        assert_eq!(persistence.load(), AppState::default());
    }

    #[test]
    fn encode_then_decode_keeps_matches() {
        let state = state_with(2);
        let encoded = encode_state(&state).unwrap();
        assert_eq!(decode_state(Some(&encoded)), Recovered::Loaded((*state).clone()));
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_changes_is_written_once() {
        let slots = Arc::new(MemorySlots::new());
        let recorder = Arc::new(Recorder::default());
        let persistence = Persistence::new(slots.clone(), recorder.clone(), PersistOptions::default());

        for count in 1..=10 {
            persistence.schedule(persistence.next_generation(), state_with(count));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(slots.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(slots.write_count(), 1);
        assert_eq!(stored_len(&slots), 10);
        assert_eq!(recorder.count(), 1);
        assert!(!persistence.has_pending_write());
    }

    #[tokio::test(start_paused = true)]
    async fn saved_toast_is_throttled() {
        let slots = Arc::new(MemorySlots::new());
        let recorder = Arc::new(Recorder::default());
        let persistence = Persistence::new(slots.clone(), recorder.clone(), PersistOptions::default());

        persistence.schedule(persistence.next_generation(), state_with(1));
        tokio::time::sleep(Duration::from_millis(300)).await;
        persistence.schedule(persistence.next_generation(), state_with(2));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(slots.write_count(), 2);
        assert_eq!(recorder.count(), 1);

        tokio::time::sleep(Duration::from_secs(3)).await;
        persistence.schedule(persistence.next_generation(), state_with(3));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(slots.write_count(), 3);
        assert_eq!(recorder.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_pending_snapshot_once() {
        let slots = Arc::new(MemorySlots::new());
        let persistence = Persistence::new(slots.clone(), Arc::new(Recorder::default()), PersistOptions::default());

        persistence.schedule(persistence.next_generation(), state_with(4));
        assert!(persistence.has_pending_write());
        assert!(persistence.flush());
        assert_eq!(slots.write_count(), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(slots.write_count(), 1);
        assert!(!persistence.flush());
        assert_eq!(stored_len(&slots), 4);
    }

    #[test]
    fn without_runtime_writes_through() {
        let slots = Arc::new(MemorySlots::new());
        let persistence = Persistence::new(slots.clone(), Arc::new(Recorder::default()), PersistOptions::default());

        persistence.schedule(persistence.next_generation(), state_with(1));
        assert_eq!(slots.write_count(), 1);
        assert!(!persistence.has_pending_write());
    }

    #[tokio::test(start_paused = true)]
    async fn late_older_snapshot_never_replaces_newer() {
        let slots = Arc::new(MemorySlots::new());
        let persistence = Persistence::new(slots.clone(), Arc::new(Recorder::default()), PersistOptions::default());

        let older = persistence.next_generation();
        let newer = persistence.next_generation();
        persistence.schedule(newer, state_with(2));
        persistence.schedule(older, state_with(1));
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(slots.write_count(), 1);
        assert_eq!(stored_len(&slots), 2);

        persistence.schedule(older, state_with(1));
        assert!(!persistence.flush());
        assert_eq!(stored_len(&slots), 2);
    }
}
