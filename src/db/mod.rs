//! Durable key-value slots.
//!
//! The app keeps two independent slots: the match collection and the
//! language preference. Each is replaced wholesale on write.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use anyhow::Result;

mod migrations;
mod sqlite;

pub use sqlite::SqliteSlots;

/// Slot holding `{ "matches": [...] }`.
pub const MATCHES_KEY: &str = "match-tracker:v1";
/// Slot holding a bare `fi` / `en` code.
pub const LANGUAGE_KEY: &str = "match-tracker:lang";

pub trait SlotStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local slots. Counts writes so callers can observe coalescing.
#[derive(Default)]
pub struct MemorySlots {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let slots = Self::default();
        slots
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        slots
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SlotStorage for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
