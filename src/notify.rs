//! Transient status messages ("toasts").

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use log::info;
use serde::Serialize;
use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastKind {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Sink for user-facing status messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: ToastKind);
}

/// Keeps the one visible toast and clears it after its time-to-live.
/// Each toast is also handed to the display sink, if there is one.
pub struct ToastCenter {
    current: Arc<Mutex<Option<Toast>>>,
    next_id: AtomicU64,
    ttl: Duration,
    runtime: Option<Handle>,
    display: Option<Arc<dyn Notifier>>,
}

impl ToastCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
            ttl,
            runtime: Handle::try_current().ok(),
            display: None,
        }
    }

    pub fn with_display(ttl: Duration, display: Arc<dyn Notifier>) -> Self {
        Self {
            display: Some(display),
            ..Self::new(ttl)
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn current(&self) -> Option<Toast> {
        lock(&self.current).clone()
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, message: &str, kind: ToastKind) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!("toast: {message}");
        if let Some(display) = &self.display {
            display.notify(message, kind);
        }
        *lock(&self.current) = Some(Toast {
            id,
            message: message.to_string(),
            kind,
        });

        let Some(runtime) = &self.runtime else {
            return;
        };
        let current = Arc::clone(&self.current);
        let ttl = self.ttl;
        runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut guard = lock(&current);
            // A newer toast owns the slot now.
            if guard.as_ref().map(|toast| toast.id) == Some(id) {
                *guard = None;
            }
        });
    }
}

/// Notifier that drops every message.
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: &str, _kind: ToastKind) {}
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
