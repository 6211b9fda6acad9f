pub mod controller;
pub mod counter;
pub mod import;
pub mod persistence;
pub mod state;

pub use controller::{MatchStore, StoreOptions};
pub use counter::{apply_delta, CounterPath, Section};
pub use import::{parse_import, validate_matches, ImportError, ImportMode};
pub use persistence::{decode_state, DefaultReason, Recovered};
pub use state::AppState;
