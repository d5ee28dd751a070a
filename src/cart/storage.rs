//! Cart Storage
//!
//! The cart's only persisted artifact is a JSON-serialized array of
//! [`CartLine`] under a fixed storage key. Loading is deliberately
//! forgiving: a missing or malformed stored value rehydrates as an empty
//! cart, never an error surfaced to the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::cart::line::CartLine;

/// Fixed namespace the cart is persisted under.
pub const STORAGE_KEY: &str = "campfire-cart";

/// Durable storage for the cart's line collection.
///
/// `load` must never fail loudly: corruption or absence of the stored value
/// yields an empty collection. `save` replaces the stored value with a full
/// serialization of the cart.
pub trait CartStorage: Send {
    /// Load the persisted line collection, or an empty one.
    fn load(&self) -> Vec<CartLine>;

    /// Persist the full line collection.
    fn save(&self, lines: &[CartLine]);
}

/// In-process storage, for tests and ephemeral sessions.
///
/// Clones share the same underlying buffer, so a cloned handle observes
/// everything a cart persisted through the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    lines: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// Create empty in-process storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the storage with a raw serialized value, as a previous session
    /// would have left it.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Vec<CartLine> {
        let Ok(guard) = self.lines.lock() else {
            return Vec::new();
        };

        guard.as_deref().map_or_else(Vec::new, parse_lines)
    }

    fn save(&self, lines: &[CartLine]) {
        match serde_json::to_string(lines) {
            Ok(raw) => {
                if let Ok(mut guard) = self.lines.lock() {
                    *guard = Some(raw);
                }
            }
            Err(error) => warn!(%error, "failed to serialize cart; keeping previous value"),
        }
    }
}

/// File-backed storage: one JSON document named after [`STORAGE_KEY`] in the
/// given directory.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// The file the cart is persisted to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Vec<CartLine> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_lines(&raw),
            // Absence is the normal first-run state.
            Err(_) => Vec::new(),
        }
    }

    fn save(&self, lines: &[CartLine]) {
        let raw = match serde_json::to_string(lines) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "failed to serialize cart; keeping previous value");
                return;
            }
        };

        if let Err(error) = fs::write(&self.path, raw) {
            warn!(%error, path = %self.path.display(), "failed to persist cart");
        }
    }
}

fn parse_lines(raw: &str) -> Vec<CartLine> {
    match serde_json::from_str(raw) {
        Ok(lines) => lines,
        Err(error) => {
            warn!(%error, "stored cart is malformed; starting with an empty cart");
            Vec::new()
        }
    }
}
