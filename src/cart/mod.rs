//! Cart
//!
//! The cart aggregator owns the unique, quantity-deduplicated collection of
//! purchase intents. It is the only writer of its collection: views consume
//! the operations here and never touch the lines directly. Every mutation
//! re-persists the full cart through the injected [`CartStorage`].

pub mod line;
pub mod storage;

use std::fmt;

use tracing::debug;

pub use line::{CartLine, LineKey, SelectedAddOn, group_add_ons};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage, STORAGE_KEY};

use crate::catalog::{AddOn, MenuItem, Variation};

/// The shopping cart.
///
/// Lines are deduplicated by [`LineKey`]: adding a configuration that is
/// already present increments the existing line's quantity and keeps its
/// originally captured unit price.
pub struct Cart {
    lines: Vec<CartLine>,
    storage: Option<Box<dyn CartStorage>>,
}

impl Cart {
    /// Create an empty, unpersisted cart.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            storage: None,
        }
    }

    /// Create a cart backed by the given storage, rehydrated from whatever
    /// it holds. A missing or malformed stored value yields an empty cart.
    pub fn with_storage(storage: Box<dyn CartStorage>) -> Self {
        let lines = storage.load();
        debug!(lines = lines.len(), "cart rehydrated from storage");

        Self {
            lines,
            storage: Some(storage),
        }
    }

    /// Add a configuration to the cart.
    ///
    /// If a line with the same `(item, variation, add-on multiset)` key
    /// already exists its quantity is incremented by `quantity` and its unit
    /// price is left untouched; otherwise a new line is appended with the
    /// price captured now. Returns the key of the affected line.
    pub fn add(
        &mut self,
        item: &MenuItem,
        quantity: u32,
        variation: Option<Variation>,
        add_ons: &[AddOn],
    ) -> LineKey {
        let grouped = group_add_ons(add_ons);
        let key = LineKey::derive(&item.id, variation.as_ref(), &grouped);

        if let Some(existing) = self.lines.iter_mut().find(|l| l.key == key) {
            existing.quantity += quantity;
            debug!(key = %key, quantity = existing.quantity, "incremented existing cart line");
        } else {
            let line = CartLine::new(item, quantity, variation, add_ons);
            debug!(key = %key, quantity, unit_price = line.unit_price, "added cart line");
            self.lines.push(line);
        }

        self.persist();
        key
    }

    /// Replace a line's quantity in place.
    ///
    /// A quantity of zero or less removes the line. An unknown key is a
    /// silent no-op.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) {
        if quantity <= 0 {
            self.remove(key);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(line) = self.lines.iter_mut().find(|l| l.key == *key) {
            line.quantity = quantity;
            self.persist();
        } else {
            debug!(key = %key, "update for unknown cart line ignored");
        }
    }

    /// Remove a line. An unknown key is a silent no-op.
    pub fn remove(&mut self, key: &LineKey) {
        let before = self.lines.len();
        self.lines.retain(|l| l.key != *key);

        if self.lines.len() == before {
            debug!(key = %key, "removal of unknown cart line ignored");
        } else {
            self.persist();
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Total price across all lines in minor units; zero for an empty cart.
    pub fn total_price(&self) -> i64 {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Total quantity across all lines; zero for an empty cart.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Look up a line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.key == *key)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn persist(&self) {
        if let Some(storage) = &self.storage {
            storage.save(&self.lines);
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .field("persisted", &self.storage.is_some())
            .finish()
    }
}
