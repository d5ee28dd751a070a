//! Cart Lines
//!
//! A cart line is one deduplicated row in the cart, keyed by its full
//! `(item, variation, add-on multiset)` configuration. Display fields and
//! the unit price are snapshotted at first insertion so the line is stable
//! even if the catalog changes underneath it.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{AddOn, MenuItem, Variation};

/// An add-on selection collapsed by identifier.
///
/// Selecting the same add-on several times within one configuration yields a
/// single record carrying the occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAddOn {
    /// Add-on identifier.
    pub id: String,

    /// Display name, snapshotted at selection time.
    pub name: String,

    /// Price delta per occurrence, in minor units.
    pub price: i64,

    /// Number of occurrences selected.
    pub quantity: u32,
}

/// Group raw add-on selections by identifier, summing occurrence counts.
///
/// The result is sorted by identifier so that the same multiset always
/// produces the same sequence.
pub fn group_add_ons(add_ons: &[AddOn]) -> SmallVec<[SelectedAddOn; 4]> {
    let mut grouped: SmallVec<[SelectedAddOn; 4]> = SmallVec::new();

    for add_on in add_ons {
        if let Some(existing) = grouped.iter_mut().find(|g| g.id == add_on.id) {
            existing.quantity += 1;
        } else {
            grouped.push(SelectedAddOn {
                id: add_on.id.clone(),
                name: add_on.name.clone(),
                price: add_on.price,
                quantity: 1,
            });
        }
    }

    grouped.sort_by(|a, b| a.id.cmp(&b.id));
    grouped
}

/// Synthetic line identifier, derived deterministically from the item id,
/// the variation id and the grouped add-on multiset.
///
/// Two lines carry the same key exactly when their configurations are the
/// same multiset, regardless of the order add-ons were selected in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(String);

impl LineKey {
    /// Derive the key for a configuration.
    pub fn derive(
        item_id: &str,
        variation: Option<&Variation>,
        add_ons: &[SelectedAddOn],
    ) -> Self {
        let variation_part = variation.map_or("default", |v| v.id.as_str());

        let add_on_part = if add_ons.is_empty() {
            "none".to_string()
        } else {
            let parts: Vec<String> = add_ons
                .iter()
                .map(|a| format!("{}x{}", a.id, a.quantity))
                .collect();
            parts.join(",")
        };

        Self(format!("{item_id}-{variation_part}-{add_on_part}"))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One deduplicated row in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Deduplication key for this configuration.
    pub key: LineKey,

    /// Originating catalog item identifier.
    pub item_id: String,

    /// Display name, snapshotted at first insertion.
    pub name: String,

    /// Display description, snapshotted at first insertion.
    pub description: String,

    /// Category, snapshotted at first insertion.
    pub category: String,

    /// Unit price in minor units, captured at first insertion and never
    /// recomputed.
    pub unit_price: i64,

    /// Quantity of this configuration in the cart. Always positive; a line
    /// whose quantity would drop to zero is removed instead.
    pub quantity: u32,

    /// Selected variation, if any.
    pub variation: Option<Variation>,

    /// Selected add-ons, grouped by identifier.
    pub add_ons: SmallVec<[SelectedAddOn; 4]>,
}

impl CartLine {
    /// Build a new line from a catalog item and a configuration, capturing
    /// the unit price as base price plus the variation delta plus every
    /// add-on occurrence's delta.
    pub fn new(
        item: &MenuItem,
        quantity: u32,
        variation: Option<Variation>,
        add_ons: &[AddOn],
    ) -> Self {
        let add_ons = group_add_ons(add_ons);
        let key = LineKey::derive(&item.id, variation.as_ref(), &add_ons);
        let unit_price = unit_price(item.base_price, variation.as_ref(), &add_ons);

        Self {
            key,
            item_id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            unit_price,
            quantity,
            variation,
            add_ons,
        }
    }

    /// Line total in minor units: unit price times quantity, computed on
    /// demand.
    pub fn total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// Unit price for a configuration: base price plus the variation delta plus
/// each grouped add-on's delta times its occurrence count.
fn unit_price(base_price: i64, variation: Option<&Variation>, add_ons: &[SelectedAddOn]) -> i64 {
    let variation_delta = variation.map_or(0, |v| v.price);
    let add_on_delta: i64 = add_ons
        .iter()
        .map(|a| a.price * i64::from(a.quantity))
        .sum();

    base_price + variation_delta + add_on_delta
}
