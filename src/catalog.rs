//! Catalog
//!
//! Menu items and rooms are sourced from the external store and treated as
//! read-only inputs. Prices are carried in minor units (centavos); a
//! negative or zero price is a valid price.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A mutually-exclusive size/type option that alters an item's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    /// Variation identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price delta in minor units, additive to the base price.
    pub price: i64,
}

/// An optional extra that alters an item's price and may be selected more
/// than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Add-on identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price delta in minor units, additive per selected occurrence.
    pub price: i64,

    /// Category tag.
    pub category: String,
}

/// A discounted price with an optional active window.
///
/// An open bound means the discount is active on any date on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDiscount {
    /// Discounted price in minor units.
    pub price: i64,

    /// First date the discount applies, inclusive.
    pub starts_on: Option<Date>,

    /// Last date the discount applies, inclusive.
    pub ends_on: Option<Date>,
}

impl ItemDiscount {
    /// Whether the discount window covers the given date.
    pub fn is_active(&self, on: Date) -> bool {
        self.starts_on.is_none_or(|start| on >= start) && self.ends_on.is_none_or(|end| on <= end)
    }
}

/// A purchasable catalog entry, as shaped by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Item identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Display description.
    pub description: String,

    /// Base price in minor units.
    pub base_price: i64,

    /// Category the item belongs to.
    pub category: String,

    /// Whether the item is currently orderable.
    pub available: bool,

    /// Whether the item is featured as popular.
    #[serde(default)]
    pub popular: bool,

    /// Mutually-exclusive variations.
    #[serde(default)]
    pub variations: Vec<Variation>,

    /// Optional extras.
    #[serde(default)]
    pub add_ons: Vec<AddOn>,

    /// Optional discount price and window.
    #[serde(default)]
    pub discount: Option<ItemDiscount>,
}

impl MenuItem {
    /// The price to display on the given date: the discount price while its
    /// window is active, the base price otherwise.
    ///
    /// The cart captures the base price regardless; this is a menu display
    /// concern.
    pub fn effective_price(&self, on: Date) -> i64 {
        match &self.discount {
            Some(discount) if discount.is_active(on) => discount.price,
            _ => self.base_price,
        }
    }

    /// Whether a discount window is active on the given date.
    pub fn is_on_discount(&self, on: Date) -> bool {
        self.discount
            .as_ref()
            .is_some_and(|discount| discount.is_active(on))
    }

    /// Case-insensitive match against the item's name or description.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Filter a menu down to the items a browsing view should show: available,
/// in the selected category (`None` means all), and matching the search term
/// (empty term matches everything).
pub fn browse<'a>(
    items: &'a [MenuItem],
    category: Option<&'a str>,
    search_term: &'a str,
) -> impl Iterator<Item = &'a MenuItem> {
    items.iter().filter(move |item| {
        item.available
            && category.is_none_or(|c| item.category == c)
            && (search_term.is_empty() || item.matches_search(search_term))
    })
}
