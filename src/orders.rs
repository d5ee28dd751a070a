//! Orders
//!
//! Room-service order records as returned by the remote procedures. Prices
//! are minor units; totals are computed server-side and echoed back, so
//! these types only aggregate for display.

use serde::{Deserialize, Serialize};

/// Lifecycle of a room-service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Still being assembled by the guest.
    Pending,

    /// Submitted to the kitchen.
    Submitted,

    /// Being prepared.
    Preparing,

    /// Delivered to the room.
    Delivered,

    /// Cancelled.
    Cancelled,
}

/// One item on a room-service order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOrderItem {
    /// Originating menu item identifier.
    pub item_id: String,

    /// Menu item name at order time.
    pub menu_item_name: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Unit price in minor units.
    pub unit_price: i64,

    /// Line total in minor units.
    pub total_price: i64,

    /// Free-text instructions for the kitchen.
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// An open or historical room-service order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOrder {
    /// Order identifier.
    pub order_id: String,

    /// Human-facing order number.
    pub order_number: String,

    /// Order total in minor units, computed remotely.
    pub total_amount: i64,

    /// Current status.
    pub status: OrderStatus,

    /// Creation timestamp, as reported by the store.
    pub created_at: String,

    /// Requested delivery time, if any.
    #[serde(default)]
    pub delivery_time: Option<String>,

    /// Order-level instructions.
    #[serde(default)]
    pub special_instructions: Option<String>,

    /// Items on the order.
    #[serde(default)]
    pub items: Vec<RoomOrderItem>,
}

impl RoomOrder {
    /// Total quantity across all items.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// The remotely computed order total in minor units.
    pub fn total_price(&self) -> i64 {
        self.total_amount
    }
}

/// The room a validated keyword unlocks ordering for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Room number.
    pub room_number: String,

    /// Room type name.
    pub room_type: String,

    /// Guest the room is registered to.
    pub guest_name: String,

    /// Check-in date, as reported by the store.
    pub check_in_date: String,
}
