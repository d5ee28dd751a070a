//! Rooms
//!
//! Bookable rooms and their blocked dates, fetched from the external store
//! and held read-only for browsing and calendar wiring.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::remote::{Filter, RemoteError, RemoteStore};

/// A bookable room, as shaped by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Display description.
    pub description: String,

    /// Room type name.
    pub room_type: String,

    /// Nightly base price in minor units.
    pub base_price: i64,

    /// Maximum number of guests.
    pub max_guests: u32,

    /// Amenity names.
    #[serde(default)]
    pub amenities: Vec<String>,

    /// Whether the room is shown to guests.
    pub available: bool,
}

/// A single unavailable date for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDate {
    /// Room the date applies to.
    pub room_id: String,

    /// The unavailable date.
    pub blocked_date: Date,
}

/// Rooms and upcoming blocked dates, loaded together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomDirectory {
    rooms: Vec<Room>,
    blocked_dates: Vec<BlockedDate>,
}

impl RoomDirectory {
    /// Build a directory from already-fetched rows. Rooms are ordered by
    /// ascending base price, the way the browsing view lists them.
    pub fn new(mut rooms: Vec<Room>, blocked_dates: Vec<BlockedDate>) -> Self {
        rooms.sort_by_key(|room| room.base_price);

        Self {
            rooms,
            blocked_dates,
        }
    }

    /// Fetch available rooms and blocked dates from `today` onward.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if either query fails or a row cannot be
    /// parsed; no partial state is produced.
    pub async fn fetch<S: RemoteStore>(store: &S, today: Date) -> Result<Self, RemoteError> {
        let room_rows = store
            .query("rooms", Filter::new().eq("available", true))
            .await?;
        let blocked_rows = store
            .query(
                "room_blocked_dates",
                Filter::new().gte("blocked_date", today.to_string()),
            )
            .await?;

        let rooms = room_rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Room>, _>>()?;
        let blocked_dates = blocked_rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<BlockedDate>, _>>()?;

        debug!(
            rooms = rooms.len(),
            blocked_dates = blocked_dates.len(),
            "room directory loaded"
        );

        Ok(Self::new(rooms, blocked_dates))
    }

    /// The rooms, cheapest first.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Look up a room by id.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    /// Blocked dates for one room, in store order.
    pub fn blocked_dates_for(&self, room_id: &str) -> Vec<Date> {
        self.blocked_dates
            .iter()
            .filter(|bd| bd.room_id == room_id)
            .map(|bd| bd.blocked_date)
            .collect()
    }

    /// Whether a room has any upcoming blocked date.
    pub fn has_blocked_dates(&self, room_id: &str) -> bool {
        self.blocked_dates.iter().any(|bd| bd.room_id == room_id)
    }

    /// The earliest upcoming blocked date for a room, if any.
    pub fn next_blocked_date(&self, room_id: &str) -> Option<Date> {
        self.blocked_dates
            .iter()
            .filter(|bd| bd.room_id == room_id)
            .map(|bd| bd.blocked_date)
            .min()
    }
}
