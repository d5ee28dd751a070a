//! Stored Procedures
//!
//! Typed wrappers over [`RemoteStore::call_procedure`], one per remote
//! procedure the storefront relies on. Keywords are normalized (trimmed,
//! uppercased) before every call; payload envelopes carry a `success` flag
//! and a user-presentable `message`.

use jiff::civil::Date;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::orders::{RoomInfo, RoomOrder, RoomOrderItem};
use crate::remote::{RemoteError, RemoteStore};

/// Procedure validating a room-service keyword.
pub const UNLOCK_FOOD_MENU: &str = "unlock_food_menu";

/// Procedure returning the open order for a keyword.
pub const GET_CURRENT_ROOM_ORDER: &str = "get_current_room_order";

/// Procedure adding an item to the keyword's open order.
pub const ADD_ITEM_TO_ROOM_ORDER: &str = "add_item_to_room_order";

/// Procedure submitting the keyword's open order.
pub const SUBMIT_ROOM_ORDER: &str = "submit_room_order";

/// Procedure listing past orders for a keyword.
pub const GET_ROOM_ORDER_HISTORY: &str = "get_room_order_history";

/// Procedure returning per-day availability for a room and month.
pub const GET_ROOM_AVAILABILITY_MONTH: &str = "get_room_availability_month";

/// Procedure creating a booking.
pub const CREATE_BOOKING: &str = "create_booking";

/// Procedure checking whether a room is free over a date range.
pub const CHECK_ROOM_AVAILABILITY: &str = "check_room_availability";

/// Normalize a guest-entered keyword the way the store expects it.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// One day of a room's availability calendar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvailabilityDay {
    /// The day described.
    pub date: Date,

    /// Whether the room can be booked on this day.
    pub available: bool,

    /// Per-day price override in minor units, if any.
    #[serde(default)]
    pub price_override: Option<i64>,

    /// Operator notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// The dates within an availability month that cannot be booked, in the
/// shape the calendar's blocked set wants.
pub fn unavailable_dates(days: &[AvailabilityDay]) -> Vec<Date> {
    days.iter()
        .filter(|day| !day.available)
        .map(|day| day.date)
        .collect()
}

/// A booking request for [`Procedures::create_booking`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    /// Room being booked.
    pub room_id: String,

    /// Guest full name.
    pub guest_name: String,

    /// Guest email.
    pub guest_email: String,

    /// Guest phone number.
    pub guest_phone: String,

    /// Check-in date.
    pub check_in: Date,

    /// Check-out date.
    pub check_out: Date,

    /// Total amount in minor units, day-multiplied by the caller.
    pub total_amount: i64,
}

#[derive(Debug, Deserialize)]
struct Ack {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnlockPayload {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    room_info: Option<RoomInfo>,
}

#[derive(Debug, Deserialize)]
struct CurrentOrderPayload {
    success: bool,
    #[serde(default)]
    order: Option<RoomOrder>,
    #[serde(default)]
    items: Vec<RoomOrderItem>,
}

#[derive(Debug, Deserialize)]
struct OrderHistoryPayload {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    orders: Vec<RoomOrder>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityCheckPayload {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    available: bool,
}

/// Typed access to the store's procedures.
#[derive(Debug)]
pub struct Procedures<S> {
    store: S,
}

impl<S: RemoteStore> Procedures<S> {
    /// Wrap a remote store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate a keyword and return the room it unlocks.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the store rejects the
    /// keyword; the error message is presentable to the guest.
    pub async fn unlock_food_menu(&self, keyword: &str) -> Result<RoomInfo, RemoteError> {
        let keyword = normalize_keyword(keyword);
        debug!(procedure = UNLOCK_FOOD_MENU, "validating keyword");

        let value = self
            .store
            .call_procedure(UNLOCK_FOOD_MENU, json!({ "keyword_input": keyword }))
            .await?;
        let payload: UnlockPayload = serde_json::from_value(value)?;

        if !payload.success {
            return Err(rejection(UNLOCK_FOOD_MENU, payload.message));
        }

        payload
            .room_info
            .ok_or_else(|| rejection(UNLOCK_FOOD_MENU, None))
    }

    /// The keyword's open order with its items attached, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the payload is
    /// malformed. An absent order is `Ok(None)`, not an error.
    pub async fn get_current_room_order(
        &self,
        keyword: &str,
    ) -> Result<Option<RoomOrder>, RemoteError> {
        let keyword = normalize_keyword(keyword);

        let value = self
            .store
            .call_procedure(GET_CURRENT_ROOM_ORDER, json!({ "keyword_input": keyword }))
            .await?;
        let payload: CurrentOrderPayload = serde_json::from_value(value)?;

        Ok(match payload.order {
            Some(mut order) if payload.success => {
                order.items = payload.items;
                Some(order)
            }
            _ => None,
        })
    }

    /// Add a menu item to the keyword's open order.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the store rejects the
    /// addition; nothing is applied locally on failure.
    pub async fn add_item_to_room_order(
        &self,
        keyword: &str,
        menu_item_id: &str,
        quantity: u32,
        special_instructions: Option<&str>,
    ) -> Result<(), RemoteError> {
        let keyword = normalize_keyword(keyword);
        debug!(procedure = ADD_ITEM_TO_ROOM_ORDER, menu_item_id, quantity, "adding item");

        let value = self
            .store
            .call_procedure(
                ADD_ITEM_TO_ROOM_ORDER,
                json!({
                    "keyword_input": keyword,
                    "menu_item_id_input": menu_item_id,
                    "quantity_input": quantity,
                    "special_instructions_input": special_instructions,
                }),
            )
            .await?;

        ack(ADD_ITEM_TO_ROOM_ORDER, value)
    }

    /// Submit the keyword's open order to the kitchen.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the store rejects the
    /// submission.
    pub async fn submit_room_order(&self, keyword: &str) -> Result<(), RemoteError> {
        let keyword = normalize_keyword(keyword);

        let value = self
            .store
            .call_procedure(SUBMIT_ROOM_ORDER, json!({ "keyword_input": keyword }))
            .await?;

        ack(SUBMIT_ROOM_ORDER, value)
    }

    /// Past orders for the keyword, newest first as the store returns them.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the store rejects the
    /// keyword.
    pub async fn get_room_order_history(
        &self,
        keyword: &str,
    ) -> Result<Vec<RoomOrder>, RemoteError> {
        let keyword = normalize_keyword(keyword);

        let value = self
            .store
            .call_procedure(GET_ROOM_ORDER_HISTORY, json!({ "keyword_input": keyword }))
            .await?;
        let payload: OrderHistoryPayload = serde_json::from_value(value)?;

        if payload.success {
            Ok(payload.orders)
        } else {
            Err(rejection(GET_ROOM_ORDER_HISTORY, payload.message))
        }
    }

    /// Per-day availability for a room and month.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the payload is
    /// malformed.
    pub async fn get_room_availability_month(
        &self,
        room_id: &str,
        year: i16,
        month: i8,
    ) -> Result<Vec<AvailabilityDay>, RemoteError> {
        let value = self
            .store
            .call_procedure(
                GET_ROOM_AVAILABILITY_MONTH,
                json!({
                    "room_id_input": room_id,
                    "year_input": year,
                    "month_input": month,
                }),
            )
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Create a booking for a room over a date range.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the store declines the
    /// booking (for instance, dates taken since the calendar was loaded).
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<(), RemoteError> {
        debug!(procedure = CREATE_BOOKING, room_id = %booking.room_id, "creating booking");

        let value = self
            .store
            .call_procedure(
                CREATE_BOOKING,
                json!({
                    "room_id_input": booking.room_id,
                    "guest_name_input": booking.guest_name,
                    "guest_email_input": booking.guest_email,
                    "guest_phone_input": booking.guest_phone,
                    "check_in_date_input": booking.check_in,
                    "check_out_date_input": booking.check_out,
                    "total_amount_input": booking.total_amount,
                }),
            )
            .await?;

        ack(CREATE_BOOKING, value)
    }

    /// Whether a room is free over an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the call fails or the store rejects the
    /// check.
    pub async fn check_room_availability(
        &self,
        room_id: &str,
        check_in: Date,
        check_out: Date,
    ) -> Result<bool, RemoteError> {
        let value = self
            .store
            .call_procedure(
                CHECK_ROOM_AVAILABILITY,
                json!({
                    "room_id_input": room_id,
                    "check_in_date_input": check_in,
                    "check_out_date_input": check_out,
                }),
            )
            .await?;
        let payload: AvailabilityCheckPayload = serde_json::from_value(value)?;

        if payload.success {
            Ok(payload.available)
        } else {
            Err(rejection(CHECK_ROOM_AVAILABILITY, payload.message))
        }
    }
}

/// Parse an acknowledgement envelope, converting `success: false` into a
/// procedure error carrying the store's message.
fn ack(name: &str, value: Value) -> Result<(), RemoteError> {
    let payload: Ack = serde_json::from_value(value)?;

    if payload.success {
        Ok(())
    } else {
        Err(rejection(name, payload.message))
    }
}

fn rejection(name: &str, message: Option<String>) -> RemoteError {
    RemoteError::Procedure {
        name: name.to_string(),
        message: message.unwrap_or_else(|| "The request could not be completed.".to_string()),
    }
}
