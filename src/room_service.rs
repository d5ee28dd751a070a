//! Room Service
//!
//! The keyword-gated ordering flow: a guest unlocks the menu with their room
//! keyword, builds up an open order through remote procedures, and submits
//! it. The session is an owned object injected into the views that need it;
//! any remote failure leaves its state exactly as it was.

use thiserror::Error;
use tracing::{debug, warn};

use crate::orders::{RoomInfo, RoomOrder};
use crate::remote::{Procedures, RemoteError, RemoteStore};

/// Failures of the room-service flow.
#[derive(Debug, Error)]
pub enum RoomServiceError {
    /// An order operation was attempted before a keyword unlocked the menu.
    #[error("enter your room keyword to start an order")]
    Locked,

    /// The remote store failed or rejected the operation.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A guest's room-service session.
#[derive(Debug)]
pub struct RoomServiceSession<S> {
    procedures: Procedures<S>,
    keyword: Option<String>,
    room: Option<RoomInfo>,
    current_order: Option<RoomOrder>,
}

impl<S: RemoteStore> RoomServiceSession<S> {
    /// A locked session over the given store.
    pub fn new(store: S) -> Self {
        Self {
            procedures: Procedures::new(store),
            keyword: None,
            room: None,
            current_order: None,
        }
    }

    /// Whether a keyword has unlocked the menu.
    pub fn is_unlocked(&self) -> bool {
        self.keyword.is_some()
    }

    /// The unlocked room, if any.
    pub fn room(&self) -> Option<&RoomInfo> {
        self.room.as_ref()
    }

    /// The open order, if one exists.
    pub fn current_order(&self) -> Option<&RoomOrder> {
        self.current_order.as_ref()
    }

    /// Total quantity on the open order; zero when there is none.
    pub fn total_items(&self) -> u64 {
        self.current_order
            .as_ref()
            .map_or(0, RoomOrder::total_items)
    }

    /// Total price of the open order in minor units; zero when there is
    /// none.
    pub fn total_price(&self) -> i64 {
        self.current_order
            .as_ref()
            .map_or(0, RoomOrder::total_price)
    }

    /// Validate a keyword and unlock the menu for its room.
    ///
    /// On success the current open order is also loaded; a failure loading
    /// it is logged and leaves the order absent rather than relocking.
    ///
    /// # Errors
    ///
    /// Returns a [`RoomServiceError`] if validation fails; the session stays
    /// locked.
    pub async fn unlock(&mut self, keyword: &str) -> Result<&RoomInfo, RoomServiceError> {
        let room = self.procedures.unlock_food_menu(keyword).await?;
        debug!(room_number = %room.room_number, "room service unlocked");

        let normalized = crate::remote::procedures::normalize_keyword(keyword);
        self.keyword = Some(normalized);
        self.room = Some(room);

        if let Err(error) = self.refresh_order().await {
            warn!(%error, "could not load the current order after unlock");
        }

        // The room was just stored; this cannot miss.
        self.room.as_ref().ok_or(RoomServiceError::Locked)
    }

    /// Reload the open order from the store.
    ///
    /// # Errors
    ///
    /// Returns a [`RoomServiceError`] if the session is locked or the call
    /// fails; the previously loaded order is kept on failure.
    pub async fn refresh_order(&mut self) -> Result<(), RoomServiceError> {
        let keyword = self.keyword.as_deref().ok_or(RoomServiceError::Locked)?;

        let order = self.procedures.get_current_room_order(keyword).await?;
        self.current_order = order;

        Ok(())
    }

    /// Add a menu item to the open order and reload it.
    ///
    /// # Errors
    ///
    /// Returns a [`RoomServiceError`] if the session is locked or the store
    /// rejects the addition; nothing changes locally on failure.
    pub async fn add_item(
        &mut self,
        menu_item_id: &str,
        quantity: u32,
        special_instructions: Option<&str>,
    ) -> Result<(), RoomServiceError> {
        let keyword = self.keyword.as_deref().ok_or(RoomServiceError::Locked)?;

        self.procedures
            .add_item_to_room_order(keyword, menu_item_id, quantity, special_instructions)
            .await?;

        self.refresh_order().await
    }

    /// Submit the open order to the kitchen. The local order is cleared only
    /// after the store confirms.
    ///
    /// # Errors
    ///
    /// Returns a [`RoomServiceError`] if the session is locked or the store
    /// rejects the submission; the open order is kept on failure.
    pub async fn submit(&mut self) -> Result<(), RoomServiceError> {
        let keyword = self.keyword.as_deref().ok_or(RoomServiceError::Locked)?;

        self.procedures.submit_room_order(keyword).await?;
        self.current_order = None;

        Ok(())
    }

    /// Past orders for the unlocked room.
    ///
    /// # Errors
    ///
    /// Returns a [`RoomServiceError`] if the session is locked or the call
    /// fails.
    pub async fn order_history(&self) -> Result<Vec<RoomOrder>, RoomServiceError> {
        let keyword = self.keyword.as_deref().ok_or(RoomServiceError::Locked)?;

        Ok(self.procedures.get_room_order_history(keyword).await?)
    }

    /// Relock the session, discarding the room and any loaded order.
    pub fn lock(&mut self) {
        self.keyword = None;
        self.room = None;
        self.current_order = None;
    }
}
