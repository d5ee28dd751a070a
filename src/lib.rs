//! Campfire
//!
//! Campfire is the storefront core for a campsite resort: menu and room
//! browsing, a deduplicating cart, date-range booking with day-count
//! pricing, keyword-gated room service, and a Messenger-confirmed checkout,
//! all over a remote backend-as-a-service store.

pub mod calendar;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod remote;
pub mod room_service;
pub mod rooms;
