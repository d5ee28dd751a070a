//! Campfire prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    calendar::{DateRangeSelector, DayStatus, MonthGrid, SelectionPhase, month_grid},
    cart::{Cart, CartLine, CartStorage, JsonFileStorage, LineKey, MemoryStorage, SelectedAddOn},
    catalog::{AddOn, ItemDiscount, MenuItem, Variation, browse},
    checkout::{
        Checkout, CheckoutError, CheckoutStep, GuestDetails, OrderKind, OrderLine, PaymentMethod,
        fetch_payment_methods,
    },
    orders::{OrderStatus, RoomInfo, RoomOrder, RoomOrderItem},
    remote::{
        Filter, Procedures, RemoteError, RemoteStore,
        procedures::{AvailabilityDay, NewBooking, normalize_keyword, unavailable_dates},
    },
    room_service::{RoomServiceError, RoomServiceSession},
    rooms::{BlockedDate, Room, RoomDirectory},
};
