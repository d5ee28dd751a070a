//! Checkout
//!
//! The three-step checkout flow over a captured cart: pick dates, fill in
//! guest details, choose a payment method. Cart lines are tagged as room
//! bookings or food orders on entry, and everything downstream matches on
//! the tag. Confirmation happens over Messenger; the flow's output is a
//! plain-text order summary and a deep link that opens a conversation
//! pre-filled with it.

use jiff::civil::Date;
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calendar::DateRangeSelector;
use crate::cart::CartLine;
use crate::remote::procedures::NewBooking;
use crate::remote::{Filter, RemoteError, RemoteStore};

/// Category marking a cart line as a room booking rather than food.
pub const ROOM_RATES_CATEGORY: &str = "room-rates";

/// Failures of the checkout flow. Every variant is a local validation
/// failure; remote failures surface from the store calls themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Checkout was started over an empty cart.
    #[error("your cart is empty")]
    EmptyOrder,

    /// The flow tried to leave the calendar step without a start date.
    #[error("select your stay dates to continue")]
    DatesNotSelected,

    /// The flow tried to leave the details step with a blank field.
    #[error("fill in your name, email, and contact number")]
    IncompleteDetails,

    /// A booking was requested for an order with no room line.
    #[error("this order has no room to book")]
    NotARoomBooking,
}

/// One line of the order being settled.
///
/// The cart's category string is consulted exactly once, when a [`CartLine`]
/// is tagged on entry; all totals and summaries match on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderLine {
    /// A stay at a room, priced per night before day multiplication.
    RoomBooking {
        /// Room being booked.
        room_id: String,

        /// Display name of the room.
        name: String,

        /// Price per night in minor units.
        nightly_rate: i64,
    },

    /// A food item, carried with its full cart configuration.
    FoodOrder(CartLine),
}

impl OrderLine {
    /// Tag a cart line by its category.
    pub fn from_cart(line: CartLine) -> Self {
        if line.category == ROOM_RATES_CATEGORY {
            Self::RoomBooking {
                nightly_rate: line.total(),
                room_id: line.item_id,
                name: line.name,
            }
        } else {
            Self::FoodOrder(line)
        }
    }

    /// Line total in minor units, before day multiplication.
    pub fn total(&self) -> i64 {
        match self {
            Self::RoomBooking { nightly_rate, .. } => *nightly_rate,
            Self::FoodOrder(line) => line.total(),
        }
    }
}

/// What kind of order a checkout settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    /// A stay; checkout starts on the calendar step.
    RoomBooking,

    /// Food only; the calendar step is skipped.
    FoodOrder,
}

/// The step the checkout flow is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Choosing stay dates.
    Calendar,

    /// Entering guest details.
    Details,

    /// Choosing a payment method and confirming.
    Payment,
}

/// A way to pay, as configured in the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Method identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Account number to send payment to.
    pub account_number: String,

    /// Name on the receiving account.
    pub account_name: String,

    /// QR code image for scanning the payment.
    #[serde(default)]
    pub qr_code_url: Option<String>,
}

/// Fetch the configured payment methods; the first row is the default.
///
/// # Errors
///
/// Returns a [`RemoteError`] if the query fails or a row cannot be parsed.
pub async fn fetch_payment_methods<S: RemoteStore>(
    store: &S,
) -> Result<Vec<PaymentMethod>, RemoteError> {
    let rows = store.query("payment_methods", Filter::new()).await?;

    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(RemoteError::from))
        .collect()
}

/// The guest placing the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestDetails {
    /// Full name.
    pub customer_name: String,

    /// Email address.
    pub email: String,

    /// Phone number.
    pub contact_number: String,
}

impl GuestDetails {
    /// Whether every field has content.
    pub fn is_complete(&self) -> bool {
        !self.customer_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.contact_number.trim().is_empty()
    }
}

/// A checkout flow over a captured set of cart lines.
///
/// Room bookings walk calendar, details, payment; food orders skip the
/// calendar and are dated today. The order total is the line total
/// multiplied by the selected day count.
#[derive(Debug)]
pub struct Checkout {
    lines: Vec<OrderLine>,
    kind: OrderKind,
    step: CheckoutStep,
    selector: DateRangeSelector,
    details: GuestDetails,
    payment_methods: Vec<PaymentMethod>,
    selected_payment: Option<String>,
}

impl Checkout {
    /// Start a checkout over the given cart lines and date selector.
    ///
    /// Lines are tagged on entry; the order is a room booking when its first
    /// line tags as one. Food orders start on the details step with today
    /// already selected.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyOrder`] if there are no lines.
    pub fn new(
        cart_lines: Vec<CartLine>,
        mut selector: DateRangeSelector,
    ) -> Result<Self, CheckoutError> {
        let lines: Vec<OrderLine> = cart_lines.into_iter().map(OrderLine::from_cart).collect();
        let first = lines.first().ok_or(CheckoutError::EmptyOrder)?;

        let kind = match first {
            OrderLine::RoomBooking { .. } => OrderKind::RoomBooking,
            OrderLine::FoodOrder(_) => OrderKind::FoodOrder,
        };

        let step = match kind {
            OrderKind::RoomBooking => CheckoutStep::Calendar,
            OrderKind::FoodOrder => {
                selector.click(selector.min_date());
                CheckoutStep::Details
            }
        };

        debug!(lines = lines.len(), ?kind, "checkout started");

        Ok(Self {
            lines,
            kind,
            step,
            selector,
            details: GuestDetails::default(),
            payment_methods: Vec::new(),
            selected_payment: None,
        })
    }

    /// Attach the configured payment methods, selecting the first as the
    /// default.
    #[must_use]
    pub fn with_payment_methods(mut self, methods: Vec<PaymentMethod>) -> Self {
        self.selected_payment = methods.first().map(|method| method.id.clone());
        self.payment_methods = methods;
        self
    }

    /// What kind of order this is.
    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    /// The current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The tagged lines being checked out.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// The date selector, for wiring into a calendar view.
    pub fn selector(&self) -> &DateRangeSelector {
        &self.selector
    }

    /// Mutable access to the date selector.
    pub fn selector_mut(&mut self) -> &mut DateRangeSelector {
        &mut self.selector
    }

    /// The guest details entered so far.
    pub fn details(&self) -> &GuestDetails {
        &self.details
    }

    /// Replace the guest details.
    pub fn set_details(&mut self, details: GuestDetails) {
        self.details = details;
    }

    /// The configured payment methods, in store order.
    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    /// The selected payment method, if any.
    pub fn payment_method(&self) -> Option<&PaymentMethod> {
        let id = self.selected_payment.as_deref()?;
        self.payment_methods.iter().find(|method| method.id == id)
    }

    /// Select a payment method by id. Unknown ids leave the selection
    /// unchanged and return `false`.
    pub fn select_payment_method(&mut self, id: &str) -> bool {
        if self.payment_methods.iter().any(|method| method.id == id) {
            self.selected_payment = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// The room being booked, when this is a room booking.
    pub fn room_id(&self) -> Option<&str> {
        match self.lines.first() {
            Some(OrderLine::RoomBooking { room_id, .. }) => Some(room_id),
            Some(OrderLine::FoodOrder(_)) | None => None,
        }
    }

    /// Advance to the next step.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the current step is not complete; the
    /// flow stays where it is.
    pub fn proceed(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.step = match self.step {
            CheckoutStep::Calendar => {
                if self.selector.start().is_none() {
                    return Err(CheckoutError::DatesNotSelected);
                }
                CheckoutStep::Details
            }
            CheckoutStep::Details => {
                if !self.details.is_complete() {
                    return Err(CheckoutError::IncompleteDetails);
                }
                CheckoutStep::Payment
            }
            CheckoutStep::Payment => CheckoutStep::Payment,
        };

        Ok(self.step)
    }

    /// Step back. Food orders never return to the calendar.
    pub fn back(&mut self) -> CheckoutStep {
        self.step = match (self.step, self.kind) {
            (CheckoutStep::Payment, _) => CheckoutStep::Details,
            (CheckoutStep::Details, OrderKind::RoomBooking) => CheckoutStep::Calendar,
            (step, _) => step,
        };

        self.step
    }

    /// Days being charged for: the selected range's inclusive length, or one
    /// while the range is incomplete.
    pub fn day_count(&self) -> i64 {
        self.selector.day_count()
    }

    /// Sum of line totals in minor units, before day multiplication.
    pub fn base_total(&self) -> i64 {
        self.lines.iter().map(OrderLine::total).sum()
    }

    /// The amount to pay in minor units: base total times day count.
    pub fn grand_total(&self) -> i64 {
        self.base_total() * self.day_count()
    }

    /// Build the booking request for the remote store, using the grand
    /// total and the selected range. A one-day stay checks out on its
    /// check-in date.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if this is not a room booking, dates are
    /// missing, or details are incomplete.
    pub fn new_booking(&self) -> Result<NewBooking, CheckoutError> {
        let room_id = self.room_id().ok_or(CheckoutError::NotARoomBooking)?;
        let check_in = self.selector.start().ok_or(CheckoutError::DatesNotSelected)?;

        if !self.details.is_complete() {
            return Err(CheckoutError::IncompleteDetails);
        }

        Ok(NewBooking {
            room_id: room_id.to_string(),
            guest_name: self.details.customer_name.clone(),
            guest_email: self.details.email.clone(),
            guest_phone: self.details.contact_number.clone(),
            check_in,
            check_out: self.selector.end().unwrap_or(check_in),
            total_amount: self.grand_total(),
        })
    }

    /// The plain-text order summary sent over Messenger.
    pub fn summary(&self) -> String {
        let mut text = String::from("🏕️ CAMPFIRE GROUNDS BOOKING\n\n");

        text.push_str(&format!("👤 Customer: {}\n", self.details.customer_name));
        text.push_str(&format!("📧 Email: {}\n", self.details.email));
        text.push_str(&format!("📞 Contact: {}\n", self.details.contact_number));
        text.push_str(&format!("📅 Dates: {}\n", self.dates_line()));

        text.push_str("\n📋 BOOKING DETAILS:\n");
        for line in &self.lines {
            text.push_str(&summarize_line(line));
            text.push('\n');
        }

        let days = self.day_count();
        text.push_str(&format!("\n💰 TOTAL: {}", peso(self.grand_total())));
        if days > 1 {
            text.push_str(&format!(" ({days} days × {})", peso(self.base_total())));
        }
        text.push('\n');

        if let Some(method) = self.payment_method() {
            text.push_str(&format!("\n💳 Payment: {}\n", method.name));
        }
        text.push_str("📸 Payment Screenshot: Please attach your payment receipt screenshot\n");
        text.push_str("\nPlease confirm this booking to proceed. Thank you! 🏕️");

        text
    }

    /// Deep link opening a Messenger conversation with the given page,
    /// pre-filled with the order summary.
    pub fn messenger_link(&self, page_id: &str) -> String {
        let encoded = urlencoding::encode(&self.summary()).into_owned();

        format!("https://m.me/{page_id}?text={encoded}")
    }

    fn dates_line(&self) -> String {
        match (self.selector.start(), self.selector.end()) {
            (Some(start), Some(end)) => {
                format!("{} to {}", long_date(start), long_date(end))
            }
            (Some(start), None) => long_date(start),
            (None, _) => "Not selected".to_string(),
        }
    }
}

/// One summary bullet. Food lines carry their variation, add-ons with
/// counts, and quantity; room lines carry the nightly rate.
fn summarize_line(line: &OrderLine) -> String {
    match line {
        OrderLine::RoomBooking {
            name, nightly_rate, ..
        } => format!("• {name} x1 - {}", peso(*nightly_rate)),
        OrderLine::FoodOrder(line) => {
            let mut text = format!("• {}", line.name);

            if let Some(variation) = &line.variation {
                text.push_str(&format!(" ({})", variation.name));
            }

            if !line.add_ons.is_empty() {
                let add_ons: Vec<String> = line
                    .add_ons
                    .iter()
                    .map(|add_on| {
                        if add_on.quantity > 1 {
                            format!("{} x{}", add_on.name, add_on.quantity)
                        } else {
                            add_on.name.clone()
                        }
                    })
                    .collect();
                text.push_str(&format!(" + {}", add_ons.join(", ")));
            }

            text.push_str(&format!(" x{} - {}", line.quantity, peso(line.total())));

            text
        }
    }
}

fn peso(minor: i64) -> String {
    Money::from_minor(minor, iso::PHP).to_string()
}

fn long_date(date: Date) -> String {
    date.strftime("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;
    use testresult::TestResult;

    use crate::calendar::DateRangeSelector;
    use crate::catalog::{AddOn, MenuItem, Variation};
    use crate::remote::MockRemoteStore;

    use super::*;

    fn menu_item(id: &str, category: &str, base_price: i64) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: "Riverside Cabin".into(),
            description: "Sleeps four".into(),
            base_price,
            category: category.into(),
            available: true,
            popular: false,
            variations: Vec::new(),
            add_ons: Vec::new(),
            discount: None,
        }
    }

    fn room_line() -> CartLine {
        CartLine::new(
            &menu_item("cabin-7", ROOM_RATES_CATEGORY, 1000_00),
            1,
            None,
            &[],
        )
    }

    fn food_line() -> CartLine {
        let mut item = menu_item("tapsilog", "breakfast", 150_00);
        item.name = "Tapsilog".into();
        CartLine::new(&item, 2, None, &[])
    }

    fn selector() -> DateRangeSelector {
        DateRangeSelector::starting_from(date(2024, 6, 1))
    }

    fn details() -> GuestDetails {
        GuestDetails {
            customer_name: "R. Santos".into(),
            email: "r@example.com".into(),
            contact_number: "0917 555 0199".into(),
        }
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let result = Checkout::new(Vec::new(), selector());

        assert_eq!(result.err(), Some(CheckoutError::EmptyOrder));
    }

    #[test]
    fn room_rates_lines_tag_as_room_bookings() {
        let tagged = OrderLine::from_cart(room_line());

        assert!(matches!(
            tagged,
            OrderLine::RoomBooking { ref room_id, nightly_rate, .. }
                if room_id == "cabin-7" && nightly_rate == 1000_00
        ));

        let food = OrderLine::from_cart(food_line());
        assert!(matches!(food, OrderLine::FoodOrder(_)));
    }

    #[test]
    fn room_bookings_start_on_the_calendar() -> TestResult {
        let checkout = Checkout::new(vec![room_line()], selector())?;

        assert_eq!(checkout.kind(), OrderKind::RoomBooking);
        assert_eq!(checkout.step(), CheckoutStep::Calendar);
        assert_eq!(checkout.room_id(), Some("cabin-7"));
        Ok(())
    }

    #[test]
    fn food_orders_skip_the_calendar_and_are_dated_today() -> TestResult {
        let checkout = Checkout::new(vec![food_line()], selector())?;

        assert_eq!(checkout.kind(), OrderKind::FoodOrder);
        assert_eq!(checkout.step(), CheckoutStep::Details);
        assert_eq!(checkout.selector().start(), Some(date(2024, 6, 1)));
        assert_eq!(checkout.room_id(), None);
        Ok(())
    }

    #[test]
    fn calendar_step_requires_a_start_date() -> TestResult {
        let mut checkout = Checkout::new(vec![room_line()], selector())?;

        assert_eq!(checkout.proceed(), Err(CheckoutError::DatesNotSelected));
        assert_eq!(checkout.step(), CheckoutStep::Calendar);

        checkout.selector_mut().click(date(2024, 6, 10));
        assert_eq!(checkout.proceed()?, CheckoutStep::Details);
        Ok(())
    }

    #[test]
    fn details_step_requires_every_field() -> TestResult {
        let mut checkout = Checkout::new(vec![food_line()], selector())?;

        assert_eq!(checkout.proceed(), Err(CheckoutError::IncompleteDetails));

        checkout.set_details(GuestDetails {
            customer_name: "R. Santos".into(),
            email: "   ".into(),
            contact_number: "0917".into(),
        });
        assert_eq!(checkout.proceed(), Err(CheckoutError::IncompleteDetails));

        checkout.set_details(details());
        assert_eq!(checkout.proceed()?, CheckoutStep::Payment);
        Ok(())
    }

    #[test]
    fn back_never_returns_a_food_order_to_the_calendar() -> TestResult {
        let mut checkout = Checkout::new(vec![food_line()], selector())?;
        checkout.set_details(details());
        checkout.proceed()?;

        assert_eq!(checkout.back(), CheckoutStep::Details);
        assert_eq!(checkout.back(), CheckoutStep::Details);
        Ok(())
    }

    #[test]
    fn grand_total_multiplies_the_lines_by_the_day_count() -> TestResult {
        let mut checkout = Checkout::new(vec![room_line()], selector())?;

        checkout.selector_mut().click(date(2024, 6, 10));
        checkout.selector_mut().click(date(2024, 6, 12));

        assert_eq!(checkout.day_count(), 3);
        assert_eq!(checkout.base_total(), 1000_00);
        assert_eq!(checkout.grand_total(), 3000_00);
        Ok(())
    }

    #[test]
    fn single_day_stay_is_charged_once() -> TestResult {
        let mut checkout = Checkout::new(vec![room_line()], selector())?;

        checkout.selector_mut().click(date(2024, 6, 10));

        assert_eq!(checkout.day_count(), 1);
        assert_eq!(checkout.grand_total(), 1000_00);
        Ok(())
    }

    #[test]
    fn first_payment_method_is_the_default() -> TestResult {
        let methods = vec![
            PaymentMethod {
                id: "gcash".into(),
                name: "GCash".into(),
                account_number: "0917 555 0199".into(),
                account_name: "Campfire Grounds".into(),
                qr_code_url: None,
            },
            PaymentMethod {
                id: "bank".into(),
                name: "Bank Transfer".into(),
                account_number: "1234".into(),
                account_name: "Campfire Grounds".into(),
                qr_code_url: None,
            },
        ];

        let mut checkout =
            Checkout::new(vec![food_line()], selector())?.with_payment_methods(methods);

        assert_eq!(checkout.payment_method().map(|m| m.id.as_str()), Some("gcash"));
        assert!(checkout.select_payment_method("bank"));
        assert_eq!(checkout.payment_method().map(|m| m.id.as_str()), Some("bank"));
        assert!(!checkout.select_payment_method("cheque"));
        assert_eq!(checkout.payment_method().map(|m| m.id.as_str()), Some("bank"));
        Ok(())
    }

    #[test]
    fn summary_lists_lines_dates_and_day_breakdown() -> TestResult {
        let mut checkout = Checkout::new(vec![room_line()], selector())?;
        checkout.selector_mut().click(date(2024, 6, 10));
        checkout.selector_mut().click(date(2024, 6, 12));
        checkout.set_details(details());

        let summary = checkout.summary();

        assert!(summary.contains("👤 Customer: R. Santos"));
        assert!(summary.contains("Monday, June 10, 2024 to Wednesday, June 12, 2024"));
        assert!(summary.contains("• Riverside Cabin x1 - ₱1,000.00"));
        assert!(summary.contains("💰 TOTAL: ₱3,000.00 (3 days × ₱1,000.00)"));
        Ok(())
    }

    #[test]
    fn summary_names_the_variation_and_counts_add_ons() {
        let mut item = menu_item("halo-halo", "desserts", 120_00);
        item.name = "Halo-Halo".into();
        item.add_ons = vec![
            AddOn {
                id: "leche-flan".into(),
                name: "Leche Flan".into(),
                price: 25_00,
                category: "toppings".into(),
            },
            AddOn {
                id: "leche-flan".into(),
                name: "Leche Flan".into(),
                price: 25_00,
                category: "toppings".into(),
            },
        ];
        let add_ons = item.add_ons.clone();
        let line = CartLine::new(
            &item,
            1,
            Some(Variation {
                id: "large".into(),
                name: "Large".into(),
                price: 30_00,
            }),
            &add_ons,
        );

        let text = summarize_line(&OrderLine::from_cart(line));

        assert!(text.contains("Halo-Halo (Large)"));
        assert!(text.contains("+ Leche Flan x2"));
        assert!(text.contains("x1 - ₱200.00"));
    }

    #[test]
    fn messenger_link_urlencodes_the_summary() -> TestResult {
        let mut checkout = Checkout::new(vec![food_line()], selector())?;
        checkout.set_details(details());

        let link = checkout.messenger_link("109895820635462");

        assert!(link.starts_with("https://m.me/109895820635462?text="));
        assert!(!link.contains(' '), "spaces must be percent-encoded");
        assert!(link.contains("R.%20Santos"));
        Ok(())
    }

    #[test]
    fn new_booking_carries_the_day_multiplied_total() -> TestResult {
        let mut checkout = Checkout::new(vec![room_line()], selector())?;
        checkout.selector_mut().click(date(2024, 6, 10));
        checkout.selector_mut().click(date(2024, 6, 12));
        checkout.set_details(details());

        let booking = checkout.new_booking()?;

        assert_eq!(booking.room_id, "cabin-7");
        assert_eq!(booking.check_in, date(2024, 6, 10));
        assert_eq!(booking.check_out, date(2024, 6, 12));
        assert_eq!(booking.total_amount, 3000_00);
        Ok(())
    }

    #[test]
    fn food_orders_cannot_build_a_booking() -> TestResult {
        let mut checkout = Checkout::new(vec![food_line()], selector())?;
        checkout.set_details(details());

        assert_eq!(checkout.new_booking(), Err(CheckoutError::NotARoomBooking));
        Ok(())
    }

    #[tokio::test]
    async fn payment_methods_come_from_the_store_in_order() -> TestResult {
        let mut store = MockRemoteStore::new();
        store
            .expect_query()
            .withf(|table, _| table == "payment_methods")
            .returning(|_, _| {
                Ok(vec![
                    json!({
                        "id": "gcash",
                        "name": "GCash",
                        "account_number": "0917 555 0199",
                        "account_name": "Campfire Grounds",
                        "qr_code_url": "https://example.com/qr.png",
                    }),
                    json!({
                        "id": "bank",
                        "name": "Bank Transfer",
                        "account_number": "1234",
                        "account_name": "Campfire Grounds",
                    }),
                ])
            });

        let methods = fetch_payment_methods(&store).await?;

        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].id, "gcash");
        Ok(())
    }
}
