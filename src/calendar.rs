//! Calendar
//!
//! Two-click date-range selection for the booking calendar. The selector
//! owns the `(start, end)` pair, validates every candidate click against the
//! minimum selectable date and the externally supplied blocked set, and
//! derives the day count used as a price multiplier at checkout.

use jiff::civil::Date;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Which endpoint the next valid click will set.
///
/// Derived state: the selector is awaiting an end exactly when a start is
/// selected without an end. A completed range puts it back to awaiting a
/// start, so the machine is perpetually re-enterable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No start selected, or a completed range that the next click replaces.
    AwaitingStart,

    /// A start is selected and the next in-order click completes the range.
    AwaitingEnd,
}

/// Render-oriented view of a single calendar day, pure in the selector state
/// and the given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    /// Before the minimum selectable date.
    pub disabled: bool,

    /// Marked unavailable by the external store.
    pub blocked: bool,

    /// Equal to the selected start or end date.
    pub selected: bool,

    /// Within a completed range, endpoints included.
    pub in_range: bool,

    /// Equal to the reference "today" passed by the caller.
    pub today: bool,

    /// Neither disabled nor blocked; a click on this day changes state.
    pub clickable: bool,
}

/// Interactive start/end date selection over a set of blocked dates.
#[derive(Debug, Clone)]
pub struct DateRangeSelector {
    start: Option<Date>,
    end: Option<Date>,
    min_date: Date,
    blocked: FxHashSet<Date>,
}

impl DateRangeSelector {
    /// A selector with no blocked dates, accepting dates from today onward.
    pub fn new() -> Self {
        Self::starting_from(jiff::Zoned::now().date())
    }

    /// A selector accepting dates from `min_date` onward.
    pub fn starting_from(min_date: Date) -> Self {
        Self {
            start: None,
            end: None,
            min_date,
            blocked: FxHashSet::default(),
        }
    }

    /// Replace the blocked-date set, e.g. after fetching availability for a
    /// different room. The current selection is left as-is; only future
    /// clicks consult the new set.
    pub fn set_blocked_dates(&mut self, blocked: impl IntoIterator<Item = Date>) {
        self.blocked = blocked.into_iter().collect();
    }

    /// Builder-style variant of [`Self::set_blocked_dates`].
    #[must_use]
    pub fn with_blocked_dates(mut self, blocked: impl IntoIterator<Item = Date>) -> Self {
        self.set_blocked_dates(blocked);
        self
    }

    /// The selected start date, if any.
    pub fn start(&self) -> Option<Date> {
        self.start
    }

    /// The selected end date, if any.
    pub fn end(&self) -> Option<Date> {
        self.end
    }

    /// The minimum selectable date.
    pub fn min_date(&self) -> Date {
        self.min_date
    }

    /// Current selection phase, derived from the endpoints.
    pub fn phase(&self) -> SelectionPhase {
        match (self.start, self.end) {
            (Some(_), None) => SelectionPhase::AwaitingEnd,
            _ => SelectionPhase::AwaitingStart,
        }
    }

    /// Whether both endpoints are selected.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Handle a click on a calendar day. Returns `true` when the selection
    /// changed.
    ///
    /// Disabled and blocked dates are no-ops in every phase. Awaiting a
    /// start, the click sets the start and clears any previous end. Awaiting
    /// an end, an in-order click (`date >= start`) completes the range; an
    /// out-of-order click restarts the range at the clicked date instead of
    /// erroring.
    pub fn click(&mut self, date: Date) -> bool {
        if !self.is_clickable(date) {
            return false;
        }

        match self.phase() {
            SelectionPhase::AwaitingStart => {
                self.start = Some(date);
                self.end = None;
            }
            SelectionPhase::AwaitingEnd => {
                if self.start.is_some_and(|start| date >= start) {
                    self.end = Some(date);
                } else {
                    self.start = Some(date);
                    self.end = None;
                }
            }
        }

        true
    }

    /// Discard any selection.
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Before the minimum selectable date.
    pub fn is_disabled(&self, date: Date) -> bool {
        date < self.min_date
    }

    /// In the blocked set.
    pub fn is_blocked(&self, date: Date) -> bool {
        self.blocked.contains(&date)
    }

    /// Equal to either selected endpoint.
    pub fn is_selected(&self, date: Date) -> bool {
        self.start == Some(date) || self.end == Some(date)
    }

    /// Within the completed range, endpoints included. Always false while
    /// the range is incomplete.
    pub fn is_in_range(&self, date: Date) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    /// Neither disabled nor blocked.
    pub fn is_clickable(&self, date: Date) -> bool {
        !self.is_disabled(date) && !self.is_blocked(date)
    }

    /// Combined per-day view for rendering. `today` is the caller's
    /// reference date.
    pub fn day_status(&self, date: Date, today: Date) -> DayStatus {
        DayStatus {
            disabled: self.is_disabled(date),
            blocked: self.is_blocked(date),
            selected: self.is_selected(date),
            in_range: self.is_in_range(date),
            today: date == today,
            clickable: self.is_clickable(date),
        }
    }

    /// Number of inclusive calendar days covered by the selection: `1` until
    /// both endpoints are set, otherwise `end - start + 1`.
    pub fn day_count(&self) -> i64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                let days = start.until(end).map_or(0, |span| span.get_days());
                i64::from(days) + 1
            }
            _ => 1,
        }
    }

    /// Price for the stay: the base price multiplied by the day count.
    /// Recomputed from scratch on every call.
    pub fn stay_total(&self, base_price: i64) -> i64 {
        base_price * self.day_count()
    }
}

impl Default for DateRangeSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of one month for grid rendering: how many leading blank cells a
/// Sunday-first week grid needs, and how many days the month has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    /// Blank cells before day 1, with Sunday as column zero.
    pub leading_blanks: i8,

    /// Number of days in the month.
    pub days: i8,
}

/// Grid shape for the given year and month.
///
/// # Errors
///
/// Returns a [`jiff::Error`] if `year`/`month` do not name a valid month.
pub fn month_grid(year: i16, month: i8) -> Result<MonthGrid, jiff::Error> {
    let first = Date::new(year, month, 1)?;

    Ok(MonthGrid {
        leading_blanks: first.weekday().to_sunday_zero_offset(),
        days: first.days_in_month(),
    })
}
