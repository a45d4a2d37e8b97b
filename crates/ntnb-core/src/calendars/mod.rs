//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with the day-count primitives used for discounting
//! - [`BrazilCalendar`], the exchange calendar used for Treasury settlement
//! - Business day adjustment conventions
//!
//! Calendar queries never fail. Dates are assumed valid, which the [`Date`]
//! type already guarantees.

mod brazil;
mod conventions;
mod holidays;

pub use brazil::BrazilCalendar;
pub use conventions::BusinessDayConvention;
pub use holidays::{easter_sunday, holidays_in_year, Holiday};

use crate::types::Date;

/// Trait for business day calendars.
///
/// Implementors only decide [`Calendar::is_business_day`]; every other
/// operation is derived from it.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday or weekend.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Returns the first business day strictly after `date`.
    fn next_business_day(&self, date: Date) -> Date {
        let mut result = date.add_days(1);
        while !self.is_business_day(result) {
            result = result.add_days(1);
        }
        result
    }

    /// Returns the last business day strictly before `date`.
    fn previous_business_day(&self, date: Date) -> Date {
        let mut result = date.add_days(-1);
        while !self.is_business_day(result) {
            result = result.add_days(-1);
        }
        result
    }

    /// Advances a date by a number of business days.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Counts business days in `[start, end)`.
    ///
    /// `start` is counted when it is a business day, `end` never is. Returns
    /// zero when `end <= start`. Callers that want both ends add one.
    fn business_days_between(&self, start: Date, end: Date) -> u32 {
        let mut count = 0;
        let mut current = start;

        while current < end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// Useful for testing with synthetic schedules.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}
