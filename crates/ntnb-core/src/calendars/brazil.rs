//! Brazilian exchange calendar for Treasury settlement.

use super::holidays::{fixed_holiday, holidays_in_year, movable_holiday, Holiday};
use super::Calendar;
use crate::types::Date;

/// Brazilian national holidays plus exchange closures.
///
/// ## Holidays
///
/// - New Year's Day (January 1)
/// - Carnival Monday and Tuesday (Easter - 48, Easter - 47)
/// - Good Friday (Easter - 2)
/// - Tiradentes (April 21)
/// - Labour Day (May 1)
/// - Corpus Christi (Easter + 60)
/// - Independence Day (September 7)
/// - Our Lady of Aparecida (October 12)
/// - All Souls' Day (November 2)
/// - Republic Day (November 15)
/// - Black Consciousness Day (November 20, from 2024)
/// - Christmas Eve and New Year's Eve (exchange closures)
/// - Christmas Day (December 25)
///
/// Holidays falling on a weekend are not moved. Every rule is evaluated on
/// demand, so any year is supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrazilCalendar;

impl BrazilCalendar {
    /// Returns the holiday name for `date`, or `None` on a regular day.
    ///
    /// Weekends are not reported here.
    #[must_use]
    pub fn holiday_name(&self, date: Date) -> Option<&'static str> {
        fixed_holiday(date).or_else(|| movable_holiday(date))
    }

    /// Lists the holidays of `year` in date order.
    #[must_use]
    pub fn holidays(&self, year: i32) -> Vec<Holiday> {
        holidays_in_year(year)
    }
}

impl Calendar for BrazilCalendar {
    fn name(&self) -> &'static str {
        "Brazil (B3 Exchange)"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }
        self.holiday_name(date).is_none()
    }
}
