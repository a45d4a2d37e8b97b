//! Holiday rules for the Brazilian exchange calendar.
//!
//! Every rule is a pure function of the year: fixed-date holidays, the
//! Easter-based movable feasts, and the two year-end exchange closures.

use serde::Serialize;
use std::fmt;

use crate::types::Date;

/// A named non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Holiday {
    /// Calendar date of the holiday.
    pub date: Date,
    /// Display name.
    pub name: &'static str,
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.name)
    }
}

/// Fixed-date holidays as `(month, day, name, first year observed)`.
pub(crate) const FIXED_HOLIDAYS: [(u32, u32, &str, i32); 11] = [
    (1, 1, "Confraternização Universal", i32::MIN),
    (4, 21, "Tiradentes", i32::MIN),
    (5, 1, "Dia do Trabalho", i32::MIN),
    (9, 7, "Independência", i32::MIN),
    (10, 12, "Nossa Senhora Aparecida", i32::MIN),
    (11, 2, "Finados", i32::MIN),
    (11, 15, "Proclamação da República", i32::MIN),
    (11, 20, "Dia Nacional de Zumbi e da Consciência Negra", 2024),
    (12, 24, "Véspera de Natal (bolsa fechada)", i32::MIN),
    (12, 25, "Natal", i32::MIN),
    (12, 31, "Véspera de Ano Novo (bolsa fechada)", i32::MIN),
];

/// Movable feasts as `(offset in days from Easter Sunday, name)`.
pub(crate) const EASTER_HOLIDAYS: [(i64, &str); 4] = [
    (-48, "Carnaval (segunda-feira)"),
    (-47, "Carnaval (terça-feira)"),
    (-2, "Sexta-feira Santa"),
    (60, "Corpus Christi"),
];

/// Calculates Easter Sunday using the anonymous Gregorian algorithm.
///
/// Valid for every Gregorian year representable by `Date`.
pub fn easter_sunday(year: i32) -> Date {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;

    // month is 3 or 4 and day is within range for every year
    Date::from_ymd(year, month as u32, day as u32)
        .unwrap_or_else(|_| unreachable!("Easter always falls in March or April"))
}

/// Returns the name of the fixed holiday on `date`, if any.
pub(crate) fn fixed_holiday(date: Date) -> Option<&'static str> {
    FIXED_HOLIDAYS
        .iter()
        .find(|(month, day, _, from)| {
            *month == date.month() && *day == date.day() && date.year() >= *from
        })
        .map(|(_, _, name, _)| *name)
}

/// Returns the name of the Easter-based holiday on `date`, if any.
pub(crate) fn movable_holiday(date: Date) -> Option<&'static str> {
    // Carnival can fall in February, Corpus Christi as late as June
    if !(2..=6).contains(&date.month()) {
        return None;
    }
    let offset = easter_sunday(date.year()).days_between(&date);
    EASTER_HOLIDAYS
        .iter()
        .find(|(days, _)| *days == offset)
        .map(|(_, name)| *name)
}

/// Lists every holiday of `year` in date order, including those on weekends.
pub fn holidays_in_year(year: i32) -> Vec<Holiday> {
    let easter = easter_sunday(year);

    let mut holidays: Vec<Holiday> = FIXED_HOLIDAYS
        .iter()
        .filter(|(_, _, _, from)| year >= *from)
        .filter_map(|(month, day, name, _)| {
            Date::from_ymd(year, *month, *day)
                .ok()
                .map(|date| Holiday { date, name: *name })
        })
        .chain(EASTER_HOLIDAYS.iter().map(|(offset, name)| Holiday {
            date: easter.add_days(*offset),
            name: *name,
        }))
        .collect();

    holidays.sort();
    // a movable feast can land on a fixed holiday
    holidays.dedup_by_key(|h| h.date);
    holidays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_easter() {
        assert_eq!(easter_sunday(2024), date(2024, 3, 31));
        assert_eq!(easter_sunday(2025), date(2025, 4, 20));
        assert_eq!(easter_sunday(2000), date(2000, 4, 23));
        assert_eq!(easter_sunday(2055), date(2055, 4, 18));
        assert_eq!(easter_sunday(1818), date(1818, 3, 22));
    }

    #[test]
    fn test_movable_feasts_2024() {
        assert_eq!(movable_holiday(date(2024, 2, 12)), Some("Carnaval (segunda-feira)"));
        assert_eq!(movable_holiday(date(2024, 2, 13)), Some("Carnaval (terça-feira)"));
        assert_eq!(movable_holiday(date(2024, 3, 29)), Some("Sexta-feira Santa"));
        assert_eq!(movable_holiday(date(2024, 5, 30)), Some("Corpus Christi"));
        assert_eq!(movable_holiday(date(2024, 2, 14)), None);
    }

    #[test]
    fn test_fixed_holiday_from_year() {
        assert!(fixed_holiday(date(2023, 11, 20)).is_none());
        assert!(fixed_holiday(date(2024, 11, 20)).is_some());
        assert_eq!(fixed_holiday(date(2025, 4, 21)), Some("Tiradentes"));
    }

    #[test]
    fn test_holidays_in_year() {
        let holidays = holidays_in_year(2025);
        assert_eq!(holidays.len(), 15);
        assert_eq!(holidays.first().unwrap().date, date(2025, 1, 1));
        assert_eq!(holidays.last().unwrap().date, date(2025, 12, 31));
        assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));

        // Before Consciência Negra became national
        assert_eq!(holidays_in_year(2020).len(), 14);
    }
}
