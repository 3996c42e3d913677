use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::model::sheet::SheetDate;

/// Trailing `day.month` suffix, 1-2 digits each, optionally preceded by
/// whitespace. A digit or dot right before the day is not a suffix
/// (`Tour 2024.03` is undated).
static DATE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\d.])\s*(\d{1,2})\.(\d{1,2})$").unwrap());

/// Extract the implied date from a sheet name.
///
/// The year is inferred: a month earlier than `reference_month` is assumed to
/// be next year's occurrence. Dates more than about eleven months out cannot
/// be represented. Days are not checked against the calendar.
pub fn parse_date(name: &str, reference_year: i32, reference_month: u32) -> SheetDate {
    let caps = match DATE_SUFFIX_RE.captures(name) {
        Some(c) => c,
        None => return SheetDate::default(),
    };
    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);

    if !(1..=12).contains(&month) {
        return SheetDate {
            day,
            month,
            year: 0,
        };
    }

    let year = if month < reference_month {
        reference_year + 1
    } else {
        reference_year
    };
    SheetDate { day, month, year }
}

/// Like [`parse_date`], pivoting on a calendar date
pub fn parse_date_on(name: &str, reference: NaiveDate) -> SheetDate {
    parse_date(name, reference.year(), reference.month())
}

/// Build a tour name `"<base> DD.MM"` that [`parse_date`] reads back with the
/// same day and month
pub fn tour_name(base: &str, date: NaiveDate) -> String {
    format!("{} {:02}.{:02}", base.trim(), date.day(), date.month())
}

/// Spanish month name for 1..=12
pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "Enero",
        "Febrero",
        "Marzo",
        "Abril",
        "Mayo",
        "Junio",
        "Julio",
        "Agosto",
        "Septiembre",
        "Octubre",
        "Noviembre",
        "Diciembre",
    ];
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    NAMES.get(idx).copied()
}

/// `"<MonthName> <year>"` for a resolved date, `None` otherwise
pub fn month_label(date: &SheetDate) -> Option<String> {
    if !date.is_resolved() {
        return None;
    }
    month_name(date.month).map(|name| format!("{} {}", name, date.year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(day: u32, month: u32, year: i32) -> SheetDate {
        SheetDate { day, month, year }
    }

    #[test]
    fn earlier_month_rolls_to_next_year() {
        assert_eq!(parse_date("Tour 05.03", 2024, 6), date(5, 3, 2025));
    }

    #[test]
    fn same_or_later_month_stays_in_year() {
        assert_eq!(parse_date("Tour 05.03", 2024, 2), date(5, 3, 2024));
        assert_eq!(parse_date("Tour 05.03", 2024, 3), date(5, 3, 2024));
    }

    #[test]
    fn no_suffix_is_all_zero() {
        assert_eq!(parse_date("Plantilla Nacional", 2024, 6), SheetDate::default());
        assert_eq!(parse_date("", 2024, 6), SheetDate::default());
        assert_eq!(parse_date("Tour 05.03 extra", 2024, 6), SheetDate::default());
    }

    #[test]
    fn single_digits_and_no_space() {
        assert_eq!(parse_date("Samaná 7.8", 2024, 1), date(7, 8, 2024));
        assert_eq!(parse_date("Samaná7.8", 2024, 1), date(7, 8, 2024));
        assert_eq!(parse_date("1.2", 2024, 1), date(1, 2, 2024));
    }

    #[test]
    fn longer_digit_runs_are_not_a_suffix() {
        assert_eq!(parse_date("Cierre 2024.03", 2024, 1), SheetDate::default());
        assert_eq!(parse_date("Tour 05.003", 2024, 1), SheetDate::default());
        assert_eq!(parse_date("v1.05.03", 2024, 1), SheetDate::default());
    }

    #[test]
    fn out_of_range_month_keeps_day_and_month_but_no_year() {
        assert_eq!(parse_date("Tour 05.13", 2024, 6), date(5, 13, 0));
        assert_eq!(parse_date("Tour 05.00", 2024, 6), date(5, 0, 0));
    }

    #[test]
    fn days_are_not_calendar_checked() {
        assert_eq!(parse_date("Tour 31.02", 2024, 1), date(31, 2, 2024));
    }

    #[test]
    fn tour_name_reparses() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let name = tour_name("Jarabacoa ", d);
        assert_eq!(name, "Jarabacoa 05.03");
        let parsed = parse_date_on(&name, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!((parsed.day, parsed.month), (5, 3));
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label(&date(5, 3, 2024)).as_deref(), Some("Marzo 2024"));
        assert_eq!(month_label(&date(5, 13, 0)), None);
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(12), Some("Diciembre"));
    }
}
