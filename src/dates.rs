//! Calendar helpers for month-bounded ledger queries.

use time::{Date, Duration, Month};

/// First day of the month containing `date`.
pub(crate) fn month_start(date: Date) -> Date {
    date.replace_day(1).unwrap()
}

/// Last day of the month containing `date`.
pub(crate) fn month_end(date: Date) -> Date {
    date.replace_day(date.month().length(date.year())).unwrap()
}

/// First day of the month before the one containing `date`.
pub(crate) fn previous_month_start(date: Date) -> Date {
    month_start(previous_month_end(date))
}

/// Last day of the month before the one containing `date`.
pub(crate) fn previous_month_end(date: Date) -> Date {
    month_start(date) - Duration::days(1)
}

/// The date `months` calendar months before `date`, clamping the day to the
/// target month's length.
pub(crate) fn months_before(date: Date, months: i32) -> Date {
    let total_months = date.year() * 12 + date.month() as i32 - 1 - months;
    let year = total_months.div_euclid(12);
    let month = Month::try_from((total_months.rem_euclid(12) + 1) as u8).unwrap();
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).unwrap()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{month_end, month_start, months_before, previous_month_end, previous_month_start};

    #[test]
    fn month_bounds() {
        assert_eq!(month_start(date!(2026 - 02 - 17)), date!(2026 - 02 - 01));
        assert_eq!(month_end(date!(2026 - 02 - 17)), date!(2026 - 02 - 28));
        assert_eq!(month_end(date!(2024 - 02 - 05)), date!(2024 - 02 - 29));
    }

    #[test]
    fn previous_month_wraps_year() {
        assert_eq!(
            previous_month_start(date!(2026 - 01 - 15)),
            date!(2025 - 12 - 01)
        );
        assert_eq!(
            previous_month_end(date!(2026 - 01 - 15)),
            date!(2025 - 12 - 31)
        );
    }

    #[test]
    fn months_before_clamps_day() {
        assert_eq!(months_before(date!(2026 - 03 - 15), 6), date!(2025 - 09 - 15));
        // Six months before August 31 lands in February.
        assert_eq!(months_before(date!(2025 - 08 - 31), 6), date!(2025 - 02 - 28));
    }
}
