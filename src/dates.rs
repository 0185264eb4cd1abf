//! Calendar helpers: ISO week numbering and display formatting.

use jiff::{
    Timestamp, ToSpan, Zoned,
    civil::{Date, Weekday},
    tz::TimeZone,
};

/// The ISO 8601 week a moment falls in.
///
/// Week 1 is the week containing the year's first Thursday and weeks run
/// Monday to Sunday, so early January can belong to the previous year's last
/// week and late December to the next year's first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoWeek {
    pub year: i16,
    pub week: i8,
}

impl IsoWeek {
    pub fn of(date: Date) -> Self {
        let iso = date.iso_week_date();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

/// The Monday on or before `date`.
pub fn week_start(date: Date) -> Date {
    let back = i64::from(date.weekday().to_monday_zero_offset());
    date.saturating_sub(back.days())
}

/// Today's date in the system time zone.
pub fn today() -> Date {
    Zoned::now().date()
}

/// Calendar date of a timestamp in the system time zone.
pub fn local_date(ts: Timestamp) -> Date {
    ts.to_zoned(TimeZone::system()).date()
}

/// Long form, e.g. `Monday, January 8, 2024`.
pub fn format_date(date: Date) -> String {
    date.strftime("%A, %B %-d, %Y").to_string()
}

/// Short form, e.g. `08/01/2024`.
pub fn format_date_short(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

/// Whether a date is the first day of its ISO week.
pub fn is_week_start(date: Date) -> bool {
    date.weekday() == Weekday::Monday
}
