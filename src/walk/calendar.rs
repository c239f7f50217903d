use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Calendar fields in directory-nesting order. Depth 0 is the directory
/// level directly under a file-tag directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Granularity {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

pub(crate) const PERIOD_ORDER: [Granularity; 6] = [
    Granularity::Year,
    Granularity::Month,
    Granularity::Day,
    Granularity::Hour,
    Granularity::Minute,
    Granularity::Second,
];

impl Granularity {
    pub(crate) fn from_depth(depth: usize) -> Option<Granularity> {
        PERIOD_ORDER.get(depth).copied()
    }
}

/// Calendar value the walk starts from before any path segment has been
/// consumed. Substituting a depth-0 year into this yields January 1st of
/// that year at midnight.
pub(crate) fn epoch_placeholder() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(0, 1, 1)
        .expect("year zero is a valid chrono date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
}

/// Truncates `date` to the granularity at `depth` (start of period). Depths
/// past the second level only drop sub-second precision.
pub(crate) fn truncate_to_depth(date: NaiveDateTime, depth: usize) -> NaiveDateTime {
    let granularity = Granularity::from_depth(depth).unwrap_or(Granularity::Second);
    let (year, month, day) = (date.year(), date.month(), date.day());
    let (hour, minute, second) = (date.hour(), date.minute(), date.second());
    let (month, day, hour, minute, second) = match granularity {
        Granularity::Year => (1, 1, 0, 0, 0),
        Granularity::Month => (month, 1, 0, 0, 0),
        Granularity::Day => (month, day, 0, 0, 0),
        Granularity::Hour => (month, day, hour, 0, 0),
        Granularity::Minute => (month, day, hour, minute, 0),
        Granularity::Second => (month, day, hour, minute, second),
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .expect("truncating an existing date keeps it valid")
}

/// Substitutes a directory-name component into the inherited date at the
/// granularity for `depth`. Returns `None` when the depth is past the
/// second level or the value does not form a real calendar date; callers
/// treat both the same as a malformed directory name.
pub(crate) fn with_component(
    date: NaiveDateTime,
    depth: usize,
    value: u32,
) -> Option<NaiveDateTime> {
    match Granularity::from_depth(depth)? {
        Granularity::Year => date.with_year(i32::try_from(value).ok()?),
        Granularity::Month => date.with_month(value),
        Granularity::Day => date.with_day(value),
        Granularity::Hour => date.with_hour(value),
        Granularity::Minute => date.with_minute(value),
        Granularity::Second => date.with_second(value),
    }
}
