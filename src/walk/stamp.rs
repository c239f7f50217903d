//! Trailing date-stamps on production file names.
//!
//! Every dated file ends with a numeric stamp right before its extension: a
//! four digit year, optionally extended by up to five `_NN` groups (month,
//! day, hour, minute, second), with a fractional-seconds suffix permitted
//! only once all five groups are present. The stamp encodes the file's own
//! granularity, so range checks truncate the query bounds to match it.

use crate::walk::calendar::truncate_to_depth;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern a dated file name must match. The capture group is the stamp
/// itself; everything before it is an arbitrary non-empty prefix.
pub static DATE_STAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.+?([0-9]{4}(?:(?:_[0-9]{2}){0,5}|(?:_[0-9]{2}){5}\.[0-9]+))\.[a-zA-Z0-9]+$")
        .expect("date stamp pattern compiles")
});

/// A parsed stamp: the calendar value it encodes (omitted components
/// defaulted to start of period) and the granularity depth it carries
/// (0 = year only, 5 = down to seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DateStamp {
    pub(crate) date: NaiveDateTime,
    pub(crate) depth: usize,
}

pub(crate) fn parse_stamp(name: &str) -> Option<DateStamp> {
    let captures = DATE_STAMP_PATTERN.captures(name)?;
    let stamp = captures.get(1)?.as_str();
    let parts: Vec<&str> = stamp.split('_').collect();
    let depth = parts.len() - 1;

    let year: i32 = parts[0].parse().ok()?;
    let mut month = 1;
    let mut day = 1;
    let mut hour = 0;
    let mut minute = 0;
    let mut second = 0;
    let mut nanos = 0;
    for (position, part) in parts.iter().enumerate().skip(1) {
        match position {
            1 => month = part.parse().ok()?,
            2 => day = part.parse().ok()?,
            3 => hour = part.parse().ok()?,
            4 => minute = part.parse().ok()?,
            5 => {
                let (whole, fraction) = match part.split_once('.') {
                    Some((whole, fraction)) => (whole, Some(fraction)),
                    None => (*part, None),
                };
                second = whole.parse().ok()?;
                if let Some(fraction) = fraction {
                    nanos = parse_fraction_nanos(fraction)?;
                }
            }
            _ => return None,
        }
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_nano_opt(hour, minute, second, nanos)?;
    Some(DateStamp { date, depth })
}

fn parse_fraction_nanos(fraction: &str) -> Option<u32> {
    let digits: String = fraction.chars().take(9).collect();
    let scale = 10u32.pow(9 - digits.len() as u32);
    digits.parse::<u32>().ok().map(|n| n * scale)
}

/// Whether a file name carries a stamp falling inside `[start, end]`, with
/// the bounds truncated to the stamp's own granularity. Unstamped or
/// malformed names are simply out of range.
pub(crate) fn file_in_range(name: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    match parse_stamp(name) {
        Some(stamp) => {
            let start = truncate_to_depth(start, stamp.depth);
            let end = truncate_to_depth(end, stamp.depth);
            stamp.date >= start && stamp.date <= end
        }
        None => false,
    }
}
