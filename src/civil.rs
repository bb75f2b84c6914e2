// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Civil-field helpers shared by the resolver and the period engine.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;
pub(crate) const MILLIS_PER_MINUTE: i64 = 60_000;
pub(crate) const MILLIS_PER_HOUR: i64 = 3_600_000;
pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;
pub(crate) const MILLIS_PER_WEEK: i64 = 604_800_000;

/// Build a civil date-time from explicit fields (month and day are 1-based).
pub(crate) fn civil(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, millisecond))
        .ok_or_else(|| {
            Error::InputValidation(format!(
                "invalid civil date-time {:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
                year, month, day, hour, minute, second, millisecond
            ))
        })
}

/// Milliseconds since the epoch of a civil reading taken at offset zero.
pub(crate) fn naive_to_millis(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// Inverse of [`naive_to_millis`]; saturates at the chrono range limits.
pub(crate) fn naive_from_millis(ms: i64) -> NaiveDateTime {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.naive_utc(),
        None if ms < 0 => NaiveDateTime::MIN,
        None => NaiveDateTime::MAX,
    }
}

/// Add whole months, clamping the day-of-month to the target month's last day
/// (Jan 31 + 1 month = Feb 28/29). `months` must be non-negative.
pub(crate) fn add_months(dt: NaiveDateTime, months: i64) -> NaiveDateTime {
    if months == 0 {
        return dt;
    }
    let months = u32::try_from(months).unwrap_or(u32::MAX);
    dt.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Render an offset in minutes as a `+HH:MM` designator.
pub(crate) fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_addition_clamps() {
        let jan31 = civil(2014, 1, 31, 0, 0, 0, 0).unwrap();
        assert_eq!(add_months(jan31, 1), civil(2014, 2, 28, 0, 0, 0, 0).unwrap());
        assert_eq!(add_months(jan31, 2), civil(2014, 3, 31, 0, 0, 0, 0).unwrap());
        assert_eq!(add_months(jan31, 3), civil(2014, 4, 30, 0, 0, 0, 0).unwrap());
        assert_eq!(add_months(jan31, 25), civil(2016, 2, 29, 0, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_fields_rejected() {
        assert!(civil(2014, 13, 1, 0, 0, 0, 0).is_err());
        assert!(civil(2014, 2, 30, 0, 0, 0, 0).is_err());
        assert!(civil(2014, 1, 1, 24, 0, 0, 0).is_err());
    }

    #[test]
    fn test_offset_formatting() {
        assert_eq!(format_offset(90), "+01:30");
        assert_eq!(format_offset(-90), "-01:30");
        assert_eq!(format_offset(3), "+00:03");
        assert_eq!(format_offset(0), "+00:00");
    }
}
