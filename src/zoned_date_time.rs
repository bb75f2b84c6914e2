// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! An immutable instant paired with the civil fields it reads as in a zone.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::civil::{civil, format_offset, naive_from_millis, naive_to_millis, MILLIS_PER_MINUTE};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::tz::{TimeZone, TzRegistry};

/// An absolute instant plus the civil fields it reads as in a time zone.
///
/// A value without a zone is "naive": its fields stand on their own and its
/// instant is the fields read at offset zero. Conversions between zones
/// preserve the instant, not the fields, and comparisons order by instant.
///
/// Invariant (for readings that exist on the local clock):
/// `instant = local fields - offset(local fields)`. Fields inside a forward
/// DST gap normalize past the gap; ambiguous fields take their first
/// occurrence.
#[derive(Debug, Clone)]
pub struct ZonedDateTime {
    /// Milliseconds since the Unix epoch.
    millis: i64,
    /// Civil fields as read on the zone's clock (or the naive fields).
    local: NaiveDateTime,
    zone: Option<Arc<TimeZone>>,
}

impl ZonedDateTime {
    /// Build from explicit civil fields read in `zone` (naive when `None`).
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        zone: Option<Arc<TimeZone>>,
    ) -> Result<Self> {
        let local = civil(year, month, day, hour, minute, second, millisecond)?;
        Ok(Self::from_local(local, zone))
    }

    /// Build from civil fields read in `zone`, applying the gap/overlap
    /// policy of the zone's resolver.
    pub fn from_local(local: NaiveDateTime, zone: Option<Arc<TimeZone>>) -> Self {
        match zone {
            None => ZonedDateTime {
                millis: naive_to_millis(&local),
                local,
                zone: None,
            },
            Some(z) => {
                let (instant, _) = z.resolve_local_millis(naive_to_millis(&local));
                Self::from_millis(instant, Some(z))
            }
        }
    }

    /// Build from an absolute instant; fields are derived for `zone`.
    pub fn from_millis(millis: i64, zone: Option<Arc<TimeZone>>) -> Self {
        let offset = zone.as_deref().map_or(0, |z| z.offset_at_millis(millis));
        ZonedDateTime {
            millis,
            local: naive_from_millis(millis + offset as i64 * MILLIS_PER_MINUTE),
            zone,
        }
    }

    /// Parse an ISO-like date-time with an optional trailing zone designator:
    /// `"2014-01-01T12:00:00.000 UTC"`, `"…+02"`, `"…Z"`,
    /// `"… Europe/Amsterdam"`, or no designator for a naive value.
    pub fn parse(text: &str, registry: &TzRegistry) -> Result<Self> {
        let text = text.trim();
        let (fields_part, zone_part) = split_zone_designator(text);
        let local = NaiveDateTime::parse_from_str(fields_part, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| Error::InputValidation(format!("unparseable date-time: {:?}", text)))?;
        let zone = registry.resolve(zone_part)?;
        Ok(Self::from_local(local, zone))
    }

    /// The current instant in `zone`, read from the platform clock.
    pub fn now(zone: Option<Arc<TimeZone>>) -> Self {
        Self::now_with(&SystemClock, zone)
    }

    /// The current instant in `zone`, read from an injected clock.
    pub fn now_with(clock: &dyn Clock, zone: Option<Arc<TimeZone>>) -> Self {
        Self::from_millis(clock.now_millis(), zone)
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.millis
    }

    /// The civil fields as read on this value's clock.
    pub fn naive_local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn zone(&self) -> Option<&Arc<TimeZone>> {
        self.zone.as_ref()
    }

    /// Offset in minutes east of UTC at this instant (zero when naive).
    pub fn offset(&self) -> i32 {
        ((naive_to_millis(&self.local) - self.millis) / MILLIS_PER_MINUTE) as i32
    }

    pub fn year(&self) -> i32 {
        self.local.year()
    }

    pub fn month(&self) -> u32 {
        self.local.month()
    }

    pub fn day(&self) -> u32 {
        self.local.day()
    }

    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    pub fn second(&self) -> u32 {
        self.local.second()
    }

    pub fn millisecond(&self) -> u32 {
        self.local.nanosecond() / 1_000_000
    }

    /// The same instant with fields recomputed for `zone`. Converting to the
    /// zone already held is a no-op on both instant and fields.
    pub fn to_zone(&self, zone: Arc<TimeZone>) -> Self {
        Self::from_millis(self.millis, Some(zone))
    }

    /// ISO rendering: fields plus `Z` for UTC or the numeric offset for any
    /// other zone; no suffix for naive values.
    pub fn to_iso_string(&self) -> String {
        let mut out = format_fields(&self.local);
        match self.zone.as_deref() {
            None => {}
            Some(z) if z.is_utc() => out.push('Z'),
            Some(_) => out.push_str(&format_offset(self.offset())),
        }
        out
    }
}

impl PartialEq for ZonedDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for ZonedDateTime {}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZonedDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_fields(&self.local))?;
        match self.zone.as_deref() {
            None => Ok(()),
            Some(z) if z.is_fixed_offset() => write!(f, "{}", z),
            Some(z) => write!(f, " {}", z),
        }
    }
}

fn format_fields(local: &NaiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        local.year(),
        local.month(),
        local.day(),
        local.hour(),
        local.minute(),
        local.second(),
        local.nanosecond() / 1_000_000
    )
}

/// Split a trailing zone designator off an ISO-like date-time string. The
/// designator starts at the first `+`, `-`, `Z` or space after the `T`.
fn split_zone_designator(text: &str) -> (&str, &str) {
    let time_start = match text.find('T') {
        Some(idx) => idx + 1,
        None => return (text, ""),
    };
    for (idx, byte) in text.bytes().enumerate().skip(time_start) {
        match byte {
            b'+' | b'-' | b'Z' => return (&text[..idx], &text[idx..]),
            b' ' => return (&text[..idx], text[idx + 1..].trim()),
            _ => {}
        }
    }
    (text, "")
}
