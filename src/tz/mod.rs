// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Time zones and offset resolution.
//!
//! A [`TimeZone`] answers two questions: what is the UTC offset at a given
//! UTC instant, and what is it for a given local wall-clock reading. The
//! second direction is the hard one: around DST transitions a local reading
//! may not exist (forward gap) or may exist twice (backward overlap). Skipped
//! readings resolve as if rounded up to the first valid instant after the
//! gap; ambiguous readings resolve to their first occurrence. Neither is an
//! error.
//!
//! Zones come in four kinds: UTC, fixed numeric offsets, the system local
//! zone, and named IANA zones backed by an ordered transition table.
//! Instances are created through a [`TzRegistry`], which caches one
//! canonical instance per key.

mod registry;
mod source;
pub(crate) mod table;

pub use registry::{string_to_offset, TzRegistry};

use std::fmt;

use chrono::NaiveDateTime;

use crate::civil::{civil, format_offset, naive_to_millis, MILLIS_PER_MINUTE};
use crate::error::Result;
use crate::tz::table::{LocalResolution, TransitionTable};

/// Which accessor family of a platform date value feeds an offset query:
/// the local civil fields or the UTC fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFields {
    Local,
    Utc,
}

/// A resolved time zone. Obtain instances from [`TzRegistry`]; zones with the
/// same canonical key are the same cached instance.
#[derive(Debug)]
pub struct TimeZone {
    key: Box<str>,
    kind: TimeZoneKind,
}

#[derive(Debug)]
enum TimeZoneKind {
    Utc,
    FixedOffset { minutes: i32 },
    Local { table: Option<&'static TransitionTable> },
    Named { table: TransitionTable },
}

impl TimeZone {
    pub(crate) fn new_utc() -> Self {
        TimeZone {
            key: "UTC".into(),
            kind: TimeZoneKind::Utc,
        }
    }

    /// `minutes` must be non-zero and within range; the registry maps zero to
    /// the UTC instance and validates the range.
    pub(crate) fn new_fixed(minutes: i32) -> Self {
        TimeZone {
            key: format_offset(minutes).into_boxed_str(),
            kind: TimeZoneKind::FixedOffset { minutes },
        }
    }

    pub(crate) fn new_local() -> Self {
        TimeZone {
            key: "localtime".into(),
            kind: TimeZoneKind::Local {
                table: source::system_table(),
            },
        }
    }

    pub(crate) fn new_named(id: &str, table: TransitionTable) -> Self {
        TimeZone {
            key: id.into(),
            kind: TimeZoneKind::Named { table },
        }
    }

    /// Canonical key: `"UTC"`, `"+HH:MM"`, `"localtime"` or the IANA id.
    pub fn name(&self) -> &str {
        &self.key
    }

    /// Offset in minutes east of UTC for a UTC reading given as fields.
    pub fn offset_for_utc(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<i32> {
        let utc = civil(year, month, day, hour, minute, second, millisecond)?;
        Ok(self.offset_for_utc_datetime(&utc))
    }

    /// Offset in minutes east of UTC for a local wall-clock reading given as
    /// fields, applying the gap/overlap policy.
    pub fn offset_for_zone(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<i32> {
        let local = civil(year, month, day, hour, minute, second, millisecond)?;
        Ok(self.offset_for_zone_datetime(&local))
    }

    /// Offset at a UTC instant expressed as a civil reading.
    pub fn offset_for_utc_datetime(&self, utc: &NaiveDateTime) -> i32 {
        self.offset_at_millis(naive_to_millis(utc))
    }

    /// Offset for a civil reading taken on this zone's local clock. Total:
    /// skipped readings answer the post-gap offset, ambiguous readings the
    /// first occurrence's.
    pub fn offset_for_zone_datetime(&self, local: &NaiveDateTime) -> i32 {
        self.resolve_local_millis(naive_to_millis(local)).1
    }

    /// Offset at the instant of a platform date value, with the fields taken
    /// from its local or UTC accessors per `fields`.
    pub fn offset_for_utc_date<Z: chrono::TimeZone>(
        &self,
        date: &chrono::DateTime<Z>,
        fields: DateFields,
    ) -> i32 {
        self.offset_for_utc_datetime(&pick_fields(date, fields))
    }

    /// Local-reading variant of [`offset_for_utc_date`](Self::offset_for_utc_date).
    pub fn offset_for_zone_date<Z: chrono::TimeZone>(
        &self,
        date: &chrono::DateTime<Z>,
        fields: DateFields,
    ) -> i32 {
        self.offset_for_zone_datetime(&pick_fields(date, fields))
    }

    /// True only for named zones whose history contains at least two
    /// distinct offsets.
    pub fn has_dst(&self) -> bool {
        match &self.kind {
            TimeZoneKind::Named { table } => table.has_multiple_offsets(),
            _ => false,
        }
    }

    /// Abbreviation of the rule active at a UTC reading: `"local"` for the
    /// local kind, the offset designator for fixed offsets, the rule's
    /// abbreviation for named zones.
    pub fn abbreviation_for_utc(&self, utc: &NaiveDateTime) -> String {
        match &self.kind {
            TimeZoneKind::Utc => "UTC".to_string(),
            TimeZoneKind::FixedOffset { .. } => self.key.to_string(),
            TimeZoneKind::Local { .. } => "local".to_string(),
            TimeZoneKind::Named { table } => table
                .rule_at_utc(naive_to_millis(utc))
                .abbreviation
                .to_string(),
        }
    }

    pub(crate) fn offset_at_millis(&self, ms: i64) -> i32 {
        match &self.kind {
            TimeZoneKind::Utc => 0,
            TimeZoneKind::FixedOffset { minutes } => *minutes,
            TimeZoneKind::Local { table: None } => 0,
            TimeZoneKind::Local { table: Some(table) } => table.rule_at_utc(ms).offset,
            TimeZoneKind::Named { table } => table.rule_at_utc(ms).offset,
        }
    }

    /// Resolve a local reading (naive milliseconds) to `(instant, offset)`.
    /// Gap readings round the instant up to the end of the gap.
    pub(crate) fn resolve_local_millis(&self, local_ms: i64) -> (i64, i32) {
        let table = match &self.kind {
            TimeZoneKind::Utc => return (local_ms, 0),
            TimeZoneKind::FixedOffset { minutes } => {
                return (local_ms - *minutes as i64 * MILLIS_PER_MINUTE, *minutes)
            }
            TimeZoneKind::Local { table: None } => return (local_ms, 0),
            TimeZoneKind::Local { table: Some(table) } => *table,
            TimeZoneKind::Named { table } => table,
        };
        match table.resolve_local(local_ms) {
            LocalResolution::Unique(rule) => (
                local_ms - rule.offset as i64 * MILLIS_PER_MINUTE,
                rule.offset,
            ),
            LocalResolution::Ambiguous { first, .. } => (
                local_ms - first.offset as i64 * MILLIS_PER_MINUTE,
                first.offset,
            ),
            LocalResolution::Gap { onset_ms, after } => (onset_ms, after.offset),
        }
    }

    pub(crate) fn is_fixed_offset(&self) -> bool {
        matches!(self.kind, TimeZoneKind::FixedOffset { .. })
    }

    pub(crate) fn is_utc(&self) -> bool {
        matches!(self.kind, TimeZoneKind::Utc)
    }
}

/// Structural equality of canonical keys; "Z", "UTC", "+00:00" and a fixed
/// zero offset all canonicalize to the same key.
impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TimeZone {}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

fn pick_fields<Z: chrono::TimeZone>(date: &chrono::DateTime<Z>, fields: DateFields) -> NaiveDateTime {
    match fields {
        DateFields::Local => date.naive_local(),
        DateFields::Utc => date.naive_utc(),
    }
}
