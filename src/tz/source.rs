// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Derives per-zone transition tables from the pre-built chrono-tz database.
//!
//! chrono-tz ships the parsed IANA data; this module samples it once per zone
//! into the ordered table the resolver binary-searches. A coarse weekly scan
//! finds the segments where the offset changes and a bisection narrows each
//! change to the exact second. IANA transitions sit far apart compared to the
//! scan stride, so nothing real is skipped.

use chrono::{DateTime, Offset, TimeZone};
use chrono_tz::{OffsetName, Tz};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::civil::{format_offset, MILLIS_PER_SECOND};
use crate::tz::table::{Transition, TransitionTable};

/// Scan range: 1890-01-01 .. 2100-01-01 (seconds since the epoch).
const SCAN_START_SECS: i64 = -2_524_521_600;
const SCAN_END_SECS: i64 = 4_102_444_800;
const SCAN_STEP_SECS: i64 = 7 * 86_400;

/// Table for the system zone, derived lazily on first use of the Local kind.
static SYSTEM_TABLE: Lazy<Option<TransitionTable>> = Lazy::new(|| {
    let id = iana_time_zone::get_timezone().ok()?;
    let table = named_table(&id);
    if table.is_none() {
        debug!(zone = id.as_str(), "system time zone not found in IANA data");
    }
    table
});

/// Look up a named zone and derive its transition table.
/// Returns `None` for identifiers unknown to the IANA database.
pub(crate) fn named_table(id: &str) -> Option<TransitionTable> {
    let tz: Tz = id.parse().ok()?;
    Some(scan_table(tz))
}

/// The system zone's table, shared process-wide.
pub(crate) fn system_table() -> Option<&'static TransitionTable> {
    SYSTEM_TABLE.as_ref()
}

fn scan_table(tz: Tz) -> TransitionTable {
    let mut transitions = vec![Transition {
        start_ms: i64::MIN,
        offset: offset_minutes(tz, SCAN_START_SECS),
        abbreviation: abbreviation(tz, SCAN_START_SECS),
    }];

    let mut prev_secs = SCAN_START_SECS;
    let mut prev_offset = transitions[0].offset;
    let mut secs = SCAN_START_SECS + SCAN_STEP_SECS;
    while secs <= SCAN_END_SECS {
        let offset = offset_minutes(tz, secs);
        if offset != prev_offset {
            let exact = refine(tz, prev_secs, secs, prev_offset);
            transitions.push(Transition {
                start_ms: exact * MILLIS_PER_SECOND,
                offset: offset_minutes(tz, exact),
                abbreviation: abbreviation(tz, exact),
            });
        }
        prev_offset = offset;
        prev_secs = secs;
        secs += SCAN_STEP_SECS;
    }

    debug!(
        zone = tz.name(),
        transitions = transitions.len(),
        "derived transition table"
    );
    TransitionTable { transitions }
}

/// Narrow a detected change to the first second holding the new offset.
fn refine(tz: Tz, mut lo: i64, mut hi: i64, lo_offset: i32) -> i64 {
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if offset_minutes(tz, mid) == lo_offset {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

fn offset_minutes(tz: Tz, secs: i64) -> i32 {
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => {
            tz.offset_from_utc_datetime(&utc.naive_utc())
                .fix()
                .local_minus_utc()
                / 60
        }
        None => 0,
    }
}

fn abbreviation(tz: Tz, secs: i64) -> Box<str> {
    let Some(utc) = DateTime::from_timestamp(secs, 0) else {
        return "UTC".into();
    };
    let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
    match offset.abbreviation() {
        Some(abbr) => abbr.into(),
        // Zones with purely numeric designations fall back to the offset form.
        None => format_offset(offset.fix().local_minus_utc() / 60).into(),
    }
}
