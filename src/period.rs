// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Recurring time boundaries anchored to a start date.
//!
//! A [`Period`] generates the boundary sequence `B_k` = start advanced by
//! `k * amount` units. Two DST policies reconcile the sequence with zone
//! transitions:
//!
//! - [`PeriodDst::RegularIntervals`]: equal real time between boundaries for
//!   fixed-duration units (an hourly period ticks every 3600 real seconds
//!   through any transition). Calendar units advance the local fields and
//!   keep the start's offset, so the rendered time-of-day may shift across a
//!   transition.
//! - [`PeriodDst::RegularLocalTime`]: the local clock reading stays in step
//!   with the anchor for every unit; the real distance between boundaries
//!   stretches or shrinks by whatever DST shift is crossed.
//!
//! Sub-day amounts that do not divide their day evenly reset their cycle
//! each local day at the start's time-of-day under regular local time, so
//! the last interval before the reset may come up short; regular intervals
//! run continuously across midnight instead.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime};
use tracing::trace;

use crate::civil::{
    add_months, naive_from_millis, naive_to_millis, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    MILLIS_PER_MINUTE, MILLIS_PER_SECOND, MILLIS_PER_WEEK,
};
use crate::error::{Error, Result};
use crate::tz::TimeZone;
use crate::zoned_date_time::ZonedDateTime;

/// Calendar units, ordered by size. Second through Week have a fixed real
/// duration; Month and Year vary with the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Real duration in milliseconds for fixed units, `None` for Month/Year.
    pub fn fixed_millis(self) -> Option<i64> {
        match self {
            TimeUnit::Second => Some(MILLIS_PER_SECOND),
            TimeUnit::Minute => Some(MILLIS_PER_MINUTE),
            TimeUnit::Hour => Some(MILLIS_PER_HOUR),
            TimeUnit::Day => Some(MILLIS_PER_DAY),
            TimeUnit::Week => Some(MILLIS_PER_WEEK),
            TimeUnit::Month | TimeUnit::Year => None,
        }
    }

    fn months(self) -> Option<i64> {
        match self {
            TimeUnit::Month => Some(1),
            TimeUnit::Year => Some(12),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a period reconciles its boundaries with DST transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodDst {
    /// Uniform elapsed real time between boundaries.
    RegularIntervals,
    /// Uniform local clock reading between boundaries.
    RegularLocalTime,
}

/// An immutable recurring period: start, positive amount, unit, DST policy.
#[derive(Debug, Clone)]
pub struct Period {
    start: ZonedDateTime,
    amount: i64,
    unit: TimeUnit,
    dst: PeriodDst,
}

impl Period {
    /// `amount` must be a positive integer.
    pub fn new(start: ZonedDateTime, amount: i64, unit: TimeUnit, dst: PeriodDst) -> Result<Self> {
        if amount < 1 {
            return Err(Error::InputValidation(format!(
                "period amount must be a positive integer, got {}",
                amount
            )));
        }
        Ok(Period {
            start,
            amount,
            unit,
            dst,
        })
    }

    pub fn start(&self) -> &ZonedDateTime {
        &self.start
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn dst(&self) -> PeriodDst {
        self.dst
    }

    /// The first boundary strictly after `from`, rendered in `from`'s zone.
    /// When `from` lies before the start, the start itself is returned.
    pub fn find_first(&self, from: &ZonedDateTime) -> ZonedDateTime {
        let boundary = if from.epoch_millis() < self.start_instant() {
            self.start.clone()
        } else {
            self.boundary_after(from.epoch_millis())
        };
        self.rezone(boundary, from)
    }

    /// The boundary `count` periods after the cycle containing `from`,
    /// rendered in `from`'s zone.
    pub fn find_next(&self, from: Option<&ZonedDateTime>, count: i64) -> Result<ZonedDateTime> {
        let from = from.ok_or(Error::NullArgument("fromDate"))?;
        if count < 1 {
            return Err(Error::InputValidation(format!(
                "count must be a positive integer, got {}",
                count
            )));
        }
        let (mut boundary, remaining) = if from.epoch_millis() < self.start_instant() {
            (self.start.clone(), count)
        } else {
            (self.boundary_after(from.epoch_millis()), count - 1)
        };
        for _ in 0..remaining {
            boundary = self.boundary_after(boundary.epoch_millis());
        }
        Ok(self.rezone(boundary, from))
    }

    /// Whether `date` coincides with a boundary to millisecond precision.
    /// Absent dates are simply not boundaries.
    pub fn is_boundary(&self, date: Option<&ZonedDateTime>) -> bool {
        let Some(date) = date else {
            return false;
        };
        let t = date.epoch_millis();
        if t == self.start_instant() {
            return true;
        }
        if t < self.start_instant() {
            return false;
        }
        self.boundary_after(t - 1).epoch_millis() == t
    }

    /// ISO-8601 start/repeating-duration rendering. The DST policy is not
    /// representable in this form and is lost.
    pub fn to_iso_string(&self) -> String {
        let mut out = self.start.to_iso_string();
        out.push_str("/P");
        match self.unit {
            TimeUnit::Second => out.push_str(&format!("T{}S", self.amount)),
            TimeUnit::Minute => out.push_str(&format!("T{}M", self.amount)),
            TimeUnit::Hour => out.push_str(&format!("{}H", self.amount)),
            TimeUnit::Day => out.push_str(&format!("{}D", self.amount)),
            TimeUnit::Week => out.push_str(&format!("{}W", self.amount)),
            TimeUnit::Month => out.push_str(&format!("{}M", self.amount)),
            TimeUnit::Year => out.push_str(&format!("{}Y", self.amount)),
        }
        out
    }

    /// The first boundary with an instant strictly greater than `instant`,
    /// in the period's own zone.
    fn boundary_after(&self, instant: i64) -> ZonedDateTime {
        match self.dst {
            PeriodDst::RegularIntervals => match self.unit.fixed_millis() {
                Some(unit_ms) => {
                    let step = self.amount * unit_ms;
                    let start = self.start_instant();
                    let cycles = if instant < start {
                        0
                    } else {
                        (instant - start).div_euclid(step) + 1
                    };
                    self.at_instant(start + cycles * step)
                }
                None => {
                    // Calendar units: the local fields advance, the instant
                    // keeps the start's offset; rendering reprojects through
                    // the zone.
                    let offset_ms = self.start.offset() as i64 * MILLIS_PER_MINUTE;
                    let k = self.month_index_after(instant + offset_ms);
                    let local = self.month_boundary_local(k);
                    self.at_instant(naive_to_millis(&local) - offset_ms)
                }
            },
            PeriodDst::RegularLocalTime => {
                let mut reading = instant + self.offset_at(instant) as i64 * MILLIS_PER_MINUTE;
                loop {
                    let candidate = self.next_local_boundary(reading);
                    let (resolved, _) = match self.zone() {
                        Some(z) => z.resolve_local_millis(candidate),
                        None => (candidate, 0),
                    };
                    // A candidate can resolve at or before `instant` around a
                    // backward transition (its first occurrence already
                    // passed); keep stepping the local reading.
                    if resolved > instant {
                        return self.at_instant(resolved);
                    }
                    reading = candidate;
                }
            }
        }
    }

    /// The smallest local boundary reading strictly after `reading`, on the
    /// naive local timeline anchored at the start's fields.
    fn next_local_boundary(&self, reading: i64) -> i64 {
        match self.unit {
            TimeUnit::Month | TimeUnit::Year => {
                naive_to_millis(&self.month_boundary_local(self.month_index_after(reading)))
            }
            TimeUnit::Day | TimeUnit::Week => {
                // total match: fixed_millis is Some for these units
                let unit_ms = self.unit.fixed_millis().unwrap_or(MILLIS_PER_DAY);
                self.stride_after(reading, self.amount * unit_ms)
            }
            TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
                let unit_ms = self.unit.fixed_millis().unwrap_or(MILLIS_PER_SECOND);
                let span = self.amount * unit_ms;
                if span % MILLIS_PER_DAY == 0 {
                    return self.stride_after(reading, span);
                }
                let start_local = self.start_local_millis();
                if reading < start_local {
                    return start_local;
                }
                // cycle phase resets each local day at the start's
                // time-of-day; the final interval may be short
                let day_start =
                    start_local + (reading - start_local).div_euclid(MILLIS_PER_DAY) * MILLIS_PER_DAY;
                let candidate = day_start + ((reading - day_start).div_euclid(span) + 1) * span;
                candidate.min(day_start + MILLIS_PER_DAY)
            }
        }
    }

    fn stride_after(&self, reading: i64, step: i64) -> i64 {
        let start_local = self.start_local_millis();
        if reading < start_local {
            return start_local;
        }
        start_local + ((reading - start_local).div_euclid(step) + 1) * step
    }

    /// Local fields of boundary `k` for calendar units, day-of-month clamped.
    fn month_boundary_local(&self, k: i64) -> NaiveDateTime {
        self.months_per_step()
            .map(|step| add_months(self.start.naive_local(), k * step))
            .unwrap_or_else(|| self.start.naive_local())
    }

    /// The smallest `k >= 0` whose calendar boundary reads strictly after
    /// `threshold` milliseconds on the local timeline. Interpolates from the
    /// calendar distance, then steps to the exact index.
    fn month_index_after(&self, threshold: i64) -> i64 {
        let Some(step) = self.months_per_step() else {
            return 0;
        };
        let target = naive_from_millis(threshold);
        let start = self.start.naive_local();
        let diff = (target.year() as i64 - start.year() as i64) * 12
            + (target.month() as i64 - start.month() as i64);
        let mut k = (diff / step - 1).max(0);
        let estimate = k;
        while k > 0 && naive_to_millis(&self.month_boundary_local(k - 1)) > threshold {
            k -= 1;
        }
        while naive_to_millis(&self.month_boundary_local(k)) <= threshold {
            k += 1;
        }
        trace!(estimate, index = k, "calendar boundary search");
        k
    }

    fn months_per_step(&self) -> Option<i64> {
        self.unit.months().map(|m| m * self.amount)
    }

    fn start_instant(&self) -> i64 {
        self.start.epoch_millis()
    }

    fn start_local_millis(&self) -> i64 {
        naive_to_millis(&self.start.naive_local())
    }

    fn zone(&self) -> Option<&Arc<TimeZone>> {
        self.start.zone()
    }

    fn offset_at(&self, instant: i64) -> i32 {
        self.zone().map_or(0, |z| z.offset_at_millis(instant))
    }

    fn at_instant(&self, instant: i64) -> ZonedDateTime {
        ZonedDateTime::from_millis(instant, self.zone().cloned())
    }

    fn rezone(&self, boundary: ZonedDateTime, from: &ZonedDateTime) -> ZonedDateTime {
        match from.zone() {
            Some(z) => boundary.to_zone(z.clone()),
            None => boundary,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.label())?;
        if self.amount != 1 {
            f.write_str("s")?;
        }
        write!(f, ", starting at {}", self.start)?;
        if self.start.zone().is_some() {
            f.write_str(match self.dst {
                PeriodDst::RegularIntervals => ", keeping regular intervals",
                PeriodDst::RegularLocalTime => ", keeping regular local time",
            })?;
        }
        Ok(())
    }
}
