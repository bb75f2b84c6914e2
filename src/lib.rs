// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Time zone offset resolution and recurring period calculations.
//!
//! This library answers two questions a recurring-interval scheduler needs
//! answered deterministically, across DST transitions, leap years and
//! variable month lengths:
//!
//! 1. What is the UTC offset for a civil date-time — both for a UTC reading
//!    and for a local wall-clock reading that may sit inside a DST gap or
//!    overlap?
//! 2. Given a recurring period (start, amount, unit, DST policy), where is
//!    the first boundary at or after some date, and where is the boundary N
//!    repetitions later?
//!
//! # Architecture
//!
//! - [`TzRegistry`] resolves zone specifiers ("Z", "+01:30", "localtime",
//!   "Europe/Amsterdam") to cached canonical [`TimeZone`] instances. Named
//!   zones carry an ordered transition table derived once from the pre-built
//!   chrono-tz database; every lookup afterwards is a binary search.
//! - [`ZonedDateTime`] is an immutable instant paired with the civil fields
//!   it reads as in its zone. Zone conversions preserve the instant, never
//!   the fields.
//! - [`Period`] computes recurrence boundaries on top of the two, either at
//!   uniform real intervals or at a uniform local clock reading.
//!
//! Skipped local readings (forward DST gap) resolve as if rounded up to the
//! first valid instant; ambiguous readings (backward overlap) resolve to
//! their first occurrence. Neither is an error.
//!
//! # Example
//!
//! ```
//! use llrt_period::{Period, PeriodDst, TimeUnit, TzRegistry, ZonedDateTime};
//!
//! let registry = TzRegistry::new();
//! let start = ZonedDateTime::parse("1970-01-01T12:00:00 Europe/Amsterdam", &registry).unwrap();
//! let hourly = Period::new(start, 1, TimeUnit::Hour, PeriodDst::RegularLocalTime).unwrap();
//!
//! let from = ZonedDateTime::parse("2014-10-26T00:00:00.000 UTC", &registry).unwrap();
//! // The clocks fall back at 01:00 UTC; keeping regular local time skips
//! // the repeated 02:00 reading.
//! assert_eq!(
//!     hourly.find_first(&from).to_string(),
//!     "2014-10-26T02:00:00.000 UTC"
//! );
//! ```

mod civil;
mod clock;
mod error;
mod period;
mod tz;
mod zoned_date_time;

pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use period::{Period, PeriodDst, TimeUnit};
pub use tz::{string_to_offset, DateFields, TimeZone, TzRegistry};
pub use zoned_date_time::ZonedDateTime;
