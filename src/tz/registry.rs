// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The zone registry: canonicalization plus a get-or-create cache.
//!
//! A registry owns every [`TimeZone`] it hands out, one instance per
//! canonical key, so equal specifiers yield pointer-identical zones and
//! equality checks are cheap. Zones are built outside the lock and published
//! with insert-if-absent; a racing caller either finds the finished zone or
//! builds its own copy and discards it, never a half-built one.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::civil::format_offset;
use crate::error::{Error, Result};
use crate::tz::{source, TimeZone};

/// Offsets must be strictly less than a day, in minutes.
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Injectable cache of canonical [`TimeZone`] instances. Zones live as long
/// as the registry; there is no eviction and cardinality is bounded by the
/// IANA zone set plus the offsets actually used.
#[derive(Debug, Default)]
pub struct TzRegistry {
    zones: RwLock<HashMap<String, Arc<TimeZone>>>,
}

impl TzRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical UTC zone ("Z", "UTC", "GMT" and zero offsets all
    /// resolve to this instance).
    pub fn utc(&self) -> Arc<TimeZone> {
        self.get_or_insert("UTC", TimeZone::new_utc)
    }

    /// The system local zone.
    pub fn local(&self) -> Arc<TimeZone> {
        self.get_or_insert("localtime", TimeZone::new_local)
    }

    /// A fixed-offset zone from whole minutes east of UTC.
    pub fn fixed(&self, minutes: i32) -> Result<Arc<TimeZone>> {
        if minutes.unsigned_abs() >= MAX_OFFSET_MINUTES as u32 {
            return Err(Error::InputValidation(format!(
                "time zone offset out of range: {} minutes",
                minutes
            )));
        }
        if minutes == 0 {
            return Ok(self.utc());
        }
        let key = format_offset(minutes);
        Ok(self.get_or_insert(&key, || TimeZone::new_fixed(minutes)))
    }

    /// Resolve a zone specifier:
    ///
    /// - empty string: `None`
    /// - `"Z"`, `"UTC"`, `"GMT"` and zero offsets: the UTC zone
    /// - ISO offset designators (`"+01"`, `"+0130"`, `"+01:30"`): fixed zones
    /// - `"local"` / `"localtime"`: the system zone
    /// - anything else: a named IANA zone, `Error::Lookup` when unknown
    pub fn resolve(&self, spec: &str) -> Result<Option<Arc<TimeZone>>> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(None);
        }
        if spec == "local" || spec == "localtime" {
            return Ok(Some(self.local()));
        }
        if spec == "Z" || spec == "UTC" || spec == "GMT" {
            return Ok(Some(self.utc()));
        }
        if spec.starts_with('+') || spec.starts_with('-') {
            return self.fixed(string_to_offset(spec)?).map(Some);
        }
        self.named(spec).map(Some)
    }

    fn named(&self, id: &str) -> Result<Arc<TimeZone>> {
        if let Some(tz) = self.read().get(id) {
            return Ok(tz.clone());
        }
        let table = source::named_table(id).ok_or_else(|| Error::Lookup(id.to_string()))?;
        let built = Arc::new(TimeZone::new_named(id, table));
        trace!(zone = id, "created named time zone");
        let mut zones = self.write();
        Ok(zones.entry(id.to_string()).or_insert(built).clone())
    }

    fn get_or_insert(&self, key: &str, build: impl FnOnce() -> TimeZone) -> Arc<TimeZone> {
        if let Some(tz) = self.read().get(key) {
            return tz.clone();
        }
        let built = Arc::new(build());
        let mut zones = self.write();
        zones.entry(key.to_string()).or_insert(built).clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<TimeZone>>> {
        self.zones.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<TimeZone>>> {
        self.zones.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse an ISO offset designator (`"Z"`, `"+01"`, `"+0130"`, `"+01:30"`,
/// `"-01:30"`) into minutes east of UTC.
pub fn string_to_offset(spec: &str) -> Result<i32> {
    let malformed = || Error::InputValidation(format!("invalid time zone offset: {:?}", spec));

    if spec == "Z" {
        return Ok(0);
    }
    let mut chars = spec.chars();
    let sign = match chars.next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Err(malformed()),
    };
    let rest = chars.as_str();

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() <= 2 => (rest, "0"),
        None if rest.len() <= 4 => rest.split_at(rest.len() - 2),
        None => return Err(malformed()),
    };
    if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    if minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let hours: i32 = hours.parse().map_err(|_| malformed())?;
    let minutes: i32 = minutes.parse().map_err(|_| malformed())?;
    if minutes >= 60 {
        return Err(malformed());
    }

    let total = sign * (hours * 60 + minutes);
    if total.abs() >= MAX_OFFSET_MINUTES {
        return Err(Error::InputValidation(format!(
            "time zone offset out of range: {:?}",
            spec
        )));
    }
    Ok(total)
}
