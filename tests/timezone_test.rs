// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Resolver and registry behavior, plus offset parity with chrono-tz.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone as _};
use llrt_period::{string_to_offset, DateFields, Error, TzRegistry};

fn naive(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

#[test]
fn test_utc_zone() {
    let registry = TzRegistry::new();
    let utc = registry.utc();
    assert_eq!(utc.offset_for_zone(2014, 2, 3, 4, 5, 6, 7).unwrap(), 0);
    assert_eq!(utc.offset_for_utc(2014, 2, 3, 4, 5, 6, 7).unwrap(), 0);
    assert!(Arc::ptr_eq(&registry.utc(), &utc));
}

#[test]
fn test_fixed_offset_zone() {
    let registry = TzRegistry::new();
    let plus = registry.fixed(60).unwrap();
    assert_eq!(plus.offset_for_zone(2014, 7, 1, 2, 3, 4, 5).unwrap(), 60);
    assert_eq!(plus.offset_for_utc(2014, 7, 1, 2, 3, 4, 5).unwrap(), 60);

    let minus = registry.fixed(-60).unwrap();
    // no DST on fixed offsets, winter and summer alike
    assert_eq!(minus.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), -60);
    assert_eq!(minus.offset_for_zone(2014, 7, 1, 1, 2, 3, 4).unwrap(), -60);

    assert!(Arc::ptr_eq(&registry.fixed(-60).unwrap(), &minus));
}

#[test]
fn test_fixed_offset_out_of_range() {
    let registry = TzRegistry::new();
    assert!(matches!(
        registry.fixed(-24 * 60),
        Err(Error::InputValidation(_))
    ));
    assert!(matches!(
        registry.fixed(24 * 60),
        Err(Error::InputValidation(_))
    ));
}

#[test]
fn test_resolve_specifiers() {
    let registry = TzRegistry::new();
    assert!(registry.resolve("").unwrap().is_none());

    let pos = registry.resolve("+01:30").unwrap().unwrap();
    assert_eq!(pos.offset_for_utc(2014, 1, 1, 1, 2, 3, 4).unwrap(), 90);

    let neg = registry.resolve("-01:30").unwrap().unwrap();
    assert_eq!(neg.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), -90);

    let compact = registry.resolve("+0130").unwrap().unwrap();
    assert_eq!(compact.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), 90);

    let hours_only = registry.resolve("+01").unwrap().unwrap();
    assert_eq!(hours_only.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), 60);

    let zulu = registry.resolve("Z").unwrap().unwrap();
    assert_eq!(zulu.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), 0);

    let asmara = registry.resolve("Africa/Asmara").unwrap().unwrap();
    assert_eq!(asmara.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), 180);

    let local = registry.resolve("localtime").unwrap().unwrap();
    assert!(Arc::ptr_eq(&local, &registry.local()));
    assert_eq!(*local, *registry.resolve("local").unwrap().unwrap());
}

#[test]
fn test_resolve_caches_across_spellings() {
    let registry = TzRegistry::new();
    let a = registry.resolve("-01:30").unwrap().unwrap();
    let b = registry.resolve("-01:30").unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let z = registry.resolve("Z").unwrap().unwrap();
    let zeroes = registry.resolve("+00:00").unwrap().unwrap();
    assert!(Arc::ptr_eq(&z, &zeroes));
}

#[test]
fn test_resolve_rejects_out_of_range_offsets() {
    let registry = TzRegistry::new();
    assert!(matches!(
        registry.resolve("+24:00"),
        Err(Error::InputValidation(_))
    ));
    assert!(matches!(
        registry.resolve("-24:00"),
        Err(Error::InputValidation(_))
    ));
}

#[test]
fn test_unknown_named_zone() {
    let registry = TzRegistry::new();
    assert!(matches!(
        registry.resolve("Unknown/Zone"),
        Err(Error::Lookup(_))
    ));
}

#[test]
fn test_offset_for_utc_named_zone() {
    let registry = TzRegistry::new();
    let edmonton = registry.resolve("America/Edmonton").unwrap().unwrap();
    assert_eq!(edmonton.offset_for_utc(2014, 1, 1, 1, 2, 3, 4).unwrap(), -7 * 60);
    assert_eq!(edmonton.offset_for_utc(2014, 7, 1, 1, 2, 3, 4).unwrap(), -6 * 60);

    // one second before the Amsterdam fall-back the summer offset holds
    let amsterdam = registry.resolve("Europe/Amsterdam").unwrap().unwrap();
    assert_eq!(
        amsterdam.offset_for_utc(2014, 10, 26, 0, 59, 59, 0).unwrap(),
        120
    );
    assert_eq!(
        amsterdam.offset_for_utc(2014, 10, 26, 1, 0, 0, 0).unwrap(),
        60
    );
}

#[test]
fn test_offset_for_zone_named_zone() {
    let registry = TzRegistry::new();
    let edmonton = registry.resolve("America/Edmonton").unwrap().unwrap();
    assert_eq!(edmonton.offset_for_zone(2014, 1, 1, 1, 2, 3, 4).unwrap(), -7 * 60);
    assert_eq!(edmonton.offset_for_zone(2014, 7, 1, 1, 2, 3, 4).unwrap(), -6 * 60);
}

#[test]
fn test_offset_for_zone_nonexistent_reading() {
    // 02:00 on 2014-03-30 is skipped in Amsterdam; it resolves as if rounded
    // up past the gap, answering the post-transition offset.
    let registry = TzRegistry::new();
    let amsterdam = registry.resolve("Europe/Amsterdam").unwrap().unwrap();
    assert_eq!(
        amsterdam.offset_for_zone(2014, 3, 30, 2, 0, 0, 0).unwrap(),
        2 * 60
    );
    assert_eq!(
        amsterdam.offset_for_zone(2014, 3, 30, 2, 59, 59, 999).unwrap(),
        2 * 60
    );
}

#[test]
fn test_offset_for_zone_ambiguous_reading() {
    // 02:30 on 2014-10-26 occurs twice in Amsterdam; the first occurrence
    // (still on summer time) wins.
    let registry = TzRegistry::new();
    let amsterdam = registry.resolve("Europe/Amsterdam").unwrap().unwrap();
    assert_eq!(
        amsterdam.offset_for_zone(2014, 10, 26, 2, 30, 0, 0).unwrap(),
        120
    );
}

#[test]
fn test_offset_for_date_field_policies() {
    let registry = TzRegistry::new();
    let amsterdam = registry.resolve("Europe/Amsterdam").unwrap().unwrap();
    let date = FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2014, 3, 26, 3, 0, 1)
        .unwrap();

    assert_eq!(
        amsterdam.offset_for_utc_date(&date, DateFields::Local),
        amsterdam
            .offset_for_utc(2014, 3, 26, 3, 0, 1, 0)
            .unwrap()
    );
    assert_eq!(
        amsterdam.offset_for_utc_date(&date, DateFields::Utc),
        amsterdam
            .offset_for_utc(2014, 3, 26, 1, 0, 1, 0)
            .unwrap()
    );
    assert_eq!(
        amsterdam.offset_for_zone_date(&date, DateFields::Local),
        amsterdam
            .offset_for_zone(2014, 3, 26, 3, 0, 1, 0)
            .unwrap()
    );
    assert_eq!(
        amsterdam.offset_for_zone_date(&date, DateFields::Utc),
        amsterdam
            .offset_for_zone(2014, 3, 26, 1, 0, 1, 0)
            .unwrap()
    );
}

#[test]
fn test_equality() {
    let registry = TzRegistry::new();
    assert_eq!(*registry.local(), *registry.local());
    assert_ne!(*registry.local(), *registry.utc());
    assert_ne!(*registry.local(), *registry.fixed(6).unwrap());

    assert_eq!(*registry.fixed(3).unwrap(), *registry.fixed(3).unwrap());
    assert_ne!(*registry.fixed(3).unwrap(), *registry.utc());
    assert_ne!(*registry.fixed(3).unwrap(), *registry.fixed(-1).unwrap());

    let amsterdam = registry.resolve("Europe/Amsterdam").unwrap().unwrap();
    assert_eq!(*amsterdam, *registry.resolve("Europe/Amsterdam").unwrap().unwrap());
    assert_ne!(*amsterdam, *registry.utc());
    assert_ne!(*amsterdam, *registry.local());

    // UTC in all of its spellings
    assert_eq!(*registry.utc(), *registry.resolve("GMT").unwrap().unwrap());
    assert_eq!(*registry.utc(), *registry.resolve("UTC").unwrap().unwrap());
    assert_eq!(*registry.utc(), *registry.fixed(0).unwrap());
}

#[test]
fn test_string_to_offset() {
    assert_eq!(string_to_offset("Z").unwrap(), 0);
    assert_eq!(string_to_offset("+00:00").unwrap(), 0);
    assert_eq!(string_to_offset("-01:30").unwrap(), -90);
    assert_eq!(string_to_offset("-01").unwrap(), -60);
}

#[test]
fn test_has_dst() {
    let registry = TzRegistry::new();
    assert!(!registry.local().has_dst());
    assert!(!registry.fixed(3).unwrap().has_dst());
    assert!(!registry.resolve("UTC").unwrap().unwrap().has_dst());
    assert!(registry
        .resolve("Europe/Amsterdam")
        .unwrap()
        .unwrap()
        .has_dst());
    assert!(!registry.resolve("Asia/Tokyo").unwrap().unwrap().has_dst());
}

#[test]
fn test_abbreviations() {
    let registry = TzRegistry::new();
    let jan = naive(2014, 1, 1, 0, 0, 0);
    let jul = naive(2014, 7, 1, 0, 0, 0);

    assert_eq!(registry.local().abbreviation_for_utc(&jan), "local");

    let fixed = registry.fixed(3).unwrap();
    assert_eq!(fixed.abbreviation_for_utc(&jan), fixed.to_string());

    assert_eq!(registry.utc().abbreviation_for_utc(&jan), "UTC");

    let amsterdam = registry.resolve("Europe/Amsterdam").unwrap().unwrap();
    assert_eq!(amsterdam.abbreviation_for_utc(&jul), "CEST");
    assert_eq!(amsterdam.abbreviation_for_utc(&jan), "CET");
}

#[test]
fn test_display() {
    let registry = TzRegistry::new();
    assert_eq!(registry.utc().to_string(), "UTC");
    assert_eq!(registry.fixed(90).unwrap().to_string(), "+01:30");
    assert_eq!(registry.local().to_string(), "localtime");
    assert_eq!(
        registry
            .resolve("Europe/Amsterdam")
            .unwrap()
            .unwrap()
            .to_string(),
        "Europe/Amsterdam"
    );
}

#[test]
fn test_local_and_utc_round_trip() {
    // For instants away from overlap second-passes, reading the local fields
    // back through offset_for_zone answers the offset at the instant itself.
    let registry = TzRegistry::new();
    let zones = [
        "Europe/Amsterdam",
        "America/New_York",
        "Asia/Kolkata",
        "Australia/Sydney",
    ];
    for id in zones {
        let zone = registry.resolve(id).unwrap().unwrap();
        for year in [1970, 1985, 1999, 2006, 2014, 2020] {
            for month in 1..=12 {
                let utc = naive(year, month, 15, 12, 0, 0);
                let offset = zone.offset_for_utc_datetime(&utc);
                let local = utc + TimeDelta::minutes(offset as i64);
                assert_eq!(
                    zone.offset_for_zone_datetime(&local),
                    offset,
                    "{} at {}",
                    id,
                    utc
                );
            }
        }
    }
}

#[test]
fn test_offset_parity_with_chrono_tz() {
    // The derived tables must agree with chrono-tz itself across the years.
    let registry = TzRegistry::new();
    let zones = [
        "Europe/Amsterdam",
        "Europe/London",
        "America/New_York",
        "America/Sao_Paulo",
        "Asia/Kathmandu",
        "Australia/Adelaide",
        "Africa/Accra",
    ];
    for id in zones {
        let zone = registry.resolve(id).unwrap().unwrap();
        let reference: chrono_tz::Tz = id.parse().unwrap();
        for year in [1930, 1937, 1970, 1990, 2006, 2014, 2024] {
            for (month, day, hour) in [(1, 15, 0), (3, 31, 12), (7, 1, 6), (10, 26, 1), (12, 31, 23)]
            {
                let utc = naive(year, month, day, hour, 0, 0);
                let expected = reference
                    .offset_from_utc_datetime(&utc)
                    .fix()
                    .local_minus_utc()
                    / 60;
                assert_eq!(
                    zone.offset_for_utc_datetime(&utc),
                    expected,
                    "{} at {}",
                    id,
                    utc
                );
            }
        }
    }
}
