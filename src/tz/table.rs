// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Ordered transition tables for named time zones.
//!
//! A table is a list of `(transition instant, offset, abbreviation)` entries
//! sorted by instant; the first entry is the rule in force from the beginning
//! of time. Lookups in the UTC direction are a single binary search. Lookups
//! in the local direction locate the rule whose local-validity window contains
//! the reading, classifying it as unique, ambiguous (backward overlap) or
//! non-existent (forward gap) so callers can apply the documented policy.

use crate::civil::MILLIS_PER_MINUTE;

/// One rule of a transition table: from `start_ms` (UTC) onward the zone is
/// `offset` minutes east of UTC and abbreviated `abbreviation`.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub start_ms: i64,
    pub offset: i32,
    pub abbreviation: Box<str>,
}

/// The transition history of one named zone, sorted by `start_ms`.
#[derive(Debug, Clone)]
pub(crate) struct TransitionTable {
    pub transitions: Vec<Transition>,
}

/// Outcome of mapping a local wall-clock reading onto the table.
#[derive(Debug)]
pub(crate) enum LocalResolution<'a> {
    /// Exactly one rule covers the reading.
    Unique(&'a Transition),
    /// The reading occurs twice around a backward transition; `first` is the
    /// rule producing the earlier instant.
    Ambiguous {
        first: &'a Transition,
        #[allow(dead_code)]
        second: &'a Transition,
    },
    /// The reading is skipped by a forward transition. `onset_ms` is the UTC
    /// instant at which the gap ends and `after` the rule in force from then.
    Gap { onset_ms: i64, after: &'a Transition },
}

impl TransitionTable {
    /// The rule in force at a UTC instant. O(log T).
    pub(crate) fn rule_at_utc(&self, ms: i64) -> &Transition {
        let idx = self.transitions.partition_point(|t| t.start_ms <= ms);
        // the first entry starts at i64::MIN, so idx >= 1
        &self.transitions[idx.saturating_sub(1)]
    }

    /// Map a local reading (milliseconds on the naive local timeline) onto
    /// the rule(s) whose local-validity window contains it.
    pub(crate) fn resolve_local(&self, local_ms: i64) -> LocalResolution<'_> {
        let ts = &self.transitions;
        // A local reading is within one offset-width of its UTC instant, so
        // the covering rule is within a step or two of the index found by
        // treating the reading as UTC.
        let approx = ts.partition_point(|t| t.start_ms <= local_ms);
        let lo = approx.saturating_sub(2);
        let hi = (approx + 1).min(ts.len() - 1);

        let mut first_hit: Option<usize> = None;
        let mut second_hit: Option<usize> = None;
        for j in lo..=hi {
            if self.local_window_contains(j, local_ms) {
                if first_hit.is_none() {
                    first_hit = Some(j);
                } else if second_hit.is_none() {
                    second_hit = Some(j);
                }
            }
        }

        match (first_hit, second_hit) {
            (Some(a), Some(b)) => LocalResolution::Ambiguous {
                first: &ts[a],
                second: &ts[b],
            },
            (Some(a), None) => LocalResolution::Unique(&ts[a]),
            _ => {
                // Forward gap: find the transition whose clock jump skipped
                // the reading.
                for k in lo.max(1)..=hi {
                    let before = &ts[k - 1];
                    let after = &ts[k];
                    if after.offset > before.offset
                        && local_ms >= after.start_ms + before.offset as i64 * MILLIS_PER_MINUTE
                        && local_ms < after.start_ms + after.offset as i64 * MILLIS_PER_MINUTE
                    {
                        return LocalResolution::Gap {
                            onset_ms: after.start_ms,
                            after,
                        };
                    }
                }
                // Unreachable for a well-formed table; fall back to the UTC
                // interpretation of the reading.
                LocalResolution::Unique(self.rule_at_utc(local_ms))
            }
        }
    }

    /// Whether the table contains more than one distinct offset.
    pub(crate) fn has_multiple_offsets(&self) -> bool {
        self.transitions
            .iter()
            .any(|t| t.offset != self.transitions[0].offset)
    }

    /// Local-validity window of rule `j`: `[start + offset, next_start + offset)`.
    fn local_window_contains(&self, j: usize, local_ms: i64) -> bool {
        let ts = &self.transitions;
        let offset_ms = ts[j].offset as i64 * MILLIS_PER_MINUTE;
        let begin = ts[j].start_ms.saturating_add(offset_ms);
        let end = match ts.get(j + 1) {
            Some(next) => next.start_ms.saturating_add(offset_ms),
            None => i64::MAX,
        };
        begin <= local_ms && local_ms < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::MILLIS_PER_HOUR;

    // A miniature zone: +60 until t=0, +120 (summer) until t=10h, +60 after.
    fn sample_table() -> TransitionTable {
        TransitionTable {
            transitions: vec![
                Transition {
                    start_ms: i64::MIN,
                    offset: 60,
                    abbreviation: "STD".into(),
                },
                Transition {
                    start_ms: 0,
                    offset: 120,
                    abbreviation: "DST".into(),
                },
                Transition {
                    start_ms: 10 * MILLIS_PER_HOUR,
                    offset: 60,
                    abbreviation: "STD".into(),
                },
            ],
        }
    }

    #[test]
    fn test_rule_at_utc() {
        let table = sample_table();
        assert_eq!(table.rule_at_utc(-1).offset, 60);
        assert_eq!(table.rule_at_utc(0).offset, 120);
        assert_eq!(table.rule_at_utc(10 * MILLIS_PER_HOUR - 1).offset, 120);
        assert_eq!(table.rule_at_utc(10 * MILLIS_PER_HOUR).offset, 60);
    }

    #[test]
    fn test_unique_local_reading() {
        let table = sample_table();
        match table.resolve_local(5 * MILLIS_PER_HOUR) {
            LocalResolution::Unique(t) => assert_eq!(t.offset, 120),
            other => panic!("expected unique resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_gap_reading() {
        // The forward jump at t=0 skips local readings in [60min, 120min).
        let table = sample_table();
        match table.resolve_local(90 * MILLIS_PER_MINUTE) {
            LocalResolution::Gap { onset_ms, after } => {
                assert_eq!(onset_ms, 0);
                assert_eq!(after.offset, 120);
            }
            other => panic!("expected gap resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_backward_overlap_reading() {
        // The backward jump at t=10h repeats local readings in [11h, 12h).
        let table = sample_table();
        match table.resolve_local(11 * MILLIS_PER_HOUR + MILLIS_PER_MINUTE) {
            LocalResolution::Ambiguous { first, second } => {
                assert_eq!(first.offset, 120);
                assert_eq!(second.offset, 60);
            }
            other => panic!("expected ambiguous resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_distinct_offsets() {
        assert!(sample_table().has_multiple_offsets());
        let flat = TransitionTable {
            transitions: vec![Transition {
                start_ms: i64::MIN,
                offset: 0,
                abbreviation: "UTC".into(),
            }],
        };
        assert!(!flat.has_multiple_offsets());
    }
}
