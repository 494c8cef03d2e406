//! The two-sided range-overlap predicate.
//!
//! [`in_range`] decides whether a (start, end) pair of test values overlaps a
//! `[range_start, range_end]` window under the four [`OverlapRules`] flags:
//! per-side inclusivity and per-side "fully contained" requirements. With
//! both fully-contained flags set the predicate reduces to strict
//! double-sided containment; with both clear, any interval that merely
//! touches the window is accepted ("event overlaps window" rather than
//! "event occurs entirely within window").
//!
//! The decision branches are evaluated in a fixed priority order. Seemingly
//! equivalent reformulations change behavior at shared boundary points when
//! only one fully-contained flag is combined with non-default inclusivity,
//! so the order here is load-bearing and must not be rearranged.

use serde::{Deserialize, Serialize};

/// Flags governing how a test pair is compared against a range.
///
/// Defaults: both sides inclusive, neither side required to be fully
/// contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapRules {
    /// Whether a test value equal to the range start satisfies the start bound.
    pub start_inclusive: bool,
    /// Whether a test value equal to the range end satisfies the end bound.
    pub end_inclusive: bool,
    /// Require the test interval's start to lie within the range.
    pub start_fully_contained: bool,
    /// Require the test interval's end to lie within the range.
    pub end_fully_contained: bool,
}

impl Default for OverlapRules {
    fn default() -> Self {
        OverlapRules {
            start_inclusive: true,
            end_inclusive: true,
            start_fully_contained: false,
            end_fully_contained: false,
        }
    }
}

/// Decide whether the interval `[start_value, end_value]` overlaps the range
/// `[range_start, range_end]` under `rules`.
///
/// An absent `start_value` or `end_value` yields `false` unconditionally,
/// even against a fully unbounded range. An absent `range_start` or
/// `range_end` leaves that side unbounded (always satisfied).
///
/// # Examples
///
/// ```
/// use range_engine::overlap::{in_range, OverlapRules};
///
/// let rules = OverlapRules::default();
/// // (2, 8) lies entirely within [1, 10]
/// assert!(in_range(Some(&2), Some(&8), Some(&1), Some(&10), rules));
/// // (5, 12) starts inside [1, 10] and runs past its end: still an overlap
/// assert!(in_range(Some(&5), Some(&12), Some(&1), Some(&10), rules));
/// // absent test values never match
/// assert!(!in_range(None::<&i32>, None, None, None, rules));
/// ```
pub fn in_range<T: PartialOrd>(
    start_value: Option<&T>,
    end_value: Option<&T>,
    range_start: Option<&T>,
    range_end: Option<&T>,
    rules: OverlapRules,
) -> bool {
    let (Some(start), Some(end)) = (start_value, end_value) else {
        return false;
    };

    let start_more_than_start = match range_start {
        None => true,
        Some(rs) => {
            if rules.start_inclusive {
                start >= rs
            } else {
                start > rs
            }
        }
    };
    let start_less_than_end = match range_end {
        None => true,
        Some(re) => {
            if rules.end_inclusive {
                start <= re
            } else {
                start < re
            }
        }
    };
    let start_in_range = start_more_than_start && start_less_than_end;

    let end_more_than_start = match range_start {
        None => true,
        Some(rs) => {
            if rules.start_inclusive {
                end >= rs
            } else {
                end > rs
            }
        }
    };
    let end_less_than_end = match range_end {
        None => true,
        Some(re) => {
            if rules.end_inclusive {
                end <= re
            } else {
                end < re
            }
        }
    };
    let end_in_range = end_more_than_start && end_less_than_end;

    // Full containment.
    if start_in_range && end_in_range {
        return true;
    }
    // Right-open partial overlap: starts inside, runs past the range end.
    if start_in_range && !end_less_than_end && !rules.end_fully_contained {
        return true;
    }
    // Left-open partial overlap: ends inside, starts before the range.
    if end_in_range && !start_more_than_start && !rules.start_fully_contained {
        return true;
    }
    // Engulfing overlap: covers a bounded range on both sides.
    if !start_more_than_start
        && !rules.start_fully_contained
        && !end_less_than_end
        && !rules.end_fully_contained
    {
        return true;
    }
    false
}

// ── Tests ───────────────────────────────────────────────────────────────────
