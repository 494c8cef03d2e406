//! Typed range evaluators over any ordered type.
//!
//! [`DualRange`] tests a (start, end) pair against explicitly configured
//! bounds; [`SingleRange`] tests one value by treating it as both start and
//! end. Bounds, test values, and the range share one type parameter, so a
//! mismatch between start and end bound types is a compile error rather than
//! a construction-time failure.
//!
//! Neither evaluator touches the clock; for ranges anchored to "now" see
//! [`crate::time_range`] and [`crate::frozen`].

use serde::{Deserialize, Serialize};

use crate::overlap::{in_range, OverlapRules};

/// A two-sided range test over explicit bounds.
///
/// Either bound may be absent, leaving that side unbounded. The evaluator is
/// immutable once configured and [`test`](DualRange::test) never fails:
/// absent test values yield `false`.
///
/// # Examples
///
/// ```
/// use range_engine::DualRange;
///
/// let range = DualRange::new().with_start(1).with_end(10);
/// assert!(range.test(Some(&2), Some(&8)));
/// assert!(range.test(Some(&5), Some(&15))); // partial overlap counts
/// assert!(!range.test(Some(&11), Some(&15)));
/// assert!(!range.test(None, Some(&5)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct DualRange<T: PartialOrd> {
    #[serde(default)]
    start: Option<T>,
    #[serde(default)]
    end: Option<T>,
    #[serde(flatten)]
    rules: OverlapRules,
}

impl<T: PartialOrd> Default for DualRange<T> {
    fn default() -> Self {
        DualRange {
            start: None,
            end: None,
            rules: OverlapRules::default(),
        }
    }
}

impl<T: PartialOrd> DualRange<T> {
    /// An unbounded range with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: T) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: T) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_start_inclusive(mut self, inclusive: bool) -> Self {
        self.rules.start_inclusive = inclusive;
        self
    }

    pub fn with_end_inclusive(mut self, inclusive: bool) -> Self {
        self.rules.end_inclusive = inclusive;
        self
    }

    pub fn with_start_fully_contained(mut self, fully_contained: bool) -> Self {
        self.rules.start_fully_contained = fully_contained;
        self
    }

    pub fn with_end_fully_contained(mut self, fully_contained: bool) -> Self {
        self.rules.end_fully_contained = fully_contained;
        self
    }

    /// Decide whether the pair overlaps the configured range.
    ///
    /// Never fails: an absent `start` or `end` yields `false`.
    pub fn test(&self, start: Option<&T>, end: Option<&T>) -> bool {
        in_range(start, end, self.start.as_ref(), self.end.as_ref(), self.rules)
    }

    /// The configured start bound.
    pub fn start(&self) -> Option<&T> {
        self.start.as_ref()
    }

    /// The configured end bound.
    pub fn end(&self) -> Option<&T> {
        self.end.as_ref()
    }

    /// The configured comparison rules.
    pub fn rules(&self) -> OverlapRules {
        self.rules
    }
}

/// A single-value range test.
///
/// `test(v)` is exactly `dual.test(v, v)`. The fully-contained flags are
/// accepted and forwarded for configuration compatibility, though with
/// start == end they cannot change the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SingleRange<T: PartialOrd> {
    dual: DualRange<T>,
}

impl<T: PartialOrd> Default for SingleRange<T> {
    fn default() -> Self {
        SingleRange {
            dual: DualRange::default(),
        }
    }
}

impl<T: PartialOrd> SingleRange<T> {
    /// An unbounded range with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: T) -> Self {
        self.dual = self.dual.with_start(start);
        self
    }

    pub fn with_end(mut self, end: T) -> Self {
        self.dual = self.dual.with_end(end);
        self
    }

    pub fn with_start_inclusive(mut self, inclusive: bool) -> Self {
        self.dual = self.dual.with_start_inclusive(inclusive);
        self
    }

    pub fn with_end_inclusive(mut self, inclusive: bool) -> Self {
        self.dual = self.dual.with_end_inclusive(inclusive);
        self
    }

    pub fn with_start_fully_contained(mut self, fully_contained: bool) -> Self {
        self.dual = self.dual.with_start_fully_contained(fully_contained);
        self
    }

    pub fn with_end_fully_contained(mut self, fully_contained: bool) -> Self {
        self.dual = self.dual.with_end_fully_contained(fully_contained);
        self
    }

    /// Decide whether the value falls in the configured range.
    ///
    /// Never fails: an absent value yields `false`.
    pub fn test(&self, value: Option<&T>) -> bool {
        self.dual.test(value, value)
    }

    /// The underlying dual-range evaluator.
    pub fn dual(&self) -> &DualRange<T> {
        &self.dual
    }
}

impl<T: PartialOrd> From<DualRange<T>> for SingleRange<T> {
    fn from(dual: DualRange<T>) -> Self {
        SingleRange { dual }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
