//! Time-range evaluation with the static offset lifecycle.
//!
//! Where [`crate::time_range`] re-reads the clock on every test,
//! [`FrozenTimeRange`] resolves its bounds exactly once, at construction,
//! and never again. Each bound is either an explicit millisecond value or a
//! single backward offset from the construction instant, given in exactly
//! one of milliseconds, hours, or days. Supplying an explicit value together
//! with an offset, or offsets in more than one unit, is a configuration
//! error.
//!
//! Tested values are milliseconds since the epoch.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{RangeError, Result};
use crate::overlap::{in_range, OverlapRules};
use crate::unit::TimeUnit;

/// One side of a frozen range: an explicit value, or one backward offset
/// from the construction instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrozenBound {
    pub value: Option<i64>,
    pub offset_millis: Option<i64>,
    pub offset_hours: Option<i64>,
    pub offset_days: Option<i64>,
}

impl FrozenBound {
    /// An unbounded side.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A bound fixed at an explicit millisecond value.
    pub fn at(value: i64) -> Self {
        FrozenBound {
            value: Some(value),
            ..Self::default()
        }
    }

    /// A bound `millis` milliseconds before the construction instant.
    pub fn millis_before_now(millis: i64) -> Self {
        FrozenBound {
            offset_millis: Some(millis),
            ..Self::default()
        }
    }

    /// A bound `hours` hours before the construction instant.
    pub fn hours_before_now(hours: i64) -> Self {
        FrozenBound {
            offset_hours: Some(hours),
            ..Self::default()
        }
    }

    /// A bound `days` days before the construction instant.
    pub fn days_before_now(days: i64) -> Self {
        FrozenBound {
            offset_days: Some(days),
            ..Self::default()
        }
    }

    /// Resolve this side against the construction instant.
    fn freeze(self, now_millis: i64, side: &str) -> Result<Option<i64>> {
        let offsets = [
            self.offset_millis.is_some(),
            self.offset_hours.is_some(),
            self.offset_days.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();

        if self.value.is_some() && offsets > 0 {
            return Err(RangeError::Configuration(format!(
                "{side} bound has both an explicit value and an offset"
            )));
        }
        if offsets > 1 {
            return Err(RangeError::Configuration(format!(
                "{side} bound has offsets in more than one unit"
            )));
        }
        if self.value.is_some() {
            return Ok(self.value);
        }

        let offset_ms = self
            .offset_millis
            .or_else(|| self.offset_hours.map(|h| TimeUnit::Hour.to_millis(h)))
            .or_else(|| self.offset_days.map(|d| TimeUnit::Day.to_millis(d)));
        Ok(offset_ms.map(|ms| now_millis - ms))
    }
}

/// Configuration for [`FrozenTimeRange`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrozenTimeRangeConfig {
    pub start: FrozenBound,
    pub end: FrozenBound,
    #[serde(flatten)]
    pub rules: OverlapRules,
}

impl FrozenTimeRangeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: FrozenBound) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: FrozenBound) -> Self {
        self.end = end;
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

    /// Freeze both bounds against the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Configuration`] if a bound carries both an
    /// explicit value and an offset, or offsets in more than one unit.
    pub fn build(self) -> Result<FrozenTimeRange> {
        self.build_at(Utc::now().timestamp_millis())
    }

    /// [`build`](FrozenTimeRangeConfig::build) with the construction instant
    /// supplied by the caller, in milliseconds since the epoch.
    pub fn build_at(self, now_millis: i64) -> Result<FrozenTimeRange> {
        let start = self.start.freeze(now_millis, "start")?;
        let end = self.end.freeze(now_millis, "end")?;
        Ok(FrozenTimeRange {
            start,
            end,
            rules: self.rules,
            config: self,
        })
    }
}

/// A time-range test whose bounds were resolved once, at construction, and
/// are fixed for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenTimeRange {
    config: FrozenTimeRangeConfig,
    start: Option<i64>,
    end: Option<i64>,
    rules: OverlapRules,
}

impl FrozenTimeRange {
    /// Decide whether the pair overlaps the frozen window.
    ///
    /// Never fails: absent test values yield `false`.
    pub fn test(&self, start_value: Option<i64>, end_value: Option<i64>) -> bool {
        in_range(
            start_value.as_ref(),
            end_value.as_ref(),
            self.start.as_ref(),
            self.end.as_ref(),
            self.rules,
        )
    }

    /// Single-value form: the value is treated as both start and end.
    pub fn test_value(&self, value: Option<i64>) -> bool {
        self.test(value, value)
    }

    /// The configuration this evaluator was built from.
    pub fn config(&self) -> &FrozenTimeRangeConfig {
        &self.config
    }

    /// The frozen start bound, in milliseconds.
    pub fn start(&self) -> Option<i64> {
        self.start
    }

    /// The frozen end bound, in milliseconds.
    pub fn end(&self) -> Option<i64> {
        self.end
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
