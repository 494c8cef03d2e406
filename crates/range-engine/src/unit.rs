//! Time-unit conversion across six granularities.
//!
//! [`TimeUnit`] names the granularity a magnitude is expressed in; the
//! conversion functions move magnitudes to and from milliseconds, truncating
//! toward zero. The `Option`-taking free functions are total: an absent value
//! propagates as `None` and an absent unit falls back to [`TimeUnit::Day`]
//! rather than failing, so callers can pass configuration fields through
//! without unwrapping.

use serde::{Deserialize, Serialize};

/// The granularity of a time magnitude.
///
/// Serializes as its uppercase name (`"DAY"`, `"HOUR"`, …) so external
/// configuration can name units the conventional way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    #[default]
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
}

impl TimeUnit {
    /// Convert `value` in this unit to milliseconds, truncating toward zero.
    pub fn to_millis(self, value: i64) -> i64 {
        match self {
            TimeUnit::Day => value * 86_400_000,
            TimeUnit::Hour => value * 3_600_000,
            TimeUnit::Minute => value * 60_000,
            TimeUnit::Second => value * 1_000,
            TimeUnit::Millisecond => value,
            // Factor is 0.001; integer division truncates toward zero.
            TimeUnit::Microsecond => value / 1_000,
        }
    }

    /// Convert `value` in milliseconds to this unit, truncating toward zero.
    pub fn from_millis(self, value: i64) -> i64 {
        match self {
            TimeUnit::Day => value / 86_400_000,
            TimeUnit::Hour => value / 3_600_000,
            TimeUnit::Minute => value / 60_000,
            TimeUnit::Second => value / 1_000,
            TimeUnit::Millisecond => value,
            TimeUnit::Microsecond => value * 1_000,
        }
    }
}

/// Convert an optional magnitude in `unit` to milliseconds.
///
/// `None` value yields `None`; an absent unit is treated as [`TimeUnit::Day`].
pub fn as_milliseconds(unit: Option<TimeUnit>, value: Option<i64>) -> Option<i64> {
    value.map(|v| unit.unwrap_or_default().to_millis(v))
}

/// Convert an optional magnitude in milliseconds to `unit`.
///
/// `None` value yields `None`; an absent unit is treated as [`TimeUnit::Day`].
pub fn from_milliseconds(unit: Option<TimeUnit>, value: Option<i64>) -> Option<i64> {
    value.map(|v| unit.unwrap_or_default().from_millis(v))
}

// ── Tests ───────────────────────────────────────────────────────────────────
