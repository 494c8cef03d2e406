//! Time-anchored range evaluators with the dynamic offset lifecycle.
//!
//! A [`TimeRangeConfig`] names each bound as a date string and/or a signed
//! offset, then [`build`](TimeRangeConfig::build)s an immutable
//! [`TimeRangeDual`]. At every test call each bound resolves to
//!
//! - the parsed anchor value, when a date string was configured,
//! - plus the offset (converted from its offset unit into the data's time
//!   unit), anchored to the *current* instant when no explicit anchor exists.
//!
//! A bound with neither anchor nor offset is unbounded. Because "now" is read
//! per call, two calls separated in wall-clock time can answer differently
//! for the same input. That sliding-window behavior is the point: a config
//! with `start_offset = -7` days accepts exactly the trailing week.
//!
//! All parsing and validation happens in `build`; `test` never fails. The
//! clock is read in [`test`](TimeRangeDual::test);
//! [`test_at`](TimeRangeDual::test_at) takes the instant explicitly so
//! callers and tests can pin it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::Result;
use crate::overlap::{in_range, OverlapRules};
use crate::unit::{as_milliseconds, from_milliseconds, TimeUnit};

/// Configuration for the time-anchored evaluators.
///
/// `start`/`end` accept anything [`crate::date::parse`] accepts. Offsets are
/// magnitudes of `offset_unit` (DAY when unset). Tested values are magnitudes
/// of `time_unit` (MILLISECOND when unset); when `time_unit` is MICROSECOND,
/// epoch numerals in the bound strings are read as microseconds too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRangeConfig {
    pub start: Option<String>,
    pub end: Option<String>,
    pub start_offset: Option<i64>,
    pub end_offset: Option<i64>,
    pub offset_unit: Option<TimeUnit>,
    pub time_unit: Option<TimeUnit>,
    #[serde(flatten)]
    pub rules: OverlapRules,
    pub time_zone: Option<String>,
}

impl TimeRangeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_start_offset(mut self, offset: i64) -> Self {
        self.start_offset = Some(offset);
        self
    }

    pub fn with_end_offset(mut self, offset: i64) -> Self {
        self.end_offset = Some(offset);
        self
    }

    pub fn with_offset_unit(mut self, unit: TimeUnit) -> Self {
        self.offset_unit = Some(unit);
        self
    }

    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
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

    /// Resolve the configuration into an immutable dual evaluator.
    ///
    /// Parses the bound date strings into the data's time unit and converts
    /// the offsets from the offset unit. Building the same configuration
    /// twice yields identical evaluators.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RangeError::InvalidFormat`] for an unparseable bound
    /// string and [`crate::RangeError::InvalidTimezone`] for an unknown
    /// timezone name. `test` itself never fails.
    pub fn build(self) -> Result<TimeRangeDual> {
        let time_unit = self.time_unit.unwrap_or(TimeUnit::Millisecond);
        let time_zone = match self.time_zone.as_deref() {
            Some(name) => Some(date::parse_time_zone(name)?),
            None => None,
        };
        let microseconds = time_unit == TimeUnit::Microsecond;

        let anchor = |bound: Option<&str>| -> Result<Option<i64>> {
            bound
                .map(|s| {
                    date::parse(s, time_zone, microseconds)
                        .map(|dt| time_unit.from_millis(dt.timestamp_millis()))
                })
                .transpose()
        };
        let start_anchor = anchor(self.start.as_deref())?;
        let end_anchor = anchor(self.end.as_deref())?;

        let start_offset =
            from_milliseconds(Some(time_unit), as_milliseconds(self.offset_unit, self.start_offset));
        let end_offset =
            from_milliseconds(Some(time_unit), as_milliseconds(self.offset_unit, self.end_offset));

        Ok(TimeRangeDual {
            start: BoundState {
                anchor: start_anchor,
                offset: start_offset,
            },
            end: BoundState {
                anchor: end_anchor,
                offset: end_offset,
            },
            rules: self.rules,
            time_unit,
            config: self,
        })
    }

    /// Resolve the configuration into a single-value evaluator.
    ///
    /// # Errors
    ///
    /// Same conditions as [`build`](TimeRangeConfig::build).
    pub fn build_single(self) -> Result<TimeRange> {
        Ok(TimeRange { dual: self.build()? })
    }
}

/// One side of the range after `build`: the parsed anchor and the converted
/// offset, both in the data's time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoundState {
    anchor: Option<i64>,
    offset: Option<i64>,
}

impl BoundState {
    /// The effective bound for a test at `now` (already in the data's unit).
    fn effective(self, now: i64) -> Option<i64> {
        match (self.anchor, self.offset) {
            (None, None) => None,
            (Some(anchor), None) => Some(anchor),
            (Some(anchor), Some(offset)) => Some(anchor + offset),
            (None, Some(offset)) => Some(now + offset),
        }
    }
}

/// A two-sided time-range test with per-call bound resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRangeDual {
    config: TimeRangeConfig,
    time_unit: TimeUnit,
    start: BoundState,
    end: BoundState,
    rules: OverlapRules,
}

impl TimeRangeDual {
    /// Decide whether the pair overlaps the configured window, resolving
    /// now-relative bounds against the current instant.
    ///
    /// Never fails: absent test values yield `false`.
    pub fn test(&self, start_value: Option<i64>, end_value: Option<i64>) -> bool {
        self.test_at(Utc::now().timestamp_millis(), start_value, end_value)
    }

    /// [`test`](TimeRangeDual::test) with the clock instant supplied by the
    /// caller, in milliseconds since the epoch.
    pub fn test_at(&self, now_millis: i64, start_value: Option<i64>, end_value: Option<i64>) -> bool {
        let now = self.time_unit.from_millis(now_millis);
        let range_start = self.start.effective(now);
        let range_end = self.end.effective(now);
        in_range(
            start_value.as_ref(),
            end_value.as_ref(),
            range_start.as_ref(),
            range_end.as_ref(),
            self.rules,
        )
    }

    /// The configuration this evaluator was built from.
    pub fn config(&self) -> &TimeRangeConfig {
        &self.config
    }

    /// The unit tested values are expressed in.
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }
}

/// A single-value time-range test; `test(v)` is the dual test of `(v, v)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    dual: TimeRangeDual,
}

impl TimeRange {
    /// Never fails: an absent value yields `false`.
    pub fn test(&self, value: Option<i64>) -> bool {
        self.dual.test(value, value)
    }

    /// [`test`](TimeRange::test) with the clock instant supplied by the caller.
    pub fn test_at(&self, now_millis: i64, value: Option<i64>) -> bool {
        self.dual.test_at(now_millis, value, value)
    }

    /// The underlying dual-range evaluator.
    pub fn dual(&self) -> &TimeRangeDual {
        &self.dual
    }
}

impl From<TimeRangeDual> for TimeRange {
    fn from(dual: TimeRangeDual) -> Self {
        TimeRange { dual }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DAY_MS: i64 = 86_400_000;

    /// A fixed "now" for pinned-clock tests: 2020-09-13T12:26:40Z.
    const NOW_MS: i64 = 1_600_000_000_000;

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_fixed_string_bounds() {
        let range = TimeRangeConfig::new()
            .with_start("2017/01/01")
            .with_end("2017/02/01")
            .with_time_zone("UTC")
            .build()
            .unwrap();

        let jan_10 = millis(2017, 1, 10, 0, 0, 0);
        let jan_20 = millis(2017, 1, 20, 0, 0, 0);
        let mar_1 = millis(2017, 3, 1, 0, 0, 0);
        assert!(range.test_at(NOW_MS, Some(jan_10), Some(jan_20)));
        assert!(!range.test_at(NOW_MS, Some(mar_1), Some(mar_1)));
    }

    #[test]
    fn test_boundary_inclusivity() {
        let start = millis(2017, 1, 1, 0, 0, 0);
        let config = TimeRangeConfig::new()
            .with_start("2017/01/01")
            .with_end("2017/02/01")
            .with_time_zone("UTC");

        let inclusive = config.clone().build().unwrap();
        assert!(inclusive.test_at(NOW_MS, Some(start), Some(start)));

        let exclusive = config.with_start_inclusive(false).build().unwrap();
        assert!(!exclusive.test_at(NOW_MS, Some(start), Some(start)));
    }

    #[test]
    fn test_trailing_week_window() {
        // start_offset = -7 days, end unbounded: the trailing week.
        let range = TimeRangeConfig::new()
            .with_start_offset(-7)
            .build()
            .unwrap();

        let inside = NOW_MS - 7 * DAY_MS + 5_000;
        let outside = NOW_MS - 8 * DAY_MS;
        assert!(range.test_at(NOW_MS, Some(inside), Some(inside)));
        assert!(!range.test_at(NOW_MS, Some(outside), Some(outside)));
    }

    #[test]
    fn test_window_slides_with_the_clock() {
        let range = TimeRangeConfig::new()
            .with_start_offset(-7)
            .build()
            .unwrap();

        // Accepted today, aged out a day later.
        let value = NOW_MS - 7 * DAY_MS + 5_000;
        assert!(range.test_at(NOW_MS, Some(value), Some(value)));
        assert!(!range.test_at(NOW_MS + DAY_MS, Some(value), Some(value)));
    }

    #[test]
    fn test_offset_unit_applies() {
        // -6 hours rather than the DAY default.
        let range = TimeRangeConfig::new()
            .with_start_offset(-6)
            .with_offset_unit(TimeUnit::Hour)
            .build()
            .unwrap();

        let five_hours_ago = NOW_MS - 5 * 3_600_000;
        let seven_hours_ago = NOW_MS - 7 * 3_600_000;
        assert!(range.test_at(NOW_MS, Some(five_hours_ago), Some(five_hours_ago)));
        assert!(!range.test_at(NOW_MS, Some(seven_hours_ago), Some(seven_hours_ago)));
    }

    #[test]
    fn test_anchor_plus_offset() {
        // Explicit anchor with an offset: the bound is anchor + offset and
        // does not track the clock.
        let anchor = millis(2018, 1, 1, 0, 0, 0);
        let range = TimeRangeConfig::new()
            .with_start("20180101")
            .with_start_offset(-1)
            .with_offset_unit(TimeUnit::Hour)
            .with_time_zone("UTC")
            .build()
            .unwrap();

        let half_hour_before = anchor - 1_800_000;
        let two_hours_before = anchor - 7_200_000;
        assert!(range.test_at(NOW_MS, Some(half_hour_before), Some(half_hour_before)));
        assert!(!range.test_at(NOW_MS, Some(two_hours_before), Some(two_hours_before)));
        // The anchored bound is immune to the clock.
        assert!(range.test_at(NOW_MS + 30 * DAY_MS, Some(half_hour_before), Some(half_hour_before)));
    }

    #[test]
    fn test_data_in_seconds() {
        let range = TimeRangeConfig::new()
            .with_start_offset(-1)
            .with_time_unit(TimeUnit::Second)
            .build()
            .unwrap();

        // Offsets and "now" are converted into seconds.
        let now_s = NOW_MS / 1_000;
        let inside = now_s - 86_000;
        let outside = now_s - 87_000;
        assert!(range.test_at(NOW_MS, Some(inside), Some(inside)));
        assert!(!range.test_at(NOW_MS, Some(outside), Some(outside)));
    }

    #[test]
    fn test_data_in_microseconds() {
        // With MICROSECOND data, epoch numerals in bounds are microseconds.
        let range = TimeRangeConfig::new()
            .with_start("1000000")
            .with_time_unit(TimeUnit::Microsecond)
            .build()
            .unwrap();

        assert!(range.test_at(NOW_MS, Some(2_000_000), Some(2_000_000)));
        assert!(!range.test_at(NOW_MS, Some(500_000), Some(500_000)));
    }

    #[test]
    fn test_partial_overlap_with_containment_flags() {
        let config = TimeRangeConfig::new()
            .with_start("2017/01/01")
            .with_end("2017/02/01")
            .with_time_zone("UTC");

        let jan_15 = millis(2017, 1, 15, 0, 0, 0);
        let feb_15 = millis(2017, 2, 15, 0, 0, 0);

        let permissive = config.clone().build().unwrap();
        assert!(permissive.test_at(NOW_MS, Some(jan_15), Some(feb_15)));

        let strict_end = config.with_end_fully_contained(true).build().unwrap();
        assert!(!strict_end.test_at(NOW_MS, Some(jan_15), Some(feb_15)));
    }

    #[test]
    fn test_unbounded_accepts_everything_but_null() {
        let range = TimeRangeConfig::new().build().unwrap();
        assert!(range.test_at(NOW_MS, Some(0), Some(0)));
        assert!(range.test_at(NOW_MS, Some(i64::MIN / 2), Some(i64::MAX / 2)));
        assert!(!range.test_at(NOW_MS, None, Some(0)));
        assert!(!range.test_at(NOW_MS, Some(0), None));
        assert!(!range.test_at(NOW_MS, None, None));
    }

    #[test]
    fn test_build_rejects_bad_date() {
        let err = TimeRangeConfig::new().with_start("garbage").build();
        assert!(err.is_err());
        assert!(err.unwrap_err().to_string().contains("Invalid date format"));
    }

    #[test]
    fn test_build_rejects_bad_timezone() {
        let err = TimeRangeConfig::new()
            .with_start("20170101")
            .with_time_zone("Not/AZone")
            .build();
        assert!(err.is_err());
        assert!(err.unwrap_err().to_string().contains("Invalid timezone"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let config = TimeRangeConfig::new()
            .with_start("2017/01/01")
            .with_end("2017/02/01")
            .with_start_offset(-2)
            .with_offset_unit(TimeUnit::Hour)
            .with_time_zone("UTC");

        let first = config.clone().build().unwrap();
        let second = config.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_accessor_exposes_configured_values() {
        let built = TimeRangeConfig::new()
            .with_start("2017/01/01")
            .with_start_offset(-7)
            .with_time_zone("UTC")
            .build()
            .unwrap();

        assert_eq!(built.config().start.as_deref(), Some("2017/01/01"));
        assert_eq!(built.config().start_offset, Some(-7));
        assert_eq!(built.config().time_zone.as_deref(), Some("UTC"));
        assert_eq!(built.time_unit(), TimeUnit::Millisecond);
    }

    #[test]
    fn test_single_value_wrapper() {
        let range = TimeRangeConfig::new()
            .with_start("2017/01/01")
            .with_end("2017/02/01")
            .with_time_zone("UTC")
            .build_single()
            .unwrap();

        let jan_15 = millis(2017, 1, 15, 0, 0, 0);
        let mar_1 = millis(2017, 3, 1, 0, 0, 0);
        assert!(range.test_at(NOW_MS, Some(jan_15)));
        assert!(!range.test_at(NOW_MS, Some(mar_1)));
        assert!(!range.test_at(NOW_MS, None));
    }

    #[test]
    fn test_serde_config_round_trip() {
        let config: TimeRangeConfig = serde_json::from_str(
            r#"{"start":"20170101","end":"20170201","time_zone":"UTC","offset_unit":"HOUR"}"#,
        )
        .unwrap();
        assert_eq!(config.offset_unit, Some(TimeUnit::Hour));
        assert!(config.rules.start_inclusive);

        let json = serde_json::to_string(&config).unwrap();
        let back: TimeRangeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let range = back.build().unwrap();
        let jan_15 = millis(2017, 1, 15, 0, 0, 0);
        assert!(range.test_at(NOW_MS, Some(jan_15), Some(jan_15)));
    }

    #[test]
    fn test_live_clock_smoke() {
        // The only assertions against the real clock; generous margins.
        let range = TimeRangeConfig::new()
            .with_start_offset(-1)
            .build()
            .unwrap();
        let now = Utc::now().timestamp_millis();
        assert!(range.test(Some(now), Some(now)));
        assert!(!range.test(Some(now - 2 * DAY_MS), Some(now - 2 * DAY_MS)));
    }
}
