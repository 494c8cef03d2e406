//! # range-engine
//!
//! Range and time-window overlap predicates.
//!
//! The engine decides whether a value, or a (start, end) pair, falls inside
//! a configured range, or overlaps it under configurable
//! partial-containment rules. Ranges may carry explicit typed bounds,
//! string-parsed dates, or offsets resolved against "now", either per test
//! call (sliding windows) or once at construction (frozen windows).
//!
//! Test entry points never fail: absent or out-of-range inputs resolve to
//! `false`. Only configuration errors exist, and they surface at build time.
//!
//! ## Modules
//!
//! - [`overlap`] — the two-sided overlap predicate and its rule flags
//! - [`range`] — typed evaluators over any ordered type
//! - [`time_range`] — date-string bounds and per-call "now"-relative offsets
//! - [`frozen`] — offsets resolved once, at construction
//! - [`date`] — multi-format date-string parsing, default-timezone setting
//! - [`unit`] — time-unit conversion across six granularities
//! - [`error`] — error types

pub mod date;
pub mod error;
pub mod frozen;
pub mod overlap;
pub mod range;
pub mod time_range;
pub mod unit;

pub use date::{default_time_zone, parse_millis, set_default_time_zone};
pub use error::RangeError;
pub use frozen::{FrozenBound, FrozenTimeRange, FrozenTimeRangeConfig};
pub use overlap::{in_range, OverlapRules};
pub use range::{DualRange, SingleRange};
pub use time_range::{TimeRange, TimeRangeConfig, TimeRangeDual};
pub use unit::{as_milliseconds, from_milliseconds, TimeUnit};
