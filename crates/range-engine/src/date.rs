//! Multi-format date-string parsing.
//!
//! Accepts either an all-digit epoch numeral or one of several
//! separator-tolerant calendar formats. Calendar input is recognized by
//! stripping separator characters and matching the remaining digit count
//! against fixed patterns:
//!
//! | digits | pattern             |
//! |--------|---------------------|
//! | 6      | `yyyyMM`            |
//! | 8      | `yyyyMMdd`          |
//! | 10     | `yyyyMMddHH`        |
//! | 12     | `yyyyMMddHHmm`      |
//! | 14     | `yyyyMMddHHmmss`    |
//! | 17     | `yyyyMMddHHmmssSSS` |
//!
//! A digit-only string whose length matches a pattern is parsed as a
//! calendar date; digit-only strings of any other length are epoch numerals
//! (milliseconds, or microseconds when the caller says so). Everything else
//! is rejected with an error that enumerates the accepted formats.
//!
//! Calendar input is interpreted in the explicitly supplied timezone, falling
//! back to the process-wide default set via [`set_default_time_zone`], and
//! finally to the platform's local zone.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{RangeError, Result};

/// Characters ignored when recognizing calendar input.
const SEPARATORS: [char; 7] = [' ', '-', '/', '_', ':', '|', '.'];

/// Digit counts of the accepted calendar patterns.
const PATTERN_LENGTHS: [usize; 6] = [6, 8, 10, 12, 14, 17];

static DEFAULT_TIME_ZONE: RwLock<Option<Tz>> = RwLock::new(None);

/// Set the process-wide default timezone used when none is supplied
/// explicitly. `None` restores the platform-local fallback.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `name` is not a valid IANA
/// timezone name.
pub fn set_default_time_zone(name: Option<&str>) -> Result<()> {
    let tz = match name {
        Some(n) => Some(parse_time_zone(n)?),
        None => None,
    };
    *DEFAULT_TIME_ZONE
        .write()
        .unwrap_or_else(PoisonError::into_inner) = tz;
    Ok(())
}

/// The process-wide default timezone, if one has been configured.
pub fn default_time_zone() -> Option<Tz> {
    *DEFAULT_TIME_ZONE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Parse an IANA timezone name.
pub(crate) fn parse_time_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| RangeError::InvalidTimezone(format!("'{name}'")))
}

/// Parse `input` into an absolute instant.
///
/// Calendar formats are interpreted in `time_zone` when given, otherwise in
/// the process default, otherwise in the platform-local zone. Epoch numerals
/// are milliseconds since the epoch, or microseconds when `microseconds` is
/// set.
///
/// # Errors
///
/// Returns [`RangeError::InvalidFormat`] if `input` matches none of the
/// accepted formats, names a nonexistent calendar date or wall-clock time,
/// or overflows a 64-bit epoch numeral.
///
/// # Examples
///
/// ```
/// use chrono_tz::Tz;
/// use range_engine::date;
///
/// let compact = date::parse("20180101120000", Some(Tz::UTC), false).unwrap();
/// let spaced = date::parse("2018/01/01 12:00:00", Some(Tz::UTC), false).unwrap();
/// assert_eq!(compact, spaced);
/// ```
pub fn parse(input: &str, time_zone: Option<Tz>, microseconds: bool) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid_format(input));
    }

    let stripped: String = trimmed.chars().filter(|c| !SEPARATORS.contains(c)).collect();
    let stripped_is_digits = !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit());

    if stripped_is_digits && PATTERN_LENGTHS.contains(&stripped.len()) {
        return parse_calendar(input, &stripped, time_zone);
    }
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return parse_epoch(trimmed, microseconds);
    }
    Err(invalid_format(input))
}

/// Parse `input` into milliseconds since the epoch, using the process-wide
/// default timezone for calendar formats. `None` passes through as `None`.
///
/// # Errors
///
/// Returns [`RangeError::InvalidFormat`] under the same conditions as
/// [`parse`].
pub fn parse_millis(input: Option<&str>) -> Result<Option<i64>> {
    input
        .map(|s| parse(s, None, false).map(|dt| dt.timestamp_millis()))
        .transpose()
}

/// Parse a stripped digit string of pattern length, already known to be
/// digits-only.
fn parse_calendar(input: &str, digits: &str, time_zone: Option<Tz>) -> Result<DateTime<Utc>> {
    // Canonicalize to the 17-digit yyyyMMddHHmmssSSS form. The 6-digit
    // pattern carries no day, so the first of the month is implied.
    let mut padded = String::with_capacity(17);
    padded.push_str(digits);
    if digits.len() == 6 {
        padded.push_str("01");
    }
    while padded.len() < 17 {
        padded.push('0');
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32> {
        padded[range].parse().map_err(|_| invalid_format(input))
    };
    let year: i32 = padded[0..4].parse().map_err(|_| invalid_format(input))?;
    let month = field(4..6)?;
    let day = field(6..8)?;
    let hour = field(8..10)?;
    let minute = field(10..12)?;
    let second = field(12..14)?;
    let milli = field(14..17)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, milli))
        .ok_or_else(|| invalid_format(input))?;

    localize(naive, time_zone).ok_or_else(|| {
        RangeError::InvalidFormat(format!(
            "'{input}' does not denote a valid instant in the target timezone"
        ))
    })
}

/// Interpret a wall-clock time in the effective timezone. Precedence:
/// explicit argument, then the process default, then the platform zone.
fn localize(naive: NaiveDateTime, time_zone: Option<Tz>) -> Option<DateTime<Utc>> {
    match time_zone.or_else(default_time_zone) {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Local
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Parse an all-digit epoch numeral.
fn parse_epoch(digits: &str, microseconds: bool) -> Result<DateTime<Utc>> {
    let n: i64 = digits.parse().map_err(|_| {
        RangeError::InvalidFormat(format!("epoch numeral '{digits}' does not fit in 64 bits"))
    })?;
    let instant = if microseconds {
        let secs = n.div_euclid(1_000_000);
        let nanos = (n.rem_euclid(1_000_000) * 1_000) as u32;
        Utc.timestamp_opt(secs, nanos).single()
    } else {
        Utc.timestamp_millis_opt(n).single()
    };
    instant.ok_or_else(|| {
        RangeError::InvalidFormat(format!("epoch numeral '{digits}' is out of range"))
    })
}

fn invalid_format(input: &str) -> RangeError {
    RangeError::InvalidFormat(format!(
        "'{input}': accepted formats: an all-digit epoch numeral, or yyyyMM, yyyyMMdd, \
         yyyyMMddHH, yyyyMMddHHmm, yyyyMMddHHmmss, yyyyMMddHHmmssSSS with any of the \
         separators ' ', '-', '/', '_', ':', '|', '.'"
    ))
}

// ── Tests ───────────────────────────────────────────────────────────────────
