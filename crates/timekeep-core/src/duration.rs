//! Pause-duration arithmetic.
//!
//! All hour values are `rust_decimal::Decimal` rounded to 4 decimal places.
//! Accumulated pause time is always recomputed from the pause timestamp plus
//! the previously stored total, never from repeated polling, so rounding
//! error cannot compound across many pause/resume cycles.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// Number of decimal places kept for hour values.
pub const HOUR_PRECISION: u32 = 4;

const SECONDS_PER_HOUR: i64 = 3600;
const MILLIS_PER_SECOND: i64 = 1000;

/// Accumulate the pause interval `[time_paused, now]` onto an existing total.
///
/// Returns `paused_hours + (now - time_paused) / 3600`, rounded to
/// [`HOUR_PRECISION`] decimal places.
pub fn add_elapsed_pause(
    now: DateTime<FixedOffset>,
    time_paused: DateTime<FixedOffset>,
    paused_hours: Decimal,
) -> Decimal {
    let diff = now.signed_duration_since(time_paused);
    let elapsed_secs =
        Decimal::from(diff.num_milliseconds()) / Decimal::from(MILLIS_PER_SECOND);
    let prev_paused_secs = paused_hours * Decimal::from(SECONDS_PER_HOUR);
    let total_secs = elapsed_secs + prev_paused_secs;
    (total_secs / Decimal::from(SECONDS_PER_HOUR)).round_dp(HOUR_PRECISION)
}

/// Hours elapsed between `start` and `end`, net of accumulated pause time.
///
/// Used for live-duration display only; the remote store owns the
/// authoritative duration computation. Clamped at zero so a paused entry
/// whose pause outlasts its runtime never shows a negative duration.
pub fn elapsed_hours(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    paused_hours: Decimal,
) -> Decimal {
    let diff = end.signed_duration_since(start);
    let total_secs = Decimal::from(diff.num_milliseconds()) / Decimal::from(MILLIS_PER_SECOND)
        - paused_hours * Decimal::from(SECONDS_PER_HOUR);
    let hours = (total_secs / Decimal::from(SECONDS_PER_HOUR)).round_dp(HOUR_PRECISION);
    hours.max(Decimal::ZERO)
}
