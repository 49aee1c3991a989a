//! # Unlock Delays & Countdown Formatting
//!
//! An [`UnlockDelay`] is the five-field duration a user picks before
//! depositing: months, days, hours, minutes, seconds. A month is always
//! [`DAYS_PER_MONTH`] days. The total is plain millisecond arithmetic,
//! saturating rather than overflowing so absurd inputs produce an absurdly
//! distant unlock time instead of a panic.
//!
//! User input arrives as arbitrary numbers. [`UnlockDelay::from_lossy`]
//! clamps each component: non-finite or negative becomes zero, fractions
//! are floored, and minutes and seconds stop at 59.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{
    DAYS_PER_MONTH, MAX_CLOCK_FIELD, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
    UNLOCKED_LABEL,
};

/// A delay from "now" until the vault unlocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnlockDelay {
    /// 30-day months.
    #[serde(default)]
    pub months: u64,
    #[serde(default)]
    pub days: u64,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl UnlockDelay {
    pub fn new(months: u64, days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// A delay of whole seconds.
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// A delay of whole hours.
    pub fn from_hours(hours: u64) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    /// Builds a delay from untrusted numbers, clamping each component to a
    /// non-negative integer. Minutes and seconds are capped at 59 like the
    /// form fields; larger units are not.
    pub fn from_lossy(months: f64, days: f64, hours: f64, minutes: f64, seconds: f64) -> Self {
        Self {
            months: clamp_component(months),
            days: clamp_component(days),
            hours: clamp_component(hours),
            minutes: clamp_component(minutes).min(MAX_CLOCK_FIELD),
            seconds: clamp_component(seconds).min(MAX_CLOCK_FIELD),
        }
    }

    /// Total delay in milliseconds:
    /// `((months*30 + days)*86400 + hours*3600 + minutes*60 + seconds) * 1000`.
    pub fn total_ms(&self) -> u64 {
        let days = self
            .months
            .saturating_mul(DAYS_PER_MONTH)
            .saturating_add(self.days);

        days.saturating_mul(MS_PER_DAY)
            .saturating_add(self.hours.saturating_mul(MS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(MS_PER_MINUTE))
            .saturating_add(self.seconds.saturating_mul(MS_PER_SECOND))
    }

    pub fn is_zero(&self) -> bool {
        self.total_ms() == 0
    }
}

impl fmt::Display for UnlockDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}mo {}d {}h {}m {}s",
            self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Wire form of an unlock delay where every component is an optional,
/// possibly garbage, number. Missing components count as zero.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct LossyUnlockDelay {
    pub months: Option<f64>,
    pub days: Option<f64>,
    pub hours: Option<f64>,
    pub minutes: Option<f64>,
    pub seconds: Option<f64>,
}

impl From<LossyUnlockDelay> for UnlockDelay {
    fn from(raw: LossyUnlockDelay) -> Self {
        UnlockDelay::from_lossy(
            raw.months.unwrap_or(0.0),
            raw.days.unwrap_or(0.0),
            raw.hours.unwrap_or(0.0),
            raw.minutes.unwrap_or(0.0),
            raw.seconds.unwrap_or(0.0),
        )
    }
}

fn clamp_component(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        // `as` saturates at u64::MAX for huge values.
        value.floor() as u64
    } else {
        0
    }
}

/// Renders a remaining duration for the countdown.
///
/// Zero renders as `"Unlocked"`. Otherwise the output starts at the largest
/// non-zero unit among days, hours, and minutes and lists every smaller unit
/// down to seconds: `"2d 0h 5m 1s"`, `"1h 1m 1s"`, `"1m 30s"`, `"9s"`.
/// Sub-second remainders render as `"0s"`.
pub fn format_remaining(remaining_ms: u64) -> String {
    if remaining_ms == 0 {
        return UNLOCKED_LABEL.to_string();
    }

    let days = remaining_ms / MS_PER_DAY;
    let hours = (remaining_ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_ms_follows_thirty_day_months() {
        let d = UnlockDelay::new(1, 2, 3, 4, 5);
        let expected = ((30 + 2) * 86_400 + 3 * 3_600 + 4 * 60 + 5) * 1_000;
        assert_eq!(d.total_ms(), expected);
    }

    #[test]
    fn total_ms_for_each_component() {
        assert_eq!(UnlockDelay::new(1, 0, 0, 0, 0).total_ms(), 2_592_000_000);
        assert_eq!(UnlockDelay::new(0, 1, 0, 0, 0).total_ms(), 86_400_000);
        assert_eq!(UnlockDelay::from_hours(1).total_ms(), 3_600_000);
        assert_eq!(UnlockDelay::new(0, 0, 0, 1, 0).total_ms(), 60_000);
        assert_eq!(UnlockDelay::from_seconds(10).total_ms(), 10_000);
        assert!(UnlockDelay::default().is_zero());
    }

    #[test]
    fn total_ms_saturates() {
        let d = UnlockDelay::new(u64::MAX, u64::MAX, 0, 0, 0);
        assert_eq!(d.total_ms(), u64::MAX);
    }

    #[test]
    fn lossy_inputs_are_clamped() {
        let d = UnlockDelay::from_lossy(f64::NAN, -3.0, 2.9, f64::INFINITY, 7.0);
        assert_eq!(d, UnlockDelay::new(0, 0, 2, 0, 7));
    }

    #[test]
    fn lossy_minutes_and_seconds_cap_at_59() {
        let d = UnlockDelay::from_lossy(0.0, 400.0, 9_000.0, 75.0, 1e12);
        assert_eq!(d, UnlockDelay::new(0, 400, 9_000, 59, 59));
    }

    #[test]
    fn lossy_wire_form_defaults_missing_fields() {
        let raw: LossyUnlockDelay =
            serde_json::from_str(r#"{"hours": 1.5, "seconds": -4}"#).expect("deserialize");
        assert_eq!(UnlockDelay::from(raw), UnlockDelay::from_hours(1));
    }

    #[test]
    fn display_lists_every_component() {
        assert_eq!(
            UnlockDelay::new(0, 0, 0, 0, 10).to_string(),
            "0mo 0d 0h 0m 10s"
        );
    }

    #[test]
    fn format_zero_is_unlocked() {
        assert_eq!(format_remaining(0), "Unlocked");
    }

    #[test]
    fn format_cascades_from_largest_unit() {
        assert_eq!(format_remaining(3_661_000), "1h 1m 1s");
        assert_eq!(format_remaining(90_000), "1m 30s");
        assert_eq!(format_remaining(9_999), "9s");
        assert_eq!(format_remaining(2 * 3_600_000 + 5 * 60_000 + 10_000), "2h 5m 10s");
        assert_eq!(format_remaining(86_400_000), "1d 0h 0m 0s");
    }

    #[test]
    fn format_sub_second_remainder() {
        assert_eq!(format_remaining(999), "0s");
    }
}
