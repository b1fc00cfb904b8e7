//! Call duration computation and formatting
//!
//! The duration runs from the first `Answer` event to the first `Hangup`
//! event, falling back to the first `Reject` event, and to "now" while the
//! call is still in progress. A call that was never answered has no
//! duration and formats to an empty string.

use tracing::{trace, warn};

use crate::config::{DurationFormatConfig, DurationStyle, DurationUnit};
use crate::types::{first_of, SignalEvent, SignalKind};

/// Milliseconds per second
const MILLIS_PER_SEC: f64 = 1000.0;

/// Elapsed call time in seconds, never negative
pub fn call_duration(events: &[SignalEvent], now_millis: i64) -> f64 {
    let Some(start) = first_of(events, SignalKind::Answer).map(|e| e.timestamp_millis) else {
        // never started
        return 0.0;
    };

    let end = first_of(events, SignalKind::Hangup)
        .or_else(|| first_of(events, SignalKind::Reject))
        .map(|e| e.timestamp_millis);

    let (end, in_progress) = match end {
        Some(end) => (end, false),
        None => (now_millis, true),
    };

    let seconds = end.saturating_sub(start) as f64 / MILLIS_PER_SEC;
    trace!(start, end, in_progress, seconds, "Computed call duration");

    if seconds < 0.0 {
        warn!(start, end, "Call end precedes answer, reporting zero duration");
        return 0.0;
    }
    seconds
}

/// Turns a number of seconds into display text
///
/// Zero, negative and non-finite durations format to an empty string.
pub trait DurationFormatter: Send + Sync {
    fn format(&self, seconds: f64) -> String;
}

/// Formatter that splits a duration into hours, minutes and seconds,
/// dropping zero-valued components
#[derive(Debug, Clone, Default)]
pub struct UnitDurationFormatter {
    config: DurationFormatConfig,
}

impl UnitDurationFormatter {
    pub fn new(config: DurationFormatConfig) -> Self {
        Self { config }
    }

    fn units(&self) -> Vec<DurationUnit> {
        let mut units = self.config.units.clone();
        units.sort();
        units.dedup();
        if units.is_empty() {
            units.push(DurationUnit::Seconds);
        }
        units
    }

    fn label(&self, unit: DurationUnit, value: u64) -> String {
        let plural = value != 1;
        match (self.config.style, unit) {
            (DurationStyle::Abbreviated, DurationUnit::Hours) => format!("{}h", value),
            (DurationStyle::Abbreviated, DurationUnit::Minutes) => format!("{}m", value),
            (DurationStyle::Abbreviated, DurationUnit::Seconds) => format!("{}s", value),
            (DurationStyle::Short, DurationUnit::Hours) => format!("{} hr", value),
            (DurationStyle::Short, DurationUnit::Minutes) => format!("{} min", value),
            (DurationStyle::Short, DurationUnit::Seconds) => format!("{} sec", value),
            (DurationStyle::Full, DurationUnit::Hours) if plural => format!("{} hours", value),
            (DurationStyle::Full, DurationUnit::Hours) => format!("{} hour", value),
            (DurationStyle::Full, DurationUnit::Minutes) if plural => format!("{} minutes", value),
            (DurationStyle::Full, DurationUnit::Minutes) => format!("{} minute", value),
            (DurationStyle::Full, DurationUnit::Seconds) if plural => format!("{} seconds", value),
            (DurationStyle::Full, DurationUnit::Seconds) => format!("{} second", value),
        }
    }
}

impl DurationFormatter for UnitDurationFormatter {
    fn format(&self, seconds: f64) -> String {
        if !seconds.is_finite() || seconds <= 0.0 {
            return String::new();
        }

        // sub-second remainders are dropped
        let whole = seconds.trunc() as u64;
        let units = self.units();
        let mut remaining = whole;
        let mut parts = Vec::new();
        for &unit in &units {
            let value = remaining / unit.seconds();
            remaining %= unit.seconds();
            if value > 0 {
                parts.push(self.label(unit, value));
            }
        }

        // shorter than the smallest allowed unit, but the call did last
        if parts.is_empty() && whole > 0 {
            if let Some(&smallest) = units.last() {
                parts.push(self.label(smallest, 0));
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HangupReason;

    fn formatter(style: DurationStyle, units: Vec<DurationUnit>) -> UnitDurationFormatter {
        UnitDurationFormatter::new(DurationFormatConfig { style, units })
    }

    #[test]
    fn test_never_answered_has_no_duration() {
        let events = vec![
            SignalEvent::invite(false, 0, false),
            SignalEvent::hangup(true, 5_000, Some(HangupReason::UserHangup)),
        ];
        assert_eq!(call_duration(&events, 60_000), 0.0);
    }

    #[test]
    fn test_answered_and_hung_up() {
        let events = vec![
            SignalEvent::invite(false, 0, false),
            SignalEvent::answer(true, 1_000),
            SignalEvent::hangup(false, 61_000, Some(HangupReason::UserHangup)),
        ];
        assert_eq!(call_duration(&events, 999_999), 60.0);
    }

    #[test]
    fn test_reject_ends_the_call_when_no_hangup() {
        let events = vec![
            SignalEvent::invite(false, 0, false),
            SignalEvent::answer(true, 1_000),
            SignalEvent::reject(true, 3_500),
        ];
        assert_eq!(call_duration(&events, 999_999), 2.5);
    }

    #[test]
    fn test_hangup_wins_over_reject() {
        let events = vec![
            SignalEvent::invite(false, 0, false),
            SignalEvent::answer(true, 1_000),
            SignalEvent::reject(true, 2_000),
            SignalEvent::hangup(true, 4_000, None),
        ];
        assert_eq!(call_duration(&events, 999_999), 3.0);
    }

    #[test]
    fn test_in_progress_uses_now() {
        let events = vec![
            SignalEvent::invite(false, 0, false),
            SignalEvent::answer(true, 1_000),
        ];
        assert_eq!(call_duration(&events, 31_000), 30.0);
    }

    #[test]
    fn test_skewed_timestamps_clamp_to_zero() {
        let events = vec![
            SignalEvent::answer(true, 10_000),
            SignalEvent::hangup(false, 4_000, None),
        ];
        assert_eq!(call_duration(&events, 0), 0.0);

        let events = vec![SignalEvent::answer(true, 10_000)];
        assert_eq!(call_duration(&events, 5_000), 0.0);
    }

    #[test]
    fn test_format_abbreviated() {
        let f = UnitDurationFormatter::default();
        assert_eq!(f.format(0.0), "");
        assert_eq!(f.format(-3.0), "");
        assert_eq!(f.format(f64::NAN), "");
        assert_eq!(f.format(0.4), "");
        assert_eq!(f.format(75.0), "1m 15s");
        assert_eq!(f.format(3600.0), "1h");
        assert_eq!(f.format(3725.9), "1h 2m 5s");
    }

    #[test]
    fn test_format_styles() {
        let all = vec![DurationUnit::Hours, DurationUnit::Minutes, DurationUnit::Seconds];
        assert_eq!(formatter(DurationStyle::Short, all.clone()).format(75.0), "1 min 15 sec");
        assert_eq!(
            formatter(DurationStyle::Full, all.clone()).format(3661.0),
            "1 hour 1 minute 1 second"
        );
        assert_eq!(
            formatter(DurationStyle::Full, all).format(7322.0),
            "2 hours 2 minutes 2 seconds"
        );
    }

    #[test]
    fn test_format_restricted_units() {
        let minutes = formatter(DurationStyle::Abbreviated, vec![DurationUnit::Minutes]);
        assert_eq!(minutes.format(3725.0), "62m");
        assert_eq!(minutes.format(0.5), "");

        let unordered = formatter(
            DurationStyle::Abbreviated,
            vec![DurationUnit::Seconds, DurationUnit::Hours],
        );
        assert_eq!(unordered.format(3725.0), "1h 125s");
    }

    #[test]
    fn test_call_shorter_than_smallest_unit_is_not_blank() {
        let minutes = formatter(DurationStyle::Abbreviated, vec![DurationUnit::Minutes]);
        assert_eq!(minutes.format(30.0), "0m");
        assert_eq!(minutes.format(59.9), "0m");

        let hours = formatter(DurationStyle::Full, vec![DurationUnit::Hours]);
        assert_eq!(hours.format(1800.0), "0 hours");
        assert_eq!(hours.format(5400.0), "1 hour");
    }
}
