//! Scaling raw event values into durations.
//!
//! The event name declares the unit: `usec` is one microsecond per unit,
//! `100usec` is a hundred. Names without a time suffix count raw units,
//! one nanosecond each.

use std::time::Duration;

/// Time suffixes, longest first so `usec` wins over `sec`
const UNIT_SUFFIXES: &[(&str, u64)] = &[
    ("nsec", 1),
    ("usec", 1_000),
    ("msec", 1_000_000),
    ("sec", 1_000_000_000),
];

/// Nanoseconds represented by one unit of an event column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostUnit {
    nanos_per_unit: u64,
}

impl Default for CostUnit {
    fn default() -> Self {
        Self { nanos_per_unit: 1 }
    }
}

impl CostUnit {
    /// Derive the unit from an event name such as `usec` or `100usec`
    pub fn from_event_name(name: &str) -> Self {
        for (suffix, nanos) in UNIT_SUFFIXES {
            if let Some(prefix) = name.strip_suffix(suffix) {
                let factor = prefix.parse::<u64>().ok().filter(|f| *f > 0).unwrap_or(1);
                return Self {
                    nanos_per_unit: nanos.saturating_mul(factor),
                };
            }
        }

        Self::default()
    }

    /// Unit of the first declared event, raw units when none is declared
    pub fn from_events(events: &[String]) -> Self {
        events
            .first()
            .map(|name| Self::from_event_name(name))
            .unwrap_or_default()
    }

    pub fn nanos_per_unit(&self) -> u64 {
        self.nanos_per_unit
    }

    /// Convert a raw event value into a duration
    pub fn scale(&self, value: f64) -> Duration {
        let nanos = value * self.nanos_per_unit as f64;
        if !nanos.is_finite() || nanos <= 0.0 {
            return Duration::ZERO;
        }
        if nanos >= u64::MAX as f64 {
            return Duration::from_nanos(u64::MAX);
        }

        Duration::from_nanos(nanos as u64)
    }
}

/// Parse an event field, unparsable values count as zero
pub fn parse_event_value(token: &str) -> f64 {
    token.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usec_with_multiplier() {
        let unit = CostUnit::from_event_name("100usec");
        let duration = unit.scale(50034.0);
        assert_eq!(duration.as_secs(), 5);
        assert_eq!(duration, Duration::from_micros(5_003_400));
    }

    #[test]
    fn test_bare_usec() {
        let unit = CostUnit::from_event_name("usec");
        assert_eq!(unit.scale(100.0), Duration::from_micros(100));
    }

    #[test]
    fn test_other_suffixes() {
        assert_eq!(CostUnit::from_event_name("nsec").nanos_per_unit(), 1);
        assert_eq!(CostUnit::from_event_name("msec").nanos_per_unit(), 1_000_000);
        assert_eq!(CostUnit::from_event_name("2sec").nanos_per_unit(), 2_000_000_000);
    }

    #[test]
    fn test_unknown_name_is_raw_units() {
        let unit = CostUnit::from_event_name("Ir");
        assert_eq!(unit.scale(42.0), Duration::from_nanos(42));
        assert_eq!(CostUnit::from_events(&[]).nanos_per_unit(), 1);
    }

    #[test]
    fn test_scale_clamps_negative() {
        let unit = CostUnit::from_event_name("usec");
        assert_eq!(unit.scale(-3.0), Duration::ZERO);
        assert_eq!(unit.scale(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn test_parse_event_value() {
        assert_eq!(parse_event_value("3002300"), 3002300.0);
        assert_eq!(parse_event_value("garbage"), 0.0);
    }
}
