use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Decimal places kept when cleaning float noise out of generated ticks.
const TICK_DECIMAL_PLACES: u32 = 10;

/// Rounds away binary float noise (`0.1 + 0.2`) so tick values compare and
/// print cleanly. Values outside the decimal range are returned untouched.
#[must_use]
pub fn clean_tick_value(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp(TICK_DECIMAL_PLACES).normalize())
        .and_then(|decimal| decimal.to_f64())
        .unwrap_or(value)
}

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Parses an RFC 3339 timestamp into UTC.
#[must_use]
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{clean_tick_value, datetime_to_unix_millis, parse_datetime};

    #[test]
    fn clean_tick_value_strips_float_noise() {
        assert_eq!(clean_tick_value(0.1 + 0.2), 0.3);
        assert_eq!(clean_tick_value(-12.5), -12.5);
    }

    #[test]
    fn timestamps_map_to_epoch_millis() {
        let time = parse_datetime("2016-03-03T12:00:00+01:00").expect("valid date");
        assert_eq!(datetime_to_unix_millis(time), 1_457_002_800_000.0);
        assert!(parse_datetime("2016-03-03").is_none());
    }
}
