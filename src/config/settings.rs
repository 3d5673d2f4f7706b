//! Settings loaded from the process environment.
//!
//! Parsing is a pure function over an environment lookup so callers (and
//! tests) can supply any source of variables.

use std::num::ParseIntError;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Environment variable holding the non-negative `required_int` setting.
pub const REQUIRED_INT_ENV: &str = "REQUIRED_INT";

/// Environment variable holding the state flag left by the previous run.
pub const STATE_ENV: &str = "STATE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Date the settings were loaded (process start).
    pub required_date: NaiveDate,
    pub required_int: u64,
    /// State flag as found in the environment, before this run changes it.
    pub state: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an integer, got {value:?}: {source}")]
    InvalidInteger {
        var: &'static str,
        value: String,
        source: ParseIntError,
    },
    #[error("{var} must be greater than or equal to 0, got {value}")]
    Negative { var: &'static str, value: i128 },
}

/// Build [`Settings`] from an environment lookup.
///
/// Absent variables default to 0. Values are trimmed before parsing.
pub fn parse_settings<F>(lookup: F, today: NaiveDate) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required_int = read_non_negative(&lookup, REQUIRED_INT_ENV)?;
    let state = read_int(&lookup, STATE_ENV)?;

    Ok(Settings {
        required_date: today,
        required_int,
        state,
    })
}

/// Parse as `u64` so the whole non-negative range is accepted. A value that
/// only fails because it is below zero is reported as [`ConfigError::Negative`].
fn read_non_negative<F>(lookup: &F, var: &'static str) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(0);
    };
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(value) => Ok(value),
        Err(source) => match trimmed.parse::<i128>() {
            Ok(0) => Ok(0),
            Ok(value) if value < 0 => Err(ConfigError::Negative { var, value }),
            _ => Err(ConfigError::InvalidInteger {
                var,
                value: raw,
                source,
            }),
        },
    }
}

fn read_int<F>(lookup: &F, var: &'static str) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(0);
    };
    let parsed = raw.trim().parse::<i64>();
    parsed.map_err(|source| ConfigError::InvalidInteger {
        var,
        value: raw,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = parse_settings(env(&[]), day()).unwrap();
        assert_eq!(settings.required_int, 0);
        assert_eq!(settings.state, 0);
        assert_eq!(settings.required_date, day());
    }

    #[test]
    fn test_non_negative_values_are_kept() {
        for (raw, expected) in [("0", 0), ("-0", 0), ("5", 5), ("42", 42), (" 7\n", 7), ("+3", 3)] {
            let settings = parse_settings(env(&[(REQUIRED_INT_ENV, raw)]), day()).unwrap();
            assert_eq!(settings.required_int, expected, "input {raw:?}");
        }
    }

    #[test]
    fn test_full_u64_range_is_accepted() {
        let mut values = vec![0, 1, u64::MAX - 1, u64::MAX];
        for bit in 0..64 {
            let power = 1u64 << bit;
            values.extend([power - 1, power, power.saturating_add(1)]);
        }
        // i64::MAX + 1 is the first value a signed parse would reject
        values.push(9_223_372_036_854_775_808);

        for value in values {
            let raw = value.to_string();
            let settings = parse_settings(env(&[(REQUIRED_INT_ENV, raw.as_str())]), day()).unwrap();
            assert_eq!(settings.required_int, value, "input {raw}");
        }
    }

    #[test]
    fn test_above_u64_is_invalid_not_negative() {
        let err = parse_settings(
            env(&[(REQUIRED_INT_ENV, "18446744073709551616")]),
            day(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidInteger {
                var: REQUIRED_INT_ENV,
                ..
            }
        ));
    }

    #[test]
    fn test_large_negative_required_int_is_negative() {
        let err = parse_settings(
            env(&[(REQUIRED_INT_ENV, " -9223372036854775809 ")]),
            day(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Negative {
                var: REQUIRED_INT_ENV,
                value: -9_223_372_036_854_775_809,
            }
        );
    }

    #[test]
    fn test_negative_required_int_is_rejected() {
        let err = parse_settings(env(&[(REQUIRED_INT_ENV, "-1")]), day()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Negative {
                var: REQUIRED_INT_ENV,
                value: -1
            }
        );
    }

    #[test]
    fn test_non_numeric_required_int_is_rejected() {
        let err = parse_settings(env(&[(REQUIRED_INT_ENV, "abc")]), day()).unwrap_err();
        match err {
            ConfigError::InvalidInteger { var, value, .. } => {
                assert_eq!(var, REQUIRED_INT_ENV);
                assert_eq!(value, "abc");
            }
            other @ ConfigError::Negative { .. } => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let err = parse_settings(env(&[(STATE_ENV, "")]), day()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidInteger { var: STATE_ENV, .. }
        ));
    }

    #[test]
    fn test_state_may_be_negative() {
        let settings = parse_settings(env(&[(STATE_ENV, "-1")]), day()).unwrap();
        assert_eq!(settings.state, -1);
    }

    #[test]
    fn test_error_message_names_the_variable() {
        let err = parse_settings(env(&[(REQUIRED_INT_ENV, "12x")]), day()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("REQUIRED_INT must be an integer"));
        assert!(msg.contains("\"12x\""));
    }
}
