//! Configuration validation.
//!
//! Validates generator settings before anything is generated. Missing keys
//! fall back to the built-in defaults and are always valid.

use std::str::FromStr;

use crate::domain::asset::parse_derived_assets;
use crate::domain::error::GoldcastError;
use crate::domain::forecast::{
    DEFAULT_MAX_FALL, DEFAULT_MAX_RISE, DEFAULT_SEED_PRICE, DEFAULT_STABLE_THRESHOLD,
};
use crate::domain::history::{DEFAULT_BASE_PRICE, DEFAULT_MAX_STEP};
use crate::domain::live::{DEFAULT_CHANGE_SPREAD, DEFAULT_PRICE_SPREAD, DEFAULT_REFERENCE_PRICE};
use crate::ports::config_port::ConfigPort;

/// Default cadence of the live feed.
pub const DEFAULT_INTERVAL_SECS: i64 = 5;

pub fn validate_generator_config(config: &dyn ConfigPort) -> Result<(), GoldcastError> {
    validate_seed(config)?;
    validate_history(config)?;
    validate_live(config)?;
    validate_forecast(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> GoldcastError {
    GoldcastError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// `None` when the key is absent. A present value that does not parse is
/// rejected rather than replaced by the default.
fn parse_key<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, GoldcastError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    raw.parse()
        .map(Some)
        .map_err(|_| invalid(section, key, &format!("{key} must be {expected}, got '{raw}'")))
}

fn require_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, GoldcastError> {
    let value = parse_key::<f64>(config, section, key, "a number")?.unwrap_or(default);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(section, key, &format!("{key} must be positive")));
    }
    Ok(value)
}

fn require_non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, GoldcastError> {
    let value = parse_key::<f64>(config, section, key, "a number")?.unwrap_or(default);
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(section, key, &format!("{key} must be non-negative")));
    }
    Ok(value)
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), GoldcastError> {
    match config.get_u64("random", "seed") {
        Some(Err(_)) => Err(invalid(
            "random",
            "seed",
            "seed must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

fn validate_history(config: &dyn ConfigPort) -> Result<(), GoldcastError> {
    require_positive(config, "history", "base_price", DEFAULT_BASE_PRICE)?;
    require_non_negative(config, "history", "max_step", DEFAULT_MAX_STEP)?;
    if let Some(list) = config.get_string("history", "assets") {
        parse_derived_assets(&list)
            .map_err(|e| invalid("history", "assets", &e.to_string()))?;
    }
    Ok(())
}

fn validate_live(config: &dyn ConfigPort) -> Result<(), GoldcastError> {
    let reference = require_positive(config, "live", "reference_price", DEFAULT_REFERENCE_PRICE)?;
    let spread = require_non_negative(config, "live", "price_spread", DEFAULT_PRICE_SPREAD)?;
    if spread >= reference {
        return Err(invalid(
            "live",
            "price_spread",
            "price_spread must be smaller than reference_price",
        ));
    }
    require_non_negative(config, "live", "change_spread", DEFAULT_CHANGE_SPREAD)?;

    let interval = parse_key::<i64>(config, "live", "interval_secs", "a whole number of seconds")?
        .unwrap_or(DEFAULT_INTERVAL_SECS);
    if interval <= 0 {
        return Err(invalid(
            "live",
            "interval_secs",
            "interval_secs must be positive",
        ));
    }
    Ok(())
}

fn validate_forecast(config: &dyn ConfigPort) -> Result<(), GoldcastError> {
    require_positive(config, "forecast", "seed_price", DEFAULT_SEED_PRICE)?;
    require_non_negative(config, "forecast", "max_rise", DEFAULT_MAX_RISE)?;
    require_non_negative(config, "forecast", "max_fall", DEFAULT_MAX_FALL)?;
    require_positive(
        config,
        "forecast",
        "stable_threshold",
        DEFAULT_STABLE_THRESHOLD,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn assert_invalid(entries: &[(&str, &str, &str)], expected_key: &str) {
        let err = validate_generator_config(&MapConfig::new(entries)).unwrap_err();
        assert!(
            matches!(&err, GoldcastError::ConfigInvalid { key, .. } if key == expected_key),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        assert!(validate_generator_config(&MapConfig::new(&[])).is_ok());
    }

    #[test]
    fn rejects_non_positive_base_price() {
        assert_invalid(&[("history", "base_price", "0")], "base_price");
        assert_invalid(&[("history", "base_price", "-10")], "base_price");
    }

    #[test]
    fn rejects_negative_step() {
        assert_invalid(&[("history", "max_step", "-1")], "max_step");
    }

    #[test]
    fn rejects_unknown_asset() {
        assert_invalid(&[("history", "assets", "silver,platinum")], "assets");
    }

    #[test]
    fn rejects_spread_that_could_go_negative() {
        assert_invalid(
            &[
                ("live", "reference_price", "10"),
                ("live", "price_spread", "10"),
            ],
            "price_spread",
        );
    }

    #[test]
    fn rejects_zero_interval() {
        assert_invalid(&[("live", "interval_secs", "0")], "interval_secs");
    }

    #[test]
    fn rejects_zero_stable_threshold() {
        assert_invalid(&[("forecast", "stable_threshold", "0")], "stable_threshold");
    }

    #[test]
    fn rejects_unparsable_history_values() {
        assert_invalid(&[("history", "base_price", "lots")], "base_price");
        assert_invalid(&[("history", "max_step", "")], "max_step");
    }

    #[test]
    fn rejects_unparsable_live_values() {
        assert_invalid(&[("live", "interval_secs", "2.5")], "interval_secs");
        assert_invalid(&[("live", "price_spread", "wide")], "price_spread");
    }

    #[test]
    fn rejects_unparsable_forecast_values() {
        assert_invalid(&[("forecast", "max_rise", "ten")], "max_rise");
        assert_invalid(&[("forecast", "stable_threshold", "5%")], "stable_threshold");
    }

    #[test]
    fn rejects_bad_seed() {
        assert_invalid(&[("random", "seed", "-4")], "seed");
        assert_invalid(&[("random", "seed", "abc")], "seed");
    }

    #[test]
    fn accepts_full_custom_config() {
        let config = MapConfig::new(&[
            ("random", "seed", "42"),
            ("history", "base_price", "1800"),
            ("history", "max_step", "0"),
            ("history", "assets", "bitcoin"),
            ("live", "reference_price", "1900"),
            ("live", "price_spread", "5"),
            ("live", "change_spread", "0"),
            ("live", "interval_secs", "1"),
            ("forecast", "seed_price", "1900"),
            ("forecast", "max_rise", "10"),
            ("forecast", "max_fall", "10"),
            ("forecast", "stable_threshold", "2.5"),
        ]);
        assert!(validate_generator_config(&config).is_ok());
    }
}
