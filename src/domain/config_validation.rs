//! Configuration validation.
//!
//! Checks an INI source before a [`ScoringConfig`](crate::domain::scoring_config::ScoringConfig)
//! or market context is built from it.

use crate::domain::catalyst::{IpoWindow, RateTrend, Volatility};
use crate::domain::error::ArbError;
use crate::domain::scoring_config::{
    BUILD_COMPONENTS, COMPOSITE_COMPONENTS, HYPE_COMPONENTS, MOAT_COMPONENTS, ScoringConfig,
};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

const WEIGHT_TOLERANCE: f64 = 1e-6;

pub fn validate_scoring_config(config: &dyn ConfigPort) -> Result<(), ArbError> {
    let defaults = ScoringConfig::default();
    validate_weights(config, "weights.hype", &HYPE_COMPONENTS, &defaults.hype_weights)?;
    validate_weights(config, "weights.build", &BUILD_COMPONENTS, &defaults.build_weights)?;
    validate_weights(
        config,
        "weights.composite",
        &COMPOSITE_COMPONENTS,
        &defaults.composite_weights,
    )?;
    validate_weights(config, "weights.moat", &MOAT_COMPONENTS, &defaults.moat_weights)?;
    validate_divergence_thresholds(config)?;
    validate_unit_interval(config, "thresholds", "low_correlation", 0.40)?;
    validate_unit_interval(config, "thresholds", "high_dependency", 0.70)?;
    validate_unit_interval(config, "thresholds", "high_conviction", 0.70)?;
    validate_position_sizes(config)?;
    Ok(())
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), ArbError> {
    validate_market(config)?;
    validate_as_of(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ArbError {
    ArbError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_weights(
    config: &dyn ConfigPort,
    section: &str,
    components: &[&str],
    defaults: &std::collections::BTreeMap<String, f64>,
) -> Result<(), ArbError> {
    let mut sum = 0.0;
    for name in components {
        let default = defaults.get(*name).copied().unwrap_or(0.0);
        let weight = config.get_double(section, name, default);
        if weight < 0.0 {
            return Err(invalid(section, name, "weight must be non-negative"));
        }
        sum += weight;
    }
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(invalid(
            section,
            components.first().copied().unwrap_or(""),
            format!("weights must sum to 1.0, got {sum:.4}"),
        ));
    }
    Ok(())
}

fn validate_divergence_thresholds(config: &dyn ConfigPort) -> Result<(), ArbError> {
    let high = config.get_double("thresholds", "divergence_high", 65.0);
    let low = config.get_double("thresholds", "divergence_low", 45.0);
    for (key, value) in [("divergence_high", high), ("divergence_low", low)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("thresholds", key, "must be between 0 and 100"));
        }
    }
    if low >= high {
        return Err(invalid(
            "thresholds",
            "divergence_low",
            "divergence_low must be below divergence_high",
        ));
    }
    Ok(())
}

fn validate_unit_interval(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), ArbError> {
    let value = config.get_double(section, key, default);
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(section, key, format!("{key} must be between 0 and 1")));
    }
    Ok(())
}

fn validate_position_sizes(config: &dyn ConfigPort) -> Result<(), ArbError> {
    let min = config.get_double("risk", "min_position_size", 0.01);
    let base = config.get_double("risk", "base_position_size", 0.02);
    let max = config.get_double("risk", "max_position_size", 0.05);
    if min <= 0.0 {
        return Err(invalid("risk", "min_position_size", "must be positive"));
    }
    if max > 1.0 {
        return Err(invalid("risk", "max_position_size", "must not exceed 1.0"));
    }
    if !(min <= base && base <= max) {
        return Err(invalid(
            "risk",
            "base_position_size",
            "expected min_position_size <= base_position_size <= max_position_size",
        ));
    }
    Ok(())
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), ArbError> {
    if let Some(value) = config.get_string("market", "ipo_window") {
        if IpoWindow::parse(&value).is_none() {
            return Err(invalid("market", "ipo_window", "expected open, mixed or closed"));
        }
    }
    if let Some(value) = config.get_string("market", "volatility") {
        if Volatility::parse(&value).is_none() {
            return Err(invalid("market", "volatility", "expected low, medium or high"));
        }
    }
    if let Some(value) = config.get_string("market", "interest_rates") {
        if RateTrend::parse(&value).is_none() {
            return Err(invalid(
                "market",
                "interest_rates",
                "expected falling, neutral or rising",
            ));
        }
    }
    Ok(())
}

fn validate_as_of(config: &dyn ConfigPort) -> Result<(), ArbError> {
    match config.get_string("report", "as_of") {
        None => Ok(()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| invalid("report", "as_of", "invalid as_of format, expected YYYY-MM-DD")),
    }
}
