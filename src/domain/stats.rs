//! Numeric and formatting helpers shared by the scorers.
//!
//! Every function degrades to a neutral value (usually 0.0) on empty or
//! degenerate input instead of failing.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Component name to weight.
pub type WeightTable = BTreeMap<String, f64>;

/// Round to 2 decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Linearly map `value` from `[min, max]` onto `[0, scale]`, clamped at
/// both ends. A degenerate range maps everything to 0.
pub fn normalize(value: f64, min: f64, max: f64, scale: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    let normalized = (value - min) / (max - min) * scale;
    normalized.clamp(0.0, scale)
}

/// Weighted sum over components that have a weight, rounded to 2 decimals.
/// Components missing from `weights` are skipped.
pub fn weighted_score(components: &[(&str, f64)], weights: &WeightTable) -> f64 {
    let total: f64 = components
        .iter()
        .filter_map(|(key, value)| weights.get(*key).map(|w| value * w))
        .sum();
    round2(total)
}

pub fn sigmoid(x: f64, midpoint: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-steepness * (x - midpoint)).exp())
}

/// Mean of the trailing `window` values, or of all values when fewer exist.
pub fn moving_average(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let start = values.len().saturating_sub(window.max(1));
    let recent = &values[start..];
    recent.iter().sum::<f64>() / recent.len() as f64
}

pub fn exponential_moving_average(values: &[f64], span: usize) -> f64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0.0;
    };
    let alpha = 2.0 / (span as f64 + 1.0);
    rest.iter()
        .fold(first, |ema, value| alpha * value + (1.0 - alpha) * ema)
}

pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    cov / denominator
}

/// Exponential half-life decay of a probability.
pub fn probability_decay(probability: f64, days_elapsed: i64, half_life_days: f64) -> f64 {
    if half_life_days <= 0.0 {
        return 0.0;
    }
    let rate = std::f64::consts::LN_2 / half_life_days;
    probability * (-rate * days_elapsed as f64).exp()
}

/// Annualized Sharpe ratio of a periodic return series (population variance).
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        return 0.0;
    }

    let annualized_return = mean * periods_per_year;
    let annualized_volatility = stddev * periods_per_year.sqrt();
    (annualized_return - risk_free_rate) / annualized_volatility
}

/// Largest peak-to-trough decline, in percent, rounded to 2 decimals.
pub fn max_drawdown(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut peak = values[0];
    let mut max_dd = 0.0_f64;
    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
        }
    }
    round2(max_dd * 100.0)
}

/// Signed day count from `as_of` to `target`. Negative means `target` is past.
pub fn days_until(target: NaiveDate, as_of: NaiveDate) -> i64 {
    (target - as_of).num_days()
}

pub fn format_currency(amount: f64, decimals: usize) -> String {
    if amount >= 1e9 {
        format!("${:.*}B", decimals, amount / 1e9)
    } else if amount >= 1e6 {
        format!("${:.*}M", decimals, amount / 1e6)
    } else if amount >= 1e3 {
        format!("${:.*}K", decimals, amount / 1e3)
    } else {
        format!("${:.*}", decimals, amount)
    }
}

/// Human-readable distance to an event.
pub fn time_to_catalyst(days: i64) -> String {
    if days < 0 {
        "Past due".to_string()
    } else if days < 30 {
        format!("{days} days")
    } else if days < 365 {
        let months = days / 30;
        let plural = if months != 1 { "s" } else { "" };
        format!("{months} month{plural}")
    } else {
        let years = days as f64 / 365.0;
        let plural = if years >= 2.0 { "s" } else { "" };
        format!("{years:.1} year{plural}")
    }
}

pub fn confidence_level(score: f64) -> &'static str {
    if score >= 0.85 {
        "Very High"
    } else if score >= 0.70 {
        "High"
    } else if score >= 0.50 {
        "Medium"
    } else if score >= 0.30 {
        "Low"
    } else {
        "Very Low"
    }
}

/// Position size band "X-Y% portfolio" around
/// `(base + conviction*(max-base)) * risk_multiplier`, one point either side,
/// floored at `min` and capped at `max`.
pub fn position_size_range(
    conviction: f64,
    risk_multiplier: f64,
    base: f64,
    min: f64,
    max: f64,
) -> String {
    let adjusted = base + conviction * (max - base);
    let size = adjusted * risk_multiplier;
    let lower = (size - 0.01).max(min);
    let upper = (size + 0.01).min(max);
    format!("{:.0}-{:.0}% portfolio", lower * 100.0, upper * 100.0)
}
