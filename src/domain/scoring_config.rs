//! Frozen scoring configuration: weight tables, thresholds and risk limits.
//!
//! Built once at startup (defaults, optionally overlaid with INI values) and
//! handed by reference to every scorer. Nothing mutates it afterwards.

use crate::domain::stats::WeightTable;
use crate::ports::config_port::ConfigPort;

pub const HYPE_COMPONENTS: [&str; 5] = [
    "media_velocity",
    "social_signal",
    "vc_buzz",
    "conference_presence",
    "search_trends",
];

pub const BUILD_COMPONENTS: [&str; 5] = [
    "revenue_indicators",
    "customer_logos",
    "patent_velocity",
    "talent_density",
    "product_milestones",
];

pub const COMPOSITE_COMPONENTS: [&str; 2] = ["hype", "build"];

pub const MOAT_COMPONENTS: [&str; 5] = [
    "regulatory_moat",
    "network_effects",
    "capital_intensity",
    "data_moat",
    "switching_costs",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Hype/build at or above this count as "high" for divergence.
    pub divergence_high: f64,
    /// Hype/build below this count as "low" for divergence.
    pub divergence_low: f64,
    pub high_momentum: f64,
    pub wave4_moat: f64,
    pub strong_moat: f64,
    pub medium_moat: f64,
    pub low_correlation: f64,
    pub high_dependency: f64,
    /// Momentum a company must strictly exceed to seed second-order plays.
    pub second_order_momentum: f64,
    pub high_conviction: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            divergence_high: 65.0,
            divergence_low: 45.0,
            high_momentum: 75.0,
            wave4_moat: 75.0,
            strong_moat: 60.0,
            medium_moat: 40.0,
            low_correlation: 0.40,
            high_dependency: 0.70,
            second_order_momentum: 70.0,
            high_conviction: 0.70,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskParams {
    pub base_position_size: f64,
    pub min_position_size: f64,
    pub max_position_size: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            base_position_size: 0.02,
            min_position_size: 0.01,
            max_position_size: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub hype_weights: WeightTable,
    pub build_weights: WeightTable,
    pub composite_weights: WeightTable,
    pub moat_weights: WeightTable,
    pub thresholds: Thresholds,
    pub risk: RiskParams,
}

fn table(names: &[&str], values: &[f64]) -> WeightTable {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hype_weights: table(&HYPE_COMPONENTS, &[0.25, 0.20, 0.30, 0.15, 0.10]),
            build_weights: table(&BUILD_COMPONENTS, &[0.30, 0.25, 0.15, 0.20, 0.10]),
            composite_weights: table(&COMPOSITE_COMPONENTS, &[0.40, 0.60]),
            moat_weights: table(&MOAT_COMPONENTS, &[0.30, 0.25, 0.20, 0.15, 0.10]),
            thresholds: Thresholds::default(),
            risk: RiskParams::default(),
        }
    }
}

impl ScoringConfig {
    /// Defaults overlaid with whatever the config source provides. Call
    /// [`validate_scoring_config`](crate::domain::config_validation::validate_scoring_config)
    /// first if the source is untrusted.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();

        let overlay = |section: &str, base: &WeightTable| -> WeightTable {
            base.iter()
                .map(|(name, weight)| (name.clone(), config.get_double(section, name, *weight)))
                .collect()
        };

        let t = &defaults.thresholds;
        let thresholds = Thresholds {
            divergence_high: config.get_double("thresholds", "divergence_high", t.divergence_high),
            divergence_low: config.get_double("thresholds", "divergence_low", t.divergence_low),
            high_momentum: config.get_double("thresholds", "high_momentum", t.high_momentum),
            wave4_moat: config.get_double("thresholds", "wave4_moat", t.wave4_moat),
            strong_moat: config.get_double("thresholds", "strong_moat", t.strong_moat),
            medium_moat: config.get_double("thresholds", "medium_moat", t.medium_moat),
            low_correlation: config.get_double("thresholds", "low_correlation", t.low_correlation),
            high_dependency: config.get_double("thresholds", "high_dependency", t.high_dependency),
            second_order_momentum: config.get_double(
                "thresholds",
                "second_order_momentum",
                t.second_order_momentum,
            ),
            high_conviction: config.get_double("thresholds", "high_conviction", t.high_conviction),
        };

        let r = &defaults.risk;
        let risk = RiskParams {
            base_position_size: config.get_double("risk", "base_position_size", r.base_position_size),
            min_position_size: config.get_double("risk", "min_position_size", r.min_position_size),
            max_position_size: config.get_double("risk", "max_position_size", r.max_position_size),
        };

        Self {
            hype_weights: overlay("weights.hype", &defaults.hype_weights),
            build_weights: overlay("weights.build", &defaults.build_weights),
            composite_weights: overlay("weights.composite", &defaults.composite_weights),
            moat_weights: overlay("weights.moat", &defaults.moat_weights),
            thresholds,
            risk,
        }
    }
}
