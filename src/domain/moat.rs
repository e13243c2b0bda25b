//! Competitive moat scoring across five dimensions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::company::{Company, Sector, WaveCategory};
use crate::domain::scoring_config::ScoringConfig;
use crate::domain::stats::{normalize, weighted_score};

/// Facts about a company's regulatory position that are not on the
/// [`Company`] record itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryContext {
    #[serde(default)]
    pub has_defense_contracts: bool,
    #[serde(default)]
    pub has_government_customers: bool,
    #[serde(default)]
    pub regulatory_approvals: u32,
    #[serde(default)]
    pub in_regulatory_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Durability {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Durability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Durability::Low => "Low",
            Durability::Medium => "Medium",
            Durability::High => "High",
            Durability::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoatScore {
    pub company_id: String,
    pub company_name: String,

    pub regulatory_moat: f64,
    pub network_effects: f64,
    pub capital_intensity: f64,
    pub data_moat: f64,
    pub switching_costs: f64,

    pub total_moat_score: f64,
    pub wave_potential: WaveCategory,
    pub durability_rating: Durability,

    pub as_of: NaiveDate,
}

pub struct MoatScorer<'a> {
    config: &'a ScoringConfig,
    as_of: NaiveDate,
}

impl<'a> MoatScorer<'a> {
    pub fn new(config: &'a ScoringConfig, as_of: NaiveDate) -> Self {
        Self { config, as_of }
    }

    pub fn score(&self, company: &Company, context: Option<&IndustryContext>) -> MoatScore {
        let default_context = IndustryContext::default();
        let context = context.unwrap_or(&default_context);

        let regulatory_moat = regulatory_moat(company, context);
        let network_effects = network_effects(company);
        let capital_intensity = capital_intensity(company);
        let data_moat = data_moat(company);
        let switching_costs = switching_costs(company);

        let total_moat_score = weighted_score(
            &[
                ("regulatory_moat", regulatory_moat),
                ("network_effects", network_effects),
                ("capital_intensity", capital_intensity),
                ("data_moat", data_moat),
                ("switching_costs", switching_costs),
            ],
            &self.config.moat_weights,
        );

        let wave_potential = self.classify_wave(total_moat_score, company.wave_category);
        let durability_rating = durability(total_moat_score);

        tracing::debug!(
            company = %company.name,
            moat = total_moat_score,
            wave = %wave_potential,
            "scored moat"
        );

        MoatScore {
            company_id: company.company_id.clone(),
            company_name: company.name.clone(),
            regulatory_moat,
            network_effects,
            capital_intensity,
            data_moat,
            switching_costs,
            total_moat_score,
            wave_potential,
            durability_rating,
            as_of: self.as_of,
        }
    }

    /// Score every company without industry context, strongest moat first.
    pub fn score_companies(&self, companies: &[Company]) -> Vec<MoatScore> {
        let mut scores: Vec<MoatScore> = companies.iter().map(|c| self.score(c, None)).collect();
        scores.sort_by(|a, b| b.total_moat_score.total_cmp(&a.total_moat_score));
        scores
    }

    pub fn classify_wave(&self, total: f64, current: WaveCategory) -> WaveCategory {
        let t = &self.config.thresholds;
        if total >= t.wave4_moat {
            WaveCategory::Wave4
        } else if total >= t.strong_moat {
            WaveCategory::Wave3
        } else if total >= t.medium_moat {
            WaveCategory::Wave2
        } else {
            current
        }
    }
}

pub fn durability(total: f64) -> Durability {
    if total >= 80.0 {
        Durability::VeryHigh
    } else if total >= 60.0 {
        Durability::High
    } else if total >= 40.0 {
        Durability::Medium
    } else {
        Durability::Low
    }
}

fn regulatory_moat(company: &Company, context: &IndustryContext) -> f64 {
    let base = match company.sector {
        Sector::SixG => 85.0,
        Sector::Quantum => 80.0,
        Sector::GreenEnergy => 75.0,
        Sector::BiotechInfra => 70.0,
        Sector::Cybersecurity => 60.0,
        Sector::Semiconductors => 55.0,
        Sector::AiInfra => 30.0,
        Sector::DataInfra => 25.0,
    };
    let government = if context.has_defense_contracts {
        15.0
    } else if context.has_government_customers {
        8.0
    } else {
        0.0
    };
    let approvals = f64::min(f64::from(context.regulatory_approvals) * 3.0, 15.0);
    f64::min(base + government + approvals, 100.0)
}

fn network_effects(company: &Company) -> f64 {
    let customers = normalize(f64::from(company.fortune_500_customers), 0.0, 100.0, 35.0);
    let sector = match company.sector {
        Sector::DataInfra => 25.0,
        Sector::AiInfra => 20.0,
        Sector::BiotechInfra | Sector::Cybersecurity | Sector::SixG => 15.0,
        Sector::Semiconductors | Sector::Quantum => 10.0,
        Sector::GreenEnergy => 5.0,
    };
    let funding = if company.total_funding > 500e6 {
        20.0
    } else if company.total_funding > 200e6 {
        15.0
    } else if company.total_funding > 100e6 {
        10.0
    } else {
        0.0
    };
    f64::min(20.0 + customers + sector + funding, 100.0)
}

fn capital_intensity(company: &Company) -> f64 {
    let base = match company.sector {
        Sector::Semiconductors => 95.0,
        Sector::Quantum => 90.0,
        Sector::SixG => 85.0,
        Sector::GreenEnergy => 80.0,
        Sector::AiInfra => 75.0,
        Sector::BiotechInfra => 50.0,
        Sector::DataInfra => 30.0,
        Sector::Cybersecurity => 25.0,
    };
    let funding = normalize(company.total_funding, 0.0, 1e9, 15.0);
    f64::min(base + funding, 100.0)
}

fn data_moat(company: &Company) -> f64 {
    let sector = match company.sector {
        Sector::AiInfra => 30.0,
        Sector::DataInfra | Sector::BiotechInfra => 25.0,
        Sector::Cybersecurity | Sector::Semiconductors => 20.0,
        Sector::SixG | Sector::Quantum => 15.0,
        Sector::GreenEnergy => 10.0,
    };
    let customers = normalize(f64::from(company.fortune_500_customers), 0.0, 100.0, 25.0);
    let patents = normalize(f64::from(company.patent_count), 0.0, 100.0, 20.0);
    f64::min(15.0 + sector + customers + patents, 100.0)
}

fn switching_costs(company: &Company) -> f64 {
    let sector = match company.sector {
        Sector::DataInfra | Sector::Semiconductors => 30.0,
        Sector::Cybersecurity | Sector::BiotechInfra | Sector::SixG => 25.0,
        Sector::AiInfra | Sector::GreenEnergy => 20.0,
        Sector::Quantum => 15.0,
    };
    let customers = normalize(f64::from(company.fortune_500_customers), 0.0, 100.0, 30.0);
    let funding = if company.total_funding > 300e6 {
        25.0
    } else if company.total_funding > 150e6 {
        15.0
    } else if company.total_funding > 75e6 {
        10.0
    } else {
        0.0
    };
    f64::min(20.0 + sector + customers + funding, 100.0)
}

pub fn filter_wave_4_candidates(scores: &[MoatScore]) -> Vec<&MoatScore> {
    scores
        .iter()
        .filter(|s| s.wave_potential == WaveCategory::Wave4)
        .collect()
}
