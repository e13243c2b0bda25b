//! Company records consumed by the scoring pipeline.
//!
//! Companies arrive already validated from a [`CompanyPort`](crate::ports::company_port::CompanyPort);
//! the scorers never reject a record, they only read it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Technology sector classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "AI_Infra")]
    AiInfra,
    #[serde(rename = "Data_Infra")]
    DataInfra,
    #[serde(rename = "Semiconductors")]
    Semiconductors,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Quantum")]
    Quantum,
    #[serde(rename = "6G")]
    SixG,
    #[serde(rename = "Green_Energy")]
    GreenEnergy,
    #[serde(rename = "Biotech_Infra")]
    BiotechInfra,
}

impl Sector {
    pub const ALL: [Sector; 8] = [
        Sector::AiInfra,
        Sector::DataInfra,
        Sector::Semiconductors,
        Sector::Cybersecurity,
        Sector::Quantum,
        Sector::SixG,
        Sector::GreenEnergy,
        Sector::BiotechInfra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::AiInfra => "AI_Infra",
            Sector::DataInfra => "Data_Infra",
            Sector::Semiconductors => "Semiconductors",
            Sector::Cybersecurity => "Cybersecurity",
            Sector::Quantum => "Quantum",
            Sector::SixG => "6G",
            Sector::GreenEnergy => "Green_Energy",
            Sector::BiotechInfra => "Biotech_Infra",
        }
    }

    /// Sectors whose business model needs heavy up-front capital (fabs,
    /// cryogenics, spectrum, generation assets).
    pub fn is_capital_intensive(&self) -> bool {
        matches!(
            self,
            Sector::Semiconductors | Sector::Quantum | Sector::SixG | Sector::GreenEnergy
        )
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Competitive maturity stage: Replace, Arbitrage, Embed, Own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaveCategory {
    Wave1,
    Wave2,
    Wave3,
    Wave4,
}

impl fmt::Display for WaveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WaveCategory::Wave1 => "Wave1",
            WaveCategory::Wave2 => "Wave2",
            WaveCategory::Wave3 => "Wave3",
            WaveCategory::Wave4 => "Wave4",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub date: NaiveDate,
    pub amount: f64,
    pub lead_investor: String,
    #[serde(default)]
    pub valuation: Option<f64>,
    pub round_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentGrant {
    pub grant_date: NaiveDate,
    pub patent_id: String,
    pub title: String,
    pub citation_count: u32,
    pub technology_cluster: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveHire {
    pub date: NaiveDate,
    pub role: String,
    pub name: String,
    pub previous_company: String,
    #[serde(default)]
    pub is_ipo_signal: bool,
}

impl ExecutiveHire {
    /// True for finance-chief hires, the classic pre-IPO tell.
    pub fn is_cfo(&self) -> bool {
        let role = self.role.to_uppercase();
        role.contains("CFO") || role.contains("CHIEF FINANCIAL")
    }
}

/// A listed security whose price tracks the private company's fortunes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProxy {
    pub ticker: String,
    pub exposure_type: String,
    pub correlation_score: f64,
    #[serde(default)]
    pub revenue_exposure_pct: Option<f64>,
}

/// A private technology company.
///
/// `engineer_pct` and `faang_talent_pct` are percentages (0..100); the two
/// IPO probabilities are fractions (0..1). Funding rounds, patent grants and
/// hires are stored in no particular order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_id: String,
    pub name: String,
    pub sector: Sector,
    pub wave_category: WaveCategory,
    #[serde(default)]
    pub bottleneck_solved: String,

    #[serde(default)]
    pub funding_rounds: Vec<FundingRound>,
    pub total_funding: f64,
    #[serde(default)]
    pub last_valuation: Option<f64>,

    #[serde(default)]
    pub patent_grants: Vec<PatentGrant>,
    #[serde(default)]
    pub patent_count: u32,

    #[serde(default)]
    pub executive_hires: Vec<ExecutiveHire>,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub engineer_pct: f64,
    #[serde(default)]
    pub faang_talent_pct: f64,

    #[serde(default)]
    pub public_proxies: Vec<PublicProxy>,
    #[serde(default)]
    pub fortune_500_customers: u32,
    #[serde(default)]
    pub estimated_arr: Option<f64>,

    #[serde(default)]
    pub ipo_probability_6mo: f64,
    #[serde(default)]
    pub ipo_probability_12mo: f64,
    #[serde(default)]
    pub expected_ipo_date: Option<NaiveDate>,

    pub founded_date: NaiveDate,
    #[serde(default)]
    pub headquarters: String,
    #[serde(default)]
    pub website: String,
}

impl Company {
    /// Minimal record with every optional attribute at its zero value.
    pub fn new(name: &str, sector: Sector, wave_category: WaveCategory, founded: NaiveDate) -> Self {
        Self {
            company_id: company_id_for(name),
            name: name.to_string(),
            sector,
            wave_category,
            bottleneck_solved: String::new(),
            funding_rounds: Vec::new(),
            total_funding: 0.0,
            last_valuation: None,
            patent_grants: Vec::new(),
            patent_count: 0,
            executive_hires: Vec::new(),
            employee_count: 0,
            engineer_pct: 0.0,
            faang_talent_pct: 0.0,
            public_proxies: Vec::new(),
            fortune_500_customers: 0,
            estimated_arr: None,
            ipo_probability_6mo: 0.0,
            ipo_probability_12mo: 0.0,
            expected_ipo_date: None,
            founded_date: founded,
            headquarters: String::new(),
            website: String::new(),
        }
    }

    /// ARR if reported and non-zero. A zero estimate carries no information.
    pub fn reported_arr(&self) -> Option<f64> {
        self.estimated_arr.filter(|arr| *arr > 0.0)
    }

    /// Date of the most recent CFO-titled hire, if any.
    pub fn latest_cfo_hire(&self) -> Option<NaiveDate> {
        self.executive_hires
            .iter()
            .filter(|h| h.is_cfo())
            .map(|h| h.date)
            .max()
    }
}

/// Deterministic id derived from a company name: lowercase ASCII
/// alphanumerics joined by single dashes.
pub fn company_id_for(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    id
}
