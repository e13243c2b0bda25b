//! Timing and catalyst prediction.
//!
//! Estimates when momentum turns into a tradeable event (IPO filing, M&A
//! exit, product launch, regulatory approval) from leading indicators on the
//! company record plus the current market context.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::company::{Company, Sector};
use crate::domain::error::ArbError;
use crate::domain::moat::IndustryContext;
use crate::domain::stats::round2;
use crate::ports::config_port::ConfigPort;

const CFO_HIRE_TO_IPO_DAYS: i64 = 270;
const PATENT_TO_PRODUCT_DAYS: i64 = 180;
const MA_HORIZON_DAYS: i64 = 540;
const IPO_CONFIDENCE_FLOOR: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpoWindow {
    Open,
    Mixed,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTrend {
    Falling,
    Neutral,
    Rising,
}

impl IpoWindow {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "mixed" => Some(Self::Mixed),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Mixed => "mixed",
            Self::Closed => "closed",
        }
    }
}

impl Volatility {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl RateTrend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "falling" => Some(Self::Falling),
            "neutral" => Some(Self::Neutral),
            "rising" => Some(Self::Rising),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Falling => "falling",
            Self::Neutral => "neutral",
            Self::Rising => "rising",
        }
    }
}

/// Macro backdrop for IPO timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConditions {
    pub ipo_window: IpoWindow,
    pub volatility: Volatility,
    pub interest_rates: RateTrend,
}

impl Default for MarketConditions {
    fn default() -> Self {
        Self {
            ipo_window: IpoWindow::Open,
            volatility: Volatility::Medium,
            interest_rates: RateTrend::Neutral,
        }
    }
}

impl MarketConditions {
    /// Read the `[market]` section; absent keys keep their defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ArbError> {
        fn read<T>(
            config: &dyn ConfigPort,
            key: &str,
            default: T,
            parse: fn(&str) -> Option<T>,
        ) -> Result<T, ArbError> {
            match config.get_string("market", key) {
                None => Ok(default),
                Some(v) => parse(&v).ok_or_else(|| ArbError::ConfigInvalid {
                    section: "market".into(),
                    key: key.into(),
                    reason: format!("unrecognised value '{v}'"),
                }),
            }
        }

        let defaults = Self::default();
        Ok(Self {
            ipo_window: read(config, "ipo_window", defaults.ipo_window, IpoWindow::parse)?,
            volatility: read(config, "volatility", defaults.volatility, Volatility::parse)?,
            interest_rates: read(
                config,
                "interest_rates",
                defaults.interest_rates,
                RateTrend::parse,
            )?,
        })
    }

    /// Probability multiplier for the current IPO window and volatility.
    pub fn window_multiplier(&self) -> f64 {
        match (self.ipo_window, self.volatility) {
            (IpoWindow::Open, Volatility::Low) => 1.2,
            (IpoWindow::Open, Volatility::Medium) => 1.0,
            (IpoWindow::Open, Volatility::High) => 0.7,
            (IpoWindow::Mixed, Volatility::Low) => 1.0,
            (IpoWindow::Mixed, Volatility::Medium) => 0.8,
            (IpoWindow::Mixed, Volatility::High) => 0.5,
            (IpoWindow::Closed, Volatility::Low) => 0.6,
            (IpoWindow::Closed, Volatility::Medium) => 0.4,
            (IpoWindow::Closed, Volatility::High) => 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalystKind {
    IpoFiling,
    MergerAcquisition,
    ProductLaunch,
    RegulatoryApproval,
}

impl fmt::Display for CatalystKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CatalystKind::IpoFiling => "ipo_filing",
            CatalystKind::MergerAcquisition => "merger_acquisition",
            CatalystKind::ProductLaunch => "product_launch",
            CatalystKind::RegulatoryApproval => "regulatory_approval",
        };
        f.write_str(s)
    }
}

/// A predicted investable event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalyst {
    pub kind: CatalystKind,
    /// Display label, e.g. "IPO Filing Expected" or "FDA Approval Expected".
    pub label: String,
    pub estimated_date: NaiveDate,
    pub confidence: f64,
    pub probability_6mo: f64,
    pub probability_12mo: f64,
    pub leading_indicators: Vec<String>,
    pub risk_factors: Vec<String>,
}

pub struct TimingPredictor {
    as_of: NaiveDate,
}

impl TimingPredictor {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn predict_ipo(&self, company: &Company, market: &MarketConditions) -> Catalyst {
        let base = (funding_stage_probability(company.total_funding)
            + self.cfo_hire_signal(company)
            + revenue_readiness(company))
            / 3.0;
        let adjusted = f64::min(base * market.window_multiplier(), 1.0);

        let estimated_date = self.estimate_ipo_date(company);
        let days_to_event = (estimated_date - self.as_of).num_days();
        let (p6, p12) = if days_to_event < 180 {
            (adjusted, f64::min(adjusted + 0.15, 0.95))
        } else if days_to_event < 365 {
            (adjusted * 0.5, adjusted)
        } else {
            (adjusted * 0.2, adjusted * 0.6)
        };

        Catalyst {
            kind: CatalystKind::IpoFiling,
            label: "IPO Filing Expected".to_string(),
            estimated_date,
            confidence: adjusted,
            probability_6mo: round2(p6),
            probability_12mo: round2(p12),
            leading_indicators: self.ipo_indicators(company),
            risk_factors: ipo_risks(company, market),
        }
    }

    /// Mid-stage companies only: too small to sell, too big to skip an IPO.
    pub fn predict_ma(&self, company: &Company) -> Option<Catalyst> {
        if company.total_funding <= 100e6 || company.total_funding > 500e6 {
            return None;
        }
        let mut probability = 0.35;
        if matches!(
            company.sector,
            Sector::Cybersecurity | Sector::DataInfra | Sector::BiotechInfra
        ) {
            probability += 0.15;
        }
        Some(Catalyst {
            kind: CatalystKind::MergerAcquisition,
            label: "M&A Exit Potential".to_string(),
            estimated_date: self.as_of + Duration::days(MA_HORIZON_DAYS),
            confidence: probability,
            probability_6mo: 0.10,
            probability_12mo: 0.25,
            leading_indicators: vec![
                "Strategic buyer interest in sector".to_string(),
                "Competitive consolidation pressure".to_string(),
            ],
            risk_factors: vec![
                "Market multiples compression".to_string(),
                "Antitrust scrutiny".to_string(),
            ],
        })
    }

    /// Launch expected about six months after the average recent grant.
    pub fn predict_product_launch(&self, company: &Company) -> Option<Catalyst> {
        let cutoff = self.as_of - Duration::days(180);
        let recent: Vec<NaiveDate> = company
            .patent_grants
            .iter()
            .filter(|p| p.grant_date > cutoff)
            .map(|p| p.grant_date)
            .collect();
        if recent.is_empty() {
            return None;
        }

        let total: i64 = recent.iter().map(|d| i64::from(d.num_days_from_ce())).sum();
        let mean = total.div_euclid(recent.len() as i64);
        let mean_date = i32::try_from(mean)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)?;

        Some(Catalyst {
            kind: CatalystKind::ProductLaunch,
            label: "Product Launch Expected".to_string(),
            estimated_date: mean_date + Duration::days(PATENT_TO_PRODUCT_DAYS),
            confidence: 0.60,
            probability_6mo: 0.70,
            probability_12mo: 0.90,
            leading_indicators: vec![
                format!("{} recent patent grants", recent.len()),
                "Technology development timeline".to_string(),
            ],
            risk_factors: vec![
                "Development delays".to_string(),
                "Regulatory approvals".to_string(),
            ],
        })
    }

    /// Only regulated sectors with a filing under review produce an approval.
    pub fn predict_regulatory(
        &self,
        company: &Company,
        context: Option<&IndustryContext>,
    ) -> Option<Catalyst> {
        let (agency, timeline_days) = match company.sector {
            Sector::BiotechInfra => ("FDA", 365),
            Sector::SixG => ("FCC", 180),
            Sector::GreenEnergy => ("DOE/FERC", 270),
            _ => return None,
        };
        if !context.is_some_and(|c| c.in_regulatory_review) {
            return None;
        }
        Some(Catalyst {
            kind: CatalystKind::RegulatoryApproval,
            label: format!("{agency} Approval Expected"),
            estimated_date: self.as_of + Duration::days(timeline_days),
            confidence: 0.65,
            probability_6mo: 0.40,
            probability_12mo: 0.75,
            leading_indicators: vec![
                "Regulatory filing submitted".to_string(),
                "Review process initiated".to_string(),
            ],
            risk_factors: vec![
                "Regulatory delays".to_string(),
                "Compliance issues".to_string(),
            ],
        })
    }

    /// Every candidate catalyst, earliest first. The IPO candidate is kept only
    /// above the confidence floor.
    pub fn all_catalysts(
        &self,
        company: &Company,
        market: &MarketConditions,
        context: Option<&IndustryContext>,
    ) -> Vec<Catalyst> {
        let mut catalysts = Vec::new();

        let ipo = self.predict_ipo(company, market);
        if ipo.confidence > IPO_CONFIDENCE_FLOOR {
            catalysts.push(ipo);
        }
        catalysts.extend(self.predict_ma(company));
        catalysts.extend(self.predict_product_launch(company));
        catalysts.extend(self.predict_regulatory(company, context));

        catalysts.sort_by_key(|c| c.estimated_date);
        catalysts
    }

    pub fn next_catalyst(
        &self,
        company: &Company,
        market: &MarketConditions,
        context: Option<&IndustryContext>,
    ) -> Option<Catalyst> {
        let next = self.all_catalysts(company, market, context).into_iter().next();
        if let Some(c) = &next {
            tracing::debug!(company = %company.name, catalyst = %c.label, date = %c.estimated_date, "next catalyst");
        }
        next
    }

    fn cfo_hire_signal(&self, company: &Company) -> f64 {
        let recent_start = self.as_of - Duration::days(270);
        let fading_start = self.as_of - Duration::days(540);
        let cfo_dates = || {
            company
                .executive_hires
                .iter()
                .filter(|h| h.is_cfo())
                .map(|h| h.date)
        };

        if cfo_dates().any(|d| d > recent_start && d < self.as_of) {
            0.85
        } else if cfo_dates().any(|d| d > fading_start && d < recent_start) {
            0.60
        } else {
            0.15
        }
    }

    fn estimate_ipo_date(&self, company: &Company) -> NaiveDate {
        if let Some(hire) = company.latest_cfo_hire() {
            let cfo_based = hire + Duration::days(CFO_HIRE_TO_IPO_DAYS);
            if cfo_based > self.as_of {
                return cfo_based;
            }
        }
        let days = if company.total_funding > 1e9 {
            540
        } else if company.total_funding > 500e6 {
            450
        } else if company.total_funding > 300e6 {
            730
        } else {
            365
        };
        self.as_of + Duration::days(days)
    }

    fn ipo_indicators(&self, company: &Company) -> Vec<String> {
        let mut indicators = Vec::new();
        let year_ago = self.as_of - Duration::days(365);
        if company
            .executive_hires
            .iter()
            .any(|h| h.is_cfo() && h.date > year_ago)
        {
            indicators.push("CFO hire within last 12 months".to_string());
        }
        if let Some(arr) = company.reported_arr().filter(|a| *a > 100e6) {
            indicators.push(format!("${:.0}M+ ARR scale", arr / 1e6));
        }
        if company.total_funding > 300e6 {
            indicators.push(format!(
                "${:.0}M raised (late-stage)",
                company.total_funding / 1e6
            ));
        }
        if company.fortune_500_customers > 50 {
            indicators.push(format!(
                "{} Fortune 500 customers",
                company.fortune_500_customers
            ));
        }
        indicators.push(format!("{} sector momentum", company.sector));
        indicators
    }
}

fn funding_stage_probability(total_funding: f64) -> f64 {
    if total_funding > 1e9 {
        0.75
    } else if total_funding > 500e6 {
        0.60
    } else if total_funding > 300e6 {
        0.45
    } else if total_funding > 150e6 {
        0.25
    } else {
        0.10
    }
}

fn revenue_readiness(company: &Company) -> f64 {
    let Some(arr) = company.reported_arr() else {
        return if company.total_funding > 500e6 { 0.60 } else { 0.20 };
    };
    if arr > 500e6 {
        0.90
    } else if arr > 200e6 {
        0.75
    } else if arr > 100e6 {
        0.60
    } else if arr > 50e6 {
        0.35
    } else {
        0.15
    }
}

fn ipo_risks(company: &Company, market: &MarketConditions) -> Vec<String> {
    let mut risks = Vec::new();
    if market.ipo_window == IpoWindow::Closed {
        risks.push("IPO market window closed".to_string());
    } else if market.volatility == Volatility::High {
        risks.push("High market volatility".to_string());
    }
    if market.interest_rates == RateTrend::Rising {
        risks.push("Rising interest rates (duration risk for unprofitable growth)".to_string());
    }
    if company.reported_arr().is_none_or(|arr| arr < 100e6) {
        risks.push("Revenue scale below typical IPO threshold".to_string());
    }
    if company.sector.is_capital_intensive() {
        risks.push("Capital-intensive business model (profitability scrutiny)".to_string());
    }
    if company.fortune_500_customers < 20 {
        risks.push("Limited customer diversification".to_string());
    }
    risks
}
