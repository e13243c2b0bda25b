//! Trade signal generation.
//!
//! Combines a company's momentum score, moat score and next catalyst into a
//! ranked, sized recommendation with three exposure routes: a listed proxy,
//! pre-IPO secondary access, and a synthetic basket.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::catalyst::Catalyst;
use crate::domain::company::{Company, Sector};
use crate::domain::error::ArbError;
use crate::domain::moat::MoatScore;
use crate::domain::momentum::{DivergenceFlag, MomentumScore};
use crate::domain::scoring_config::ScoringConfig;
use crate::domain::stats::position_size_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    Fade,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG_BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
            Recommendation::Fade => "FADE",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 0.8,
            RiskLevel::High => 0.6,
            RiskLevel::VeryHigh => 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub rank: usize,
    pub company: String,
    pub company_id: String,
    pub sector: Sector,

    pub momentum_score: f64,
    pub momentum_change_7d: f64,
    pub hype_score: f64,
    pub build_score: f64,
    pub moat_score: f64,

    pub public_proxy: Option<String>,
    pub pre_ipo_access: Option<String>,
    pub synthetic_exposure: Option<String>,

    pub recommendation: Recommendation,
    pub conviction: f64,
    pub risk_level: RiskLevel,
    pub position_size: String,

    pub next_catalyst: Option<String>,
    pub catalyst_date: Option<NaiveDate>,
    pub entry_timing: String,

    pub risk_factors: Vec<String>,
    pub expected_return: String,
    pub time_horizon: String,

    pub generated_on: NaiveDate,
}

pub struct SignalGenerator<'a> {
    config: &'a ScoringConfig,
    as_of: NaiveDate,
}

impl<'a> SignalGenerator<'a> {
    pub fn new(config: &'a ScoringConfig, as_of: NaiveDate) -> Self {
        Self { config, as_of }
    }

    pub fn generate(
        &self,
        rank: usize,
        company: &Company,
        momentum: &MomentumScore,
        moat: &MoatScore,
        catalyst: Option<&Catalyst>,
    ) -> TradeSignal {
        let high_momentum = self.config.thresholds.high_momentum;
        let conviction = conviction(momentum, moat, catalyst);
        let risk_level = assess_risk_level(company, moat);
        let risk = &self.config.risk;
        let position_size = position_size_range(
            conviction,
            risk_level.multiplier(),
            risk.base_position_size,
            risk.min_position_size,
            risk.max_position_size,
        );

        TradeSignal {
            rank,
            company: company.name.clone(),
            company_id: company.company_id.clone(),
            sector: company.sector,
            momentum_score: momentum.momentum_score,
            momentum_change_7d: momentum.momentum_change_7d,
            hype_score: momentum.hype_score,
            build_score: momentum.build_score,
            moat_score: moat.total_moat_score,
            public_proxy: Some(public_proxy(company)),
            pre_ipo_access: pre_ipo_access(company),
            synthetic_exposure: Some(synthetic_exposure(company.sector).to_string()),
            recommendation: recommend(momentum, moat, high_momentum),
            conviction,
            risk_level,
            position_size,
            next_catalyst: catalyst.map(|c| c.label.clone()),
            catalyst_date: catalyst.map(|c| c.estimated_date),
            entry_timing: entry_timing(momentum, catalyst, high_momentum),
            risk_factors: risk_factors(company, momentum, moat),
            expected_return: expected_return(momentum, moat, catalyst, high_momentum).to_string(),
            time_horizon: self.time_horizon(catalyst).to_string(),
            generated_on: self.as_of,
        }
    }

    /// One signal per company, ranked by conviction (stable, so equal
    /// convictions keep input order). Scores are joined to companies by id
    /// and catalysts are looked up by id.
    pub fn generate_batch(
        &self,
        companies: &[Company],
        momentum: &[MomentumScore],
        moat: &[MoatScore],
        catalysts: &HashMap<String, Catalyst>,
    ) -> Result<Vec<TradeSignal>, ArbError> {
        if companies.len() != momentum.len() || companies.len() != moat.len() {
            return Err(ArbError::MisalignedBatch {
                companies: companies.len(),
                momentum: momentum.len(),
                moat: moat.len(),
            });
        }

        let momentum_by_id: HashMap<&str, &MomentumScore> = momentum
            .iter()
            .map(|s| (s.company_id.as_str(), s))
            .collect();
        let moat_by_id: HashMap<&str, &MoatScore> =
            moat.iter().map(|s| (s.company_id.as_str(), s)).collect();

        let mut signals = Vec::with_capacity(companies.len());
        for (i, company) in companies.iter().enumerate() {
            let id = company.company_id.as_str();
            let m = momentum_by_id
                .get(id)
                .ok_or_else(|| missing(id, "momentum"))?;
            let w = moat_by_id.get(id).ok_or_else(|| missing(id, "moat"))?;
            signals.push(self.generate(i + 1, company, m, w, catalysts.get(id)));
        }

        signals.sort_by(|a, b| b.conviction.total_cmp(&a.conviction));
        for (i, signal) in signals.iter_mut().enumerate() {
            signal.rank = i + 1;
        }

        tracing::info!(signals = signals.len(), "trade signals generated");
        Ok(signals)
    }

    fn time_horizon(&self, catalyst: Option<&Catalyst>) -> &'static str {
        let Some(c) = catalyst else {
            return "18-36 months (long-term hold)";
        };
        let days = (c.estimated_date - self.as_of).num_days();
        if days < 180 {
            "3-6 months (near-term catalyst)"
        } else if days < 365 {
            "6-12 months (medium-term)"
        } else if days < 730 {
            "12-24 months (long-term)"
        } else {
            "24+ months (very long-term)"
        }
    }
}

fn missing(company_id: &str, kind: &str) -> ArbError {
    ArbError::MissingScore {
        company_id: company_id.to_string(),
        kind: kind.to_string(),
    }
}

/// First matching rule wins. `high_momentum` is the score a company must
/// strictly exceed to earn a BUY on momentum alone.
pub fn recommend(momentum: &MomentumScore, moat: &MoatScore, high_momentum: f64) -> Recommendation {
    let flag = momentum.divergence_flag;
    if flag == DivergenceFlag::ConfirmedMomentum && moat.total_moat_score > 70.0 {
        Recommendation::StrongBuy
    } else if flag == DivergenceFlag::MispricedOpportunity {
        Recommendation::Buy
    } else if momentum.momentum_score > high_momentum && moat.total_moat_score > 55.0 {
        Recommendation::Buy
    } else if flag == DivergenceFlag::BubbleRisk {
        Recommendation::Fade
    } else if momentum.momentum_score > 50.0 {
        Recommendation::Hold
    } else {
        Recommendation::Sell
    }
}

pub fn conviction(momentum: &MomentumScore, moat: &MoatScore, catalyst: Option<&Catalyst>) -> f64 {
    let base = momentum.momentum_score / 100.0;
    let moat_adjustment = (moat.total_moat_score - 50.0) / 500.0;
    let catalyst_boost = if catalyst.is_some_and(|c| c.probability_6mo > 0.50) {
        0.10
    } else {
        0.0
    };
    let divergence_adjustment = match momentum.divergence_flag {
        DivergenceFlag::ConfirmedMomentum => 0.10,
        DivergenceFlag::MispricedOpportunity => 0.15,
        DivergenceFlag::BubbleRisk => -0.25,
        DivergenceFlag::NoSignal => -0.10,
    };
    (base + moat_adjustment + catalyst_boost + divergence_adjustment).clamp(0.0, 1.0)
}

/// Highest-correlation listed proxy, else the sector ETF.
pub fn public_proxy(company: &Company) -> String {
    let best = company.public_proxies.iter().reduce(|best, p| {
        if p.correlation_score > best.correlation_score {
            p
        } else {
            best
        }
    });
    match best {
        Some(p) => format!(
            "{} ({}, correlation {:.2})",
            p.ticker, p.exposure_type, p.correlation_score
        ),
        None => sector_etf(company.sector).to_string(),
    }
}

pub fn sector_etf(sector: Sector) -> &'static str {
    match sector {
        Sector::AiInfra => "SKYY (Cloud Computing ETF) or WCLD",
        Sector::Semiconductors => "SMH (Semiconductor ETF) or SOXX",
        Sector::Cybersecurity => "HACK (Cybersecurity ETF) or CIBR",
        Sector::DataInfra => "SKYY (Cloud Computing ETF)",
        Sector::GreenEnergy => "ICLN (Clean Energy ETF) or TAN (Solar)",
        Sector::SixG => "ARKF (Fintech/Telecom) or IYZ (Telecom)",
        Sector::Quantum => "QTUM (Quantum Computing ETF)",
        Sector::BiotechInfra => "XBI (Biotech ETF) or IBB",
    }
}

/// Secondary-market access for late-stage names likely to list within a year.
pub fn pre_ipo_access(company: &Company) -> Option<String> {
    if company.ipo_probability_12mo <= 0.50 || company.total_funding <= 300e6 {
        return None;
    }
    let valuation = match company.last_valuation {
        Some(v) => format!("estimated valuation ${:.0}M", v / 1e6),
        None => "valuation undisclosed".to_string(),
    };
    Some(format!("Secondary market access (Forge/EquityZen), {valuation}"))
}

pub fn synthetic_exposure(sector: Sector) -> &'static str {
    match sector {
        Sector::AiInfra => "Custom basket: 40% NVDA, 30% AVGO, 20% ANET, 10% VRT (cooling exposure)",
        Sector::Semiconductors => "Custom basket: 30% ASML, 25% AMAT, 25% LRCX, 20% ENTG",
        Sector::SixG => "Custom basket: 35% QRVO, 35% SWKS, 30% GLW",
        Sector::Cybersecurity => "HACK ETF or custom basket: 25% PANW, 25% CRWD, 25% ZS, 25% FTNT",
        Sector::GreenEnergy => "Custom basket: 40% FLNC, 30% ENPH, 30% MP (rare earths)",
        Sector::Quantum => "Custom basket: 40% KEYS, 30% OXIG.L, 30% QTUM (quantum supply chain)",
        Sector::DataInfra | Sector::BiotechInfra => "QQQ call spreads (tech proxy)",
    }
}

pub fn assess_risk_level(company: &Company, moat: &MoatScore) -> RiskLevel {
    if moat.total_moat_score > 70.0 {
        RiskLevel::Low
    } else if moat.total_moat_score > 50.0 && company.total_funding > 300e6 {
        RiskLevel::Medium
    } else if company.sector.is_capital_intensive() || company.total_funding < 150e6 {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

fn entry_timing(momentum: &MomentumScore, catalyst: Option<&Catalyst>, high_momentum: f64) -> String {
    let score = momentum.momentum_score;
    if score > high_momentum && catalyst.is_some_and(|c| c.probability_6mo > 0.50) {
        return "Immediate (catalyst within 6 months)".to_string();
    }
    if momentum.divergence_flag == DivergenceFlag::MispricedOpportunity {
        return "Immediate (mispriced execution momentum)".to_string();
    }
    if score > high_momentum {
        return "Immediate".to_string();
    }
    if score > 55.0 {
        return "Staged entry (build position over 30-60 days)".to_string();
    }
    match catalyst {
        Some(c) => format!(
            "Wait for catalyst (monitor until {})",
            c.estimated_date.format("%Y-%m")
        ),
        None => "Monitor (no immediate entry)".to_string(),
    }
}

fn risk_factors(company: &Company, momentum: &MomentumScore, moat: &MoatScore) -> Vec<String> {
    let mut risks = Vec::new();
    if momentum.divergence_flag == DivergenceFlag::BubbleRisk {
        risks.push("Bubble risk: High hype relative to execution");
    }
    if moat.total_moat_score < 40.0 {
        risks.push("Weak competitive moat (susceptible to competition)");
    }
    if company.fortune_500_customers < 10 {
        risks.push("Limited customer diversification");
    }
    if company.total_funding < 200e6 {
        risks.push("Requires additional funding rounds (dilution risk)");
    }
    if company.sector.is_capital_intensive() {
        risks.push("Capital-intensive model (high burn rate)");
    }
    if company.ipo_probability_12mo > 0.60 {
        risks.push("IPO window dependency (market conditions)");
    }
    match company.sector {
        Sector::Quantum => risks.push("Technology commercialization timeline uncertain"),
        Sector::BiotechInfra => risks.push("Regulatory approval timelines"),
        _ => {}
    }
    risks.into_iter().map(String::from).collect()
}

fn expected_return(
    momentum: &MomentumScore,
    moat: &MoatScore,
    catalyst: Option<&Catalyst>,
    high_momentum: f64,
) -> &'static str {
    let score = momentum.momentum_score;
    if score > 85.0
        && moat.total_moat_score > 70.0
        && catalyst.is_some_and(|c| c.probability_6mo > 0.60)
    {
        "50-100% (12-18 months)"
    } else if score > high_momentum && catalyst.is_some() {
        "30-60% (12 months)"
    } else if momentum.divergence_flag == DivergenceFlag::MispricedOpportunity {
        "40-80% (18-24 months, mispricing corrects)"
    } else if score > 60.0 {
        "20-40% (12-18 months)"
    } else {
        "10-25% (18-24 months)"
    }
}

pub fn filter_by_recommendation(
    signals: &[TradeSignal],
    recommendation: Recommendation,
) -> Vec<&TradeSignal> {
    signals
        .iter()
        .filter(|s| s.recommendation == recommendation)
        .collect()
}

pub fn filter_high_conviction(signals: &[TradeSignal], threshold: f64) -> Vec<&TradeSignal> {
    signals.iter().filter(|s| s.conviction >= threshold).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalyst::CatalystKind;
    use crate::domain::company::{PublicProxy, WaveCategory};
    use crate::domain::moat::MoatScorer;
    use crate::domain::momentum::MomentumScorer;
    use approx::assert_relative_eq;
    use chrono::Duration;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn as_of() -> NaiveDate {
        date("2025-01-01")
    }

    fn company(name: &str, sector: Sector) -> Company {
        Company::new(name, sector, WaveCategory::Wave2, date("2019-01-01"))
    }

    fn momentum_for(c: &Company, score: f64, flag: DivergenceFlag) -> MomentumScore {
        let cfg = ScoringConfig::default();
        let mut m = MomentumScorer::new(&cfg, as_of()).score(c, None);
        m.momentum_score = score;
        m.divergence_flag = flag;
        m
    }

    fn moat_for(c: &Company, total: f64) -> MoatScore {
        let cfg = ScoringConfig::default();
        let mut w = MoatScorer::new(&cfg, as_of()).score(c, None);
        w.total_moat_score = total;
        w
    }

    fn catalyst(days_out: i64, p6: f64) -> Catalyst {
        Catalyst {
            kind: CatalystKind::IpoFiling,
            label: "IPO Filing Expected".into(),
            estimated_date: as_of() + Duration::days(days_out),
            confidence: 0.7,
            probability_6mo: p6,
            probability_12mo: 0.8,
            leading_indicators: vec![],
            risk_factors: vec![],
        }
    }

    mod recommendation_tests {
        use super::*;

        #[test]
        fn decision_tree_order() {
            let c = company("Acme", Sector::AiInfra);
            let r = |score, flag, moat| recommend(&momentum_for(&c, score, flag), &moat_for(&c, moat), 75.0);
            assert_eq!(r(80.0, DivergenceFlag::ConfirmedMomentum, 71.0), Recommendation::StrongBuy);
            assert_eq!(r(80.0, DivergenceFlag::ConfirmedMomentum, 70.0), Recommendation::Buy);
            assert_eq!(r(30.0, DivergenceFlag::MispricedOpportunity, 10.0), Recommendation::Buy);
            assert_eq!(r(80.0, DivergenceFlag::BubbleRisk, 60.0), Recommendation::Buy);
            assert_eq!(r(80.0, DivergenceFlag::BubbleRisk, 50.0), Recommendation::Fade);
            assert_eq!(r(51.0, DivergenceFlag::NoSignal, 50.0), Recommendation::Hold);
            assert_eq!(r(50.0, DivergenceFlag::NoSignal, 50.0), Recommendation::Sell);
        }
    }

    mod conviction_tests {
        use super::*;

        #[test]
        fn adversarial_bubble_clamps_to_085() {
            let c = company("Acme", Sector::AiInfra);
            let v = conviction(
                &momentum_for(&c, 100.0, DivergenceFlag::BubbleRisk),
                &moat_for(&c, 100.0),
                None,
            );
            assert_relative_eq!(v, 0.85, epsilon = 1e-12);
        }

        #[test]
        fn catalyst_boost_needs_p6_above_half() {
            let c = company("Acme", Sector::AiInfra);
            let m = momentum_for(&c, 60.0, DivergenceFlag::NoSignal);
            let w = moat_for(&c, 50.0);
            assert_relative_eq!(conviction(&m, &w, None), 0.50, epsilon = 1e-12);
            assert_relative_eq!(
                conviction(&m, &w, Some(&catalyst(90, 0.50))),
                0.50,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                conviction(&m, &w, Some(&catalyst(90, 0.51))),
                0.60,
                epsilon = 1e-12
            );
        }

        #[test]
        fn floor_at_zero() {
            let c = company("Acme", Sector::AiInfra);
            let v = conviction(
                &momentum_for(&c, 5.0, DivergenceFlag::BubbleRisk),
                &moat_for(&c, 0.0),
                None,
            );
            assert_eq!(v, 0.0);
        }
    }

    mod exposure_tests {
        use super::*;

        fn proxy(ticker: &str, corr: f64) -> PublicProxy {
            PublicProxy {
                ticker: ticker.into(),
                exposure_type: "Customer".into(),
                correlation_score: corr,
                revenue_exposure_pct: None,
            }
        }

        #[test]
        fn best_proxy_first_wins_ties() {
            let mut c = company("Acme", Sector::AiInfra);
            c.public_proxies = vec![proxy("MSFT", 0.4), proxy("NVDA", 0.72), proxy("AMD", 0.72)];
            assert_eq!(public_proxy(&c), "NVDA (Customer, correlation 0.72)");
        }

        #[test]
        fn sector_etf_fallback() {
            assert_eq!(
                public_proxy(&company("Q", Sector::Quantum)),
                "QTUM (Quantum Computing ETF)"
            );
            assert_eq!(
                public_proxy(&company("B", Sector::BiotechInfra)),
                "XBI (Biotech ETF) or IBB"
            );
        }

        #[test]
        fn pre_ipo_needs_probability_and_scale() {
            let mut c = company("Acme", Sector::AiInfra);
            c.ipo_probability_12mo = 0.65;
            c.total_funding = 400e6;
            c.last_valuation = Some(4.2e9);
            assert_eq!(
                pre_ipo_access(&c).as_deref(),
                Some("Secondary market access (Forge/EquityZen), estimated valuation $4200M")
            );
            c.last_valuation = None;
            assert!(pre_ipo_access(&c).unwrap().ends_with("valuation undisclosed"));
            c.total_funding = 300e6;
            assert!(pre_ipo_access(&c).is_none());
            c.total_funding = 400e6;
            c.ipo_probability_12mo = 0.50;
            assert!(pre_ipo_access(&c).is_none());
        }

        #[test]
        fn baskets_by_sector() {
            assert!(synthetic_exposure(Sector::SixG).contains("QRVO"));
            assert_eq!(
                synthetic_exposure(Sector::DataInfra),
                "QQQ call spreads (tech proxy)"
            );
        }
    }

    mod sizing_tests {
        use super::*;

        #[test]
        fn risk_levels() {
            let mut c = company("Acme", Sector::Semiconductors);
            c.total_funding = 400e6;
            assert_eq!(assess_risk_level(&c, &moat_for(&c, 71.0)), RiskLevel::Low);
            assert_eq!(assess_risk_level(&c, &moat_for(&c, 55.0)), RiskLevel::Medium);
            assert_eq!(assess_risk_level(&c, &moat_for(&c, 45.0)), RiskLevel::High);
            let mut saas = company("Beta", Sector::Cybersecurity);
            saas.total_funding = 100e6;
            assert_eq!(assess_risk_level(&saas, &moat_for(&saas, 45.0)), RiskLevel::High);
            saas.total_funding = 200e6;
            assert_eq!(assess_risk_level(&saas, &moat_for(&saas, 45.0)), RiskLevel::Medium);
        }

        #[test]
        fn position_band_from_conviction_and_risk() {
            let cfg = ScoringConfig::default();
            let generator = SignalGenerator::new(&cfg, as_of());
            let mut c = company("Acme", Sector::Cybersecurity);
            c.total_funding = 600e6;
            // conviction .80 + (80-50)/500 + .10 = .96 -> clamp .96, Low risk
            // size = .02 + .96*.03 = .0488 -> 3.88%..5%
            let s = generator.generate(
                1,
                &c,
                &momentum_for(&c, 80.0, DivergenceFlag::ConfirmedMomentum),
                &moat_for(&c, 80.0),
                None,
            );
            assert_eq!(s.risk_level, RiskLevel::Low);
            assert_eq!(s.position_size, "4-5% portfolio");
        }
    }

    mod timing_tests {
        use super::*;

        #[test]
        fn entry_timing_rules() {
            let c = company("Acme", Sector::AiInfra);
            let m = |score, flag| momentum_for(&c, score, flag);
            let near = catalyst(100, 0.6);
            assert_eq!(
                entry_timing(&m(80.0, DivergenceFlag::NoSignal), Some(&near), 75.0),
                "Immediate (catalyst within 6 months)"
            );
            assert_eq!(
                entry_timing(&m(40.0, DivergenceFlag::MispricedOpportunity), None, 75.0),
                "Immediate (mispriced execution momentum)"
            );
            assert_eq!(entry_timing(&m(80.0, DivergenceFlag::NoSignal), None, 75.0), "Immediate");
            assert_eq!(
                entry_timing(&m(60.0, DivergenceFlag::NoSignal), None, 75.0),
                "Staged entry (build position over 30-60 days)"
            );
            assert_eq!(
                entry_timing(&m(40.0, DivergenceFlag::NoSignal), Some(&catalyst(300, 0.2)), 75.0),
                "Wait for catalyst (monitor until 2025-10)"
            );
            assert_eq!(
                entry_timing(&m(40.0, DivergenceFlag::NoSignal), None, 75.0),
                "Monitor (no immediate entry)"
            );
        }

        #[test]
        fn time_horizon_buckets() {
            let cfg = ScoringConfig::default();
            let g = SignalGenerator::new(&cfg, as_of());
            assert_eq!(g.time_horizon(None), "18-36 months (long-term hold)");
            assert_eq!(g.time_horizon(Some(&catalyst(179, 0.1))), "3-6 months (near-term catalyst)");
            assert_eq!(g.time_horizon(Some(&catalyst(180, 0.1))), "6-12 months (medium-term)");
            assert_eq!(g.time_horizon(Some(&catalyst(500, 0.1))), "12-24 months (long-term)");
            assert_eq!(g.time_horizon(Some(&catalyst(730, 0.1))), "24+ months (very long-term)");
        }

        #[test]
        fn expected_return_rules() {
            let c = company("Acme", Sector::AiInfra);
            let m = |score, flag| momentum_for(&c, score, flag);
            assert_eq!(
                expected_return(
                    &m(90.0, DivergenceFlag::ConfirmedMomentum),
                    &moat_for(&c, 75.0),
                    Some(&catalyst(90, 0.7)),
                    75.0
                ),
                "50-100% (12-18 months)"
            );
            assert_eq!(
                expected_return(&m(80.0, DivergenceFlag::NoSignal), &moat_for(&c, 40.0), Some(&catalyst(90, 0.1)), 75.0),
                "30-60% (12 months)"
            );
            assert_eq!(
                expected_return(&m(40.0, DivergenceFlag::MispricedOpportunity), &moat_for(&c, 40.0), None, 75.0),
                "40-80% (18-24 months, mispricing corrects)"
            );
            assert_eq!(
                expected_return(&m(40.0, DivergenceFlag::NoSignal), &moat_for(&c, 40.0), None, 75.0),
                "10-25% (18-24 months)"
            );
        }

        #[test]
        fn high_momentum_threshold_comes_from_config() {
            let c = company("Acme", Sector::AiInfra);
            let m = momentum_for(&c, 70.0, DivergenceFlag::NoSignal);
            let w = moat_for(&c, 60.0);

            let defaults = ScoringConfig::default();
            let s = SignalGenerator::new(&defaults, as_of()).generate(1, &c, &m, &w, None);
            assert_eq!(s.recommendation, Recommendation::Hold);
            assert_eq!(s.entry_timing, "Staged entry (build position over 30-60 days)");

            let mut lowered = ScoringConfig::default();
            lowered.thresholds.high_momentum = 65.0;
            let s = SignalGenerator::new(&lowered, as_of()).generate(1, &c, &m, &w, None);
            assert_eq!(s.recommendation, Recommendation::Buy);
            assert_eq!(s.entry_timing, "Immediate");
        }

        #[test]
        fn risk_factor_list() {
            let mut c = company("Qbit", Sector::Quantum);
            c.ipo_probability_12mo = 0.7;
            let risks = risk_factors(
                &c,
                &momentum_for(&c, 70.0, DivergenceFlag::BubbleRisk),
                &moat_for(&c, 30.0),
            );
            assert_eq!(
                risks,
                vec![
                    "Bubble risk: High hype relative to execution",
                    "Weak competitive moat (susceptible to competition)",
                    "Limited customer diversification",
                    "Requires additional funding rounds (dilution risk)",
                    "Capital-intensive model (high burn rate)",
                    "IPO window dependency (market conditions)",
                    "Technology commercialization timeline uncertain",
                ]
            );
        }
    }

    mod batch_tests {
        use super::*;

        fn batch(n: usize) -> Vec<Company> {
            (0..n)
                .map(|i| company(&format!("Co {i}"), Sector::ALL[i % Sector::ALL.len()]))
                .collect()
        }

        #[test]
        fn misaligned_lengths_fail_fast() {
            let cfg = ScoringConfig::default();
            let companies = batch(3);
            let momentum: Vec<_> = companies
                .iter()
                .take(2)
                .map(|c| momentum_for(c, 50.0, DivergenceFlag::NoSignal))
                .collect();
            let moat: Vec<_> = companies.iter().map(|c| moat_for(c, 50.0)).collect();
            let result = SignalGenerator::new(&cfg, as_of()).generate_batch(
                &companies,
                &momentum,
                &moat,
                &HashMap::new(),
            );
            assert!(matches!(
                result,
                Err(ArbError::MisalignedBatch {
                    companies: 3,
                    momentum: 2,
                    moat: 3
                })
            ));
        }

        #[test]
        fn unknown_id_is_missing_score() {
            let cfg = ScoringConfig::default();
            let companies = batch(2);
            let momentum: Vec<_> = companies
                .iter()
                .map(|c| momentum_for(c, 50.0, DivergenceFlag::NoSignal))
                .collect();
            let mut moat: Vec<_> = companies.iter().map(|c| moat_for(c, 50.0)).collect();
            moat[1].company_id = "someone-else".into();
            let err = SignalGenerator::new(&cfg, as_of())
                .generate_batch(&companies, &momentum, &moat, &HashMap::new())
                .unwrap_err();
            assert!(matches!(err, ArbError::MissingScore { ref kind, .. } if kind == "moat"));
        }

        #[test]
        fn joins_by_id_regardless_of_score_order() {
            let cfg = ScoringConfig::default();
            let companies = batch(3);
            let mut momentum: Vec<_> = companies
                .iter()
                .enumerate()
                .map(|(i, c)| momentum_for(c, 40.0 + 20.0 * i as f64, DivergenceFlag::NoSignal))
                .collect();
            momentum.reverse();
            let moat: Vec<_> = companies.iter().map(|c| moat_for(c, 50.0)).collect();
            let signals = SignalGenerator::new(&cfg, as_of())
                .generate_batch(&companies, &momentum, &moat, &HashMap::new())
                .unwrap();
            assert_eq!(signals[0].company_id, "co-2");
            assert_eq!(signals[0].momentum_score, 80.0);
            assert_eq!(signals[2].company_id, "co-0");
            assert_eq!(signals[2].momentum_score, 40.0);
        }

        #[test]
        fn catalysts_looked_up_by_id() {
            let cfg = ScoringConfig::default();
            let companies = batch(2);
            let momentum: Vec<_> = companies
                .iter()
                .map(|c| momentum_for(c, 50.0, DivergenceFlag::NoSignal))
                .collect();
            let moat: Vec<_> = companies.iter().map(|c| moat_for(c, 50.0)).collect();
            let mut catalysts = HashMap::new();
            catalysts.insert("co-1".to_string(), catalyst(60, 0.9));
            let signals = SignalGenerator::new(&cfg, as_of())
                .generate_batch(&companies, &momentum, &moat, &catalysts)
                .unwrap();
            assert_eq!(signals[0].company_id, "co-1");
            assert_eq!(signals[0].next_catalyst.as_deref(), Some("IPO Filing Expected"));
            assert!(signals[1].next_catalyst.is_none());
        }

        proptest! {
            #[test]
            fn ranks_are_permutation_and_sort_is_stable(
                values in proptest::collection::vec((0u8..5, 0u8..5), 1..20)
            ) {
                let cfg = ScoringConfig::default();
                let companies = batch(values.len());
                let momentum: Vec<_> = companies
                    .iter()
                    .zip(&values)
                    .map(|(c, (m, _))| momentum_for(c, f64::from(*m) * 20.0, DivergenceFlag::NoSignal))
                    .collect();
                let moat: Vec<_> = companies
                    .iter()
                    .zip(&values)
                    .map(|(c, (_, w))| moat_for(c, f64::from(*w) * 20.0))
                    .collect();
                let signals = SignalGenerator::new(&cfg, as_of())
                    .generate_batch(&companies, &momentum, &moat, &HashMap::new())
                    .unwrap();

                prop_assert_eq!(signals.len(), companies.len());
                let mut ranks: Vec<usize> = signals.iter().map(|s| s.rank).collect();
                ranks.sort_unstable();
                prop_assert_eq!(ranks, (1..=companies.len()).collect::<Vec<_>>());

                let position = |id: &str| companies.iter().position(|c| c.company_id == id).unwrap();
                for pair in signals.windows(2) {
                    prop_assert!(pair[0].conviction >= pair[1].conviction);
                    if pair[0].conviction == pair[1].conviction {
                        prop_assert!(position(&pair[0].company_id) < position(&pair[1].company_id));
                    }
                }
            }
        }
    }
}
