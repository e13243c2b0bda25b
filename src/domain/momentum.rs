//! Dual-track momentum scoring.
//!
//! Track A ("hype") measures narrative momentum: press, social, VC chatter,
//! conference visibility and search interest. Track B ("build") measures
//! execution: revenue, customer logos, patents, talent and milestones. The
//! composite blends both, and the gap between them yields a
//! [`DivergenceFlag`].

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::company::{Company, FundingRound, PatentGrant, Sector};
use crate::domain::scoring_config::ScoringConfig;
use crate::domain::stats::{normalize, weighted_score};

const TIER_1_VCS: [&str; 8] = [
    "Andreessen Horowitz",
    "Sequoia Capital",
    "Benchmark",
    "Lightspeed",
    "Accel",
    "Greylock",
    "Kleiner Perkins",
    "Index Ventures",
];

const MEDIA_BASELINE: f64 = 20.0;
const SOCIAL_BASELINE: f64 = 25.0;
const SEARCH_BASELINE: f64 = 20.0;
const PATENT_BASELINE: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivergenceFlag {
    ConfirmedMomentum,
    MispricedOpportunity,
    BubbleRisk,
    NoSignal,
}

impl DivergenceFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DivergenceFlag::ConfirmedMomentum => "CONFIRMED_MOMENTUM",
            DivergenceFlag::MispricedOpportunity => "MISPRICED_OPPORTUNITY",
            DivergenceFlag::BubbleRisk => "BUBBLE_RISK",
            DivergenceFlag::NoSignal => "NO_SIGNAL",
        }
    }
}

impl fmt::Display for DivergenceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMention {
    pub date: NaiveDate,
    #[serde(default)]
    pub outlet: String,
}

/// An object with neither field set scores as if it were absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMetrics {
    /// Monthly LinkedIn follower growth, percent.
    #[serde(default)]
    pub linkedin_growth_rate: Option<f64>,
    /// Twitter/X engagement rate, percent.
    #[serde(default)]
    pub twitter_engagement: Option<f64>,
}

impl SocialMetrics {
    pub fn is_empty(&self) -> bool {
        self.linkedin_growth_rate.is_none() && self.twitter_engagement.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub current_interest: Option<f64>,
    #[serde(default)]
    pub previous_interest: Option<f64>,
}

impl SearchData {
    pub fn is_empty(&self) -> bool {
        self.current_interest.is_none() && self.previous_interest.is_none()
    }
}

/// Optional narrative signals for one company. Any field left `None` falls
/// back to that sub-score's baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalSignals {
    #[serde(default)]
    pub media_mentions: Option<Vec<MediaMention>>,
    #[serde(default)]
    pub social_metrics: Option<SocialMetrics>,
    #[serde(default)]
    pub vc_mentions: Option<Vec<String>>,
    #[serde(default)]
    pub search_data: Option<SearchData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumScore {
    pub company_id: String,
    pub company_name: String,
    pub sector: Sector,

    pub media_velocity: f64,
    pub social_signal: f64,
    pub vc_buzz: f64,
    pub conference_presence: f64,
    pub search_trends: f64,
    pub hype_score: f64,

    pub revenue_indicators: f64,
    pub customer_logos: f64,
    pub patent_velocity: f64,
    pub talent_density: f64,
    pub product_milestones: f64,
    pub build_score: f64,

    pub momentum_score: f64,
    /// No score history is stored, so both changes are always zero.
    pub momentum_change_7d: f64,
    pub momentum_change_30d: f64,
    pub divergence_flag: DivergenceFlag,

    pub as_of: NaiveDate,
}

pub struct MomentumScorer<'a> {
    config: &'a ScoringConfig,
    as_of: NaiveDate,
}

impl<'a> MomentumScorer<'a> {
    pub fn new(config: &'a ScoringConfig, as_of: NaiveDate) -> Self {
        Self { config, as_of }
    }

    pub fn score(&self, company: &Company, signals: Option<&ExternalSignals>) -> MomentumScore {
        let media_velocity = self.media_velocity(signals.and_then(|s| s.media_mentions.as_deref()));
        let social_signal = social_signal(signals.and_then(|s| s.social_metrics.as_ref()));
        let vc_buzz = self.vc_buzz(
            signals.and_then(|s| s.vc_mentions.as_deref()),
            &company.funding_rounds,
        );
        let conference_presence = conference_presence(company.total_funding);
        let search_trends = search_trends(signals.and_then(|s| s.search_data.as_ref()));

        let revenue_indicators = revenue_indicators(company);
        let customer_logos = normalize(f64::from(company.fortune_500_customers), 0.0, 100.0, 100.0);
        let patent_velocity = self.patent_velocity(&company.patent_grants);
        let talent_density = talent_density(company);
        let product_milestones = product_milestones(company);

        let hype_score = weighted_score(
            &[
                ("media_velocity", media_velocity),
                ("social_signal", social_signal),
                ("vc_buzz", vc_buzz),
                ("conference_presence", conference_presence),
                ("search_trends", search_trends),
            ],
            &self.config.hype_weights,
        );
        let build_score = weighted_score(
            &[
                ("revenue_indicators", revenue_indicators),
                ("customer_logos", customer_logos),
                ("patent_velocity", patent_velocity),
                ("talent_density", talent_density),
                ("product_milestones", product_milestones),
            ],
            &self.config.build_weights,
        );
        let momentum_score = weighted_score(
            &[("hype", hype_score), ("build", build_score)],
            &self.config.composite_weights,
        );
        let divergence_flag = self.detect_divergence(hype_score, build_score);

        tracing::debug!(
            company = %company.name,
            hype = hype_score,
            build = build_score,
            momentum = momentum_score,
            flag = %divergence_flag,
            "scored momentum"
        );

        MomentumScore {
            company_id: company.company_id.clone(),
            company_name: company.name.clone(),
            sector: company.sector,
            media_velocity,
            social_signal,
            vc_buzz,
            conference_presence,
            search_trends,
            hype_score,
            revenue_indicators,
            customer_logos,
            patent_velocity,
            talent_density,
            product_milestones,
            build_score,
            momentum_score,
            momentum_change_7d: 0.0,
            momentum_change_30d: 0.0,
            divergence_flag,
            as_of: self.as_of,
        }
    }

    /// Score every company without external signals, highest momentum first.
    /// The order is for display only; join results to companies by id.
    pub fn score_companies(&self, companies: &[Company]) -> Vec<MomentumScore> {
        self.score_companies_with(companies, &HashMap::new())
    }

    /// Like [`score_companies`](Self::score_companies), with external signals
    /// keyed by company id.
    pub fn score_companies_with(
        &self,
        companies: &[Company],
        signals: &HashMap<String, ExternalSignals>,
    ) -> Vec<MomentumScore> {
        let mut scores: Vec<MomentumScore> = companies
            .iter()
            .map(|c| self.score(c, signals.get(&c.company_id)))
            .collect();
        scores.sort_by(|a, b| b.momentum_score.total_cmp(&a.momentum_score));
        scores
    }

    pub fn detect_divergence(&self, hype: f64, build: f64) -> DivergenceFlag {
        classify_divergence(
            hype,
            build,
            self.config.thresholds.divergence_high,
            self.config.thresholds.divergence_low,
        )
    }

    fn media_velocity(&self, mentions: Option<&[MediaMention]>) -> f64 {
        let mentions = match mentions {
            Some(m) if !m.is_empty() => m,
            _ => return MEDIA_BASELINE,
        };
        let cutoff = self.as_of - Duration::days(30);
        let recent = mentions.iter().filter(|m| m.date > cutoff).count();
        normalize(recent as f64, 0.0, 50.0, 100.0)
    }

    fn vc_buzz(&self, vc_mentions: Option<&[String]>, rounds: &[FundingRound]) -> f64 {
        let mut score = 0.0;

        if let Some(mentions) = vc_mentions {
            score += normalize(mentions.len() as f64, 0.0, 10.0, 40.0);
        }

        let tier_1_backed = rounds
            .iter()
            .any(|r| TIER_1_VCS.iter().any(|vc| r.lead_investor.contains(vc)));
        if tier_1_backed {
            score += 30.0;
        }

        let cutoff = self.as_of - Duration::days(180);
        if rounds.iter().any(|r| r.date > cutoff) {
            score += 30.0;
        }

        f64::min(score, 100.0)
    }

    fn patent_velocity(&self, grants: &[PatentGrant]) -> f64 {
        if grants.is_empty() {
            return PATENT_BASELINE;
        }
        let cutoff = self.as_of - Duration::days(365);
        let weighted: f64 = grants
            .iter()
            .filter(|p| p.grant_date > cutoff)
            .map(|p| 1.0 + f64::from(p.citation_count) * 0.1)
            .sum();
        let quarterly_rate = weighted / 4.0;
        normalize(quarterly_rate, 0.0, 10.0, 100.0)
    }
}

/// Quadrant classification of hype versus build.
pub fn classify_divergence(hype: f64, build: f64, high: f64, low: f64) -> DivergenceFlag {
    if hype >= high && build >= high {
        DivergenceFlag::ConfirmedMomentum
    } else if hype < low && build >= high {
        DivergenceFlag::MispricedOpportunity
    } else if hype >= high && build < low {
        DivergenceFlag::BubbleRisk
    } else {
        DivergenceFlag::NoSignal
    }
}

fn social_signal(metrics: Option<&SocialMetrics>) -> f64 {
    match metrics.filter(|m| !m.is_empty()) {
        None => SOCIAL_BASELINE,
        Some(m) => {
            normalize(m.linkedin_growth_rate.unwrap_or(0.0), 0.0, 20.0, 50.0)
                + normalize(m.twitter_engagement.unwrap_or(0.0), 0.0, 10.0, 50.0)
        }
    }
}

// Speaking slots track funding stage.
fn conference_presence(total_funding: f64) -> f64 {
    if total_funding > 500e6 {
        80.0
    } else if total_funding > 200e6 {
        60.0
    } else if total_funding > 100e6 {
        40.0
    } else if total_funding > 50e6 {
        25.0
    } else {
        10.0
    }
}

fn search_trends(data: Option<&SearchData>) -> f64 {
    let Some(d) = data.filter(|d| !d.is_empty()) else {
        return SEARCH_BASELINE;
    };
    let current = d.current_interest.unwrap_or(0.0);
    match d.previous_interest {
        Some(previous) if previous > 0.0 => {
            normalize((current - previous) / previous, -0.5, 0.5, 100.0)
        }
        _ => normalize(current, 0.0, 100.0, 100.0),
    }
}

fn revenue_indicators(company: &Company) -> f64 {
    let Some(arr) = company.reported_arr() else {
        return if company.total_funding > 500e6 {
            70.0
        } else if company.total_funding > 200e6 {
            50.0
        } else {
            30.0
        };
    };

    if arr > 500e6 {
        95.0
    } else if arr > 200e6 {
        85.0
    } else if arr > 100e6 {
        75.0
    } else if arr > 50e6 {
        60.0
    } else if arr > 20e6 {
        45.0
    } else {
        25.0
    }
}

fn talent_density(company: &Company) -> f64 {
    let headcount = match company.employee_count {
        n if n > 5000 => 30.0,
        n if n > 2000 => 25.0,
        n if n > 1000 => 20.0,
        n if n > 500 => 15.0,
        n if n > 200 => 10.0,
        _ => 0.0,
    };
    let engineers = normalize(company.engineer_pct, 0.0, 70.0, 35.0);
    let faang = normalize(company.faang_talent_pct, 0.0, 30.0, 35.0);
    f64::min(headcount + engineers + faang, 100.0)
}

fn product_milestones(company: &Company) -> f64 {
    let customers = match company.fortune_500_customers {
        n if n > 50 => 40.0,
        n if n > 20 => 30.0,
        n if n > 10 => 20.0,
        _ => 0.0,
    };
    let funding = if company.total_funding > 500e6 {
        40.0
    } else if company.total_funding > 200e6 {
        30.0
    } else if company.total_funding > 100e6 {
        20.0
    } else {
        0.0
    };
    f64::min(20.0 + customers + funding, 100.0)
}

pub fn filter_high_conviction(scores: &[MomentumScore], threshold: f64) -> Vec<&MomentumScore> {
    scores
        .iter()
        .filter(|s| s.momentum_score >= threshold)
        .collect()
}

pub fn filter_by_divergence(scores: &[MomentumScore], flag: DivergenceFlag) -> Vec<&MomentumScore> {
    scores.iter().filter(|s| s.divergence_flag == flag).collect()
}
