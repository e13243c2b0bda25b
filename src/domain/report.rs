//! Weekly alpha report: the full scoring pipeline end to end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::bottleneck::{self, Bottleneck};
use crate::domain::catalyst::{IpoWindow, MarketConditions, TimingPredictor};
use crate::domain::company::{Company, Sector};
use crate::domain::error::ArbError;
use crate::domain::moat::MoatScorer;
use crate::domain::momentum::{DivergenceFlag, MomentumScore, MomentumScorer};
use crate::domain::scoring_config::ScoringConfig;
use crate::domain::second_order::{
    CorrelationTable, SecondOrderEngine, SecondOrderPlay, reference_correlations, top_plays,
};
use crate::domain::signal::{SignalGenerator, TradeSignal, filter_high_conviction};
use crate::domain::stats::round2;

pub const TOP_SIGNALS: usize = 10;
pub const TOP_SECOND_ORDER: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub company: String,
    pub momentum_score: f64,
    pub hype_score: f64,
    pub build_score: f64,
    pub divergence_flag: DivergenceFlag,
}

pub type SectorHeatmap = BTreeMap<Sector, Vec<HeatmapCell>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_date: NaiveDate,
    pub signals_generated: usize,
    pub high_conviction_count: usize,
    pub average_momentum_score: f64,
    pub ipo_window_health: IpoWindow,
    pub macro_conditions: MarketConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAlphaReport {
    pub report_date: NaiveDate,
    pub top_10_momentum_plays: Vec<TradeSignal>,
    pub emerging_bottlenecks: Vec<Bottleneck>,
    pub second_order_plays: Vec<SecondOrderPlay>,
    pub ipo_window_health: IpoWindow,
    pub macro_conditions: MarketConditions,
    pub signals_generated: usize,
    pub high_conviction_count: usize,
    pub average_momentum_score: f64,
    pub heatmap: SectorHeatmap,
}

impl WeeklyAlphaReport {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            report_date: self.report_date,
            signals_generated: self.signals_generated,
            high_conviction_count: self.high_conviction_count,
            average_momentum_score: self.average_momentum_score,
            ipo_window_health: self.ipo_window_health,
            macro_conditions: self.macro_conditions,
        }
    }

    pub fn signal_by_rank(&self, rank: usize) -> Option<&TradeSignal> {
        self.top_10_momentum_plays.iter().find(|s| s.rank == rank)
    }
}

/// Run every stage against the reference correlation table.
pub fn build_weekly_report(
    companies: &[Company],
    market: &MarketConditions,
    config: &ScoringConfig,
    as_of: NaiveDate,
) -> Result<WeeklyAlphaReport, ArbError> {
    build_weekly_report_with(companies, market, config, &reference_correlations(), as_of)
}

pub fn build_weekly_report_with(
    companies: &[Company],
    market: &MarketConditions,
    config: &ScoringConfig,
    correlations: &CorrelationTable,
    as_of: NaiveDate,
) -> Result<WeeklyAlphaReport, ArbError> {
    // Stage 1: momentum
    let momentum = MomentumScorer::new(config, as_of).score_companies(companies);
    tracing::info!(count = momentum.len(), "momentum scored");

    // Stage 2: moat
    let moat = MoatScorer::new(config, as_of).score_companies(companies);
    tracing::info!(count = moat.len(), "moats scored");

    // Stage 3: catalysts
    let predictor = TimingPredictor::new(as_of);
    let catalysts: HashMap<_, _> = companies
        .iter()
        .filter_map(|c| {
            predictor
                .next_catalyst(c, market, None)
                .map(|catalyst| (c.company_id.clone(), catalyst))
        })
        .collect();
    tracing::info!(count = catalysts.len(), "catalysts predicted");

    // Stage 4: signals
    let signals =
        SignalGenerator::new(config, as_of).generate_batch(companies, &momentum, &moat, &catalysts)?;
    let high_conviction_count =
        filter_high_conviction(&signals, config.thresholds.high_conviction).len();

    // Stage 5: bottlenecks and second-order plays
    let emerging_bottlenecks = bottleneck::watchlist(as_of);
    let plays = SecondOrderEngine::new(&config.thresholds, correlations).find_plays(&momentum);
    tracing::info!(
        bottlenecks = emerging_bottlenecks.len(),
        second_order = plays.len(),
        "supply chain scan complete"
    );

    Ok(WeeklyAlphaReport {
        report_date: as_of,
        top_10_momentum_plays: signals.iter().take(TOP_SIGNALS).cloned().collect(),
        emerging_bottlenecks,
        second_order_plays: top_plays(&plays, TOP_SECOND_ORDER).to_vec(),
        ipo_window_health: market.ipo_window,
        macro_conditions: *market,
        signals_generated: signals.len(),
        high_conviction_count,
        average_momentum_score: average_momentum(&momentum),
        heatmap: sector_heatmap(&momentum),
    })
}

/// Mean composite momentum, zero for an empty batch.
pub fn average_momentum(scores: &[MomentumScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.iter().map(|s| s.momentum_score).sum();
    round2(total / scores.len() as f64)
}

/// Scores grouped by sector, keeping the order they arrive in.
pub fn sector_heatmap(scores: &[MomentumScore]) -> SectorHeatmap {
    let mut heatmap = SectorHeatmap::new();
    for s in scores {
        heatmap.entry(s.sector).or_default().push(HeatmapCell {
            company: s.company_name.clone(),
            momentum_score: s.momentum_score,
            hype_score: s.hype_score,
            build_score: s.build_score,
            divergence_flag: s.divergence_flag,
        });
    }
    heatmap
}
