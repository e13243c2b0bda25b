//! HTTP request handlers for the report API.
//!
//! Every handler reads the report computed at startup; nothing is rescored
//! per request.

use axum::{
    Json,
    extract::{OriginalUri, Path, State},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domain::bottleneck::Bottleneck;
use crate::domain::company::{Company, Sector, WaveCategory};
use crate::domain::report::{ReportSummary, SectorHeatmap};
use crate::domain::second_order::SecondOrderPlay;
use crate::domain::signal::TradeSignal;

use super::{AppState, WebError};

/// Company listing row; the full record stays on disk.
#[derive(Debug, Serialize)]
pub struct CompanyView<'a> {
    pub company_id: &'a str,
    pub name: &'a str,
    pub sector: Sector,
    pub wave_category: WaveCategory,
    pub bottleneck_solved: &'a str,
    pub total_funding: f64,
    pub last_valuation: Option<f64>,
    pub fortune_500_customers: u32,
    pub estimated_arr: Option<f64>,
    pub ipo_probability_12mo: f64,
    pub employee_count: u32,
    pub founded_date: NaiveDate,
    pub website: &'a str,
}

impl<'a> From<&'a Company> for CompanyView<'a> {
    fn from(c: &'a Company) -> Self {
        Self {
            company_id: &c.company_id,
            name: &c.name,
            sector: c.sector,
            wave_category: c.wave_category,
            bottleneck_solved: &c.bottleneck_solved,
            total_funding: c.total_funding,
            last_valuation: c.last_valuation,
            fortune_500_customers: c.fortune_500_customers,
            estimated_arr: c.estimated_arr,
            ipo_probability_12mo: c.ipo_probability_12mo,
            employee_count: c.employee_count,
            founded_date: c.founded_date,
            website: &c.website,
        }
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<ReportSummary> {
    Json(state.report.summary())
}

pub async fn signals(State(state): State<Arc<AppState>>) -> Json<Vec<TradeSignal>> {
    Json(state.report.top_10_momentum_plays.clone())
}

pub async fn signal_by_rank(
    State(state): State<Arc<AppState>>,
    Path(rank): Path<String>,
) -> Result<Json<TradeSignal>, WebError> {
    let rank: usize = rank
        .parse()
        .map_err(|_| WebError::bad_request(format!("invalid rank '{rank}'")))?;
    state
        .report
        .signal_by_rank(rank)
        .cloned()
        .map(Json)
        .ok_or_else(|| WebError::not_found(format!("no signal at rank {rank}")))
}

pub async fn bottlenecks(State(state): State<Arc<AppState>>) -> Json<Vec<Bottleneck>> {
    Json(state.report.emerging_bottlenecks.clone())
}

pub async fn companies(State(state): State<Arc<AppState>>) -> Json<Value> {
    let views: Vec<CompanyView> = state.companies.iter().map(CompanyView::from).collect();
    Json(json!(views))
}

pub async fn heatmap(State(state): State<Arc<AppState>>) -> Json<SectorHeatmap> {
    Json(state.report.heatmap.clone())
}

pub async fn second_order(State(state): State<Arc<AppState>>) -> Json<Vec<SecondOrderPlay>> {
    Json(state.report.second_order_plays.clone())
}

pub async fn api_not_found(OriginalUri(uri): OriginalUri) -> WebError {
    tracing::debug!(path = %uri.path(), "unknown api path");
    WebError::not_found(format!("no route for {}", uri.path()))
}
