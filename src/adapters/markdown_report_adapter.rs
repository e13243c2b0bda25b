//! Markdown report adapter implementing ReportPort.
//!
//! Sections are rendered by small helpers and joined in order: executive
//! summary, top momentum plays, emerging bottlenecks, second-order plays.

use std::fs;
use std::path::Path;

use crate::domain::bottleneck::Bottleneck;
use crate::domain::error::ArbError;
use crate::domain::report::WeeklyAlphaReport;
use crate::domain::second_order::SecondOrderPlay;
use crate::domain::signal::TradeSignal;
use crate::ports::report_port::ReportPort;

/// Second-order plays shown in the markdown report.
const MARKDOWN_SECOND_ORDER: usize = 5;
/// Private companies listed per bottleneck.
const MAX_PRIVATE_COMPANIES: usize = 5;

pub struct MarkdownReportAdapter;

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn write(&self, report: &WeeklyAlphaReport, output_path: &str) -> Result<(), ArbError> {
        let markdown = render(report);
        if let Some(parent) = Path::new(output_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| ArbError::Export {
                path: output_path.to_string(),
                reason: e.to_string(),
            })?;
        }
        fs::write(output_path, markdown).map_err(|e| ArbError::Export {
            path: output_path.to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(path = output_path, "wrote markdown report");
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Render the whole report as markdown text.
pub fn render(report: &WeeklyAlphaReport) -> String {
    let mut md: Vec<String> = Vec::new();

    md.push("# TECH MOMENTUM ARBITRAGE ENGINE".into());
    md.push(format!(
        "## Weekly Alpha Report - {}",
        report.report_date.format("%B %d, %Y")
    ));
    md.push(String::new());
    md.push("---".into());
    md.push(String::new());

    render_summary(report, &mut md);

    md.push("## TOP 10 MOMENTUM PLAYS".into());
    md.push(String::new());
    if report.top_10_momentum_plays.is_empty() {
        md.push("_No signals generated._".into());
        md.push(String::new());
    }
    for signal in &report.top_10_momentum_plays {
        render_signal(signal, &mut md);
    }

    md.push("## EMERGING BOTTLENECKS (Wave 1 Opportunities)".into());
    md.push(String::new());
    for bottleneck in &report.emerging_bottlenecks {
        render_bottleneck(bottleneck, &mut md);
    }

    md.push("## SECOND-ORDER ARBITRAGE PLAYS".into());
    md.push(String::new());
    md.push("*Suppliers to the suppliers: mispriced exposure to Wave 1 momentum*".into());
    md.push(String::new());
    if report.second_order_plays.is_empty() {
        md.push("_No sector cleared the momentum threshold._".into());
        md.push(String::new());
    }
    for play in report.second_order_plays.iter().take(MARKDOWN_SECOND_ORDER) {
        render_play(play, &mut md);
    }

    md.join("\n")
}

fn render_summary(report: &WeeklyAlphaReport, md: &mut Vec<String>) {
    md.push("## Executive Summary".into());
    md.push(String::new());
    md.push(format!("- **Signals Generated**: {}", report.signals_generated));
    md.push(format!(
        "- **High Conviction Plays**: {}",
        report.high_conviction_count
    ));
    md.push(format!(
        "- **Average Momentum Score**: {:.1}/100",
        report.average_momentum_score
    ));
    md.push(format!(
        "- **IPO Window**: {}",
        report.ipo_window_health.as_str().to_uppercase()
    ));
    md.push(format!(
        "- **Market Volatility**: {}",
        report.macro_conditions.volatility.as_str().to_uppercase()
    ));
    md.push(format!(
        "- **Interest Rates**: {}",
        report.macro_conditions.interest_rates.as_str().to_uppercase()
    ));
    md.push(String::new());
    md.push("---".into());
    md.push(String::new());
}

fn render_signal(signal: &TradeSignal, md: &mut Vec<String>) {
    md.push(format!("### {}. {}", signal.rank, signal.company));
    md.push(format!(
        "**Sector**: {} | **Recommendation**: {} | **Risk**: {}",
        signal.sector,
        signal.recommendation,
        signal.risk_level.as_str()
    ));
    md.push(String::new());
    md.push("**Momentum Metrics:**".into());
    md.push(format!(
        "- Overall Momentum: **{:.1}/100**",
        signal.momentum_score
    ));
    md.push(format!(
        "- Hype Score (Narrative): {:.1}/100",
        signal.hype_score
    ));
    md.push(format!(
        "- Build Score (Execution): {:.1}/100",
        signal.build_score
    ));
    md.push(format!("- Moat Score: {:.1}/100", signal.moat_score));
    md.push(format!("- Conviction: **{}**", percent(signal.conviction)));
    md.push(String::new());
    md.push("**Investment Thesis:**".into());
    md.push(format!("- Position Size: {}", signal.position_size));
    md.push(format!("- Entry Timing: {}", signal.entry_timing));
    md.push(format!("- Expected Return: {}", signal.expected_return));
    md.push(format!("- Time Horizon: {}", signal.time_horizon));
    md.push(String::new());
    md.push("**Exposure Routes:**".into());
    if let Some(proxy) = &signal.public_proxy {
        md.push(format!("- Public Proxy: {proxy}"));
    }
    if let Some(access) = &signal.pre_ipo_access {
        md.push(format!("- Pre-IPO: {access}"));
    }
    if let Some(synthetic) = &signal.synthetic_exposure {
        md.push(format!("- Synthetic: {synthetic}"));
    }
    md.push(String::new());
    if let Some(catalyst) = &signal.next_catalyst {
        match signal.catalyst_date {
            Some(date) => md.push(format!("**Next Catalyst:** {catalyst} ({date})")),
            None => md.push(format!("**Next Catalyst:** {catalyst}")),
        }
        md.push(String::new());
    }
    md.push("**Risk Factors:**".into());
    for risk in &signal.risk_factors {
        md.push(format!("- {risk}"));
    }
    md.push(String::new());
    md.push("---".into());
    md.push(String::new());
}

fn render_bottleneck(bottleneck: &Bottleneck, md: &mut Vec<String>) {
    md.push(format!("### {}", bottleneck.name));
    md.push(format!(
        "**Sector**: {} | **Priority**: {} | **Confidence**: {}",
        bottleneck.sector,
        bottleneck.priority,
        percent(bottleneck.confidence)
    ));
    md.push(String::new());
    md.push(format!("**Description:** {}", bottleneck.description));
    md.push(String::new());
    md.push("**Evidence:**".into());
    for evidence in &bottleneck.evidence {
        md.push(format!("- {evidence}"));
    }
    md.push(String::new());
    if !bottleneck.private_companies.is_empty() {
        let shown: Vec<&str> = bottleneck
            .private_companies
            .iter()
            .take(MAX_PRIVATE_COMPANIES)
            .map(String::as_str)
            .collect();
        md.push(format!(
            "**Private Companies Solving This:** {}",
            shown.join(", ")
        ));
    }
    if !bottleneck.public_proxies.is_empty() {
        md.push(format!(
            "**Public Proxies:** {}",
            bottleneck.public_proxies.join(", ")
        ));
    }
    md.push(String::new());
    md.push("---".into());
    md.push(String::new());
}

fn render_play(play: &SecondOrderPlay, md: &mut Vec<String>) {
    md.push(format!("### {}", play.supplier_company));
    md.push(format!(
        "**Ticker**: {} | **Exposure**: {}",
        play.supplier_ticker, play.exposure_type
    ));
    md.push(String::new());
    md.push(format!(
        "**Primary Technology:** {} (Momentum: {:.1}/100)",
        play.primary_technology, play.primary_momentum_score
    ));
    md.push(format!(
        "**Dependency Score:** {}",
        percent(play.dependency_score)
    ));
    md.push(format!(
        "**Price Correlation:** {:.2}",
        play.price_correlation
    ));
    md.push(String::new());
    md.push(format!("**Thesis:** {}", play.thesis));
    md.push(String::new());
    md.push(format!(
        "**Entry Timing:** {:?} | **Risk-Adjusted Return:** {:?}",
        play.entry_timing, play.risk_adjusted_return
    ));
    md.push(String::new());
    md.push("---".into());
    md.push(String::new());
}
