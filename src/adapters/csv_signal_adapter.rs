//! CSV export of the ranked signal table.
//!
//! One row per top-ranked signal. Risk factors are joined with `; `.

use csv::Writer;
use std::fs::{self, File};
use std::path::Path;

use crate::domain::error::ArbError;
use crate::domain::report::WeeklyAlphaReport;
use crate::domain::signal::TradeSignal;
use crate::ports::report_port::ReportPort;

const HEADER: [&str; 17] = [
    "rank",
    "company",
    "sector",
    "recommendation",
    "conviction",
    "momentum_score",
    "hype_score",
    "build_score",
    "moat_score",
    "risk_level",
    "position_size",
    "public_proxy",
    "next_catalyst",
    "catalyst_date",
    "expected_return",
    "time_horizon",
    "risk_factors",
];

pub struct CsvSignalAdapter;

impl CsvSignalAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Write `signals` as CSV to any writer.
    pub fn write_signals<W: std::io::Write>(
        writer: W,
        signals: &[TradeSignal],
    ) -> Result<(), ArbError> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(HEADER)?;
        for s in signals {
            writer.write_record([
                s.rank.to_string(),
                s.company.clone(),
                s.sector.to_string(),
                s.recommendation.to_string(),
                format!("{:.4}", s.conviction),
                format!("{:.2}", s.momentum_score),
                format!("{:.2}", s.hype_score),
                format!("{:.2}", s.build_score),
                format!("{:.2}", s.moat_score),
                s.risk_level.as_str().to_string(),
                s.position_size.clone(),
                s.public_proxy.clone().unwrap_or_default(),
                s.next_catalyst.clone().unwrap_or_default(),
                s.catalyst_date.map(|d| d.to_string()).unwrap_or_default(),
                s.expected_return.clone(),
                s.time_horizon.clone(),
                s.risk_factors.join("; "),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvSignalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvSignalAdapter {
    fn write(&self, report: &WeeklyAlphaReport, output_path: &str) -> Result<(), ArbError> {
        let export_err = |reason: String| ArbError::Export {
            path: output_path.to_string(),
            reason,
        };
        if let Some(parent) = Path::new(output_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| export_err(e.to_string()))?;
        }
        let file = File::create(output_path).map_err(|e| export_err(e.to_string()))?;
        Self::write_signals(file, &report.top_10_momentum_plays)
            .map_err(|e| export_err(e.to_string()))?;
        tracing::info!(
            path = output_path,
            rows = report.top_10_momentum_plays.len(),
            "wrote signal csv"
        );
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
