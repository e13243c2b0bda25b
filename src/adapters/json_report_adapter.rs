//! JSON report adapter implementing ReportPort.

use std::fs;
use std::path::Path;

use crate::domain::error::ArbError;
use crate::domain::report::WeeklyAlphaReport;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &WeeklyAlphaReport, output_path: &str) -> Result<(), ArbError> {
        let export_err = |reason: String| ArbError::Export {
            path: output_path.to_string(),
            reason,
        };
        let json = serde_json::to_string_pretty(report).map_err(|e| export_err(e.to_string()))?;
        if let Some(parent) = Path::new(output_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| export_err(e.to_string()))?;
        }
        fs::write(output_path, json).map_err(|e| export_err(e.to_string()))?;
        tracing::info!(path = output_path, "wrote json report");
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalyst::{IpoWindow, MarketConditions};
    use crate::domain::report::build_weekly_report;
    use crate::domain::scoring_config::ScoringConfig;
    use crate::domain::synthetic::generate_companies;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_report() -> WeeklyAlphaReport {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let market = MarketConditions {
            ipo_window: IpoWindow::Mixed,
            ..Default::default()
        };
        build_weekly_report(
            &generate_companies(7, 12, as_of),
            &market,
            &ScoringConfig::default(),
            as_of,
        )
        .unwrap()
    }

    #[test]
    fn written_report_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weekly.json");
        let report = sample_report();
        JsonReportAdapter::new()
            .write(&report, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: WeeklyAlphaReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.report_date, report.report_date);
        assert_eq!(parsed.signals_generated, 12);
        assert_eq!(parsed.top_10_momentum_plays.len(), 10);
        assert_eq!(parsed.ipo_window_health, IpoWindow::Mixed);
    }

    #[test]
    fn field_names_are_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weekly.json");
        JsonReportAdapter::new()
            .write(&sample_report(), path.to_str().unwrap())
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["report_date"], "2025-01-06");
        assert_eq!(value["ipo_window_health"], "mixed");
        assert_eq!(value["macro_conditions"]["volatility"], "medium");
        assert_eq!(value["top_10_momentum_plays"][0]["rank"], 1);
        assert_eq!(value["emerging_bottlenecks"][0]["priority"], "CRITICAL");
    }

    #[test]
    fn unwritable_path_is_export_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let path = blocker.join("weekly.json");
        let result = JsonReportAdapter::new().write(&sample_report(), path.to_str().unwrap());
        assert!(matches!(result, Err(ArbError::Export { .. })));
    }
}
