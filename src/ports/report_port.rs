//! Report export port.

use crate::domain::error::ArbError;
use crate::domain::report::WeeklyAlphaReport;

/// Port for writing weekly alpha reports.
pub trait ReportPort {
    fn write(&self, report: &WeeklyAlphaReport, output_path: &str) -> Result<(), ArbError>;

    /// File extension this exporter produces, without the dot.
    fn extension(&self) -> &'static str;
}
