//! Concrete adapter implementations for ports.

pub mod csv_signal_adapter;
pub mod file_config_adapter;
pub mod json_company_adapter;
pub mod json_report_adapter;
pub mod markdown_report_adapter;
#[cfg(feature = "web")]
pub mod web;
