//! Port traits the domain depends on; adapters implement them.

pub mod company_port;
pub mod config_port;
pub mod report_port;
