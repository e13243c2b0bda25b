//! Core domain types and scoring logic.

pub mod bottleneck;
pub mod catalyst;
pub mod company;
pub mod config_validation;
pub mod error;
pub mod moat;
pub mod momentum;
pub mod report;
pub mod scoring_config;
pub mod second_order;
pub mod signal;
pub mod stats;
pub mod synthetic;
