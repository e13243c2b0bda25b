//! momentum-arb: tech momentum arbitrage scoring and signal ranking.
//!
//! Hexagonal architecture: scoring logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], command line in
//! [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
