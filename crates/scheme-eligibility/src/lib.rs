//! Eligibility assessment and application decisions for financial assistance schemes.
//!
//! The [`eligibility`] module holds the strategy registry, the multi-scheme assessment facade
//! and the decision service. [`config`], [`telemetry`] and [`error`] carry the process-level
//! plumbing shared by the HTTP service and the CLI.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;
