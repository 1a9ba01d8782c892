//! Oracle module - Fallback-chained commodity price aggregation
//!
//! Queries the real market sources concurrently, falls back to synthetic
//! prices when none of them answer, and summarises the pooled observations.

mod aggregator;
pub mod sources;

pub use aggregator::{summarize, CollectedPrices, PriceAggregator, SourceOutcome};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

/// Errors visible to callers of the oracle
#[derive(Debug, Error)]
pub enum OracleError {
    /// Malformed request, rejected before any source is queried
    #[error("invalid input: {0}")]
    Validation(String),

    /// The synthetic provider returned nothing; an implementation defect
    #[error("synthetic fallback produced no observations for {0}")]
    FallbackFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}
