//! Mandi Oracle Library
//!
//! Commodity price aggregation across unreliable market sources, with a
//! synthetic fallback and fairness verdicts for traders' quotes.

pub mod comparison;
pub mod config;
pub mod logging;
pub mod oracle;
pub mod service;
pub mod types;

pub use comparison::PriceComparisonEngine;
pub use oracle::{OracleError, PriceAggregator};
pub use service::OracleService;
pub use types::{Location, PriceAggregation, PriceAnalysis, PriceObservation, SourceTag, Verdict};
