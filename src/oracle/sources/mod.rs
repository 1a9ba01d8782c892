//! Price source implementations (registered market, regional board, crowd reports, synthetic)

mod crowd_sourced;
mod regional_board;
mod registered_market;
mod synthetic;

pub use crowd_sourced::{CrowdReport, CrowdSourcedClient};
pub use regional_board::RegionalBoardClient;
pub use registered_market::RegisteredMarketClient;
pub use synthetic::SyntheticFallbackProvider;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::{Location, PriceObservation, SourceTag};

/// Source-local failures. All of them mean "try the next source".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("{tag} requires registration credentials that are not provisioned")]
    RegistrationRequired { tag: SourceTag },

    #[error("{tag} unavailable: {reason}")]
    Access { tag: SourceTag, reason: String },

    #[error("{tag} returned no data for {commodity}")]
    EmptyResult { tag: SourceTag, commodity: String },

    /// Raised by the aggregator when a fetch outlives its timeout
    #[error("{tag} timed out after {after:?}")]
    TimedOut { tag: SourceTag, after: Duration },
}

impl SourceError {
    pub fn tag(&self) -> SourceTag {
        match self {
            SourceError::RegistrationRequired { tag }
            | SourceError::Access { tag, .. }
            | SourceError::EmptyResult { tag, .. }
            | SourceError::TimedOut { tag, .. } => *tag,
        }
    }

    /// Known, documented outcomes of the current deployment (not worth a warning)
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            SourceError::RegistrationRequired { .. } | SourceError::EmptyResult { .. }
        )
    }
}

/// Trait for commodity price sources
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Which source this is
    fn tag(&self) -> SourceTag;

    /// Fetch observations for a normalized commodity at a location.
    /// `timeout` is the budget the caller will enforce on this call.
    async fn fetch(
        &self,
        commodity: &str,
        location: &Location,
        timeout: Duration,
    ) -> Result<Vec<PriceObservation>, SourceError>;
}
