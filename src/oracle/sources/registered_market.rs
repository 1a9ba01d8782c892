//! National electronic market network client
//!
//! The network only serves registered traders. This deployment holds no
//! credentials, so every fetch ends in `RegistrationRequired`.

use async_trait::async_trait;
use std::time::Duration;

use crate::oracle::sources::{PriceSource, SourceError};
use crate::types::{Location, PriceObservation, SourceTag};

const REGISTERED_MARKET_PORTAL: &str = "https://enam.gov.in/web/dashboard/trade-data";

#[derive(Debug, Clone)]
pub struct RegisteredMarketClient {
    portal: String,
}

impl RegisteredMarketClient {
    pub fn new() -> Self {
        Self {
            portal: REGISTERED_MARKET_PORTAL.to_string(),
        }
    }

    pub fn portal(&self) -> &str {
        &self.portal
    }
}

impl Default for RegisteredMarketClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for RegisteredMarketClient {
    fn tag(&self) -> SourceTag {
        SourceTag::RegisteredMarket
    }

    async fn fetch(
        &self,
        commodity: &str,
        location: &Location,
        _timeout: Duration,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        tracing::debug!(
            commodity = %commodity,
            location = %location,
            portal = %self.portal,
            "Registered market trade data requires trader credentials"
        );

        Err(SourceError::RegistrationRequired { tag: self.tag() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_requires_registration() {
        let client = RegisteredMarketClient::new();
        let location = Location::new("Maharashtra", None).unwrap();

        let err = client
            .fetch("onion", &location, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SourceError::RegistrationRequired {
                tag: SourceTag::RegisteredMarket
            }
        );
        assert!(err.is_expected());
    }
}
