//! State mandi-board feed client
//!
//! Board feeds differ per state and none is integrated yet, so every fetch
//! reports the board as unreachable.

use async_trait::async_trait;
use std::time::Duration;

use crate::oracle::sources::{PriceSource, SourceError};
use crate::types::{Location, PriceObservation, SourceTag};

#[derive(Debug, Clone, Default)]
pub struct RegionalBoardClient;

impl RegionalBoardClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PriceSource for RegionalBoardClient {
    fn tag(&self) -> SourceTag {
        SourceTag::RegionalBoard
    }

    async fn fetch(
        &self,
        commodity: &str,
        location: &Location,
        _timeout: Duration,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        Err(SourceError::Access {
            tag: self.tag(),
            reason: format!(
                "no live {} board integration for {}",
                location.state(),
                commodity
            ),
        })
    }
}
