//! User-submitted price reports
//!
//! Reports are supplied at construction and filtered per query. The default
//! deployment has collected none, so fetches come back empty.

use async_trait::async_trait;
use std::time::Duration;

use crate::oracle::sources::{PriceSource, SourceError};
use crate::types::{normalize_commodity, Location, PriceObservation, SourceTag};

/// A single price report and where it was observed
#[derive(Debug, Clone)]
pub struct CrowdReport {
    pub location: Location,
    pub observation: PriceObservation,
}

#[derive(Debug, Clone, Default)]
pub struct CrowdSourcedClient {
    reports: Vec<CrowdReport>,
}

impl CrowdSourcedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client backed by a fixed set of reports
    pub fn with_reports(reports: Vec<CrowdReport>) -> Self {
        Self { reports }
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    fn matches(report: &CrowdReport, commodity: &str, location: &Location) -> bool {
        if report.observation.commodity != commodity
            || report.location.state_key() != location.state_key()
        {
            return false;
        }

        // A district-scoped query only takes reports from that district
        match (location.district(), report.location.district()) {
            (Some(wanted), Some(got)) => wanted.eq_ignore_ascii_case(got),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[async_trait]
impl PriceSource for CrowdSourcedClient {
    fn tag(&self) -> SourceTag {
        SourceTag::CrowdSourced
    }

    async fn fetch(
        &self,
        commodity: &str,
        location: &Location,
        _timeout: Duration,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let commodity = normalize_commodity(commodity);

        Ok(self
            .reports
            .iter()
            .filter(|r| Self::matches(r, &commodity, location))
            .map(|r| r.observation.clone())
            .collect())
    }
}
