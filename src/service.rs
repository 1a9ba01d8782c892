//! Oracle service - the entry points consumed by the API layer
//!
//! One aggregator and one comparison engine are built at start-up and
//! shared by reference; both are stateless, so clones of the service can be
//! handed to concurrent request handlers without locking.

use std::sync::Arc;

use crate::comparison::{validate_quote, PriceComparisonEngine};
use crate::config::AppConfig;
use crate::oracle::sources::SyntheticFallbackProvider;
use crate::oracle::{PriceAggregator, Result};
use crate::types::{Location, PriceAggregation, PriceAnalysis};

#[derive(Clone)]
pub struct OracleService {
    aggregator: Arc<PriceAggregator>,
    engine: Arc<PriceComparisonEngine>,
}

impl OracleService {
    pub fn new(aggregator: Arc<PriceAggregator>, engine: Arc<PriceComparisonEngine>) -> Self {
        Self { aggregator, engine }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.oracle.validate()?;
        config.synthetic.validate()?;

        let aggregator = PriceAggregator::from_config(&config.oracle, &config.synthetic);
        let engine = PriceComparisonEngine::new(config.comparison.clone())?;

        Ok(Self::new(Arc::new(aggregator), Arc::new(engine)))
    }

    pub fn aggregator(&self) -> &PriceAggregator {
        &self.aggregator
    }

    pub fn engine(&self) -> &PriceComparisonEngine {
        &self.engine
    }

    pub async fn aggregate_prices(
        &self,
        commodity: &str,
        location: &Location,
    ) -> Result<PriceAggregation> {
        self.aggregator.aggregate_prices(commodity, location).await
    }

    pub fn analyze_quote(
        &self,
        commodity: &str,
        quoted_price: f64,
        aggregation: &PriceAggregation,
    ) -> Result<PriceAnalysis> {
        self.engine.analyze_quote(commodity, quoted_price, aggregation)
    }

    /// Aggregate and judge a quote in one call.
    /// The quote is validated before any source is queried.
    pub async fn evaluate_quote(
        &self,
        commodity: &str,
        location: &Location,
        quoted_price: f64,
    ) -> Result<(PriceAggregation, PriceAnalysis)> {
        validate_quote(quoted_price)?;

        let aggregation = self.aggregate_prices(commodity, location).await?;
        let analysis = self.analyze_quote(commodity, quoted_price, &aggregation)?;

        Ok((aggregation, analysis))
    }

    pub fn get_price_range_message(&self, aggregation: &PriceAggregation) -> String {
        self.engine.get_price_range_message(aggregation)
    }

    /// Commodities with a known base price, for UI discovery
    pub fn list_known_commodities(&self) -> Vec<String> {
        SyntheticFallbackProvider::known_commodities()
    }
}

impl Default for OracleService {
    fn default() -> Self {
        Self::new(
            Arc::new(PriceAggregator::default()),
            Arc::new(PriceComparisonEngine::default()),
        )
    }
}
