//! Oracle Aggregator - Combines price observations from multiple sources
//!
//! Fans out to the real sources concurrently, each bounded by the per-source
//! timeout, pools whatever they return and falls back to synthetic data when
//! the pool is empty. The pool is then reduced to min/max/mean/median/std-dev.

use chrono::Utc;
use futures_util::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{OracleConfig, SyntheticConfig};
use crate::oracle::sources::{
    CrowdSourcedClient, PriceSource, RegionalBoardClient, RegisteredMarketClient, SourceError,
    SyntheticFallbackProvider,
};
use crate::oracle::{OracleError, Result};
use crate::types::{
    normalize_commodity, round_price, Location, PriceAggregation, PriceObservation, SourceTag,
};

/// What one source did for one query
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub tag: SourceTag,
    /// Number of usable observations, or why there were none
    pub result: std::result::Result<usize, SourceError>,
}

/// Pooled observations plus the per-source outcomes that produced them
#[derive(Debug, Clone)]
pub struct CollectedPrices {
    pub observations: Vec<PriceObservation>,
    pub outcomes: Vec<SourceOutcome>,
    pub used_fallback: bool,
}

/// Price aggregator over an ordered chain of sources ending in synthetic data
pub struct PriceAggregator {
    /// Real sources in priority order
    sources: Vec<Arc<dyn PriceSource>>,
    /// Terminal fallback; must never come back empty
    fallback: SyntheticFallbackProvider,
    source_timeout: Duration,
}

impl PriceAggregator {
    pub fn new(
        sources: Vec<Arc<dyn PriceSource>>,
        fallback: SyntheticFallbackProvider,
        source_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            fallback,
            source_timeout,
        }
    }

    /// Build the default chain: RegisteredMarket → RegionalBoard → CrowdSourced → Synthetic
    pub fn from_config(oracle: &OracleConfig, synthetic: &SyntheticConfig) -> Self {
        let mut sources: Vec<Arc<dyn PriceSource>> = Vec::new();
        if oracle.registered_market_enabled {
            sources.push(Arc::new(RegisteredMarketClient::new()));
        }
        if oracle.regional_board_enabled {
            sources.push(Arc::new(RegionalBoardClient::new()));
        }
        if oracle.crowd_sourced_enabled {
            sources.push(Arc::new(CrowdSourcedClient::new()));
        }

        Self::new(
            sources,
            SyntheticFallbackProvider::new(synthetic),
            oracle.source_timeout(),
        )
    }

    pub fn fallback(&self) -> &SyntheticFallbackProvider {
        &self.fallback
    }

    /// Tags of the real sources, in priority order
    pub fn source_tags(&self) -> Vec<SourceTag> {
        self.sources.iter().map(|s| s.tag()).collect()
    }

    /// Query every real source concurrently and pool the results,
    /// falling back to synthetic observations when nothing usable came back
    pub async fn collect(&self, commodity: &str, location: &Location) -> CollectedPrices {
        let normalized = normalize_commodity(commodity);
        let commodity = normalized.as_str();
        let timeout = self.source_timeout;

        let fetches = self.sources.iter().map(|source| async move {
            let tag = source.tag();
            let result =
                match tokio::time::timeout(timeout, source.fetch(commodity, location, timeout)).await
                {
                    Ok(Ok(observations)) => Ok(observations),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(SourceError::TimedOut { tag, after: timeout }),
                };
            (tag, result)
        });

        // join_all keeps input order, so outcomes stay in priority order
        let results = join_all(fetches).await;

        let mut observations = Vec::new();
        let mut outcomes = Vec::with_capacity(results.len());

        for (tag, result) in results {
            let result = match result {
                Ok(batch) => {
                    let total = batch.len();
                    let usable: Vec<PriceObservation> =
                        batch.into_iter().filter(|o| o.is_well_formed()).collect();
                    if usable.len() < total {
                        tracing::warn!(
                            source = %tag,
                            dropped = total - usable.len(),
                            "Dropped malformed observations"
                        );
                    }

                    if usable.is_empty() {
                        Err(SourceError::EmptyResult {
                            tag,
                            commodity: commodity.to_string(),
                        })
                    } else {
                        tracing::debug!(
                            source = %tag,
                            commodity = %commodity,
                            count = usable.len(),
                            "Source returned observations"
                        );
                        let count = usable.len();
                        observations.extend(usable);
                        Ok(count)
                    }
                }
                Err(e) => Err(e),
            };

            if let Err(e) = &result {
                if e.is_expected() {
                    tracing::info!(source = %tag, commodity = %commodity, "{}", e);
                } else {
                    tracing::warn!(source = %tag, commodity = %commodity, error = %e, "Source failed");
                }
            }

            outcomes.push(SourceOutcome { tag, result });
        }

        let used_fallback = observations.is_empty();
        if used_fallback {
            observations = self.fallback.generate(commodity, location);
            tracing::info!(
                commodity = %commodity,
                location = %location,
                count = observations.len(),
                "🧪 No real price data, using synthetic fallback"
            );
            outcomes.push(SourceOutcome {
                tag: SourceTag::Synthetic,
                result: Ok(observations.len()),
            });
        }

        CollectedPrices {
            observations,
            outcomes,
            used_fallback,
        }
    }

    /// Aggregate prices for a commodity at a location.
    /// Only fails on empty commodity input or a fallback defect.
    pub async fn aggregate_prices(
        &self,
        commodity: &str,
        location: &Location,
    ) -> Result<PriceAggregation> {
        let commodity = normalize_commodity(commodity);
        if commodity.is_empty() {
            return Err(OracleError::Validation(
                "commodity must not be empty".to_string(),
            ));
        }

        let collected = self.collect(&commodity, location).await;

        summarize(&commodity, location, &collected.observations)
            .ok_or_else(|| OracleError::FallbackFailed(commodity.clone()))
    }
}

impl Default for PriceAggregator {
    fn default() -> Self {
        Self::from_config(&OracleConfig::default(), &SyntheticConfig::default())
    }
}

/// Reduce a pool of observations to summary statistics.
/// Malformed observations do not contribute; `None` when nothing does.
pub fn summarize(
    commodity: &str,
    location: &Location,
    observations: &[PriceObservation],
) -> Option<PriceAggregation> {
    let contributing: Vec<&PriceObservation> =
        observations.iter().filter(|o| o.is_well_formed()).collect();
    if contributing.is_empty() {
        return None;
    }

    let mut prices: Vec<f64> = contributing.iter().map(|o| o.price).collect();
    prices.sort_by(|a, b| a.total_cmp(b));

    let n = prices.len();
    let average = prices.iter().sum::<f64>() / n as f64;
    let median = calculate_median(&prices);
    let std_dev = calculate_sample_std_dev(&prices, average);

    // Rounding is monotone, so min <= avg/median <= max survives it
    let min_price = round_price(prices[0]);
    let max_price = round_price(prices[n - 1]);

    let sources_used: BTreeSet<SourceTag> = contributing.iter().map(|o| o.source).collect();
    let is_demo = sources_used.iter().all(|s| !s.is_real());

    Some(PriceAggregation {
        commodity: normalize_commodity(commodity),
        location: location.clone(),
        min_price,
        max_price,
        average_price: round_price(average).clamp(min_price, max_price),
        median_price: round_price(median).clamp(min_price, max_price),
        std_dev: round_price(std_dev).max(0.0),
        sample_size: n,
        sources_used,
        is_demo,
        timestamp: Utc::now(),
    })
}

/// Median of sorted prices
fn calculate_median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sample standard deviation (n - 1), zero for a single price
fn calculate_sample_std_dev(prices: &[f64], mean: f64) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>()
        / (prices.len() - 1) as f64;
    variance.sqrt()
}
