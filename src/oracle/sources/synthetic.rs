//! Synthetic fallback provider
//!
//! Generates plausible multi-market prices when no real source answers.
//! Each observation is `base × regional multiplier × (1 ± jitter)`. Pure:
//! no I/O, read-only tables, and never returns an empty set.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::config::SyntheticConfig;
use crate::oracle::sources::{PriceSource, SourceError};
use crate::types::{normalize_commodity, round_price, Location, PriceObservation, SourceTag};

/// Approximate retail price per unit: (commodity, price, unit)
const BASE_PRICES: &[(&str, f64, &str)] = &[
    ("apple", 120.0, "kg"),
    ("banana", 40.0, "dozen"),
    ("brinjal", 28.0, "kg"),
    ("cabbage", 18.0, "kg"),
    ("cauliflower", 30.0, "kg"),
    ("garlic", 120.0, "kg"),
    ("ginger", 90.0, "kg"),
    ("green chilli", 60.0, "kg"),
    ("mango", 80.0, "kg"),
    ("okra", 35.0, "kg"),
    ("onion", 30.0, "kg"),
    ("potato", 22.0, "kg"),
    ("rice", 45.0, "kg"),
    ("sugar", 42.0, "kg"),
    ("tomato", 25.0, "kg"),
    ("tur dal", 130.0, "kg"),
    ("wheat", 28.0, "kg"),
];

/// Known regional skew: (commodity, lower-cased state, multiplier)
const REGIONAL_MULTIPLIERS: &[(&str, &str, f64)] = &[
    ("apple", "himachal pradesh", 0.85),
    ("apple", "jammu and kashmir", 0.82),
    ("banana", "kerala", 0.90),
    ("banana", "tamil nadu", 0.92),
    ("onion", "delhi", 1.08),
    ("onion", "karnataka", 1.00),
    ("onion", "maharashtra", 0.92),
    ("potato", "uttar pradesh", 0.90),
    ("potato", "west bengal", 0.92),
    ("rice", "punjab", 0.93),
    ("rice", "tamil nadu", 0.95),
    ("tomato", "delhi", 1.10),
    ("tomato", "karnataka", 0.90),
    ("tomato", "maharashtra", 0.95),
    ("wheat", "madhya pradesh", 0.94),
    ("wheat", "punjab", 0.90),
];

/// Well-known market yards per state, used to name synthetic observations
const KNOWN_MARKETS: &[(&str, &[&str])] = &[
    ("delhi", &["Azadpur", "Okhla", "Ghazipur", "Narela"]),
    ("karnataka", &["Yeshwanthpur", "Hubli", "Mysuru", "Kolar"]),
    ("maharashtra", &["Lasalgaon", "Pune", "Nashik", "Vashi", "Nagpur"]),
    ("punjab", &["Khanna", "Amritsar", "Jalandhar", "Ludhiana"]),
    ("tamil nadu", &["Koyambedu", "Madurai", "Coimbatore", "Salem"]),
    ("uttar pradesh", &["Agra", "Kanpur", "Lucknow", "Varanasi"]),
    ("west bengal", &["Siliguri", "Burdwan", "Howrah", "Sealdah"]),
];

/// Centre of the band used for commodities missing from the table
const GENERIC_BASE_PRICE: f64 = 20.0;
/// Every price generated for an unknown commodity lies in this band
pub const GENERIC_PRICE_BAND: (f64, f64) = (16.0, 24.0);
const GENERIC_UNIT: &str = "kg";

#[derive(Debug, Clone)]
pub struct SyntheticFallbackProvider {
    sample_count: usize,
    jitter_pct: f64,
    seed: Option<u64>,
}

impl SyntheticFallbackProvider {
    pub fn new(config: &SyntheticConfig) -> Self {
        Self {
            sample_count: config.sample_count.max(1),
            jitter_pct: config.jitter_pct.clamp(0.0, 0.49),
            seed: config.seed,
        }
    }

    /// Commodities with a known base price, sorted
    pub fn known_commodities() -> Vec<String> {
        let mut names: Vec<String> = BASE_PRICES.iter().map(|(c, _, _)| c.to_string()).collect();
        names.sort();
        names
    }

    pub fn base_price(commodity: &str) -> Option<(f64, &'static str)> {
        let commodity = normalize_commodity(commodity);
        BASE_PRICES
            .iter()
            .find(|(c, _, _)| *c == commodity)
            .map(|(_, price, unit)| (*price, *unit))
    }

    /// Regional multiplier for a commodity in a state, 1.0 when no skew is known
    pub fn regional_multiplier(commodity: &str, state: &str) -> f64 {
        let commodity = normalize_commodity(commodity);
        let state = state.trim().to_lowercase();
        REGIONAL_MULTIPLIERS
            .iter()
            .find(|(c, s, _)| *c == commodity && *s == state)
            .map(|(_, _, m)| *m)
            .unwrap_or(1.0)
    }

    /// Generate synthetic observations. Always returns `sample_count` entries.
    pub fn generate(&self, commodity: &str, location: &Location) -> Vec<PriceObservation> {
        let commodity = normalize_commodity(commodity);
        let now = Utc::now();
        let mut rng = self.rng();

        let (base, unit, known) = match Self::base_price(&commodity) {
            Some((price, unit)) => (price, unit, true),
            None => (GENERIC_BASE_PRICE, GENERIC_UNIT, false),
        };
        let multiplier = if known {
            Self::regional_multiplier(&commodity, location.state())
        } else {
            1.0
        };

        (0..self.sample_count)
            .map(|i| {
                let jitter = if self.jitter_pct > 0.0 {
                    rng.gen_range(-self.jitter_pct..=self.jitter_pct)
                } else {
                    0.0
                };
                let mut price = base * multiplier * (1.0 + jitter);
                if !known {
                    price = price.clamp(GENERIC_PRICE_BAND.0, GENERIC_PRICE_BAND.1);
                }

                PriceObservation::new(
                    &commodity,
                    round_price(price),
                    unit,
                    &market_name(location, i),
                    SourceTag::Synthetic,
                    now,
                )
            })
            .collect()
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for SyntheticFallbackProvider {
    fn default() -> Self {
        Self::new(&SyntheticConfig::default())
    }
}

fn market_name(location: &Location, index: usize) -> String {
    let state = location.state_key();
    let known = KNOWN_MARKETS
        .iter()
        .find(|(s, _)| *s == state)
        .and_then(|(_, markets)| markets.get(index));

    match known {
        Some(name) => format!("{} APMC", name),
        None => format!(
            "{} Market {}",
            location.district().unwrap_or(location.state()),
            index + 1
        ),
    }
}

#[async_trait]
impl PriceSource for SyntheticFallbackProvider {
    fn tag(&self) -> SourceTag {
        SourceTag::Synthetic
    }

    async fn fetch(
        &self,
        commodity: &str,
        location: &Location,
        _timeout: Duration,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        Ok(self.generate(commodity, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(seed: Option<u64>) -> SyntheticFallbackProvider {
        SyntheticFallbackProvider::new(&SyntheticConfig {
            sample_count: 6,
            jitter_pct: 0.10,
            seed,
        })
    }

    #[test]
    fn test_generates_demo_observations_within_jitter() {
        let location = Location::new("Maharashtra", None).unwrap();
        let observations = provider(None).generate("Tomato ", &location);

        assert_eq!(observations.len(), 6);
        // 25.0 * 0.95 = 23.75, ±10%
        for obs in &observations {
            assert!(obs.is_demo());
            assert_eq!(obs.source, SourceTag::Synthetic);
            assert_eq!(obs.commodity, "tomato");
            assert_eq!(obs.unit, "kg");
            assert!(obs.price >= 21.37 && obs.price <= 26.13, "price {}", obs.price);
        }
    }

    #[test]
    fn test_unknown_commodity_stays_in_generic_band() {
        let location = Location::new("Maharashtra", None).unwrap();
        let wide = SyntheticFallbackProvider::new(&SyntheticConfig {
            sample_count: 50,
            jitter_pct: 0.45,
            seed: Some(7),
        });

        for obs in wide.generate("unknown_root_vegetable", &location) {
            assert!(obs.price >= GENERIC_PRICE_BAND.0 && obs.price <= GENERIC_PRICE_BAND.1);
        }
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let location = Location::new("Delhi", None).unwrap();
        let a: Vec<f64> = provider(Some(42)).generate("onion", &location).iter().map(|o| o.price).collect();
        let b: Vec<f64> = provider(Some(42)).generate("onion", &location).iter().map(|o| o.price).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_sample_count_still_returns_one() {
        let provider = SyntheticFallbackProvider::new(&SyntheticConfig {
            sample_count: 0,
            jitter_pct: 0.0,
            seed: None,
        });
        let location = Location::new("Goa", None).unwrap();
        let observations = provider.generate("rice", &location);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].price, 45.0);
    }

    #[test]
    fn test_multipliers_and_lookups() {
        assert_eq!(SyntheticFallbackProvider::regional_multiplier("onion", "Maharashtra"), 0.92);
        assert_eq!(SyntheticFallbackProvider::regional_multiplier("onion", " DELHI "), 1.08);
        assert_eq!(SyntheticFallbackProvider::regional_multiplier("onion", "Goa"), 1.0);
        assert_eq!(SyntheticFallbackProvider::base_price("BANANA"), Some((40.0, "dozen")));
        assert_eq!(SyntheticFallbackProvider::base_price("kohlrabi"), None);
    }

    #[test]
    fn test_known_commodities_sorted() {
        let names = SyntheticFallbackProvider::known_commodities();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"tomato".to_string()));
    }

    #[test]
    fn test_market_names_use_known_yards_then_numbering() {
        let maharashtra = Location::new("Maharashtra", None).unwrap();
        assert_eq!(market_name(&maharashtra, 0), "Lasalgaon APMC");
        assert_eq!(market_name(&maharashtra, 7), "Maharashtra Market 8");

        let goa = Location::new("Goa", Some("Panaji")).unwrap();
        assert_eq!(market_name(&goa, 1), "Panaji Market 2");
    }
}
