//! Core types used throughout the oracle
//!
//! Defines locations, price observations, aggregated summaries and quote verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::oracle::OracleError;

/// Lower-case and trim a commodity name
pub fn normalize_commodity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Round a price to two decimal places (paise)
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Geographic scope of a price query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    district: Option<String>,
}

#[derive(Deserialize)]
struct RawLocation {
    state: String,
    #[serde(default)]
    district: Option<String>,
}

impl TryFrom<RawLocation> for Location {
    type Error = OracleError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(&raw.state, raw.district.as_deref())
    }
}

impl Location {
    /// Build a location; the state is required, a blank district counts as absent
    pub fn new(state: &str, district: Option<&str>) -> Result<Self, OracleError> {
        let state = state.trim();
        if state.is_empty() {
            return Err(OracleError::Validation(
                "location state must not be empty".to_string(),
            ));
        }

        let district = district
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            state: state.to_string(),
            district,
        })
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// Lower-cased state used for table lookups
    pub fn state_key(&self) -> String {
        self.state.to_lowercase()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.district {
            Some(district) => write!(f, "{}, {}", district, self.state),
            None => write!(f, "{}", self.state),
        }
    }
}

/// Price source identifier, declared in fallback priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTag {
    /// National electronic market network
    RegisteredMarket,
    /// State mandi-board feeds
    RegionalBoard,
    /// User-submitted price reports
    CrowdSourced,
    /// Generated fallback data
    Synthetic,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::RegisteredMarket => "REGISTERED_MARKET",
            SourceTag::RegionalBoard => "REGIONAL_BOARD",
            SourceTag::CrowdSourced => "CROWD_SOURCED",
            SourceTag::Synthetic => "SYNTHETIC",
        }
    }

    /// Whether the tag identifies an upstream data source rather than generated data
    pub fn is_real(&self) -> bool {
        !matches!(self, SourceTag::Synthetic)
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One price reading from one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceObservation {
    pub commodity: String,
    pub price: f64,
    pub unit: String,
    pub market: String,
    pub source: SourceTag,
    pub timestamp: DateTime<Utc>,
    is_demo: bool,
}

impl PriceObservation {
    /// Create an observation from a raw upstream reading. The demo flag
    /// follows the source tag. Price and unit are taken as reported; check
    /// `is_well_formed` before letting the reading contribute to statistics
    /// (the aggregator drops readings that fail it).
    pub fn new(
        commodity: &str,
        price: f64,
        unit: &str,
        market: &str,
        source: SourceTag,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            commodity: normalize_commodity(commodity),
            price,
            unit: unit.to_string(),
            market: market.to_string(),
            source,
            timestamp,
            is_demo: source == SourceTag::Synthetic,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.is_demo
    }

    /// Positive finite price and a named unit
    pub fn is_well_formed(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && !self.unit.trim().is_empty()
    }
}

/// Statistical summary of the observations gathered for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAggregation {
    pub commodity: String,
    pub location: Location,
    pub min_price: f64,
    pub max_price: f64,
    pub average_price: f64,
    pub median_price: f64,
    pub std_dev: f64,
    pub sample_size: usize,
    pub sources_used: BTreeSet<SourceTag>,
    /// True when every observation came from the synthetic fallback
    pub is_demo: bool,
    pub timestamp: DateTime<Utc>,
}

/// Fairness classification of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Fair,
    SlightlyHigh,
    SlightlyLow,
    High,
    Low,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Fair => write!(f, "fair"),
            Verdict::SlightlyHigh => write!(f, "slightly high"),
            Verdict::SlightlyLow => write!(f, "slightly low"),
            Verdict::High => write!(f, "high"),
            Verdict::Low => write!(f, "low"),
        }
    }
}

/// Verdict on a trader's quote relative to the market average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalysis {
    pub commodity: String,
    pub quoted_price: f64,
    pub market_average: f64,
    pub percentage_difference: f64,
    pub verdict: Verdict,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_state() {
        assert!(Location::new("   ", None).is_err());

        let loc = Location::new(" Maharashtra ", Some("  ")).unwrap();
        assert_eq!(loc.state(), "Maharashtra");
        assert_eq!(loc.district(), None);
        assert_eq!(loc.state_key(), "maharashtra");
    }

    #[test]
    fn test_location_equality_by_fields() {
        let a = Location::new("Karnataka", Some("Kolar")).unwrap();
        let b = Location::new("Karnataka", Some("Kolar")).unwrap();
        let c = Location::new("Karnataka", None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "Kolar, Karnataka");
    }

    #[test]
    fn test_location_deserialization_rejects_blank_state() {
        let ok: Location = serde_json::from_str(r#"{"state":"Punjab"}"#).unwrap();
        assert_eq!(ok.state(), "Punjab");

        let bad: Result<Location, _> = serde_json::from_str(r#"{"state":""}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_observation_demo_flag_follows_source() {
        let now = Utc::now();
        let synthetic = PriceObservation::new(" Tomato ", 24.0, "kg", "Pune", SourceTag::Synthetic, now);
        let crowd = PriceObservation::new("tomato", 24.0, "kg", "Pune", SourceTag::CrowdSourced, now);

        assert!(synthetic.is_demo());
        assert!(!crowd.is_demo());
        assert_eq!(synthetic.commodity, "tomato");
    }

    #[test]
    fn test_raw_readings_checked_by_is_well_formed() {
        let now = Utc::now();
        let ok = PriceObservation::new("onion", 28.0, "kg", "Vashi", SourceTag::RegionalBoard, now);
        let zero = PriceObservation::new("onion", 0.0, "kg", "Vashi", SourceTag::RegionalBoard, now);
        let negative = PriceObservation::new("onion", -2.0, "kg", "Vashi", SourceTag::RegionalBoard, now);
        let nan = PriceObservation::new("onion", f64::NAN, "kg", "Vashi", SourceTag::RegionalBoard, now);
        let no_unit = PriceObservation::new("onion", 28.0, "  ", "Vashi", SourceTag::RegionalBoard, now);

        assert!(ok.is_well_formed());
        assert!(!zero.is_well_formed());
        assert!(!negative.is_well_formed());
        assert!(!nan.is_well_formed());
        assert!(!no_unit.is_well_formed());
    }

    #[test]
    fn test_source_tags_serialize_screaming_snake() {
        let json = serde_json::to_string(&SourceTag::RegisteredMarket).unwrap();
        assert_eq!(json, "\"REGISTERED_MARKET\"");
        assert_eq!(SourceTag::Synthetic.to_string(), "SYNTHETIC");
        assert!(SourceTag::RegisteredMarket < SourceTag::Synthetic);
    }

    #[test]
    fn test_verdict_serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::SlightlyHigh).unwrap();
        assert_eq!(json, "\"slightly_high\"");
    }

    #[test]
    fn test_round_price_two_decimals() {
        assert_eq!(round_price(24.456), 24.46);
        assert_eq!(round_price(24.0), 24.0);
    }
}
