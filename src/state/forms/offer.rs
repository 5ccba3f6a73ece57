//! Program offer the Apply flow is opened for

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A purchasable program: seeds the Apply form and the price breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    pub base_price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for Offer {
    /// Fallback offer used when the page opens the flow without one
    fn default() -> Self {
        Self {
            title: "AI & Data Bootcamp".to_string(),
            category: "Bootcamp".to_string(),
            bullets: vec![
                "12 weeks, live online".to_string(),
                "Mentored capstone project".to_string(),
                "Internship placement support".to_string(),
            ],
            base_price: Decimal::new(149900, 2),
            currency: default_currency(),
        }
    }
}

impl Offer {
    /// Read an offer from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading offer {}", path.display()))?;
        let offer = serde_json::from_str(&content)
            .with_context(|| format!("parsing offer {}", path.display()))?;
        Ok(offer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_offer_price() {
        let offer = Offer::default();
        assert_eq!(offer.base_price, dec!(1499.00));
        assert_eq!(offer.currency, "EUR");
        assert!(!offer.bullets.is_empty());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{"title": "Custom Training", "category": "Training", "base_price": "2500"}"#;
        let offer: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.base_price, dec!(2500));
        assert_eq!(offer.currency, "EUR");
        assert!(offer.bullets.is_empty());
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let result = Offer::from_file(Path::new("/definitely/not/here.json"));
        assert!(result.is_err());
    }
}
