use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RefinanceError;
use crate::types::{Money, Percent};
use crate::RefinanceResult;

/// Refinancing cost assumed for a custom offer that does not state one.
pub const DEFAULT_CUSTOM_REFINANCING_COST: Money = dec!(500);

const CUSTOM_OFFER_DESCRIPTION: &str = "Your own refinancing option";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One line of a refinancing cost breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeItem {
    pub label: String,
    pub amount: Money,
}

/// A named candidate refinancing offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinancingOffer {
    pub bank: String,
    pub interest_rate_percent: Percent,
    /// One-time fee charged for refinancing.
    pub refinancing_cost: Money,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cost_breakdown: Vec<FeeItem>,
}

/// An offer typed in by the user. It only counts once both the bank name and
/// the rate are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOffer {
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub interest_rate_percent: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinancing_cost: Option<Money>,
}

impl CustomOffer {
    pub fn is_complete(&self) -> bool {
        !self.bank.trim().is_empty() && self.interest_rate_percent.is_some()
    }

    /// The catalog-shaped offer, or `None` when the custom entry is incomplete.
    pub fn to_offer(&self) -> Option<RefinancingOffer> {
        let rate = self.interest_rate_percent?;
        if self.bank.trim().is_empty() {
            return None;
        }
        Some(RefinancingOffer {
            bank: self.bank.trim().to_string(),
            interest_rate_percent: rate,
            refinancing_cost: self
                .refinancing_cost
                .unwrap_or(DEFAULT_CUSTOM_REFINANCING_COST),
            description: CUSTOM_OFFER_DESCRIPTION.to_string(),
            cost_breakdown: Vec::new(),
        })
    }
}

/// Ordered list of candidate offers. Order is the display order and breaks
/// ties when ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCatalog {
    pub offers: Vec<RefinancingOffer>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn standard_fees(processing: Money, appraisal: Money, notarization: Money) -> Vec<FeeItem> {
    vec![
        FeeItem {
            label: "Application processing fee".into(),
            amount: processing,
        },
        FeeItem {
            label: "Property appraisal".into(),
            amount: appraisal,
        },
        FeeItem {
            label: "Contract notarization".into(),
            amount: notarization,
        },
    ]
}

impl Default for OfferCatalog {
    /// Static fallback list used when no catalog is supplied.
    fn default() -> Self {
        Self {
            offers: vec![
                RefinancingOffer {
                    bank: "Erste Bank".into(),
                    interest_rate_percent: dec!(4.2),
                    refinancing_cost: dec!(500),
                    description: "Most favourable refinancing offer".into(),
                    cost_breakdown: standard_fees(dec!(300), dec!(150), dec!(50)),
                },
                RefinancingOffer {
                    bank: "Zagrebačka Banka".into(),
                    interest_rate_percent: dec!(4.5),
                    refinancing_cost: dec!(600),
                    description: "Stable offer with a moderate rate".into(),
                    cost_breakdown: standard_fees(dec!(350), dec!(200), dec!(50)),
                },
                RefinancingOffer {
                    bank: "PBZ".into(),
                    interest_rate_percent: dec!(4.7),
                    refinancing_cost: dec!(550),
                    description: "Flexible refinancing terms".into(),
                    cost_breakdown: standard_fees(dec!(325), dec!(175), dec!(50)),
                },
            ],
        }
    }
}

impl OfferCatalog {
    pub fn from_json_str(json: &str) -> RefinanceResult<Self> {
        let catalog: OfferCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> RefinanceResult<()> {
        if self.offers.is_empty() {
            return Err(RefinanceError::InsufficientData(
                "Offer catalog must contain at least one offer.".into(),
            ));
        }
        for (i, offer) in self.offers.iter().enumerate() {
            if offer.bank.trim().is_empty() {
                return Err(RefinanceError::invalid(
                    &format!("offers[{i}].bank"),
                    "Bank name cannot be blank.",
                ));
            }
            if offer.interest_rate_percent < Decimal::ZERO {
                return Err(RefinanceError::invalid(
                    &format!("offers[{i}].interest_rate_percent"),
                    "Interest rate cannot be negative.",
                ));
            }
            if offer.refinancing_cost < Decimal::ZERO {
                return Err(RefinanceError::invalid(
                    &format!("offers[{i}].refinancing_cost"),
                    "Refinancing cost cannot be negative.",
                ));
            }
        }
        Ok(())
    }

    /// Candidate list for ranking: a complete custom offer first, then the
    /// catalog in order.
    pub fn candidates(&self, custom: Option<&CustomOffer>) -> Vec<RefinancingOffer> {
        let mut list = Vec::with_capacity(self.offers.len() + 1);
        if let Some(offer) = custom.and_then(CustomOffer::to_offer) {
            list.push(offer);
        }
        list.extend(self.offers.iter().cloned());
        list
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_catalog_order() {
        let catalog = OfferCatalog::default();
        let banks: Vec<&str> = catalog.offers.iter().map(|o| o.bank.as_str()).collect();
        assert_eq!(banks, vec!["Erste Bank", "Zagrebačka Banka", "PBZ"]);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_fee_breakdown_sums_to_cost() {
        for offer in OfferCatalog::default().offers {
            let sum: Money = offer.cost_breakdown.iter().map(|f| f.amount).sum();
            assert_eq!(sum, offer.refinancing_cost, "{}", offer.bank);
        }
    }

    #[test]
    fn test_custom_offer_prepended() {
        let custom = CustomOffer {
            bank: "My Bank".into(),
            interest_rate_percent: Some(dec!(3.9)),
            refinancing_cost: None,
        };
        let list = OfferCatalog::default().candidates(Some(&custom));
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].bank, "My Bank");
        assert_eq!(list[0].refinancing_cost, DEFAULT_CUSTOM_REFINANCING_COST);
        assert_eq!(list[1].bank, "Erste Bank");
    }

    #[test]
    fn test_incomplete_custom_offer_ignored() {
        let catalog = OfferCatalog::default();
        let no_rate = CustomOffer {
            bank: "My Bank".into(),
            interest_rate_percent: None,
            refinancing_cost: None,
        };
        let blank_bank = CustomOffer {
            bank: "  ".into(),
            interest_rate_percent: Some(dec!(3.9)),
            refinancing_cost: None,
        };
        assert_eq!(catalog.candidates(Some(&no_rate)).len(), 3);
        assert_eq!(catalog.candidates(Some(&blank_bank)).len(), 3);
        assert_eq!(catalog.candidates(None).len(), 3);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{"offers":[{"bank":"Local CU","interest_rate_percent":"3.75","refinancing_cost":"250","description":"Credit union"}]}"#;
        let catalog = OfferCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.offers.len(), 1);
        assert_eq!(catalog.offers[0].interest_rate_percent, dec!(3.75));
        assert!(catalog.offers[0].cost_breakdown.is_empty());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = OfferCatalog { offers: vec![] }.validate().unwrap_err();
        assert!(matches!(err, RefinanceError::InsufficientData(_)));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut catalog = OfferCatalog::default();
        catalog.offers[1].refinancing_cost = dec!(-10);
        match catalog.validate().unwrap_err() {
            RefinanceError::InvalidInput { field, .. } => {
                assert_eq!(field, "offers[1].refinancing_cost")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
