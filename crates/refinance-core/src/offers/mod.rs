pub mod catalog;
pub mod ranking;

pub use catalog::{CustomOffer, FeeItem, OfferCatalog, RefinancingOffer};
pub use ranking::{generate_offers, rank_offers, CurrentLoan, OffersOutput, RankedOffer, RefinancingInput};
