pub mod amortization;
pub mod annuity;
pub mod break_even;
pub mod costs;
pub mod error;
pub mod savings;
pub mod types;

#[cfg(feature = "offers")]
pub mod offers;

#[cfg(feature = "offers")]
pub mod analysis;

#[cfg(feature = "offers")]
pub mod form;

pub use error::RefinanceError;
pub use types::*;

/// Standard result type for all refinance operations
pub type RefinanceResult<T> = Result<T, RefinanceError>;
