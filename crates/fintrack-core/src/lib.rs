pub mod error;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "goals")]
pub mod goals;

#[cfg(feature = "expenses")]
pub mod expenses;

#[cfg(feature = "store")]
pub mod store;

#[cfg(all(feature = "store", feature = "loans", feature = "goals", feature = "expenses"))]
pub mod ledger;

pub use error::FinTrackError;
pub use types::*;

/// Standard result type for all fintrack operations
pub type FinTrackResult<T> = Result<T, FinTrackError>;
