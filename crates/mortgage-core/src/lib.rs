pub mod amortization;
pub mod error;
pub mod types;

#[cfg(feature = "products")]
pub mod products;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-core operations
pub type MortgageResult<T> = Result<T, MortgageError>;
