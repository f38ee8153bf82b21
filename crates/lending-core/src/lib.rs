pub mod calendar;
pub mod error;
pub mod progress;
pub mod rounding;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "penalty")]
pub mod penalty;

pub use error::LendingError;
pub use types::*;

/// Standard result type for all lending operations
pub type LendingResult<T> = Result<T, LendingError>;
