//! Deterministic schedule generators behind the simcalc calculators.
//!
//! Every calculator is a pure function from an input struct to a
//! [`ComputationOutput`] envelope. Nothing here performs I/O or keeps state
//! between calls; identical inputs always produce identical outputs.

pub mod error;
pub mod numeric;
pub mod time_value;
pub mod types;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "cvp")]
pub mod cvp;

#[cfg(feature = "reaction")]
pub mod reaction;

pub use error::SimCalcError;
pub use types::*;

/// Standard result type for all simcalc operations
pub type SimCalcResult<T> = Result<T, SimCalcError>;
