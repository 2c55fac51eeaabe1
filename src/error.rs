//! Error types for the polyavol library.
//!
//! Every fallible operation returns `Result<T, PolyaVolError>` rather than
//! panicking. Per-element failures carry the batch index of the first
//! offending quote so callers can locate bad data in large batches.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, PolyaVolError>;

/// Errors raised by implied volatility extraction.
///
/// Only [`InvalidInput`](PolyaVolError::InvalidInput) is raised when
/// argument validation is disabled; the other variants are produced by the
/// no-arbitrage validator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolyaVolError {
    /// Malformed call: mismatched batch lengths, bad polya factor, etc.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Forward or strike not positive, or expiry negative.
    #[error("invalid domain at index {index}: {message}")]
    InvalidDomain {
        /// Batch position of the offending quote.
        index: usize,
        message: String,
    },

    /// Undiscounted price outside the no-arbitrage band for its option type.
    #[error("arbitrage violation at index {index}: {message}")]
    ArbitrageViolation {
        /// Batch position of the offending quote.
        index: usize,
        message: String,
    },

    /// Undiscounted price within epsilon of a no-arbitrage bound.
    #[error("numerical instability at index {index}: {message}")]
    NumericalInstability {
        /// Batch position of the offending quote.
        index: usize,
        message: String,
    },
}

impl PolyaVolError {
    /// Batch index of the offending quote, if the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            PolyaVolError::InvalidInput { .. } => None,
            PolyaVolError::InvalidDomain { index, .. }
            | PolyaVolError::ArbitrageViolation { index, .. }
            | PolyaVolError::NumericalInstability { index, .. } => Some(*index),
        }
    }
}
