//! This module defines errors returned by the library.
use bellpepper_core::SynthesisError;
use thiserror::Error;

/// Errors returned when building scalar-multiplication circuits
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EccError {
  /// returned if a lookup table or a batch multiplication is given no points
  #[error("EmptyBatch")]
  EmptyBatch,
  /// returned if the number of points and the number of scalars differ
  #[error("LengthMismatch: {points} points, {scalars} scalars")]
  LengthMismatch {
    /// number of points supplied
    points: usize,
    /// number of scalars supplied
    scalars: usize,
  },
  /// returned if a requested scalar bit length cannot be honoured
  #[error("InvalidBitLength: {reason}")]
  InvalidBitLength {
    /// The reason the bit length was rejected
    reason: String,
  },
  /// returned if a table is indexed with the wrong number of selector bits
  #[error("InvalidSelectorLength: expected {expected}, got {actual}")]
  InvalidSelectorLength {
    /// number of selectors the table consumes
    expected: usize,
    /// number of selectors supplied
    actual: usize,
  },
  /// returned when error during synthesis
  #[error("SynthesisError: {0}")]
  Synthesis(#[from] SynthesisError),
}
