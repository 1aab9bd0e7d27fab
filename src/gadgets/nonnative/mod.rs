//! This module implements the gadgets needed for arithmetic over a foreign prime field.
//! `bignat` and `util` are adapted from [bellman-bignat](https://github.com/alex-ozdemir/bellman-bignat),
//! which is licenced under MIT
use bellpepper_core::SynthesisError;
use ff::PrimeField;
use serde::{Deserialize, Serialize};

pub(crate) trait OptionExt<T> {
  fn grab(&self) -> Result<&T, SynthesisError>;
}

impl<T> OptionExt<T> for Option<T> {
  fn grab(&self) -> Result<&T, SynthesisError> {
    self.as_ref().ok_or(SynthesisError::AssignmentMissing)
  }
}

trait BitAccess {
  fn get_bit(&self, i: usize) -> Option<bool>;
}

impl<Scalar: PrimeField> BitAccess for Scalar {
  fn get_bit(&self, i: usize) -> Option<bool> {
    if i as u32 >= Scalar::NUM_BITS {
      return None;
    }

    let (byte_pos, bit_pos) = (i / 8, i % 8);
    let byte = self.to_repr().as_ref()[byte_pos];
    let bit = byte >> bit_pos & 1;
    Some(bit == 1)
  }
}

/// Where the value of a circuit quantity comes from.
///
/// Constants are known when the circuit is built and cost no constraints; anything touched by a
/// witness is a witness. Merging is total, so a binary operation always has a well-defined origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
  /// Fixed when the circuit is built
  Constant,
  /// Depends on the prover's assignment
  Witness,
}

impl Provenance {
  /// Combines the origins of two operands
  pub fn merge(self, other: Self) -> Self {
    match (self, other) {
      (Provenance::Constant, Provenance::Constant) => Provenance::Constant,
      _ => Provenance::Witness,
    }
  }

  /// Returns true for circuit constants
  pub fn is_constant(self) -> bool {
    self == Provenance::Constant
  }
}

pub mod bignat;
pub mod field;
pub mod util;
