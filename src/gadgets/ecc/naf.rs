//! Signed-digit recoding of scalars.
//!
//! A scalar `k < 2^n` is written as `sum_i d_i 2^i - skew` with every digit `d_i` in `{-1, 1}`.
//! The stream has the same length for every scalar, so the shape of a circuit does not depend on
//! the scalar. Even scalars set `skew`, which the multiplier undoes with one conditional
//! subtraction.
use crate::{gadgets::nonnative::field::ForeignFieldElement, provider::FieldParams};
use bellpepper_core::{
  boolean::{AllocatedBit, Boolean},
  ConstraintSystem, SynthesisError,
};
use ff::PrimeField;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use rayon::prelude::*;

/// The digits of one scalar, most significant first. `true` stands for `-1`.
#[derive(Clone)]
pub struct NafDigits {
  pub digits: Vec<Boolean>,
  pub skew: Boolean,
}

impl NafDigits {
  /// The number of digits
  pub fn len(&self) -> usize {
    self.digits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.digits.is_empty()
  }

  /// `sum_i d_i 2^i - skew`, if the digits are known
  pub fn value(&self) -> Option<BigInt> {
    let sum = self.digits.iter().try_fold(BigInt::zero(), |acc, d| {
      d.get_value()
        .map(|neg| (acc << 1) + if neg { -1 } else { 1 })
    })?;
    Some(sum - u8::from(self.skew.get_value()?))
  }
}

/// Digits computed outside the circuit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NafWitness {
  /// Set for even scalars
  pub skew: bool,
  /// `negatives[i]` is set when the digit of weight `2^i` is `-1`; the top digit is always `1`
  /// and is not stored
  pub negatives: Vec<bool>,
}

impl NafWitness {
  /// Recodes `k` into `num_bits` digits. `None` when `k` is negative or does not fit.
  pub fn new(k: &BigInt, num_bits: usize) -> Option<Self> {
    if num_bits == 0 || k.sign() == num_bigint::Sign::Minus || k.bits() as usize > num_bits {
      return None;
    }
    let skew = k.is_even();
    let odd = k + u8::from(skew);
    // sum_i d_i 2^i = 2^n - 1 - 2 N, with N collecting the negative digits
    let n: BigInt = ((BigInt::one() << num_bits) - 1u8 - odd) >> 1;
    if n.sign() == num_bigint::Sign::Minus {
      return None;
    }
    let negatives = (0..num_bits - 1).map(|i| n.bit(i as u64)).collect();
    Some(Self { skew, negatives })
  }

  /// The digits as integers, most significant first
  pub fn digits(&self) -> Vec<i8> {
    std::iter::once(1)
      .chain(self.negatives.iter().rev().map(|neg| if *neg { -1 } else { 1 }))
      .collect()
  }

  /// The scalar the digits encode
  pub fn scalar(&self) -> BigInt {
    self
      .digits()
      .into_iter()
      .fold(BigInt::zero(), |acc, d| (acc << 1) + d)
      - u8::from(self.skew)
  }
}

/// Recodes a scalar into `num_bits` digits and constrains the digits to encode it
pub fn compute_naf<F, P, CS>(
  cs: CS,
  scalar: &ForeignFieldElement<F, P>,
  num_bits: usize,
) -> Result<NafDigits, SynthesisError>
where
  F: PrimeField,
  P: FieldParams,
  CS: ConstraintSystem<F>,
{
  compute_nafs(cs, std::slice::from_ref(scalar), num_bits)?
    .pop()
    .ok_or(SynthesisError::Unsatisfiable)
}

/// Recodes many scalars. The digit witnesses are computed in parallel; allocation and
/// constraints follow in input order.
pub fn compute_nafs<F, P, CS>(
  mut cs: CS,
  scalars: &[ForeignFieldElement<F, P>],
  num_bits: usize,
) -> Result<Vec<NafDigits>, SynthesisError>
where
  F: PrimeField,
  P: FieldParams,
  CS: ConstraintSystem<F>,
{
  if num_bits == 0 {
    return Err(SynthesisError::Unsatisfiable);
  }
  let values = scalars.iter().map(|s| s.value()).collect::<Vec<_>>();
  let witnesses: Vec<Option<NafWitness>> = values
    .par_iter()
    .map(|v| {
      v.as_ref().map(|k| {
        // an oversized scalar gets an arbitrary stream, which the range constraint rejects
        NafWitness::new(k, num_bits).unwrap_or_else(|| NafWitness {
          skew: false,
          negatives: vec![false; num_bits - 1],
        })
      })
    })
    .collect();

  scalars
    .iter()
    .zip(witnesses)
    .enumerate()
    .map(|(j, (scalar, witness))| {
      let mut cs = cs.namespace(|| format!("scalar {j}"));
      let skew = Boolean::from(AllocatedBit::alloc(
        cs.namespace(|| "skew"),
        witness.as_ref().map(|w| w.skew),
      )?);
      let negatives = (0..num_bits - 1)
        .map(|i| {
          AllocatedBit::alloc(
            cs.namespace(|| format!("digit {i}")),
            witness.as_ref().map(|w| w.negatives[i]),
          )
          .map(Boolean::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

      // scalar + skew + 2 N = 2^n - 1
      let bits = std::iter::once(skew.clone())
        .chain(negatives.iter().cloned())
        .collect::<Vec<_>>();
      let recoded = scalar.add(&ForeignFieldElement::from_bits_le(&bits)?)?;
      let all_ones = ForeignFieldElement::constant(&((BigInt::one() << num_bits) - 1u8))?;
      recoded.assert_equal(cs.namespace(|| "recoding"), &all_ones)?;

      let digits = std::iter::once(Boolean::constant(false))
        .chain(negatives.into_iter().rev())
        .collect();
      Ok(NafDigits { digits, skew })
    })
    .collect()
}
