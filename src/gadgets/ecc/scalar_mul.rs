//! Constrained multi-scalar multiplication.
//!
//! Every scalar is recoded into `n` digits in `{-1, 1}` (see `naf`), and the points are placed
//! in a `BatchLookupTable`. The accumulator starts at the table's initial entry plus an offset
//! generator `G`, then each of the remaining `n - 1` rounds computes `acc = 2 acc + T` with one
//! Montgomery ladder step, where `T` is the table entry selected by the round's digits. Skews are
//! removed with conditional subtractions, and the constant `2^(n-1) G` is subtracted last.
//!
//! `G` is hash-derived, so inputs built without knowledge of its discrete logarithm never meet
//! an exceptional case of the affine formulas. Inputs that do (a point equal to `G`, or a result
//! at infinity such as a zero scalar) leave the circuit unsatisfiable.
use super::{
  naf::{compute_nafs, NafDigits},
  tables::{BatchLookupTable, LookupTable},
  CurvePoint,
};
use crate::{
  errors::EccError,
  gadgets::nonnative::field::ForeignFieldElement,
  provider::{generators::OffsetGenerators, CurveParams, FieldParams},
};
use bellpepper_core::{boolean::Boolean, ConstraintSystem};
use ff::PrimeField;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// A scalar of the curve `C`, held in a circuit over `F`
pub type Scalar<F, C> = ForeignFieldElement<F, <C as CurveParams>::Scalar>;

/// Runtime settings of a `ScalarMultiplier`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulConfig {
  /// Number of digits per scalar when a call does not say otherwise.
  /// `None` stands for the bit length of the curve order.
  pub max_num_bits: Option<usize>,
}

/// Builds scalar-multiplication circuits for the curve `C`
#[derive(Clone, Debug, Default)]
pub struct ScalarMultiplier<F: PrimeField, C: CurveParams> {
  config: MulConfig,
  _p: PhantomData<(F, C)>,
}

// points, their digits, and the round at which their most significant digit enters
struct Group<F: PrimeField, C: CurveParams> {
  points: Vec<CurvePoint<F, C>>,
  digits: Vec<NafDigits>,
  table: BatchLookupTable<F, C>,
  start: usize,
}

impl<F: PrimeField, C: CurveParams> Group<F, C> {
  fn new<CS: ConstraintSystem<F>>(
    mut cs: CS,
    points: &[CurvePoint<F, C>],
    scalars: &[Scalar<F, C>],
    num_bits: usize,
    start: usize,
  ) -> Result<Self, EccError> {
    let digits = compute_nafs(cs.namespace(|| "digits"), scalars, num_bits)?;
    let table = BatchLookupTable::new(cs.namespace(|| "table"), points)?;
    Ok(Self {
      points: points.to_vec(),
      digits,
      table,
      start,
    })
  }

  fn round_digits(&self, round: usize) -> Vec<Boolean> {
    self
      .digits
      .iter()
      .map(|d| d.digits[round - self.start].clone())
      .collect()
  }
}

fn check_lengths<F: PrimeField, C: CurveParams>(
  points: &[CurvePoint<F, C>],
  scalars: &[Scalar<F, C>],
) -> Result<(), EccError> {
  if points.is_empty() {
    return Err(EccError::EmptyBatch);
  }
  if points.len() != scalars.len() {
    return Err(EccError::LengthMismatch {
      points: points.len(),
      scalars: scalars.len(),
    });
  }
  Ok(())
}

impl<F: PrimeField, C: CurveParams> ScalarMultiplier<F, C> {
  pub fn new(config: MulConfig) -> Self {
    Self {
      config,
      _p: PhantomData,
    }
  }

  pub fn config(&self) -> &MulConfig {
    &self.config
  }

  fn num_bits(&self, max_num_bits: Option<usize>) -> Result<usize, EccError> {
    let full = C::Scalar::num_bits();
    let n = max_num_bits.or(self.config.max_num_bits).unwrap_or(full);
    if n == 0 || n > full {
      return Err(EccError::InvalidBitLength {
        reason: format!("{n} digits requested, scalars of {} have {full} bits", C::NAME),
      });
    }
    Ok(n)
  }

  /// Returns `scalar * point`
  pub fn single_mul<CS: ConstraintSystem<F>>(
    &self,
    cs: CS,
    point: &CurvePoint<F, C>,
    scalar: &Scalar<F, C>,
  ) -> Result<CurvePoint<F, C>, EccError> {
    self.batch_mul(
      cs,
      std::slice::from_ref(point),
      std::slice::from_ref(scalar),
      None,
    )
  }

  /// Returns `k0 * p0 + k1 * p1`
  pub fn twin_mul<CS: ConstraintSystem<F>>(
    &self,
    cs: CS,
    p0: &CurvePoint<F, C>,
    k0: &Scalar<F, C>,
    p1: &CurvePoint<F, C>,
    k1: &Scalar<F, C>,
  ) -> Result<CurvePoint<F, C>, EccError> {
    self.batch_mul(
      cs,
      &[p0.clone(), p1.clone()],
      &[k0.clone(), k1.clone()],
      None,
    )
  }

  /// Returns `sum_i k_i * p_i` over four points
  pub fn quad_mul<CS: ConstraintSystem<F>>(
    &self,
    cs: CS,
    points: &[CurvePoint<F, C>; 4],
    scalars: &[Scalar<F, C>; 4],
  ) -> Result<CurvePoint<F, C>, EccError> {
    self.batch_mul(cs, points, scalars, None)
  }

  /// Returns `sum_i k_i * p_i`, each scalar recoded into `max_num_bits` digits (or the
  /// configured default). A scalar that does not fit leaves the circuit unsatisfiable.
  #[tracing::instrument(
    skip_all,
    name = "ScalarMultiplier::batch_mul",
    fields(points = points.len())
  )]
  pub fn batch_mul<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    points: &[CurvePoint<F, C>],
    scalars: &[Scalar<F, C>],
    max_num_bits: Option<usize>,
  ) -> Result<CurvePoint<F, C>, EccError> {
    check_lengths(points, scalars)?;
    let num_bits = self.num_bits(max_num_bits)?;
    let group = Group::new(cs.namespace(|| "points"), points, scalars, num_bits, 0)?;
    Self::accumulate(cs.namespace(|| "accumulate"), &group, None, num_bits)
  }

  /// Returns `sum_i k_i * p_i + sum_j s_j * q_j`, where the scalars `s_j` are known to fit in
  /// `small_bits` bits. The small scalars only take part in the last `small_bits` rounds.
  #[tracing::instrument(
    skip_all,
    name = "ScalarMultiplier::mixed_batch_mul",
    fields(big = big_points.len(), small = small_points.len(), small_bits = small_bits)
  )]
  pub fn mixed_batch_mul<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    big_points: &[CurvePoint<F, C>],
    big_scalars: &[Scalar<F, C>],
    small_points: &[CurvePoint<F, C>],
    small_scalars: &[Scalar<F, C>],
    small_bits: usize,
  ) -> Result<CurvePoint<F, C>, EccError> {
    if small_points.is_empty() && small_scalars.is_empty() {
      return self.batch_mul(cs, big_points, big_scalars, None);
    }
    check_lengths(small_points, small_scalars)?;
    if big_points.is_empty() && big_scalars.is_empty() {
      return self.batch_mul(cs, small_points, small_scalars, Some(small_bits));
    }
    check_lengths(big_points, big_scalars)?;

    let num_bits = self.num_bits(None)?;
    if small_bits == 0 || small_bits > num_bits {
      return Err(EccError::InvalidBitLength {
        reason: format!("{small_bits} small digits against {num_bits} digits"),
      });
    }

    let big = Group::new(cs.namespace(|| "big"), big_points, big_scalars, num_bits, 0)?;
    let small = Group::new(
      cs.namespace(|| "small"),
      small_points,
      small_scalars,
      small_bits,
      num_bits - small_bits,
    )?;
    Self::accumulate(cs.namespace(|| "accumulate"), &big, Some(&small), num_bits)
  }

  fn accumulate<CS: ConstraintSystem<F>>(
    mut cs: CS,
    big: &Group<F, C>,
    small: Option<&Group<F, C>>,
    num_bits: usize,
  ) -> Result<CurvePoint<F, C>, EccError> {
    let offset = OffsetGenerators::<C>::new(num_bits).ok_or_else(|| EccError::InvalidBitLength {
      reason: format!("no offset generator for {num_bits} rounds"),
    })?;
    let generator = CurvePoint::constant(&offset.generator)?;

    let mut acc = big
      .table
      .initial_entry()
      .add(cs.namespace(|| "initial"), &generator)?;
    // a small group spanning every round enters with the big one
    if let Some(small) = small.filter(|s| s.start == 0) {
      acc = acc.add(cs.namespace(|| "small initial"), small.table.initial_entry())?;
    }

    for round in 1..num_bits {
      let mut cs = cs.namespace(|| format!("round {round}"));
      let entry = big
        .table
        .get(cs.namespace(|| "big entry"), &big.round_digits(round))?;
      acc = acc.montgomery_ladder(cs.namespace(|| "ladder"), &entry)?;

      if let Some(small) = small.filter(|s| round >= s.start) {
        let entry = if round == small.start {
          small.table.initial_entry().clone()
        } else {
          small
            .table
            .get(cs.namespace(|| "small entry"), &small.round_digits(round))?
        };
        acc = acc.add(cs.namespace(|| "small add"), &entry)?;
      }
    }

    for (g, group) in std::iter::once(big).chain(small).enumerate() {
      for (j, (point, digits)) in group.points.iter().zip(&group.digits).enumerate() {
        let mut cs = cs.namespace(|| format!("skew {g} {j}"));
        let corrected = acc.sub(cs.namespace(|| "sub"), point)?;
        acc = acc.conditional_select(cs.namespace(|| "select"), &corrected, &digits.skew)?;
      }
    }

    let correction = CurvePoint::constant(&offset.correction)?;
    tracing::debug!(rounds = num_bits, curve = C::NAME, "scalar multiplication rounds done");
    Ok(acc.sub(cs.namespace(|| "remove offset"), &correction)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::secp256k1::Secp256k1;
  use bellpepper_core::test_cs::TestConstraintSystem;
  use halo2curves::bn256::Fr;
  use num_bigint::BigInt;

  type Mul = ScalarMultiplier<Fr, Secp256k1>;

  #[test]
  fn test_config_deserializes() {
    let config: MulConfig = serde_json::from_str(r#"{ "max_num_bits": 16 }"#).unwrap();
    assert_eq!(config.max_num_bits, Some(16));
    let config: MulConfig = serde_json::from_str(r#"{ "max_num_bits": null }"#).unwrap();
    assert_eq!(config, MulConfig::default());
  }

  #[test]
  fn test_structural_errors() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let mul = Mul::new(MulConfig::default());
    let p = CurvePoint::<Fr, Secp256k1>::one().unwrap();
    let k = Scalar::<Fr, Secp256k1>::constant(&BigInt::from(3u8)).unwrap();

    assert!(matches!(
      mul.batch_mul(cs.namespace(|| "empty"), &[], &[], None),
      Err(EccError::EmptyBatch)
    ));
    assert!(matches!(
      mul.batch_mul(cs.namespace(|| "mismatch"), &[p.clone()], &[k.clone(), k.clone()], None),
      Err(EccError::LengthMismatch {
        points: 1,
        scalars: 2
      })
    ));
    assert!(matches!(
      mul.batch_mul(cs.namespace(|| "zero bits"), &[p.clone()], &[k.clone()], Some(0)),
      Err(EccError::InvalidBitLength { .. })
    ));
    assert!(matches!(
      mul.batch_mul(cs.namespace(|| "too many bits"), &[p.clone()], &[k.clone()], Some(257)),
      Err(EccError::InvalidBitLength { .. })
    ));
    let small = Mul::new(MulConfig {
      max_num_bits: Some(8),
    });
    assert!(matches!(
      small.mixed_batch_mul(
        cs.namespace(|| "small too wide"),
        &[p.clone()],
        &[k.clone()],
        &[p],
        &[k],
        9
      ),
      Err(EccError::InvalidBitLength { .. })
    ));
    assert_eq!(cs.num_constraints(), 0);
  }

  #[test]
  fn test_constant_inputs_fold() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let mul = Mul::new(MulConfig {
      max_num_bits: Some(4),
    });
    let p = CurvePoint::<Fr, Secp256k1>::one().unwrap();
    let k = Scalar::<Fr, Secp256k1>::constant(&BigInt::from(11u8)).unwrap();
    let r = mul.single_mul(cs.namespace(|| "mul"), &p, &k).unwrap();
    assert_eq!(r.value(), Secp256k1::one().mul(&BigInt::from(11u8)));
    assert!(cs.is_satisfied());
  }
}
