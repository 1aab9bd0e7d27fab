//! Deterministic generator derivation and the process-wide caches built on it.
//!
//! Derived generators are independent points with no known discrete-log relation to the
//! base point or to each other. Each curve caches its list in a `OnceCell` (see `CurveParams`);
//! offset generators are memoised here, keyed by curve name and round count.
use crate::{
  constants::OFFSET_GENERATOR_LABEL,
  provider::{native::AffinePoint, CurveParams},
};
use num_bigint::BigInt;
use num_traits::One;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use sha3::{
  digest::{ExtendableOutput, Update, XofReader},
  Shake256,
};
use std::{collections::HashMap, sync::RwLock};

/// Derives `n` points from a domain-separation label.
///
/// Seeds are squeezed sequentially from SHAKE256 over the label and the curve name, then mapped
/// to the curve in parallel.
pub fn from_label<C: CurveParams>(label: &[u8], n: usize) -> Vec<AffinePoint<C>> {
  let mut shake = Shake256::default();
  shake.update(label);
  shake.update(C::NAME.as_bytes());
  let mut reader = shake.finalize_xof();
  let seeds = (0..n)
    .map(|_| {
      let mut seed = [0u8; 32];
      reader.read(&mut seed);
      seed
    })
    .collect::<Vec<_>>();

  seeds
    .into_par_iter()
    .map(|seed| AffinePoint::hash_to_curve(&seed))
    .collect()
}

/// Returns the `i`-th derived generator of `C`, or `None` past the end of the cached list
pub fn derived_generator<C: CurveParams>(i: usize) -> Option<&'static AffinePoint<C>> {
  C::generators().get(i)
}

type CachedPoints = (BigInt, BigInt, BigInt, BigInt);

static OFFSET_GENERATORS: Lazy<RwLock<HashMap<(&'static str, usize), CachedPoints>>> =
  Lazy::new(|| RwLock::new(HashMap::new()));

/// The offset point a multi-scalar multiplication starts from, together with the multiple of
/// it that is left in the accumulator after `num_rounds` rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetGenerators<C: CurveParams> {
  /// The offset point `G` added to the initial accumulator
  pub generator: AffinePoint<C>,
  /// `2^(num_rounds - 1) * G`, subtracted once all rounds are done
  pub correction: AffinePoint<C>,
}

impl<C: CurveParams> OffsetGenerators<C> {
  /// Returns the offset generators for a multiplication with `num_rounds` digits.
  /// Returns `None` when `num_rounds` is zero.
  pub fn new(num_rounds: usize) -> Option<Self> {
    if num_rounds == 0 {
      return None;
    }

    let key = (C::NAME, num_rounds);
    let cached = OFFSET_GENERATORS
      .read()
      .unwrap_or_else(|e| e.into_inner())
      .get(&key)
      .cloned();
    if let Some((gx, gy, cx, cy)) = cached {
      return Some(Self {
        generator: AffinePoint::new_unchecked(gx, gy),
        correction: AffinePoint::new_unchecked(cx, cy),
      });
    }

    let generator = from_label::<C>(OFFSET_GENERATOR_LABEL, 1).pop()?;
    let correction = generator.mul(&(BigInt::one() << (num_rounds - 1)))?;
    tracing::debug!(curve = C::NAME, num_rounds, "derived offset generator");

    OFFSET_GENERATORS
      .write()
      .unwrap_or_else(|e| e.into_inner())
      .insert(
        key,
        (
          generator.x().clone(),
          generator.y().clone(),
          correction.x().clone(),
          correction.y().clone(),
        ),
      );
    Some(Self {
      generator,
      correction,
    })
  }
}
