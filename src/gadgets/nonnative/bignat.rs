use super::{
  util::{f_to_nat, nat_to_f_checked, one_var, Bitvector, Num},
  OptionExt,
};
use bellpepper_core::{ConstraintSystem, LinearCombination, SynthesisError};
use ff::PrimeField;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::max;

/// Compute the natural number represented by an array of limbs.
/// The limbs are assumed to be based the `limb_width` power of 2.
pub fn limbs_to_nat<Scalar: PrimeField, B: Borrow<Scalar>, I: DoubleEndedIterator<Item = B>>(
  limbs: I,
  limb_width: usize,
) -> BigInt {
  limbs.rev().fold(BigInt::from(0), |mut acc, limb| {
    acc <<= limb_width as u32;
    acc += f_to_nat(limb.borrow());
    acc
  })
}

pub(crate) fn int_with_n_ones(n: usize) -> BigInt {
  let mut m = BigInt::from(1);
  m <<= n as u32;
  m -= 1;
  m
}

/// Splits a natural number into `n_limbs` integer limbs of `limb_width` bits.
pub fn nat_to_int_limbs(
  nat: &BigInt,
  limb_width: usize,
  n_limbs: usize,
) -> Result<Vec<BigInt>, SynthesisError> {
  if nat.sign() == num_bigint::Sign::Minus || nat.bits() as usize > n_limbs * limb_width {
    tracing::warn!("nat {nat} does not fit in {n_limbs} limbs of width {limb_width}");
    return Err(SynthesisError::Unsatisfiable);
  }
  let mask = int_with_n_ones(limb_width);
  let mut nat = nat.clone();
  Ok(
    (0..n_limbs)
      .map(|_| {
        let r = &nat & &mask;
        nat >>= limb_width as u32;
        r
      })
      .collect(),
  )
}

/// Compute the limbs encoding a natural number.
/// The limbs are assumed to be based the `limb_width` power of 2.
pub fn nat_to_limbs<Scalar: PrimeField>(
  nat: &BigInt,
  limb_width: usize,
  n_limbs: usize,
) -> Result<Vec<Scalar>, SynthesisError> {
  nat_to_int_limbs(nat, limb_width, n_limbs)?
    .iter()
    .map(nat_to_f_checked)
    .collect()
}

/// Shape of a `BigNat`: how many limbs, how wide, and how large any limb may be.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigNatParams {
  /// A lower bound on the bit length of the value
  pub min_bits: usize,
  /// An upper bound on every limb
  pub max_word: BigInt,
  /// The radix of the representation is `2^limb_width`
  pub limb_width: usize,
  /// Number of limbs
  pub n_limbs: usize,
}

impl BigNatParams {
  /// Parameters of a number whose limbs are all range-checked to `limb_width` bits
  pub fn new(limb_width: usize, n_limbs: usize) -> Self {
    BigNatParams {
      max_word: int_with_n_ones(limb_width),
      n_limbs,
      limb_width,
      min_bits: 0,
    }
  }
}

/// A representation of a large natural number (a member of {0, 1, 2, ... })
#[derive(Clone)]
pub struct BigNat<Scalar: PrimeField> {
  /// The linear combinations which constrain the value of each limb of the number
  pub limbs: Vec<LinearCombination<Scalar>>,
  /// The witness values for each limb (filled at witness-time)
  pub limb_values: Option<Vec<Scalar>>,
  /// The value of the whole number (filled at witness-time)
  pub value: Option<BigInt>,
  /// Parameters
  pub params: BigNatParams,
}

impl<Scalar: PrimeField> PartialEq for BigNat<Scalar> {
  fn eq(&self, other: &Self) -> bool {
    self.value == other.value && self.params == other.params
  }
}
impl<Scalar: PrimeField> Eq for BigNat<Scalar> {}

impl<Scalar: PrimeField> From<BigNat<Scalar>> for Polynomial<Scalar> {
  fn from(other: BigNat<Scalar>) -> Polynomial<Scalar> {
    Polynomial {
      coefficients: other.limbs,
      values: other.limb_values,
    }
  }
}

impl<Scalar: PrimeField> BigNat<Scalar> {
  /// Allocates a `BigNat` in the circuit with `n_limbs` limbs of width `limb_width` each.
  /// The `max_word` is guaranteed to be `(2 << limb_width) - 1`.
  /// The value is provided by a closure returning a natural number.
  pub fn alloc_from_nat<CS, F>(
    mut cs: CS,
    f: F,
    limb_width: usize,
    n_limbs: usize,
  ) -> Result<Self, SynthesisError>
  where
    CS: ConstraintSystem<Scalar>,
    F: FnOnce() -> Result<BigInt, SynthesisError>,
  {
    let all_values_cell =
      f().and_then(|v| Ok((nat_to_limbs::<Scalar>(&v, limb_width, n_limbs)?, v)));
    let mut value = None;
    let mut limb_values = Vec::new();
    let limbs = (0..n_limbs)
      .map(|limb_i| {
        cs.alloc(
          || format!("limb {limb_i}"),
          || match all_values_cell {
            Ok((ref vs, ref v)) => {
              if value.is_none() {
                value = Some(v.clone());
              }
              limb_values.push(vs[limb_i]);
              Ok(vs[limb_i])
            }
            // SynthesisError is not Clone; rebuild the variants that can occur here
            Err(SynthesisError::AssignmentMissing) => Err(SynthesisError::AssignmentMissing),
            Err(_) => Err(SynthesisError::Unsatisfiable),
          },
        )
        .map(|v| LinearCombination::zero() + v)
      })
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self {
      value,
      limb_values: if limb_values.len() == n_limbs {
        Some(limb_values)
      } else {
        None
      },
      limbs,
      params: BigNatParams::new(limb_width, n_limbs),
    })
  }

  /// A circuit constant with `n_limbs` canonical limbs; no constraints.
  pub fn constant(
    value: &BigInt,
    limb_width: usize,
    n_limbs: usize,
  ) -> Result<Self, SynthesisError> {
    let limb_values = nat_to_limbs::<Scalar>(value, limb_width, n_limbs)?;
    let limbs = limb_values
      .iter()
      .map(|v| LinearCombination::zero() + (*v, one_var()))
      .collect();
    Ok(Self {
      limbs,
      limb_values: Some(limb_values),
      value: Some(value.clone()),
      params: BigNatParams::new(limb_width, n_limbs),
    })
  }

  /// The limbs as individual numbers
  pub fn as_limbs(&self) -> Vec<Num<Scalar>> {
    let mut limbs = Vec::new();
    for (i, lc) in self.limbs.iter().enumerate() {
      limbs.push(Num::new(
        self.limb_values.as_ref().map(|vs| vs[i]),
        lc.clone(),
      ));
    }
    limbs
  }

  /// Range-checks every limb to `limb_width` bits
  pub fn assert_well_formed<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
  ) -> Result<(), SynthesisError> {
    // swap the option and iterator
    let limb_values_split =
      (0..self.limbs.len()).map(|i| self.limb_values.as_ref().map(|vs| vs[i]));
    for (i, (limb, limb_value)) in self.limbs.iter().zip(limb_values_split).enumerate() {
      Num::new(limb_value, limb.clone())
        .fits_in_bits(cs.namespace(|| format!("{i}")), self.params.limb_width)?;
    }
    Ok(())
  }

  /// Break `self` up into a bit-vector.
  pub fn decompose<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
  ) -> Result<Bitvector<Scalar>, SynthesisError> {
    let limb_values_split =
      (0..self.limbs.len()).map(|i| self.limb_values.as_ref().map(|vs| vs[i]));
    let bitvectors: Vec<Bitvector<Scalar>> = self
      .limbs
      .iter()
      .zip(limb_values_split)
      .enumerate()
      .map(|(i, (limb, limb_value))| {
        Num::new(limb_value, limb.clone()).decompose(
          cs.namespace(|| format!("subdecmop {i}")),
          self.params.limb_width,
        )
      })
      .collect::<Result<Vec<_>, _>>()?;
    let mut bits = Vec::new();
    let mut values = Vec::new();
    let mut allocations = Vec::new();
    for bv in bitvectors {
      bits.extend(bv.bits);
      if let Some(vs) = bv.values {
        values.extend(vs)
      };
      allocations.extend(bv.allocations);
    }
    let values = if !values.is_empty() {
      Some(values)
    } else {
      None
    };
    Ok(Bitvector {
      bits,
      values,
      allocations,
    })
  }

  pub fn enforce_limb_width_agreement(
    &self,
    other: &Self,
    location: &str,
  ) -> Result<usize, SynthesisError> {
    if self.params.limb_width == other.params.limb_width {
      Ok(self.params.limb_width)
    } else {
      tracing::warn!(
        "Limb widths {}, {}, do not agree at {}",
        self.params.limb_width,
        other.params.limb_width,
        location
      );
      Err(SynthesisError::Unsatisfiable)
    }
  }

  pub fn from_poly(poly: Polynomial<Scalar>, limb_width: usize, max_word: BigInt) -> Self {
    Self {
      params: BigNatParams {
        min_bits: 0,
        max_word,
        n_limbs: poly.coefficients.len(),
        limb_width,
      },
      limbs: poly.coefficients,
      value: poly
        .values
        .as_ref()
        .map(|limb_values| limbs_to_nat::<Scalar, _, _>(limb_values.iter(), limb_width)),
      limb_values: poly.values,
    }
  }

  /// Constrain `self` to be equal to `other`, after carrying both.
  /// The shorter of the two is padded with zero limbs.
  pub fn equal_when_carried<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
    other: &Self,
  ) -> Result<(), SynthesisError> {
    self.enforce_limb_width_agreement(other, "equal_when_carried")?;

    let n = max(self.limbs.len(), other.limbs.len());
    let zero_lc = LinearCombination::zero();
    let limb = |x: &Self, i: usize| x.limbs.get(i).unwrap_or(&zero_lc).clone();
    let limb_value = |x: &Self, i: usize| -> Result<BigInt, SynthesisError> {
      Ok(
        x.limb_values
          .grab()?
          .get(i)
          .map(f_to_nat)
          .unwrap_or_else(BigInt::zero),
      )
    };

    let target_base = BigInt::one() << self.params.limb_width as u32;
    let mut accumulated_extra = BigInt::zero();
    let max_word = max(&self.params.max_word, &other.params.max_word);
    let carry_bits = (max_word.bits() as usize + 1).saturating_sub(self.params.limb_width);
    let max_word_f = nat_to_f_checked::<Scalar>(max_word)?;
    let target_base_f = nat_to_f_checked::<Scalar>(&target_base)?;
    let mut carry_in = Num::new(Some(Scalar::ZERO), LinearCombination::zero());

    for i in 0..n {
      let carry = Num::alloc(cs.namespace(|| format!("carry value {i}")), || {
        nat_to_f_checked(
          &((limb_value(self, i)? + f_to_nat(carry_in.value.grab()?) + max_word
            - limb_value(other, i)?)
            / &target_base),
        )
      })?;
      accumulated_extra += max_word;
      let extra_f = nat_to_f_checked::<Scalar>(&(&accumulated_extra % &target_base))?;

      cs.enforce(
        || format!("carry {i}"),
        |lc| lc,
        |lc| lc,
        |lc| {
          lc + &carry_in.num + &limb(self, i) - &limb(other, i) + (max_word_f, CS::one())
            - (target_base_f, &carry.num)
            - (extra_f, CS::one())
        },
      );

      accumulated_extra /= &target_base;

      if i < n - 1 {
        carry.fits_in_bits(cs.namespace(|| format!("carry {i} decomp")), carry_bits)?;
      } else {
        let out_f = nat_to_f_checked::<Scalar>(&accumulated_extra)?;
        cs.enforce(
          || format!("carry {i} is out"),
          |lc| lc,
          |lc| lc,
          |lc| lc + &carry.num - (out_f, CS::one()),
        );
      }
      carry_in = carry;
    }
    Ok(())
  }

  /// Constrain `self` to be equal to `other`, after carrying both.
  /// Uses regrouping internally to take full advantage of the field size and reduce the amount
  /// of carrying.
  pub fn equal_when_carried_regroup<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
    other: &Self,
  ) -> Result<(), SynthesisError> {
    self.enforce_limb_width_agreement(other, "equal_when_carried_regroup")?;
    let max_word = max(&self.params.max_word, &other.params.max_word);
    let carry_bits = (max_word.bits() as usize + 1).saturating_sub(self.params.limb_width);
    let limbs_per_group =
      (Scalar::CAPACITY as usize).saturating_sub(carry_bits) / self.params.limb_width;
    if limbs_per_group == 0 {
      tracing::warn!("limb bound of {} bits leaves no room to carry", max_word.bits());
      return Err(SynthesisError::Unsatisfiable);
    }
    let self_grouped = self.group_limbs(limbs_per_group);
    let other_grouped = other.group_limbs(limbs_per_group);
    self_grouped.equal_when_carried(cs.namespace(|| "grouped"), &other_grouped)
  }

  /// Limb-wise sum; no constraints.
  pub fn add(&self, other: &Self) -> Result<BigNat<Scalar>, SynthesisError> {
    self.enforce_limb_width_agreement(other, "add")?;
    let n_limbs = max(self.limbs.len(), other.limbs.len());
    let max_word = &self.params.max_word + &other.params.max_word;
    let limbs: Vec<LinearCombination<Scalar>> = (0..n_limbs)
      .map(|i| match (self.limbs.get(i), other.limbs.get(i)) {
        (Some(a), Some(b)) => a.clone() + b,
        (Some(a), None) | (None, Some(a)) => a.clone(),
        (None, None) => LinearCombination::zero(),
      })
      .collect();
    let limb_values: Option<Vec<Scalar>> = self.limb_values.as_ref().and_then(|x| {
      other.limb_values.as_ref().map(|y| {
        (0..n_limbs)
          .map(|i| match (x.get(i), y.get(i)) {
            (Some(a), Some(b)) => *a + b,
            (Some(a), None) | (None, Some(a)) => *a,
            (None, None) => Scalar::ZERO,
          })
          .collect()
      })
    });
    let value = self
      .value
      .as_ref()
      .and_then(|x| other.value.as_ref().map(|y| x + y));
    Ok(Self {
      limb_values,
      value,
      limbs,
      params: BigNatParams {
        min_bits: max(self.params.min_bits, other.params.min_bits),
        n_limbs,
        max_word,
        limb_width: self.params.limb_width,
      },
    })
  }

  /// Combines limbs into groups.
  pub fn group_limbs(&self, limbs_per_group: usize) -> BigNat<Scalar> {
    let n_groups = (self.limbs.len() - 1) / limbs_per_group + 1;
    let limb_block = (0..self.params.limb_width).fold(Scalar::ONE, |l, _| l.double());
    let limb_values = self.limb_values.as_ref().map(|vs| {
      let mut values: Vec<Scalar> = vec![Scalar::ZERO; n_groups];
      let mut shift = Scalar::ONE;
      for (i, v) in vs.iter().enumerate() {
        if i % limbs_per_group == 0 {
          shift = Scalar::ONE;
        }
        values[i / limbs_per_group] += shift * v;
        shift *= limb_block;
      }
      values
    });
    let limbs = {
      let mut limbs: Vec<LinearCombination<Scalar>> = vec![LinearCombination::zero(); n_groups];
      let mut shift = Scalar::ONE;
      for (i, limb) in self.limbs.iter().enumerate() {
        if i % limbs_per_group == 0 {
          shift = Scalar::ONE;
        }
        limbs[i / limbs_per_group] =
          std::mem::replace(&mut limbs[i / limbs_per_group], LinearCombination::zero())
            + (shift, limb);
        shift *= limb_block;
      }
      limbs
    };
    let max_word = (0..limbs_per_group).fold(BigInt::from(0u8), |mut acc, i| {
      acc.set_bit((i * self.params.limb_width) as u64, true);
      acc
    }) * &self.params.max_word;
    BigNat {
      params: BigNatParams {
        min_bits: self.params.min_bits,
        limb_width: self.params.limb_width * limbs_per_group,
        n_limbs: limbs.len(),
        max_word,
      },
      limbs,
      limb_values,
      value: self.value.clone(),
    }
  }

  /// An upper bound on the value, `sum_i max_word * 2^(i * limb_width)`
  pub fn max_value(&self) -> BigInt {
    (0..self.limbs.len()).fold(BigInt::zero(), |acc, i| {
      acc + (&self.params.max_word << (i * self.params.limb_width))
    })
  }

  /// Whether every limb is known to fit in `limb_width` bits
  pub fn is_well_formed(&self) -> bool {
    self.params.max_word <= int_with_n_ones(self.params.limb_width)
  }
}

/// A polynomial whose coefficients are linear combinations; a `BigNat` before carrying.
pub struct Polynomial<Scalar: PrimeField> {
  pub coefficients: Vec<LinearCombination<Scalar>>,
  pub values: Option<Vec<Scalar>>,
}

impl<Scalar: PrimeField> Polynomial<Scalar> {
  /// Allocates the product of two polynomials, checked at `n_product_coeffs` points.
  pub fn alloc_product<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
    other: &Self,
  ) -> Result<Polynomial<Scalar>, SynthesisError> {
    let n_product_coeffs = self.coefficients.len() + other.coefficients.len() - 1;
    let values = self.values.as_ref().and_then(|self_vs| {
      other.values.as_ref().map(|other_vs| {
        let mut values: Vec<Scalar> = vec![Scalar::ZERO; n_product_coeffs];
        for (self_i, self_v) in self_vs.iter().enumerate() {
          for (other_i, other_v) in other_vs.iter().enumerate() {
            values[self_i + other_i] += *self_v * other_v;
          }
        }
        values
      })
    });
    let coefficients = (0..n_product_coeffs)
      .map(|i| {
        Ok(LinearCombination::zero() + cs.alloc(|| format!("prod {i}"), || Ok(values.grab()?[i]))?)
      })
      .collect::<Result<Vec<LinearCombination<Scalar>>, SynthesisError>>()?;
    let product = Polynomial {
      coefficients,
      values,
    };
    let mut x = Scalar::ZERO;
    for _ in 1..(n_product_coeffs + 1) {
      x += Scalar::ONE;
      let eval = |coefficients: &[LinearCombination<Scalar>], lc: LinearCombination<Scalar>| {
        let mut i = Scalar::ONE;
        coefficients.iter().fold(lc, |lc, c| {
          let r = lc + (i, c);
          i *= x;
          r
        })
      };
      cs.enforce(
        || format!("pointwise product @ {x:?}"),
        |lc| eval(&self.coefficients, lc),
        |lc| eval(&other.coefficients, lc),
        |lc| eval(&product.coefficients, lc),
      )
    }
    Ok(product)
  }

  /// Multiplies by a polynomial with constant coefficients; no constraints.
  pub fn scale(&self, constants: &[BigInt]) -> Result<Polynomial<Scalar>, SynthesisError> {
    let constants = constants
      .iter()
      .map(nat_to_f_checked::<Scalar>)
      .collect::<Result<Vec<_>, _>>()?;
    let n_coeffs = self.coefficients.len() + constants.len() - 1;
    let mut coefficients = vec![LinearCombination::zero(); n_coeffs];
    for (i, c) in self.coefficients.iter().enumerate() {
      for (j, k) in constants.iter().enumerate() {
        coefficients[i + j] =
          std::mem::replace(&mut coefficients[i + j], LinearCombination::zero()) + (*k, c);
      }
    }
    let values = self.values.as_ref().map(|vs| {
      let mut values = vec![Scalar::ZERO; n_coeffs];
      for (i, v) in vs.iter().enumerate() {
        for (j, k) in constants.iter().enumerate() {
          values[i + j] += *v * k;
        }
      }
      values
    });
    Ok(Polynomial {
      coefficients,
      values,
    })
  }

  pub fn sum(&self, other: &Self) -> Self {
    let n_coeffs = max(self.coefficients.len(), other.coefficients.len());
    let values = self.values.as_ref().and_then(|self_vs| {
      other.values.as_ref().map(|other_vs| {
        (0..n_coeffs)
          .map(|i| {
            let mut s = Scalar::ZERO;
            if i < self_vs.len() {
              s += self_vs[i];
            }
            if i < other_vs.len() {
              s += other_vs[i];
            }
            s
          })
          .collect()
      })
    });
    let coefficients = (0..n_coeffs)
      .map(|i| {
        let mut lc = LinearCombination::zero();
        if i < self.coefficients.len() {
          lc = lc + &self.coefficients[i];
        }
        if i < other.coefficients.len() {
          lc = lc + &other.coefficients[i];
        }
        lc
      })
      .collect();
    Polynomial {
      coefficients,
      values,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bellpepper_core::{test_cs::TestConstraintSystem, Circuit};
  use halo2curves::bn256::Fr as Scalar;
  use proptest::prelude::*;

  pub struct PolynomialMultiplier<Scalar: PrimeField> {
    pub a: Vec<Scalar>,
    pub b: Vec<Scalar>,
  }

  impl<Scalar: PrimeField> Circuit<Scalar> for PolynomialMultiplier<Scalar> {
    fn synthesize<CS: ConstraintSystem<Scalar>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
      let a = Polynomial {
        coefficients: self
          .a
          .iter()
          .enumerate()
          .map(|(i, x)| {
            Ok(LinearCombination::zero() + cs.alloc(|| format!("coeff_a {i}"), || Ok(*x))?)
          })
          .collect::<Result<Vec<LinearCombination<Scalar>>, SynthesisError>>()?,
        values: Some(self.a),
      };
      let b = Polynomial {
        coefficients: self
          .b
          .iter()
          .enumerate()
          .map(|(i, x)| {
            Ok(LinearCombination::zero() + cs.alloc(|| format!("coeff_b {i}"), || Ok(*x))?)
          })
          .collect::<Result<Vec<LinearCombination<Scalar>>, SynthesisError>>()?,
        values: Some(self.b),
      };
      let prod = a.alloc_product(cs.namespace(|| "product"), &b)?;
      assert_eq!(
        prod.values,
        Some(
          [1u64, 2, 2, 1]
            .iter()
            .map(|v| Scalar::from(*v))
            .collect::<Vec<_>>()
        )
      );
      Ok(())
    }
  }

  #[test]
  fn test_polynomial_multiplier_circuit() {
    let mut cs = TestConstraintSystem::<Scalar>::new();

    let circuit = PolynomialMultiplier {
      a: [1, 1, 1].iter().map(|i| Scalar::from_u128(*i)).collect(),
      b: [1, 1].iter().map(|i| Scalar::from_u128(*i)).collect(),
    };

    circuit.synthesize(&mut cs).expect("synthesis failed");

    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_scale_matches_product() {
    let a = BigNat::<Scalar>::constant(&BigInt::from(0x1234_5678u64), 16, 2).unwrap();
    let scaled = Polynomial::from(a).scale(&[BigInt::from(3u8), BigInt::from(1u8)]).unwrap();
    let n = BigNat::from_poly(scaled, 16, BigInt::from(1u64 << 20));
    // (3 + 2^16) * 0x12345678
    assert_eq!(n.value, Some(BigInt::from(0x1234_5678u64 * (3 + (1 << 16)))));
  }

  #[test]
  fn test_equal_when_carried_pads_shorter_side() {
    let mut cs = TestConstraintSystem::<Scalar>::new();
    // [0, 1] and [2^8] both represent 2^8 in base 2^8
    let a = BigNat::<Scalar>::constant(&BigInt::from(256u32), 8, 2).unwrap();
    let b = BigNat::from_poly(
      Polynomial {
        coefficients: vec![LinearCombination::zero() + (Scalar::from(256u64), one_var())],
        values: Some(vec![Scalar::from(256u64)]),
      },
      8,
      BigInt::from(256u32),
    );
    a.equal_when_carried(cs.namespace(|| "eq"), &b).unwrap();
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_equal_when_carried_rejects_unequal() {
    let mut cs = TestConstraintSystem::<Scalar>::new();
    let a = BigNat::alloc_from_nat(cs.namespace(|| "a"), || Ok(BigInt::from(1000u32)), 8, 2)
      .unwrap();
    let b = BigNat::alloc_from_nat(cs.namespace(|| "b"), || Ok(BigInt::from(1001u32)), 8, 2)
      .unwrap();
    a.equal_when_carried_regroup(cs.namespace(|| "eq"), &b).unwrap();
    assert!(!cs.is_satisfied());
  }

  #[derive(Debug)]
  pub struct BigNatBitDecompInputs {
    pub n: BigInt,
  }

  pub struct BigNatBitDecompParams {
    pub limb_width: usize,
    pub n_limbs: usize,
  }

  pub struct BigNatBitDecomp {
    inputs: Option<BigNatBitDecompInputs>,
    params: BigNatBitDecompParams,
  }

  impl<Scalar: PrimeField> Circuit<Scalar> for BigNatBitDecomp {
    fn synthesize<CS: ConstraintSystem<Scalar>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
      let n = BigNat::alloc_from_nat(
        cs.namespace(|| "n"),
        || Ok(self.inputs.grab()?.n.clone()),
        self.params.limb_width,
        self.params.n_limbs,
      )?;
      n.decompose(cs.namespace(|| "decomp"))?;
      Ok(())
    }
  }

  proptest! {

    #![proptest_config(ProptestConfig {
      cases: 10, // this test is costlier as max n gets larger
      .. ProptestConfig::default()
    })]
    #[test]
    fn test_big_nat_can_decompose(n in any::<u16>(), limb_width in 40u8..200) {
        let n = n as usize;

        let n_limbs = if n == 0 {
            1
        } else {
            (n - 1) / limb_width as usize + 1
        };

        let circuit = BigNatBitDecomp {
           inputs: Some(BigNatBitDecompInputs {
                n: BigInt::from(n),
            }),
            params: BigNatBitDecompParams {
                limb_width: limb_width as usize,
                n_limbs,
            },
        };
        let mut cs = TestConstraintSystem::<Scalar>::new();
        circuit.synthesize(&mut cs).expect("synthesis failed");
        prop_assert!(cs.is_satisfied());
    }
  }
}
