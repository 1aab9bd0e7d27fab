use super::{BitAccess, OptionExt};
use bellpepper_core::{ConstraintSystem, Index, LinearCombination, SynthesisError, Variable};
use ff::PrimeField;
use num_bigint::{BigInt, Sign};

/// The variable every bellpepper constraint system reserves for the constant one.
/// Constants are linear combinations over it and need no constraint system to be built.
pub fn one_var() -> Variable {
  Variable::new_unchecked(Index::Input(0))
}

#[derive(Clone)]
/// A representation of a bit
pub struct Bit<Scalar: PrimeField> {
  /// The linear combination which constrains the value of the bit
  pub bit: LinearCombination<Scalar>,
}

#[derive(Clone)]
/// A representation of a bit-vector
pub struct Bitvector<Scalar: PrimeField> {
  /// The linear combination which constrains the values of the bits
  pub bits: Vec<LinearCombination<Scalar>>,
  /// The value of the bits (filled at witness-time)
  pub values: Option<Vec<bool>>,
  /// Allocated bit variables
  pub allocations: Vec<Bit<Scalar>>,
}

impl<Scalar: PrimeField> Bit<Scalar> {
  /// Allocate a variable in the constraint system which can only be a
  /// boolean value.
  pub fn alloc<CS: ConstraintSystem<Scalar>>(
    mut cs: CS,
    value: Option<bool>,
  ) -> Result<Self, SynthesisError> {
    let var = cs.alloc(
      || "boolean",
      || {
        if *value.grab()? {
          Ok(Scalar::ONE)
        } else {
          Ok(Scalar::ZERO)
        }
      },
    )?;

    // Constrain: (1 - a) * a = 0
    // This constrains a to be either 0 or 1.
    cs.enforce(
      || "boolean constraint",
      |lc| lc + CS::one() - var,
      |lc| lc + var,
      |lc| lc,
    );

    Ok(Self {
      bit: LinearCombination::zero() + var,
    })
  }
}

/// A representation of a field element as a linear combination with an optional value.
#[derive(Clone)]
pub struct Num<Scalar: PrimeField> {
  /// The linear combination representing the number.
  pub num: LinearCombination<Scalar>,
  /// The value of the number (filled at witness-time).
  pub value: Option<Scalar>,
}

impl<Scalar: PrimeField> Num<Scalar> {
  /// Creates a new `Num` with the given value and linear combination.
  pub const fn new(value: Option<Scalar>, num: LinearCombination<Scalar>) -> Self {
    Self { value, num }
  }

  /// A circuit constant.
  pub fn constant(value: Scalar) -> Self {
    Self::new(Some(value), LinearCombination::zero() + (value, one_var()))
  }

  /// Allocates a new `Num` in the constraint system with the given value.
  pub fn alloc<CS, F>(mut cs: CS, value: F) -> Result<Self, SynthesisError>
  where
    CS: ConstraintSystem<Scalar>,
    F: FnOnce() -> Result<Scalar, SynthesisError>,
  {
    let mut new_value = None;
    let var = cs.alloc(
      || "num",
      || {
        let tmp = value()?;

        new_value = Some(tmp);

        Ok(tmp)
      },
    )?;

    Ok(Num {
      value: new_value,
      num: LinearCombination::zero() + var,
    })
  }

  /// Returns `self + other`; no constraints.
  pub fn add(&self, other: &Self) -> Self {
    Self::new(
      self.value.and_then(|a| other.value.map(|b| a + b)),
      self.num.clone() + &other.num,
    )
  }

  /// Returns `coeff * self`; no constraints.
  pub fn scale(&self, coeff: Scalar) -> Self {
    Self::new(
      self.value.map(|v| v * coeff),
      LinearCombination::zero() + (coeff, &self.num),
    )
  }

  /// Checks that the `Num` fits in the given number of bits.
  pub fn fits_in_bits<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
    n_bits: usize,
  ) -> Result<(), SynthesisError> {
    let v = self.value;

    // Allocate all but the first bit.
    let bits: Vec<Variable> = (1..n_bits)
      .map(|i| {
        cs.alloc(
          || format!("bit {i}"),
          || {
            let r = if *v.grab()?.get_bit(i).grab()? {
              Scalar::ONE
            } else {
              Scalar::ZERO
            };
            Ok(r)
          },
        )
      })
      .collect::<Result<_, _>>()?;

    for (i, v) in bits.iter().enumerate() {
      cs.enforce(
        || format!("{i} is bit"),
        |lc| lc + *v,
        |lc| lc + CS::one() - *v,
        |lc| lc,
      )
    }

    // Last bit
    cs.enforce(
      || "last bit",
      |mut lc| {
        let mut f = Scalar::ONE;
        lc = lc + &self.num;
        for v in bits.iter() {
          f = f.double();
          lc = lc - (f, *v);
        }
        lc
      },
      |mut lc| {
        lc = lc + CS::one();
        let mut f = Scalar::ONE;
        lc = lc - &self.num;
        for v in bits.iter() {
          f = f.double();
          lc = lc + (f, *v);
        }
        lc
      },
      |lc| lc,
    );
    Ok(())
  }

  /// Decomposes `self` into `n_bits` allocated bits, low-order first, and checks that they
  /// recompose to `self`.
  pub fn decompose<CS: ConstraintSystem<Scalar>>(
    &self,
    mut cs: CS,
    n_bits: usize,
  ) -> Result<Bitvector<Scalar>, SynthesisError> {
    let values: Option<Vec<bool>> = self
      .value
      .as_ref()
      .map(|v| (0..n_bits).map(|i| v.get_bit(i).unwrap_or(false)).collect());
    let allocations: Vec<Bit<Scalar>> = (0..n_bits)
      .map(|bit_i| {
        Bit::alloc(
          cs.namespace(|| format!("bit{bit_i}")),
          values.as_ref().map(|vs| vs[bit_i]),
        )
      })
      .collect::<Result<Vec<_>, _>>()?;
    let mut f = Scalar::ONE;
    let sum = allocations
      .iter()
      .fold(LinearCombination::zero(), |lc, bit| {
        let l = lc + (f, &bit.bit);
        f = f.double();
        l
      });
    let sum_lc = LinearCombination::zero() + &self.num - &sum;
    cs.enforce(|| "sum", |lc| lc + &sum_lc, |lc| lc + CS::one(), |lc| lc);
    let bits: Vec<LinearCombination<Scalar>> = allocations
      .iter()
      .map(|a| LinearCombination::zero() + &a.bit)
      .collect();
    Ok(Bitvector {
      allocations,
      values,
      bits,
    })
  }
}

/// Convert a field element to a natural number
pub fn f_to_nat<Scalar: PrimeField>(f: &Scalar) -> BigInt {
  BigInt::from_bytes_le(Sign::Plus, f.to_repr().as_ref())
}

/// Convert a natural number to a field element.
/// Returns `None` if the number is too big for the field.
pub fn nat_to_f<Scalar: PrimeField>(n: &BigInt) -> Option<Scalar> {
  Scalar::from_str_vartime(&format!("{n}"))
}

/// Like `nat_to_f`, failing synthesis when the number does not fit.
pub fn nat_to_f_checked<Scalar: PrimeField>(n: &BigInt) -> Result<Scalar, SynthesisError> {
  nat_to_f(n).ok_or_else(|| {
    tracing::warn!("{n} does not fit in the native field");
    SynthesisError::Unsatisfiable
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use bellpepper_core::test_cs::TestConstraintSystem;
  use halo2curves::bn256::Fr;

  #[test]
  fn test_num_decompose() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let n = Num::alloc(cs.namespace(|| "n"), || Ok(Fr::from(0b1011u64))).unwrap();
    let bv = n.decompose(cs.namespace(|| "decomp"), 6).unwrap();
    assert_eq!(
      bv.values,
      Some(vec![true, true, false, true, false, false])
    );
    n.fits_in_bits(cs.namespace(|| "fits"), 4).unwrap();
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_num_does_not_fit() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    let n = Num::alloc(cs.namespace(|| "n"), || Ok(Fr::from(17u64))).unwrap();
    n.fits_in_bits(cs.namespace(|| "fits"), 4).unwrap();
    assert!(!cs.is_satisfied());
  }

  #[test]
  fn test_constant_arithmetic() {
    let a = Num::<Fr>::constant(Fr::from(5u64));
    let b = Num::<Fr>::constant(Fr::from(7u64));
    assert_eq!(a.add(&b).scale(Fr::from(2u64)).value, Some(Fr::from(24u64)));
    assert_eq!(f_to_nat(&Fr::from(24u64)), BigInt::from(24u8));
    assert_eq!(nat_to_f::<Fr>(&BigInt::from(24u8)), Some(Fr::from(24u64)));
  }
}
