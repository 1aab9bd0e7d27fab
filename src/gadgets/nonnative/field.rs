//! Elements of a foreign prime field, emulated with `N_LIMBS` limbs of `LIMB_WIDTH` bits.
//!
//! An element is a `BigNat` whose integer value is congruent to the element modulo `p`.
//! Limb values are always non-negative integers bounded by `max_word`; an element is *reduced*
//! when every limb is range-checked to `LIMB_WIDTH` bits, and *canonical* when in addition its
//! value is below `p`. Every modular relation is proven by one integer identity
//!
//! ```text
//! sum_i a_i * b_i + sum_j l_j + K = q * p + sum_k r_k
//! ```
//!
//! where `K` is a constant multiple of `p` large enough to keep `q` non-negative.
use super::{
  bignat::{int_with_n_ones, limbs_to_nat, nat_to_int_limbs, BigNat, BigNatParams, Polynomial},
  util::{f_to_nat, nat_to_f_checked, one_var, Num},
  OptionExt, Provenance,
};
use crate::{
  constants::{LIMB_WIDTH, MAX_UNREDUCED_LIMB_BITS, N_LIMBS},
  gadgets::utils::{alloc_is_zero, conditionally_select_num},
  provider::{native::inv_mod, FieldParams},
};
use bellpepper_core::{boolean::Boolean, ConstraintSystem, LinearCombination, SynthesisError};
use ff::PrimeField;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::{cmp::max, marker::PhantomData};

/// The limbs of an element: `N_LIMBS` binary limbs and the element's value modulo the native
/// field (the prime-basis limb), which is a fixed linear function of the binary limbs.
#[derive(Clone)]
pub struct LimbDecomposition<F: PrimeField> {
  /// Limbs in radix `2^LIMB_WIDTH`, least significant first
  pub binary: Vec<Num<F>>,
  /// `sum_i binary_i * 2^(i * LIMB_WIDTH)` in the native field
  pub prime: Num<F>,
}

/// An element of the field described by `P`, held in a circuit over `F`
#[derive(Clone)]
pub struct ForeignFieldElement<F: PrimeField, P: FieldParams> {
  nat: BigNat<F>,
  provenance: Provenance,
  _p: PhantomData<P>,
}

impl<F: PrimeField, P: FieldParams> ForeignFieldElement<F, P> {
  fn from_nat(nat: BigNat<F>, provenance: Provenance) -> Self {
    Self {
      nat,
      provenance,
      _p: PhantomData,
    }
  }

  /// A circuit constant, reduced modulo `p`
  pub fn constant(value: &BigInt) -> Result<Self, SynthesisError> {
    let v = value.mod_floor(P::modulus());
    Ok(Self::from_nat(
      BigNat::constant(&v, LIMB_WIDTH, N_LIMBS)?,
      Provenance::Constant,
    ))
  }

  /// The constant zero
  pub fn zero() -> Result<Self, SynthesisError> {
    Self::constant(&BigInt::zero())
  }

  /// The constant one
  pub fn one() -> Result<Self, SynthesisError> {
    Self::constant(&BigInt::one())
  }

  /// Allocates a witness with range-checked limbs. The value is not checked against `p`; use
  /// `assert_is_in_field` or `normalize` where canonical form matters.
  pub fn alloc<CS, Func>(mut cs: CS, f: Func) -> Result<Self, SynthesisError>
  where
    CS: ConstraintSystem<F>,
    Func: FnOnce() -> Result<BigInt, SynthesisError>,
  {
    let nat = BigNat::alloc_from_nat(cs.namespace(|| "limbs"), f, LIMB_WIDTH, N_LIMBS)?;
    nat.assert_well_formed(cs.namespace(|| "range"))?;
    Ok(Self::from_nat(nat, Provenance::Witness))
  }

  /// Packs little-endian bits into an element; no constraints.
  /// Constant bits give a constant, reduced modulo `p`.
  pub fn from_bits_le(bits: &[Boolean]) -> Result<Self, SynthesisError> {
    if bits.len() > LIMB_WIDTH * N_LIMBS {
      tracing::warn!("{} bits do not fit in {N_LIMBS} limbs", bits.len());
      return Err(SynthesisError::Unsatisfiable);
    }

    let value = bits
      .iter()
      .enumerate()
      .try_fold(BigInt::zero(), |acc, (i, b)| {
        b.get_value().map(|v| if v { acc + (BigInt::one() << i) } else { acc })
      });
    if bits.iter().all(|b| matches!(b, Boolean::Constant(_))) {
      return Self::constant(&value.unwrap_or_default());
    }

    let n_limbs = max(1, bits.len().div_ceil(LIMB_WIDTH));
    let limbs = (0..n_limbs)
      .map(|i| {
        let mut coeff = F::ONE;
        bits
          .iter()
          .skip(i * LIMB_WIDTH)
          .take(LIMB_WIDTH)
          .fold(LinearCombination::zero(), |lc, b| {
            let lc = lc + &b.lc(one_var(), coeff);
            coeff = coeff.double();
            lc
          })
      })
      .collect::<Vec<_>>();
    let limb_values = value
      .as_ref()
      .map(|v| {
        nat_to_int_limbs(v, LIMB_WIDTH, n_limbs)?
          .iter()
          .map(nat_to_f_checked)
          .collect::<Result<Vec<F>, _>>()
      })
      .transpose()?;

    Ok(Self::from_nat(
      BigNat {
        limbs,
        limb_values,
        value,
        params: BigNatParams::new(LIMB_WIDTH, n_limbs),
      },
      Provenance::Witness,
    ))
  }

  /// The element's value in `[0, p)`, if known
  pub fn value(&self) -> Option<BigInt> {
    self
      .nat
      .value
      .as_ref()
      .map(|v| v.mod_floor(P::modulus()))
  }

  /// Whether the element is a circuit constant or depends on the witness
  pub fn provenance(&self) -> Provenance {
    self.provenance
  }

  /// Returns true for circuit constants
  pub fn is_constant(&self) -> bool {
    self.provenance.is_constant()
  }

  /// Returns true when every limb is range-checked, so the element can be reused without
  /// another reduction
  pub fn is_reduced(&self) -> bool {
    self.nat.is_well_formed() && self.nat.limbs.len() <= N_LIMBS
  }

  /// An upper bound on every limb
  pub fn limb_bound(&self) -> &BigInt {
    &self.nat.params.max_word
  }

  fn const_value(&self) -> Option<BigInt> {
    if self.is_constant() {
      self.value()
    } else {
      None
    }
  }

  /// Returns `self + other`; no constraints.
  pub fn add(&self, other: &Self) -> Result<Self, SynthesisError> {
    if let (Some(a), Some(b)) = (self.const_value(), other.const_value()) {
      return Self::constant(&(a + b));
    }
    Ok(Self::from_nat(
      self.nat.add(&other.nat)?,
      self.provenance.merge(other.provenance),
    ))
  }

  /// Returns `self - other`; no constraints.
  ///
  /// A constant multiple of `p` whose limbs dominate `other`'s limb bound is added first, so
  /// every limb of the result stays a non-negative integer.
  pub fn sub(&self, other: &Self) -> Result<Self, SynthesisError> {
    if let Some(b) = other.const_value() {
      return self.add(&Self::constant(&(P::modulus() - b))?);
    }

    let n_limbs = max(N_LIMBS, max(self.nat.limbs.len(), other.nat.limbs.len()));
    let pad_limbs = subtraction_pad::<P>(&other.nat.params.max_word, n_limbs)?;
    let pad_value = limbs_to_int(&pad_limbs);
    let pad_max = pad_limbs.iter().max().cloned().unwrap_or_default();
    let pad_f = pad_limbs
      .iter()
      .map(nat_to_f_checked::<F>)
      .collect::<Result<Vec<_>, _>>()?;

    let zero_lc = LinearCombination::zero();
    let limbs = (0..n_limbs)
      .map(|i| {
        self.nat.limbs.get(i).unwrap_or(&zero_lc).clone() + (pad_f[i], one_var())
          - other.nat.limbs.get(i).unwrap_or(&zero_lc)
      })
      .collect();
    let limb_values = self.nat.limb_values.as_ref().and_then(|a| {
      other.nat.limb_values.as_ref().map(|b| {
        (0..n_limbs)
          .map(|i| {
            a.get(i).copied().unwrap_or(F::ZERO) + pad_f[i] - b.get(i).copied().unwrap_or(F::ZERO)
          })
          .collect()
      })
    });
    let value = self
      .nat
      .value
      .as_ref()
      .and_then(|a| other.nat.value.as_ref().map(|b| a + &pad_value - b));

    Ok(Self::from_nat(
      BigNat {
        limbs,
        limb_values,
        value,
        params: BigNatParams {
          min_bits: 0,
          max_word: &self.nat.params.max_word + pad_max,
          limb_width: LIMB_WIDTH,
          n_limbs,
        },
      },
      Provenance::Witness,
    ))
  }

  /// Returns `-self`; no constraints.
  pub fn neg(&self) -> Result<Self, SynthesisError> {
    Self::zero()?.sub(self)
  }

  /// Returns `self * other`
  pub fn mul<CS: ConstraintSystem<F>>(&self, cs: CS, other: &Self) -> Result<Self, SynthesisError> {
    self.mul_sub(cs, other, &[])
  }

  /// Returns `self * self`
  pub fn sqr<CS: ConstraintSystem<F>>(&self, cs: CS) -> Result<Self, SynthesisError> {
    self.mul_sub(cs, self, &[])
  }

  /// Returns `self * other - sum(subtrahends)` at the cost of a single reduction
  pub fn mul_sub<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    other: &Self,
    subtrahends: &[&Self],
  ) -> Result<Self, SynthesisError> {
    if let (Some(a), Some(b)) = (self.const_value(), other.const_value()) {
      if let Some(subs) = subtrahends
        .iter()
        .map(|s| s.const_value())
        .collect::<Option<Vec<_>>>()
      {
        return Self::constant(&(a * b - subs.into_iter().sum::<BigInt>()));
      }
    }

    let a = self.prepared(cs.namespace(|| "prepare lhs"))?;
    let b = other.prepared(cs.namespace(|| "prepare rhs"))?;
    let r = Self::alloc(cs.namespace(|| "result"), || {
      let mut v = a.nat.value.grab()? * b.nat.value.grab()?;
      for s in subtrahends {
        v -= s.nat.value.grab()?;
      }
      Ok(v.mod_floor(P::modulus()))
    })?;
    let mut right = vec![&r];
    right.extend_from_slice(subtrahends);
    Self::enforce_congruent(cs.namespace(|| "congruence"), &[(&a, &b)], &[], &right)?;
    Ok(r)
  }

  /// Returns `self / denominator`. A vanishing denominator makes the circuit unsatisfiable,
  /// whatever the numerator; for constants it is reported as `DivisionByZero`.
  pub fn div<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    denominator: &Self,
  ) -> Result<Self, SynthesisError> {
    if let (Some(a), Some(b)) = (self.const_value(), denominator.const_value()) {
      let inv = inv_mod::<P>(&b).ok_or(SynthesisError::DivisionByZero)?;
      return Self::constant(&(a * inv));
    }
    if let Some(b) = denominator.const_value() {
      let inv = inv_mod::<P>(&b).ok_or(SynthesisError::DivisionByZero)?;
      return self.mul(cs.namespace(|| "by inverse"), &Self::constant(&inv)?);
    }

    let b = denominator.prepared(cs.namespace(|| "prepare denominator"))?;
    let inv_value = b.nat.value.as_ref().map(|v| inv_mod::<P>(v));
    // b * inv = 1 fails for b = 0, 0 / 0 included
    let inv = Self::alloc(cs.namespace(|| "inverse"), || {
      Ok(inv_value.grab()?.clone().unwrap_or_default())
    })?;
    let one = Self::one()?;
    Self::enforce_congruent(cs.namespace(|| "invertible"), &[(&inv, &b)], &[], &[&one])?;

    let c = Self::alloc(cs.namespace(|| "quotient"), || {
      let num = self.nat.value.grab()?;
      Ok(
        inv_value
          .grab()?
          .as_ref()
          .map(|inv| (num * inv).mod_floor(P::modulus()))
          .unwrap_or_default(),
      )
    })?;
    Self::enforce_congruent(cs.namespace(|| "congruence"), &[(&c, &b)], &[], &[self])?;
    Ok(c)
  }

  /// Returns an element congruent to `self` with range-checked limbs (a self-reduction).
  /// Constants and already reduced elements are returned as they are.
  pub fn reduce<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Self, SynthesisError> {
    if self.is_constant() || self.is_reduced() {
      return Ok(self.clone());
    }
    let r = Self::alloc(cs.namespace(|| "remainder"), || {
      Ok(self.nat.value.grab()?.mod_floor(P::modulus()))
    })?;
    Self::enforce_congruent(cs.namespace(|| "congruence"), &[], &[self], &[&r])?;
    Ok(r)
  }

  // reduces operands whose limbs have grown too large to enter a product
  fn prepared<CS: ConstraintSystem<F>>(&self, cs: CS) -> Result<Self, SynthesisError> {
    if self.nat.params.max_word.bits() as usize > MAX_UNREDUCED_LIMB_BITS {
      self.reduce(cs)
    } else {
      Ok(self.clone())
    }
  }

  /// Enforces that the integer value of `self` is below `p`. An out-of-range value leaves the
  /// circuit unsatisfiable.
  pub fn assert_is_in_field<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
  ) -> Result<(), SynthesisError> {
    if self.is_constant() {
      return Ok(());
    }
    let p_minus_one = P::modulus() - 1u8;
    let slack = BigNat::alloc_from_nat(
      cs.namespace(|| "slack"),
      || {
        let v = self.nat.value.grab()?;
        Ok(if v > &p_minus_one {
          BigInt::zero()
        } else {
          &p_minus_one - v
        })
      },
      LIMB_WIDTH,
      N_LIMBS,
    )?;
    slack.assert_well_formed(cs.namespace(|| "slack range"))?;
    let target = BigNat::constant(&p_minus_one, LIMB_WIDTH, N_LIMBS)?;
    self
      .nat
      .add(&slack)?
      .equal_when_carried_regroup(cs.namespace(|| "slack sum"), &target)
  }

  /// Returns the canonical representative of `self`: reduced, and below `p`
  pub fn normalize<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Self, SynthesisError> {
    if self.is_constant() {
      return Ok(self.clone());
    }
    let r = self.reduce(cs.namespace(|| "reduce"))?;
    r.assert_is_in_field(cs.namespace(|| "in field"))?;
    Ok(r)
  }

  /// Enforces `self = other (mod p)`
  pub fn assert_equal<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    other: &Self,
  ) -> Result<(), SynthesisError> {
    if let (Some(a), Some(b)) = (self.const_value(), other.const_value()) {
      if a != b {
        cs.enforce(|| "constants differ", |lc| lc, |lc| lc, |lc| lc + CS::one());
      }
      return Ok(());
    }
    Self::enforce_congruent(cs, &[], &[self], &[other])
  }

  /// Returns `other` if `condition` holds, `self` otherwise. One constraint per limb.
  pub fn conditional_select<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    other: &Self,
    condition: &Boolean,
  ) -> Result<Self, SynthesisError> {
    if let Boolean::Constant(c) = condition {
      return Ok(if *c { other.clone() } else { self.clone() });
    }

    let n_limbs = max(self.nat.limbs.len(), other.nat.limbs.len());
    let zero = Num::new(Some(F::ZERO), LinearCombination::zero());
    let (ours, theirs) = (self.nat.as_limbs(), other.nat.as_limbs());
    let limbs = (0..n_limbs)
      .map(|i| {
        conditionally_select_num(
          cs.namespace(|| format!("limb {i}")),
          theirs.get(i).unwrap_or(&zero),
          ours.get(i).unwrap_or(&zero),
          condition,
        )
      })
      .collect::<Result<Vec<_>, SynthesisError>>()?;
    let value = condition.get_value().and_then(|c| {
      if c {
        other.nat.value.clone()
      } else {
        self.nat.value.clone()
      }
    });

    Ok(Self::from_nat(
      BigNat {
        limb_values: limbs.iter().map(|l| l.value).collect(),
        limbs: limbs.into_iter().map(|l| l.num).collect(),
        value,
        params: BigNatParams {
          min_bits: 0,
          max_word: max(&self.nat.params.max_word, &other.nat.params.max_word).clone(),
          limb_width: LIMB_WIDTH,
          n_limbs,
        },
      },
      Provenance::Witness,
    ))
  }

  /// Returns `-self` if `condition` holds, `self` otherwise
  pub fn conditional_negate<CS: ConstraintSystem<F>>(
    &self,
    cs: CS,
    condition: &Boolean,
  ) -> Result<Self, SynthesisError> {
    self.conditional_select(cs, &self.neg()?, condition)
  }

  /// Returns a boolean that is true iff `self = 0 (mod p)`.
  /// The canonical limbs are range-checked, so their sum vanishes only when every limb does.
  pub fn is_zero<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Boolean, SynthesisError> {
    if let Some(v) = self.const_value() {
      return Ok(Boolean::constant(v.is_zero()));
    }
    let c = self.normalize(cs.namespace(|| "normalize"))?;
    let sum = c
      .nat
      .as_limbs()
      .iter()
      .fold(Num::new(Some(F::ZERO), LinearCombination::zero()), |acc, l| acc.add(l));
    let bit = alloc_is_zero(cs.namespace(|| "limb sum is zero"), &sum)?;
    Ok(Boolean::from(bit))
  }

  /// The binary limbs and the prime-basis limb of `self`
  pub fn limbs(&self) -> LimbDecomposition<F> {
    let binary = self.nat.as_limbs();
    let prime = recompose(&binary);
    LimbDecomposition { binary, prime }
  }

  /// Rebuilds an element from a limb decomposition whose binary limbs are bounded by
  /// `max_word`. The prime-basis limb is constrained to agree with the binary limbs.
  pub fn from_limbs<CS: ConstraintSystem<F>>(
    mut cs: CS,
    limbs: &LimbDecomposition<F>,
    max_word: &BigInt,
    provenance: Provenance,
  ) -> Result<Self, SynthesisError> {
    let recomposed = recompose(&limbs.binary);
    if !provenance.is_constant() {
      cs.enforce(
        || "prime limb",
        |lc| lc + &recomposed.num - &limbs.prime.num,
        |lc| lc + CS::one(),
        |lc| lc,
      );
    }
    let limb_values = limbs
      .binary
      .iter()
      .map(|l| l.value)
      .collect::<Option<Vec<F>>>();
    let value = limb_values
      .as_ref()
      .map(|vs| limbs_to_nat::<F, _, _>(vs.iter(), LIMB_WIDTH));
    Ok(Self::from_nat(
      BigNat {
        limbs: limbs.binary.iter().map(|l| l.num.clone()).collect(),
        limb_values,
        value,
        params: BigNatParams {
          min_bits: 0,
          max_word: max_word.clone(),
          limb_width: LIMB_WIDTH,
          n_limbs: limbs.binary.len(),
        },
      },
      provenance,
    ))
  }

  /// The canonical big-endian bytes of `self`, each constrained to 8 bits
  pub fn to_bytes_be<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
  ) -> Result<Vec<Num<F>>, SynthesisError> {
    let n_bytes = P::num_bits().div_ceil(8);
    if let Some(v) = self.const_value() {
      let (_, le) = v.to_bytes_le();
      return Ok(
        (0..n_bytes)
          .rev()
          .map(|i| Num::constant(F::from(u64::from(le.get(i).copied().unwrap_or(0)))))
          .collect(),
      );
    }

    let c = self.normalize(cs.namespace(|| "normalize"))?;
    let bits = c.nat.decompose(cs.namespace(|| "bits"))?;
    let bytes = bits
      .bits
      .chunks(8)
      .enumerate()
      .map(|(i, chunk)| {
        let mut coeff = F::ONE;
        let num = chunk.iter().fold(LinearCombination::zero(), |lc, b| {
          let lc = lc + (coeff, b);
          coeff = coeff.double();
          lc
        });
        let value = bits.values.as_ref().map(|vs| {
          vs[i * 8..(i + 1) * 8]
            .iter()
            .rev()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(*b))
        });
        Num::new(value.map(F::from), num)
      })
      .take(n_bytes)
      .collect::<Vec<_>>();
    Ok(bytes.into_iter().rev().collect())
  }

  /// Enforces `sum_i a_i * b_i + sum_j left_j = sum_k right_k (mod p)`.
  fn enforce_congruent<CS: ConstraintSystem<F>>(
    mut cs: CS,
    products: &[(&Self, &Self)],
    left: &[&Self],
    right: &[&Self],
  ) -> Result<(), SynthesisError> {
    let p = P::modulus();
    let left_bound = products
      .iter()
      .map(|(a, b)| a.nat.max_value() * b.nat.max_value())
      .chain(left.iter().map(|l| l.nat.max_value()))
      .sum::<BigInt>();
    let right_bound = right.iter().map(|r| r.nat.max_value()).sum::<BigInt>();
    // the least multiple of p not below anything the right-hand side can reach
    let k = right_bound.div_ceil(p) * p;
    let q_bound = (&left_bound + &k) / p;
    let q_limbs = max(1, (q_bound.bits() as usize).div_ceil(LIMB_WIDTH));

    let q = BigNat::alloc_from_nat(
      cs.namespace(|| "quotient"),
      || {
        let mut v = k.clone();
        for (a, b) in products {
          v += a.nat.value.grab()? * b.nat.value.grab()?;
        }
        for l in left {
          v += l.nat.value.grab()?;
        }
        for r in right {
          v -= r.nat.value.grab()?;
        }
        Ok(v.div_floor(p))
      },
      LIMB_WIDTH,
      q_limbs,
    )?;
    q.assert_well_formed(cs.namespace(|| "quotient range"))?;

    let word = int_with_n_ones(LIMB_WIDTH);
    let k_limbs = max(1, (k.bits() as usize).div_ceil(LIMB_WIDTH));
    let mut lhs = Polynomial::from(BigNat::constant(&k, LIMB_WIDTH, k_limbs)?);
    let mut lhs_max_word = word.clone();
    for (i, (a, b)) in products.iter().enumerate() {
      let prod = Self::product(cs.namespace(|| format!("product {i}")), a, b)?;
      lhs = lhs.sum(&prod);
      lhs_max_word += BigInt::from(a.nat.limbs.len().min(b.nat.limbs.len()))
        * &a.nat.params.max_word
        * &b.nat.params.max_word;
    }
    for l in left {
      lhs = lhs.sum(&Polynomial::from(l.nat.clone()));
      lhs_max_word += &l.nat.params.max_word;
    }

    let p_limbs = nat_to_int_limbs(p, LIMB_WIDTH, N_LIMBS)?;
    let mut rhs = Polynomial::from(q).scale(&p_limbs)?;
    let mut rhs_max_word = BigInt::from(q_limbs.min(N_LIMBS)) * &word * &word;
    for r in right {
      rhs = rhs.sum(&Polynomial::from(r.nat.clone()));
      rhs_max_word += &r.nat.params.max_word;
    }

    let lhs = BigNat::from_poly(lhs, LIMB_WIDTH, lhs_max_word);
    let rhs = BigNat::from_poly(rhs, LIMB_WIDTH, rhs_max_word);
    lhs.equal_when_carried_regroup(cs.namespace(|| "carry"), &rhs)
  }

  // product of two limb polynomials; free when either side is a constant
  fn product<CS: ConstraintSystem<F>>(
    cs: CS,
    a: &Self,
    b: &Self,
  ) -> Result<Polynomial<F>, SynthesisError> {
    let const_limbs = |x: &Self| -> Option<Vec<BigInt>> {
      if x.is_constant() {
        x.nat
          .limb_values
          .as_ref()
          .map(|vs| vs.iter().map(f_to_nat).collect())
      } else {
        None
      }
    };
    match (const_limbs(a), const_limbs(b)) {
      (Some(c), _) => Polynomial::from(b.nat.clone()).scale(&c),
      (None, Some(c)) => Polynomial::from(a.nat.clone()).scale(&c),
      (None, None) => {
        Polynomial::from(a.nat.clone()).alloc_product(cs, &Polynomial::from(b.nat.clone()))
      }
    }
  }
}

fn limbs_to_int(limbs: &[BigInt]) -> BigInt {
  limbs.iter().rev().fold(BigInt::zero(), |acc, l| (acc << LIMB_WIDTH) + l)
}

// limbs of a multiple of p, each strictly above `bound`
fn subtraction_pad<P: FieldParams>(
  bound: &BigInt,
  n_limbs: usize,
) -> Result<Vec<BigInt>, SynthesisError> {
  let d = BigInt::one() << bound.bits();
  let d_value = limbs_to_int(&vec![d.clone(); n_limbs]);
  let r = (-d_value).mod_floor(P::modulus());
  Ok(
    nat_to_int_limbs(&r, LIMB_WIDTH, n_limbs)?
      .into_iter()
      .map(|r_i| &d + r_i)
      .collect(),
  )
}

fn recompose<F: PrimeField>(limbs: &[Num<F>]) -> Num<F> {
  let base = F::from(2u64).pow_vartime([LIMB_WIDTH as u64]);
  let mut shift = F::ONE;
  limbs
    .iter()
    .fold(Num::new(Some(F::ZERO), LinearCombination::zero()), |acc, l| {
      let acc = acc.add(&l.scale(shift));
      shift *= base;
      acc
    })
}
