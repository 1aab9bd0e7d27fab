//! Native-field gadgets shared by the foreign-field and curve code: zero tests, selection, and
//! the three-bit table lookup used by the quad lookup table.
use super::nonnative::{util::Num, OptionExt, Provenance};
use bellpepper_core::{
  boolean::{AllocatedBit, Boolean},
  ConstraintSystem, LinearCombination, SynthesisError,
};
use ff::PrimeField;

/// Returns a bit that is true iff `num` is zero
pub fn alloc_is_zero<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  num: &Num<F>,
) -> Result<AllocatedBit, SynthesisError> {
  let r = AllocatedBit::alloc(cs.namespace(|| "r"), num.value.map(|v| v.is_zero().into()))?;

  let inv = cs.alloc(
    || "inv",
    || {
      let v = *num.value.grab()?;
      // any value works when v is zero
      Ok(Option::from(v.invert()).unwrap_or(F::ONE))
    },
  )?;

  // Constrain:
  // num * inv == 1 - r
  // For a non-zero num this forces r = 0 once inv is its inverse, and for num = 0 it forces r = 1
  cs.enforce(
    || "num * inv == 1 - r",
    |lc| lc + &num.num,
    |lc| lc + inv,
    |lc| lc + CS::one() - r.get_variable(),
  );

  // Constrain:
  // num * r == 0
  // r is zero whenever num is non-zero
  cs.enforce(
    || "num * r == 0",
    |lc| lc + &num.num,
    |lc| lc + r.get_variable(),
    |lc| lc,
  );

  Ok(r)
}

/// If condition return a otherwise b
pub fn conditionally_select_num<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  a: &Num<F>,
  b: &Num<F>,
  condition: &Boolean,
) -> Result<Num<F>, SynthesisError> {
  if let Boolean::Constant(c) = condition {
    return Ok(if *c { a.clone() } else { b.clone() });
  }

  let c = Num::alloc(cs.namespace(|| "conditional select result"), || {
    if *condition.get_value().grab()? {
      Ok(*a.value.grab()?)
    } else {
      Ok(*b.value.grab()?)
    }
  })?;

  // a * condition + b*(1-condition) = c ->
  // a * condition - b*condition = c - b
  cs.enforce(
    || "conditional select constraint",
    |lc| lc + &a.num - &b.num,
    |_| condition.lc(CS::one(), F::ONE),
    |lc| lc + &c.num - &b.num,
  );

  Ok(c)
}

/// An 8-entry table in multilinear form: entry `t0 + 2 t1 + 4 t2` equals
/// `c0 + c1 t0 + c2 t1 + c3 t2 + c4 t0 t1 + c5 t0 t2 + c6 t1 t2 + c7 t0 t1 t2`.
#[derive(Clone)]
pub struct ThreeBitTable<F: PrimeField> {
  coefficients: [Num<F>; 8],
  provenance: Provenance,
}

impl<F: PrimeField> ThreeBitTable<F> {
  /// The multilinear coefficients, `c0` first
  pub fn coefficients(&self) -> &[Num<F>; 8] {
    &self.coefficients
  }

  /// Constant tables are looked up without constraints
  pub fn provenance(&self) -> Provenance {
    self.provenance
  }
}

/// Rewrites 8 entries into the coefficients of the multilinear polynomial interpolating them
/// over `{0, 1}^3`; no constraints.
pub fn preprocess_three_bit_table<F: PrimeField>(
  entries: &[Num<F>; 8],
  provenance: Provenance,
) -> ThreeBitTable<F> {
  // signed sums over the subsets of each monomial's support
  const SIGNS: [&[(usize, bool)]; 8] = [
    &[(0, true)],
    &[(1, true), (0, false)],
    &[(2, true), (0, false)],
    &[(4, true), (0, false)],
    &[(3, true), (2, false), (1, false), (0, true)],
    &[(5, true), (4, false), (1, false), (0, true)],
    &[(6, true), (4, false), (2, false), (0, true)],
    &[
      (7, true),
      (6, false),
      (5, false),
      (4, true),
      (3, false),
      (2, true),
      (1, true),
      (0, false),
    ],
  ];
  let coefficients = SIGNS.map(|terms| {
    terms.iter().fold(
      Num::new(Some(F::ZERO), LinearCombination::zero()),
      |acc, (i, positive)| {
        if *positive {
          acc.add(&entries[*i])
        } else {
          acc.add(&entries[*i].scale(-F::ONE))
        }
      },
    )
  });
  ThreeBitTable {
    coefficients,
    provenance,
  }
}

/// Three selector bits together with their products, shared by every table read with them
pub struct ThreeBitSelector {
  // t0, t1, t2, t0t1, t0t2, t1t2, t0t1t2
  monomials: [Boolean; 7],
}

impl ThreeBitSelector {
  /// Allocates the products of the bits; constant bits cost nothing
  pub fn new<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    t0: &Boolean,
    t1: &Boolean,
    t2: &Boolean,
  ) -> Result<Self, SynthesisError> {
    let t01 = Boolean::and(cs.namespace(|| "t0 t1"), t0, t1)?;
    let t02 = Boolean::and(cs.namespace(|| "t0 t2"), t0, t2)?;
    let t12 = Boolean::and(cs.namespace(|| "t1 t2"), t1, t2)?;
    let t012 = Boolean::and(cs.namespace(|| "t0 t1 t2"), &t01, t2)?;
    Ok(Self {
      monomials: [t0.clone(), t1.clone(), t2.clone(), t01, t02, t12, t012],
    })
  }

  /// The index `t0 + 2 t1 + 4 t2`, if known
  pub fn index(&self) -> Option<usize> {
    self.monomials[..3]
      .iter()
      .enumerate()
      .try_fold(0, |acc, (i, b)| b.get_value().map(|v| acc | (usize::from(v) << i)))
  }

  /// Reads the entry addressed by the bits. Each product of a witness coefficient with a
  /// non-constant monomial costs one constraint.
  pub fn select<F: PrimeField, CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    table: &ThreeBitTable<F>,
  ) -> Result<Num<F>, SynthesisError> {
    let constant_table = table.provenance.is_constant();
    let mut acc = table.coefficients[0].clone();
    for (k, (c, m)) in table.coefficients[1..]
      .iter()
      .zip(self.monomials.iter())
      .enumerate()
    {
      let term = match m {
        Boolean::Constant(false) => continue,
        Boolean::Constant(true) => c.clone(),
        _ if constant_table => {
          let coeff = *c.value.grab()?;
          Num::new(
            m.get_value()
              .map(|b| if b { coeff } else { F::ZERO }),
            m.lc(CS::one(), coeff),
          )
        }
        _ => {
          let product = Num::alloc(cs.namespace(|| format!("term {k}")), || {
            Ok(if *m.get_value().grab()? {
              *c.value.grab()?
            } else {
              F::ZERO
            })
          })?;
          cs.enforce(
            || format!("term {k} product"),
            |lc| lc + &c.num,
            |_| m.lc(CS::one(), F::ONE),
            |lc| lc + &product.num,
          );
          product
        }
      };
      acc = acc.add(&term);
    }
    Ok(acc)
  }
}
