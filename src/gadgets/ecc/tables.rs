//! Precomputed signed combinations of points, read with one selector bit per point.
//!
//! A table over points `P_0..P_{n-1}` returns `sum_i (-1)^{v_i} P_i` for selector bits `v_i`.
//! The entry for all-false selectors is the table's initial entry.
use super::CurvePoint;
use crate::{
  errors::EccError,
  gadgets::{
    nonnative::{
      field::{ForeignFieldElement, LimbDecomposition},
      util::Num,
      Provenance,
    },
    utils::{preprocess_three_bit_table, ThreeBitSelector, ThreeBitTable},
  },
  provider::CurveParams,
};
use bellpepper_core::{boolean::Boolean, ConstraintSystem};
use ff::PrimeField;
use num_bigint::BigInt;

/// A table of signed point combinations
pub trait LookupTable<F: PrimeField, C: CurveParams> {
  /// The number of points the table combines, which is also the number of selector bits
  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The sum of all points, read with every selector bit false
  fn initial_entry(&self) -> &CurvePoint<F, C>;

  /// Returns `sum_i (-1)^{selectors_i} P_i`
  fn get<CS: ConstraintSystem<F>>(
    &self,
    cs: CS,
    selectors: &[Boolean],
  ) -> Result<CurvePoint<F, C>, EccError>;
}

fn check_selectors(expected: usize, selectors: &[Boolean]) -> Result<(), EccError> {
  if selectors.len() != expected {
    return Err(EccError::InvalidSelectorLength {
      expected,
      actual: selectors.len(),
    });
  }
  Ok(())
}

/// `P1 + P0` and `P1 - P0`; the other two sign patterns are their negations
#[derive(Clone)]
pub struct PairLookupTable<F: PrimeField, C: CurveParams> {
  sum: CurvePoint<F, C>,
  difference: CurvePoint<F, C>,
}

impl<F: PrimeField, C: CurveParams> PairLookupTable<F, C> {
  pub fn new<CS: ConstraintSystem<F>>(
    mut cs: CS,
    p0: &CurvePoint<F, C>,
    p1: &CurvePoint<F, C>,
  ) -> Result<Self, EccError> {
    let sum = p1.add(cs.namespace(|| "p1 + p0"), p0)?;
    let difference = p1.sub(cs.namespace(|| "p1 - p0"), p0)?;
    Ok(Self {
      sum: sum.reduce(cs.namespace(|| "reduce sum"))?,
      difference: difference.reduce(cs.namespace(|| "reduce difference"))?,
    })
  }
}

impl<F: PrimeField, C: CurveParams> LookupTable<F, C> for PairLookupTable<F, C> {
  fn len(&self) -> usize {
    2
  }

  fn initial_entry(&self) -> &CurvePoint<F, C> {
    &self.sum
  }

  fn get<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    selectors: &[Boolean],
  ) -> Result<CurvePoint<F, C>, EccError> {
    check_selectors(2, selectors)?;
    let (v0, v1) = (&selectors[0], &selectors[1]);
    let differ = Boolean::xor(cs.namespace(|| "v0 xor v1"), v0, v1)?;
    let entry = self
      .sum
      .conditional_select(cs.namespace(|| "select"), &self.difference, &differ)?;
    Ok(entry.conditional_negate(cs.namespace(|| "sign"), v1)?)
  }
}

// the five three-bit tables of one coordinate
#[derive(Clone)]
struct CoordinateTables<F: PrimeField> {
  binary: Vec<ThreeBitTable<F>>,
  prime: ThreeBitTable<F>,
  max_word: BigInt,
}

impl<F: PrimeField> CoordinateTables<F> {
  fn new<P: crate::provider::FieldParams>(
    entries: &[&ForeignFieldElement<F, P>; 8],
    provenance: Provenance,
  ) -> Self {
    let limbs = entries.map(|e| e.limbs());
    let table = |pick: &dyn Fn(&LimbDecomposition<F>) -> Num<F>| {
      preprocess_three_bit_table(&core::array::from_fn(|i| pick(&limbs[i])), provenance)
    };
    let n_limbs = limbs[0].binary.len();
    Self {
      binary: (0..n_limbs)
        .map(|j| table(&|l: &LimbDecomposition<F>| l.binary[j].clone()))
        .collect(),
      prime: table(&|l: &LimbDecomposition<F>| l.prime.clone()),
      max_word: entries
        .iter()
        .map(|e| e.limb_bound().clone())
        .max()
        .unwrap_or_default(),
    }
  }

  fn select<P: crate::provider::FieldParams, CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    selector: &ThreeBitSelector,
    provenance: Provenance,
  ) -> Result<ForeignFieldElement<F, P>, EccError> {
    let binary = self
      .binary
      .iter()
      .enumerate()
      .map(|(j, t)| selector.select(cs.namespace(|| format!("limb {j}")), t))
      .collect::<Result<Vec<_>, _>>()?;
    let prime = selector.select(cs.namespace(|| "prime limb"), &self.prime)?;
    Ok(ForeignFieldElement::from_limbs(
      cs.namespace(|| "from limbs"),
      &LimbDecomposition { binary, prime },
      &self.max_word,
      provenance,
    )?)
  }
}

/// The 8 combinations of four points with the sign of the last one fixed positive
#[derive(Clone)]
pub struct QuadLookupTable<F: PrimeField, C: CurveParams> {
  entries: Vec<CurvePoint<F, C>>,
  x: CoordinateTables<F>,
  y: CoordinateTables<F>,
  provenance: Provenance,
}

impl<F: PrimeField, C: CurveParams> QuadLookupTable<F, C> {
  /// Builds the table over `[A, B, C, D]`. Entry `i` holds
  /// `(-1)^{i_0} A + (-1)^{i_1} B + (-1)^{i_2} C + D`.
  pub fn new<CS: ConstraintSystem<F>>(
    mut cs: CS,
    points: &[CurvePoint<F, C>; 4],
  ) -> Result<Self, EccError> {
    let [a, b, c, d] = points;
    let t0 = b.add(cs.namespace(|| "t0"), a)?;
    let t1 = b.sub(cs.namespace(|| "t1"), a)?;
    let t2 = d.add(cs.namespace(|| "t2"), c)?;
    let t3 = d.sub(cs.namespace(|| "t3"), c)?;

    let mut entries = Vec::with_capacity(8);
    for (i, (high, low, negate)) in [
      (&t2, &t0, false),
      (&t2, &t1, false),
      (&t2, &t1, true),
      (&t2, &t0, true),
      (&t3, &t0, false),
      (&t3, &t1, false),
      (&t3, &t1, true),
      (&t3, &t0, true),
    ]
    .into_iter()
    .enumerate()
    {
      let mut cs = cs.namespace(|| format!("entry {i}"));
      let e = if negate {
        high.sub(cs.namespace(|| "sub"), low)?
      } else {
        high.add(cs.namespace(|| "add"), low)?
      };
      entries.push(e.reduce(cs.namespace(|| "reduce"))?);
    }

    let provenance = entries
      .iter()
      .fold(Provenance::Constant, |acc, e| acc.merge(e.provenance()));
    let xs: [&ForeignFieldElement<F, C::Base>; 8] = core::array::from_fn(|i| entries[i].x());
    let ys: [&ForeignFieldElement<F, C::Base>; 8] = core::array::from_fn(|i| entries[i].y());
    tracing::debug!(?provenance, "quad lookup table over {}", C::NAME);
    Ok(Self {
      x: CoordinateTables::new(&xs, provenance),
      y: CoordinateTables::new(&ys, provenance),
      entries,
      provenance,
    })
  }

  /// The stored combinations, in index order
  pub fn entries(&self) -> &[CurvePoint<F, C>] {
    &self.entries
  }
}

impl<F: PrimeField, C: CurveParams> LookupTable<F, C> for QuadLookupTable<F, C> {
  fn len(&self) -> usize {
    4
  }

  fn initial_entry(&self) -> &CurvePoint<F, C> {
    &self.entries[0]
  }

  fn get<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    selectors: &[Boolean],
  ) -> Result<CurvePoint<F, C>, EccError> {
    check_selectors(4, selectors)?;
    let v3 = &selectors[3];
    // flipping every sign negates the point, so the sign of D picks between the entry and
    // its negation
    let t = (0..3)
      .map(|i| Boolean::xor(cs.namespace(|| format!("t{i}")), v3, &selectors[i]))
      .collect::<Result<Vec<_>, _>>()?;
    let selector = ThreeBitSelector::new(cs.namespace(|| "selector"), &t[0], &t[1], &t[2])?;

    let provenance = if t.iter().all(|b| matches!(b, Boolean::Constant(_))) {
      self.provenance
    } else {
      Provenance::Witness
    };
    let x = self.x.select(cs.namespace(|| "x"), &selector, provenance)?;
    let y = self.y.select(cs.namespace(|| "y"), &selector, provenance)?;
    Ok(CurvePoint::new(x, y).conditional_negate(cs.namespace(|| "sign"), v3)?)
  }
}

/// Any number of points, grouped into quad tables, then at most one pair table, then at most
/// one single point
#[derive(Clone)]
pub struct BatchLookupTable<F: PrimeField, C: CurveParams> {
  quads: Vec<QuadLookupTable<F, C>>,
  pair: Option<PairLookupTable<F, C>>,
  single: Option<CurvePoint<F, C>>,
  initial_entry: CurvePoint<F, C>,
  len: usize,
}

impl<F: PrimeField, C: CurveParams> BatchLookupTable<F, C> {
  pub fn new<CS: ConstraintSystem<F>>(
    mut cs: CS,
    points: &[CurvePoint<F, C>],
  ) -> Result<Self, EccError> {
    if points.is_empty() {
      return Err(EccError::EmptyBatch);
    }
    let n = points.len();
    let num_quads = n / 4;
    let has_pair = n % 4 >= 2;
    let has_single = n % 2 == 1;
    tracing::debug!(n, num_quads, has_pair, has_single, "batch lookup table");

    let quads = points
      .chunks_exact(4)
      .enumerate()
      .map(|(i, chunk)| {
        let quad: &[CurvePoint<F, C>; 4] = chunk.try_into().map_err(|_| EccError::EmptyBatch)?;
        QuadLookupTable::new(cs.namespace(|| format!("quad {i}")), quad)
      })
      .collect::<Result<Vec<_>, _>>()?;
    let rest = &points[4 * num_quads..];
    let pair = if has_pair {
      Some(PairLookupTable::new(
        cs.namespace(|| "pair"),
        &rest[0],
        &rest[1],
      )?)
    } else {
      None
    };
    let single = if has_single {
      rest
        .last()
        .map(|p| p.reduce(cs.namespace(|| "single")))
        .transpose()?
    } else {
      None
    };

    let mut parts = quads
      .iter()
      .map(|q| q.initial_entry())
      .chain(pair.iter().map(|p| p.initial_entry()))
      .chain(single.iter());
    let first = parts.next().ok_or(EccError::EmptyBatch)?.clone();
    let initial_entry = parts.enumerate().try_fold(first, |acc, (i, p)| {
      acc.add(cs.namespace(|| format!("initial entry {i}")), p)
    })?;

    Ok(Self {
      quads,
      pair,
      single,
      initial_entry,
      len: n,
    })
  }

  /// The number of quad tables, whether a pair table is present, and whether a single point is
  /// present
  pub fn shape(&self) -> (usize, bool, bool) {
    (self.quads.len(), self.pair.is_some(), self.single.is_some())
  }
}

impl<F: PrimeField, C: CurveParams> LookupTable<F, C> for BatchLookupTable<F, C> {
  fn len(&self) -> usize {
    self.len
  }

  fn initial_entry(&self) -> &CurvePoint<F, C> {
    &self.initial_entry
  }

  fn get<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    selectors: &[Boolean],
  ) -> Result<CurvePoint<F, C>, EccError> {
    check_selectors(self.len, selectors)?;
    let mut parts = Vec::with_capacity(self.quads.len() + 2);
    for (i, (quad, bits)) in self.quads.iter().zip(selectors.chunks_exact(4)).enumerate() {
      parts.push(quad.get(cs.namespace(|| format!("quad {i}")), bits)?);
    }
    let rest = &selectors[4 * self.quads.len()..];
    if let Some(pair) = &self.pair {
      parts.push(pair.get(cs.namespace(|| "pair"), &rest[..2])?);
    }
    if let (Some(single), Some(bit)) = (&self.single, rest.last()) {
      parts.push(single.conditional_negate(cs.namespace(|| "single"), bit)?);
    }

    let mut parts = parts.into_iter();
    let first = parts.next().ok_or(EccError::EmptyBatch)?;
    Ok(parts.enumerate().try_fold(first, |acc, (i, p)| {
      acc.add(cs.namespace(|| format!("sum {i}")), &p)
    })?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::{
    native::{msm, AffinePoint},
    secp256k1::Secp256k1,
    secp256r1::Secp256r1,
  };
  use bellpepper_core::{boolean::AllocatedBit, test_cs::TestConstraintSystem};
  use halo2curves::bn256::Fr;

  fn points<C: CurveParams>(n: usize) -> Vec<AffinePoint<C>> {
    C::generators()[..n].to_vec()
  }

  fn alloc_points<C: CurveParams, CS: ConstraintSystem<Fr>>(
    mut cs: CS,
    points: &[AffinePoint<C>],
  ) -> Vec<CurvePoint<Fr, C>> {
    points
      .iter()
      .enumerate()
      .map(|(i, p)| {
        let p = p.clone();
        CurvePoint::alloc(cs.namespace(|| format!("point {i}")), || Ok(p)).unwrap()
      })
      .collect()
  }

  fn alloc_bits<CS: ConstraintSystem<Fr>>(mut cs: CS, n: usize, pattern: usize) -> Vec<Boolean> {
    (0..n)
      .map(|i| {
        Boolean::from(
          AllocatedBit::alloc(cs.namespace(|| format!("v{i}")), Some(pattern >> i & 1 == 1))
            .unwrap(),
        )
      })
      .collect()
  }

  fn signed_sum<C: CurveParams>(
    points: &[AffinePoint<C>],
    pattern: usize,
  ) -> Option<AffinePoint<C>> {
    let signs = (0..points.len())
      .map(|i| {
        if pattern >> i & 1 == 1 {
          BigInt::from(-1)
        } else {
          BigInt::from(1)
        }
      })
      .collect::<Vec<_>>();
    msm(points, &signs)
  }

  #[test]
  fn test_pair_table() {
    let ps = points::<Secp256k1>(2);
    let mut cs = TestConstraintSystem::<Fr>::new();
    let vars = alloc_points(cs.namespace(|| "points"), &ps);
    let table = PairLookupTable::new(cs.namespace(|| "table"), &vars[0], &vars[1]).unwrap();
    for pattern in 0..4 {
      let mut cs = cs.namespace(|| format!("read {pattern}"));
      let bits = alloc_bits(cs.namespace(|| "bits"), 2, pattern);
      let r = table.get(cs.namespace(|| "get"), &bits).unwrap();
      assert_eq!(r.value(), signed_sum(&ps, pattern));
    }
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_quad_table_all_sign_patterns() {
    let ps = points::<Secp256r1>(4);
    let mut cs = TestConstraintSystem::<Fr>::new();
    let vars = alloc_points(cs.namespace(|| "points"), &ps);
    let quad: [CurvePoint<Fr, Secp256r1>; 4] = vars.try_into().ok().unwrap();
    let table = QuadLookupTable::new(cs.namespace(|| "table"), &quad).unwrap();
    assert_eq!(table.initial_entry().value(), signed_sum(&ps, 0));
    for pattern in 0..16 {
      let mut cs = cs.namespace(|| format!("read {pattern}"));
      let bits = alloc_bits(cs.namespace(|| "bits"), 4, pattern);
      let r = table.get(cs.namespace(|| "get"), &bits).unwrap();
      assert_eq!(r.value(), signed_sum(&ps, pattern), "pattern {pattern}");
    }
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_constant_quad_table_with_constant_bits() {
    let ps = points::<Secp256k1>(4);
    let mut cs = TestConstraintSystem::<Fr>::new();
    let quad: [CurvePoint<Fr, Secp256k1>; 4] =
      core::array::from_fn(|i| CurvePoint::constant(&ps[i]).unwrap());
    let table = QuadLookupTable::new(cs.namespace(|| "table"), &quad).unwrap();
    let bits = [true, false, false, true].map(Boolean::constant);
    let r = table.get(cs.namespace(|| "get"), &bits).unwrap();
    assert!(r.is_constant());
    assert_eq!(r.value(), signed_sum(&ps, 0b1001));
    assert_eq!(cs.num_constraints(), 0);
  }

  #[test]
  fn test_batch_partition() {
    for n in 1..=9usize {
      let ps = points::<Secp256k1>(n);
      let mut cs = TestConstraintSystem::<Fr>::new();
      let vars = alloc_points(cs.namespace(|| "points"), &ps);
      let table = BatchLookupTable::new(cs.namespace(|| "table"), &vars).unwrap();
      let (quads, pair, single) = table.shape();
      assert_eq!(4 * quads + 2 * usize::from(pair) + usize::from(single), n);
      assert_eq!(table.len(), n);
      assert_eq!(table.initial_entry().value(), signed_sum(&ps, 0));

      let pattern = 0b1_0110_1101 & ((1 << n) - 1);
      let bits = alloc_bits(cs.namespace(|| "bits"), n, pattern);
      let r = table.get(cs.namespace(|| "get"), &bits).unwrap();
      assert_eq!(r.value(), signed_sum(&ps, pattern), "n = {n}");
      assert!(cs.is_satisfied(), "n = {n}");
    }
  }

  #[test]
  fn test_batch_errors() {
    let mut cs = TestConstraintSystem::<Fr>::new();
    assert!(matches!(
      BatchLookupTable::<Fr, Secp256k1>::new(cs.namespace(|| "empty"), &[]),
      Err(EccError::EmptyBatch)
    ));

    let ps = points::<Secp256k1>(3);
    let vars = alloc_points(cs.namespace(|| "points"), &ps);
    let table = BatchLookupTable::new(cs.namespace(|| "table"), &vars).unwrap();
    let bits = alloc_bits(cs.namespace(|| "bits"), 2, 0);
    assert!(matches!(
      table.get(cs.namespace(|| "get"), &bits),
      Err(EccError::InvalidSelectorLength {
        expected: 3,
        actual: 2
      })
    ));
  }
}
