//! In-circuit arithmetic on short Weierstrass curves `y^2 = x^3 + a x + b` whose coordinates
//! live in a foreign field.
//!
//! Points are affine and have no encoding of infinity. Operations whose result would be the
//! point at infinity, or whose slope is undefined, leave the circuit unsatisfiable.
pub mod naf;
pub mod scalar_mul;
pub mod tables;

use crate::{
  gadgets::nonnative::{field::ForeignFieldElement, util::Num, Provenance},
  provider::{native::AffinePoint, CurveParams},
};
use bellpepper_core::{boolean::Boolean, ConstraintSystem, SynthesisError};
use ff::PrimeField;

type Coordinate<F, C> = ForeignFieldElement<F, <C as CurveParams>::Base>;

/// An affine point of the curve `C`, held in a circuit over `F`
#[derive(Clone)]
pub struct CurvePoint<F: PrimeField, C: CurveParams> {
  x: Coordinate<F, C>,
  y: Coordinate<F, C>,
}

impl<F: PrimeField, C: CurveParams> CurvePoint<F, C> {
  /// Creates a point from its coordinates. The curve equation is not checked; see `on_curve`.
  pub fn new(x: Coordinate<F, C>, y: Coordinate<F, C>) -> Self {
    Self { x, y }
  }

  /// A circuit constant
  pub fn constant(p: &AffinePoint<C>) -> Result<Self, SynthesisError> {
    Ok(Self::new(
      ForeignFieldElement::constant(p.x())?,
      ForeignFieldElement::constant(p.y())?,
    ))
  }

  /// The curve's base point as a constant. Infinity has no representation; this stands in
  /// wherever a structurally valid point is needed.
  pub fn one() -> Result<Self, SynthesisError> {
    Self::constant(C::one())
  }

  /// Allocates both coordinates with range-checked limbs
  pub fn alloc<CS, Func>(mut cs: CS, f: Func) -> Result<Self, SynthesisError>
  where
    CS: ConstraintSystem<F>,
    Func: FnOnce() -> Result<AffinePoint<C>, SynthesisError>,
  {
    let p = f();
    let coordinate = |c: fn(&AffinePoint<C>) -> &num_bigint::BigInt| match &p {
      Ok(p) => Ok(c(p).clone()),
      Err(SynthesisError::AssignmentMissing) => Err(SynthesisError::AssignmentMissing),
      Err(_) => Err(SynthesisError::Unsatisfiable),
    };
    let x = ForeignFieldElement::alloc(cs.namespace(|| "x"), || coordinate(AffinePoint::x))?;
    let y = ForeignFieldElement::alloc(cs.namespace(|| "y"), || coordinate(AffinePoint::y))?;
    Ok(Self::new(x, y))
  }

  pub fn x(&self) -> &Coordinate<F, C> {
    &self.x
  }

  pub fn y(&self) -> &Coordinate<F, C> {
    &self.y
  }

  /// The point's value, if known. It is not checked to be on the curve.
  pub fn value(&self) -> Option<AffinePoint<C>> {
    Some(AffinePoint::new_unchecked(self.x.value()?, self.y.value()?))
  }

  /// `Constant` only when both coordinates are
  pub fn provenance(&self) -> Provenance {
    self.x.provenance().merge(self.y.provenance())
  }

  pub fn is_constant(&self) -> bool {
    self.provenance().is_constant()
  }

  /// Returns `-self`; no constraints.
  pub fn neg(&self) -> Result<Self, SynthesisError> {
    Ok(Self::new(self.x.clone(), self.y.neg()?))
  }

  /// Returns `self + other`. Points sharing an x coordinate, equal or opposite, leave the circuit
  /// unsatisfiable; use `dbl` for doubling.
  pub fn add<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    other: &Self,
  ) -> Result<Self, SynthesisError> {
    if let (Some(p), Some(q)) = (self.constant_value(), other.constant_value()) {
      return Self::constant(&p.add(&q).ok_or(SynthesisError::Unsatisfiable)?);
    }

    //************************************************************************/
    // lambda = (other.y - self.y) / (other.x - self.x)
    //************************************************************************/
    let lambda = other
      .y
      .sub(&self.y)?
      .div(cs.namespace(|| "lambda"), &other.x.sub(&self.x)?)?;
    self.chord(cs.namespace(|| "chord"), &lambda, &other.x)
  }

  /// Returns `self - other`
  pub fn sub<CS: ConstraintSystem<F>>(&self, cs: CS, other: &Self) -> Result<Self, SynthesisError> {
    self.add(cs, &other.neg()?)
  }

  /// Returns `2 * self`. A point with `y = 0` leaves the circuit unsatisfiable.
  pub fn dbl<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Self, SynthesisError> {
    if let Some(p) = self.constant_value() {
      return Self::constant(&p.double().ok_or(SynthesisError::Unsatisfiable)?);
    }

    //************************************************************************/
    // lambda = (3 * x^2 + a) / (2 * y)
    //************************************************************************/
    let xx = self.x.sqr(cs.namespace(|| "x^2"))?;
    let mut numerator = xx.add(&xx)?.add(&xx)?;
    if let Some(a) = C::a() {
      numerator = numerator.add(&ForeignFieldElement::constant(a)?)?;
    }
    let lambda = numerator.div(cs.namespace(|| "lambda"), &self.y.add(&self.y)?)?;
    self.chord(cs.namespace(|| "chord"), &lambda, &self.x)
  }

  /// Returns `2 * self + other` with two divisions, skipping the intermediate `self + other`
  /// y coordinate. Points sharing an x coordinate leave the circuit unsatisfiable.
  pub fn montgomery_ladder<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    other: &Self,
  ) -> Result<Self, SynthesisError> {
    if let (Some(p), Some(q)) = (self.constant_value(), other.constant_value()) {
      let r = p
        .double()
        .and_then(|d| d.add(&q))
        .ok_or(SynthesisError::Unsatisfiable)?;
      return Self::constant(&r);
    }

    // lambda1 = (other.y - self.y) / (other.x - self.x)
    let lambda1 = other
      .y
      .sub(&self.y)?
      .div(cs.namespace(|| "lambda1"), &other.x.sub(&self.x)?)?;
    // x3 = lambda1^2 - self.x - other.x
    let x3 = lambda1.mul_sub(cs.namespace(|| "x3"), &lambda1, &[&self.x, &other.x])?;
    // lambda2 = 2 * self.y / (self.x - x3) - lambda1
    let lambda2 = self
      .y
      .add(&self.y)?
      .div(cs.namespace(|| "t"), &self.x.sub(&x3)?)?
      .sub(&lambda1)?;
    // x4 = lambda2^2 - self.x - x3
    let x4 = lambda2.mul_sub(cs.namespace(|| "x4"), &lambda2, &[&self.x, &x3])?;
    // y4 = lambda2 * (self.x - x4) - self.y
    let y4 = lambda2.mul_sub(cs.namespace(|| "y4"), &self.x.sub(&x4)?, &[&self.y])?;
    Ok(Self::new(x4, y4))
  }

  // the third point on the line of slope `lambda` through `self` and a point with x coordinate
  // `other_x`, reflected
  fn chord<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    lambda: &Coordinate<F, C>,
    other_x: &Coordinate<F, C>,
  ) -> Result<Self, SynthesisError> {
    //************************************************************************/
    // x = lambda * lambda - self.x - other.x
    //************************************************************************/
    let x = lambda.mul_sub(cs.namespace(|| "x"), lambda, &[&self.x, other_x])?;

    //************************************************************************/
    // y = lambda * (self.x - x) - self.y
    //************************************************************************/
    let y = lambda.mul_sub(cs.namespace(|| "y"), &self.x.sub(&x)?, &[&self.y])?;
    Ok(Self::new(x, y))
  }

  /// Returns `-self` if `condition` holds, `self` otherwise
  pub fn conditional_negate<CS: ConstraintSystem<F>>(
    &self,
    cs: CS,
    condition: &Boolean,
  ) -> Result<Self, SynthesisError> {
    Ok(Self::new(
      self.x.clone(),
      self.y.conditional_negate(cs, condition)?,
    ))
  }

  /// Returns `other` if `condition` holds, `self` otherwise
  pub fn conditional_select<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
    other: &Self,
    condition: &Boolean,
  ) -> Result<Self, SynthesisError> {
    Ok(Self::new(
      self
        .x
        .conditional_select(cs.namespace(|| "x"), &other.x, condition)?,
      self
        .y
        .conditional_select(cs.namespace(|| "y"), &other.y, condition)?,
    ))
  }

  /// Range-checks both coordinates' limbs, so the point can be read repeatedly from a table
  pub fn reduce<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Self, SynthesisError> {
    Ok(Self::new(
      self.x.reduce(cs.namespace(|| "x"))?,
      self.y.reduce(cs.namespace(|| "y"))?,
    ))
  }

  /// Brings both coordinates into canonical form
  pub fn normalize<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Self, SynthesisError> {
    Ok(Self::new(
      self.x.normalize(cs.namespace(|| "x"))?,
      self.y.normalize(cs.namespace(|| "y"))?,
    ))
  }

  /// Returns a boolean that is true iff `y^2 = x^3 + a x + b`.
  /// An off-curve point yields false; the circuit stays satisfiable.
  pub fn on_curve<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<Boolean, SynthesisError> {
    let yy = self.y.sqr(cs.namespace(|| "y^2"))?;
    let xx = self.x.sqr(cs.namespace(|| "x^2"))?;
    // x^3 - y^2
    let mut diff = xx.mul_sub(cs.namespace(|| "x^3 - y^2"), &self.x, &[&yy])?;
    if let Some(a) = C::a() {
      let ax = self
        .x
        .mul(cs.namespace(|| "a x"), &ForeignFieldElement::constant(a)?)?;
      diff = diff.add(&ax)?;
    }
    diff
      .add(&ForeignFieldElement::constant(C::b())?)?
      .is_zero(cs.namespace(|| "is zero"))
  }

  /// Makes the circuit unsatisfiable unless the point is on the curve
  pub fn assert_on_curve<CS: ConstraintSystem<F>>(&self, mut cs: CS) -> Result<(), SynthesisError> {
    let on_curve = self.on_curve(cs.namespace(|| "on curve"))?;
    Boolean::enforce_equal(
      cs.namespace(|| "is on curve"),
      &on_curve,
      &Boolean::constant(true),
    )
  }

  /// Canonical big-endian bytes of `y` followed by those of `x`
  pub fn to_canonical_bytes<CS: ConstraintSystem<F>>(
    &self,
    mut cs: CS,
  ) -> Result<Vec<Num<F>>, SynthesisError> {
    let mut bytes = self.y.to_bytes_be(cs.namespace(|| "y"))?;
    bytes.extend(self.x.to_bytes_be(cs.namespace(|| "x"))?);
    Ok(bytes)
  }

  fn constant_value(&self) -> Option<AffinePoint<C>> {
    if self.is_constant() {
      self.value()
    } else {
      None
    }
  }
}
