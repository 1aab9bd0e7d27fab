//! Out-of-circuit affine arithmetic on a foreign curve.
//!
//! `AffinePoint` is the reference the gadgets are checked against and the source of every
//! constant point a circuit embeds. The point at infinity is modelled as `None`.
use crate::provider::{CurveParams, FieldParams};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// A finite point on the curve `C`, with coordinates in `[0, p)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AffinePoint<C: CurveParams> {
  x: BigInt,
  y: BigInt,
  #[serde(skip)]
  _p: PhantomData<C>,
}

pub(crate) fn mod_p<P: FieldParams>(v: &BigInt) -> BigInt {
  v.mod_floor(P::modulus())
}

/// Inverse modulo a prime, `None` for zero
pub(crate) fn inv_mod<P: FieldParams>(v: &BigInt) -> Option<BigInt> {
  let p = P::modulus();
  let v = v.mod_floor(p);
  if v.is_zero() {
    None
  } else {
    Some(v.modpow(&(p - 2u8), p))
  }
}

/// Square root modulo an odd prime (Tonelli-Shanks), `None` for non-residues
pub(crate) fn sqrt_mod<P: FieldParams>(v: &BigInt) -> Option<BigInt> {
  let p = P::modulus();
  let v = v.mod_floor(p);
  let p_minus_one = p - 1u8;
  let euler = |a: &BigInt| a.modpow(&(&p_minus_one >> 1), p);
  if v.is_zero() {
    return Some(v);
  }
  if !euler(&v).is_one() {
    return None;
  }
  if p % 4u8 == BigInt::from(3u8) {
    return Some(v.modpow(&((p + 1u8) >> 2), p));
  }

  // p - 1 = q * 2^s with q odd
  let s = p_minus_one.trailing_zeros()?;
  let q = &p_minus_one >> s;
  let z = (2u32..).map(BigInt::from).find(|z| euler(z) == p_minus_one)?;
  let mut m = s;
  let mut c = z.modpow(&q, p);
  let mut t = v.modpow(&q, p);
  let mut r = v.modpow(&((&q + 1u8) >> 1), p);
  while !t.is_one() {
    // least i with t^(2^i) = 1
    let mut i = 0u64;
    let mut t2 = t.clone();
    while !t2.is_one() {
      t2 = (&t2 * &t2).mod_floor(p);
      i += 1;
    }
    let b = c.modpow(&(BigInt::one() << (m - i - 1)), p);
    m = i;
    c = (&b * &b).mod_floor(p);
    t = (t * &c).mod_floor(p);
    r = (r * b).mod_floor(p);
  }
  Some(r)
}

/// Big-endian encoding of a field element in the byte length of its modulus
pub(crate) fn to_bytes_be<P: FieldParams>(v: &BigInt) -> Vec<u8> {
  let len = P::num_bits().div_ceil(8);
  let (_, bytes) = v.mod_floor(P::modulus()).to_bytes_be();
  let mut out = vec![0u8; len.saturating_sub(bytes.len())];
  out.extend(bytes);
  out
}

impl<C: CurveParams> AffinePoint<C> {
  /// Builds a point from coordinates, returning `None` if it is not on the curve
  pub fn new(x: BigInt, y: BigInt) -> Option<Self> {
    let p = Self::new_unchecked(mod_p::<C::Base>(&x), mod_p::<C::Base>(&y));
    if p.is_on_curve() {
      Some(p)
    } else {
      None
    }
  }

  /// Builds a point from coordinates without checking the curve equation
  pub fn new_unchecked(x: BigInt, y: BigInt) -> Self {
    Self {
      x,
      y,
      _p: PhantomData,
    }
  }

  /// Returns the x coordinate
  pub fn x(&self) -> &BigInt {
    &self.x
  }

  /// Returns the y coordinate
  pub fn y(&self) -> &BigInt {
    &self.y
  }

  /// Evaluates `x^3 + a*x + b`
  pub fn rhs(x: &BigInt) -> BigInt {
    let mut v = x * x * x + C::b();
    if let Some(a) = C::a() {
      v += a * x;
    }
    mod_p::<C::Base>(&v)
  }

  /// Checks `y^2 = x^3 + a*x + b`
  pub fn is_on_curve(&self) -> bool {
    mod_p::<C::Base>(&(&self.y * &self.y)) == Self::rhs(&self.x)
  }

  /// Returns `-self`
  pub fn neg(&self) -> Self {
    Self::new_unchecked(self.x.clone(), mod_p::<C::Base>(&-&self.y))
  }

  /// Returns `2 * self`, or `None` for a point of order two
  pub fn double(&self) -> Option<Self> {
    let mut num = BigInt::from(3u8) * &self.x * &self.x;
    if let Some(a) = C::a() {
      num += a;
    }
    let lambda = mod_p::<C::Base>(&(num * inv_mod::<C::Base>(&(&self.y << 1))?));
    Some(self.chord(&lambda, &self.x))
  }

  /// Returns `self + other`, or `None` when the sum is the point at infinity
  pub fn add(&self, other: &Self) -> Option<Self> {
    if self.x == other.x {
      return if self.y == other.y {
        self.double()
      } else {
        None
      };
    }
    let lambda = mod_p::<C::Base>(
      &((&other.y - &self.y) * inv_mod::<C::Base>(&(&other.x - &self.x))?),
    );
    Some(self.chord(&lambda, &other.x))
  }

  /// Returns `self - other`
  pub fn sub(&self, other: &Self) -> Option<Self> {
    self.add(&other.neg())
  }

  // third intersection of the line through `self` with slope `lambda`, reflected
  fn chord(&self, lambda: &BigInt, other_x: &BigInt) -> Self {
    let x3 = mod_p::<C::Base>(&(lambda * lambda - &self.x - other_x));
    let y3 = mod_p::<C::Base>(&(lambda * (&self.x - &x3) - &self.y));
    Self::new_unchecked(x3, y3)
  }

  /// Returns `k * self` (with `k` taken modulo the group order), `None` for infinity
  pub fn mul(&self, k: &BigInt) -> Option<Self> {
    let k = k.mod_floor(C::Scalar::modulus());
    let mut acc: Option<Self> = None;
    for i in (0..k.bits()).rev() {
      acc = acc.and_then(|a| a.double());
      if k.bit(i) {
        acc = add_opt(acc.as_ref(), Some(self));
      }
    }
    acc
  }

  /// Derives a point from a 32-byte seed by try-and-increment on the x coordinate.
  /// The even square root is taken for y.
  pub fn hash_to_curve(seed: &[u8]) -> Self {
    let mut x = mod_p::<C::Base>(&BigInt::from_bytes_be(Sign::Plus, seed));
    loop {
      if let Some(y) = sqrt_mod::<C::Base>(&Self::rhs(&x)) {
        let y = if y.is_odd() {
          mod_p::<C::Base>(&-y)
        } else {
          y
        };
        return Self::new_unchecked(x, y);
      }
      x = mod_p::<C::Base>(&(x + BigInt::one()));
    }
  }

  /// Big-endian bytes of `y` followed by `x`
  pub fn to_canonical_bytes(&self) -> Vec<u8> {
    let mut out = to_bytes_be::<C::Base>(&self.y);
    out.extend(to_bytes_be::<C::Base>(&self.x));
    out
  }
}

/// Adds two points where `None` stands for the point at infinity
pub fn add_opt<C: CurveParams>(
  a: Option<&AffinePoint<C>>,
  b: Option<&AffinePoint<C>>,
) -> Option<AffinePoint<C>> {
  match (a, b) {
    (Some(a), Some(b)) => a.add(b),
    (Some(p), None) | (None, Some(p)) => Some(p.clone()),
    (None, None) => None,
  }
}

/// Computes `sum_i k_i * P_i` with the reference arithmetic
pub fn msm<C: CurveParams>(
  points: &[AffinePoint<C>],
  scalars: &[BigInt],
) -> Option<AffinePoint<C>> {
  points
    .iter()
    .zip(scalars)
    .fold(None, |acc, (p, k)| add_opt(acc.as_ref(), p.mul(k).as_ref()))
}
