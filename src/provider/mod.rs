//! This module describes the foreign curves the gadgets are instantiated with:
//! `FieldParams` for a prime field emulated in-circuit, `CurveParams` for a short Weierstrass
//! curve over such a field, native reference arithmetic, and the derived-generator caches.
use crate::provider::native::AffinePoint;
use num_bigint::BigInt;
use std::fmt::Debug;

pub mod generators;
pub mod native;
pub mod secp256k1;
pub mod secp256r1;

/// A prime field whose elements are emulated with limbs of the native field
pub trait FieldParams: Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
  /// A human-readable name for the field
  const NAME: &'static str;

  /// Returns the prime modulus
  fn modulus() -> &'static BigInt;

  /// Returns the number of bits needed to write down the modulus
  fn num_bits() -> usize {
    Self::modulus().bits() as usize
  }
}

/// A short Weierstrass curve `y^2 = x^3 + a*x + b` over a foreign prime field
pub trait CurveParams: Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
  /// A human-readable name for the curve, also used as the key of the process-wide caches
  const NAME: &'static str;

  /// The field the coordinates live in
  type Base: FieldParams;

  /// The field of scalars, i.e. integers modulo the group order
  type Scalar: FieldParams;

  /// The linear coefficient `a`, or `None` for curves with `a = 0`
  fn a() -> Option<&'static BigInt>;

  /// The constant coefficient `b`
  fn b() -> &'static BigInt;

  /// The canonical base point `(one_x, one_y)`
  fn one() -> &'static AffinePoint<Self>;

  /// Generators derived by hashing to the curve, computed once on first use
  fn generators() -> &'static [AffinePoint<Self>];
}

/// Parses a hex literal baked into the curve descriptions below
pub(crate) fn hex(s: &str) -> BigInt {
  BigInt::parse_bytes(s.as_bytes(), 16).expect("curve constants are valid hex")
}

/// Declares a curve: a unit type for the curve and one for each of its two fields.
macro_rules! impl_curve_params {
  (
    $curve:ident,
    $base:ident,
    $scalar:ident,
    $name:literal,
    $p:literal,
    $n:literal,
    $a:expr,
    $b:literal,
    $gx:literal,
    $gy:literal
  ) => {
    /// The base field of the curve
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct $base;

    /// The scalar field of the curve
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct $scalar;

    /// The curve itself
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct $curve;

    impl $crate::provider::FieldParams for $base {
      const NAME: &'static str = concat!($name, "/base");

      fn modulus() -> &'static num_bigint::BigInt {
        static P: once_cell::sync::Lazy<num_bigint::BigInt> =
          once_cell::sync::Lazy::new(|| $crate::provider::hex($p));
        &P
      }
    }

    impl $crate::provider::FieldParams for $scalar {
      const NAME: &'static str = concat!($name, "/scalar");

      fn modulus() -> &'static num_bigint::BigInt {
        static N: once_cell::sync::Lazy<num_bigint::BigInt> =
          once_cell::sync::Lazy::new(|| $crate::provider::hex($n));
        &N
      }
    }

    impl $crate::provider::CurveParams for $curve {
      const NAME: &'static str = $name;
      type Base = $base;
      type Scalar = $scalar;

      fn a() -> Option<&'static num_bigint::BigInt> {
        static A: once_cell::sync::Lazy<Option<num_bigint::BigInt>> =
          once_cell::sync::Lazy::new(|| {
            let a: Option<&str> = $a;
            a.map($crate::provider::hex)
          });
        (*A).as_ref()
      }

      fn b() -> &'static num_bigint::BigInt {
        static B: once_cell::sync::Lazy<num_bigint::BigInt> =
          once_cell::sync::Lazy::new(|| $crate::provider::hex($b));
        &B
      }

      fn one() -> &'static $crate::provider::native::AffinePoint<Self> {
        static ONE: once_cell::sync::Lazy<$crate::provider::native::AffinePoint<$curve>> =
          once_cell::sync::Lazy::new(|| {
            $crate::provider::native::AffinePoint::new_unchecked(
              $crate::provider::hex($gx),
              $crate::provider::hex($gy),
            )
          });
        &ONE
      }

      fn generators() -> &'static [$crate::provider::native::AffinePoint<Self>] {
        static GENS: once_cell::sync::OnceCell<Vec<$crate::provider::native::AffinePoint<$curve>>> =
          once_cell::sync::OnceCell::new();
        GENS.get_or_init(|| {
          $crate::provider::generators::from_label::<$curve>(
            $crate::constants::GENERATORS_LABEL,
            $crate::constants::NUM_DERIVED_GENERATORS,
          )
        })
      }
    }
  };
}

pub(crate) use impl_curve_params;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::{secp256k1::Secp256k1, secp256r1::Secp256r1};

  fn test_curve_constants_with<C: CurveParams>() {
    let one = C::one();
    assert!(one.is_on_curve());
    assert_eq!(C::Base::num_bits(), 256);
    assert_eq!(C::Scalar::num_bits(), 256);
    // the base point has the advertised order
    let order = C::Scalar::modulus();
    assert!(one.mul(order).is_none());
    assert_eq!(one.mul(&(order - 1u8)), Some(one.neg()));
  }

  #[test]
  fn test_curve_constants() {
    test_curve_constants_with::<Secp256k1>();
    test_curve_constants_with::<Secp256r1>();
  }

  #[test]
  fn test_linear_coefficient() {
    assert!(Secp256k1::a().is_none());
    let p = <Secp256r1 as CurveParams>::Base::modulus();
    assert_eq!(Secp256r1::a(), Some(&(p - 3u8)));
  }
}
