//! Parameters of secp256k1, `y^2 = x^3 + 7`.
use crate::provider::impl_curve_params;

impl_curve_params!(
  Secp256k1,
  Secp256k1Base,
  Secp256k1Scalar,
  "secp256k1",
  "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
  "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
  None,
  "7",
  "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
  "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
);
