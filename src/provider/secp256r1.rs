//! Parameters of secp256r1 (NIST P-256), `y^2 = x^3 - 3x + b`.
use crate::provider::impl_curve_params;

impl_curve_params!(
  Secp256r1,
  Secp256r1Base,
  Secp256r1Scalar,
  "secp256r1",
  "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
  "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
  Some("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc"),
  "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
  "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
  "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
);
