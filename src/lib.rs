//! This library implements R1CS gadgets for elliptic-curve arithmetic over a non-native field:
//! a curve point whose coordinates live in a foreign prime field, the group law on such points,
//! and constrained multi-scalar multiplication driven by signed-digit recoding and precomputed
//! lookup tables.
#![forbid(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod gadgets;
pub mod provider;
pub mod util_cs;

pub use errors::EccError;
pub use gadgets::{
  ecc::{
    naf::NafDigits,
    scalar_mul::{MulConfig, ScalarMultiplier},
    tables::{BatchLookupTable, LookupTable, PairLookupTable, QuadLookupTable},
    CurvePoint,
  },
  nonnative::{field::ForeignFieldElement, Provenance},
};
pub use provider::{
  native::AffinePoint, secp256k1::Secp256k1, secp256r1::Secp256r1, CurveParams, FieldParams,
};
