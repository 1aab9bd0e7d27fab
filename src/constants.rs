//! This module defines constants used throughout the library.

/// Width of each limb in the bignat representation of a foreign-field element.
pub const LIMB_WIDTH: usize = 64;

/// Number of limbs in the bignat representation of a foreign-field element.
pub const N_LIMBS: usize = 4;

/// Operands whose limb bound grows past this many bits are reduced before they enter a product.
pub const MAX_UNREDUCED_LIMB_BITS: usize = 80;

/// Number of generators derived (and cached) per curve.
pub const NUM_DERIVED_GENERATORS: usize = 1 << 8;

/// Domain separator for the derived generators of a curve.
pub const GENERATORS_LABEL: &[u8] = b"nonnative-ecc/generators";

/// Domain separator for the offset generator used by the scalar multiplier.
pub const OFFSET_GENERATOR_LABEL: &[u8] = b"nonnative-ecc/offset-generator";
