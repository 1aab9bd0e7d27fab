//! This module implements the gadgets: foreign-field arithmetic, curve points, and scalar
//! multiplication.
pub mod ecc;
pub mod nonnative;
pub mod utils;
