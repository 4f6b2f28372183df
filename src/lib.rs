#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

//! Pairing-based verifiable random functions.
//!
//! Three constructions over a bilinear group (arkworks, BLS12-381 by default):
//!
//! - DY05: Dodis–Yampolskiy, one inversion and one pairing per evaluation.
//! - BMR10: a chain of inversions keyed by the structured code of the input.
//! - DOD03: selective exponentiation along the full codeword.
//!
//! BMR10 and DOD03 first pass 64-bit inputs through [`hcode`], a Hamming-style
//! encoder producing 71-bit codewords in which any two inputs differ in at
//! least three positions.
//!
//! [`Vrf`] selects a construction at runtime from its tag; [`Instance`] is the
//! statically typed engine underneath. Parameters, keys, values and proofs all
//! export to strings so a verifier can be set up from another party's data.

// Fixed choices:
// - Group: BLS12-381 (optionally BN254), asymmetric pairing
// - Scalars: decimal strings; group elements: hex of compressed encoding
// - Output digest: BLAKE3 over the 14-byte tag "pairing-vrf/v1"
// - Coded input width: 64 bits, codeword width 71 bits

pub mod types;
pub mod errors;
pub mod ser;
pub mod group;
pub mod hcode;
pub mod dy05;
pub mod bmr10;
pub mod dod03;
pub mod vrf;

pub use types::*;
pub use errors::VrfError;
pub use group::{Generator, GroupParams, PairingGroup};
pub use vrf::{Construction, Instance, PublicParams, Vrf};
pub use dy05::Dy05;
pub use bmr10::Bmr10;
pub use dod03::Dod03;

pub use ark_bls12_381::Bls12_381;
#[cfg(feature = "bn254")]
pub use ark_bn254::Bn254;
pub use num_bigint::BigUint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Same deterministic seeded `StdRng` as `ark_std::test_rng()`, but with a
/// concrete type so it satisfies `CryptoRng` bounds.
#[cfg(test)]
pub(crate) fn test_rng() -> ark_std::rand::rngs::StdRng {
    use ark_std::rand::SeedableRng;
    let seed = [
        1, 0, 0, 0, 23, 0, 0, 0, 200, 1, 0, 0, 210, 30, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0,
    ];
    ark_std::rand::rngs::StdRng::from_seed(seed)
}
