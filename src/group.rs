//! Bilinear group provider: curve descriptors, group parameters and the
//! public generator.
//!
//! The curves exposed here carry an asymmetric pairing `e: G1 × G2 → GT`.
//! The generator is kept in both source groups with the same discrete log,
//! `(g1, g2) = (s·P1, s·P2)`, so `e(g1^a, g2^b) = e(g1, g2)^{ab}` holds as in
//! the symmetric setting.

use core::fmt;
use core::str::FromStr;

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};
use ark_std::{UniformRand, Zero};

use crate::{errors::VrfError, ser};

/// A pairing engine usable as the VRF group provider.
pub trait PairingGroup: Pairing {
    /// Identifier carried in the exported parameter string.
    const CURVE: &'static str;
    /// Largest security parameter the curve can honour.
    const SECURITY_BITS: u32;
}

impl PairingGroup for ark_bls12_381::Bls12_381 {
    const CURVE: &'static str = "bls12-381";
    const SECURITY_BITS: u32 = 128;
}

#[cfg(feature = "bn254")]
impl PairingGroup for ark_bn254::Bn254 {
    const CURVE: &'static str = "bn254";
    const SECURITY_BITS: u32 = 100;
}

/// Description of the pairing group an instance works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupParams {
    curve: &'static str,
    security: u32,
}

impl GroupParams {
    /// Parameters for `E` at security level `lambda`.
    ///
    /// # Errors
    /// Returns `VrfError::UnsupportedSecurity` if `lambda` is zero or above
    /// what the curve provides.
    pub fn generate<E: PairingGroup>(lambda: u32) -> Result<Self, VrfError> {
        if lambda == 0 || lambda > E::SECURITY_BITS {
            return Err(VrfError::UnsupportedSecurity {
                curve: E::CURVE,
                requested: lambda,
                max: E::SECURITY_BITS,
            });
        }
        Ok(Self { curve: E::CURVE, security: lambda })
    }

    /// Parse the exported form `"<curve>/<lambda>"` for the local curve `E`.
    ///
    /// # Errors
    /// Returns `VrfError::CurveMismatch` for another curve and
    /// `VrfError::DecodeError` for a malformed string.
    pub fn parse<E: PairingGroup>(s: &str) -> Result<Self, VrfError> {
        let (curve, lambda) = s
            .split_once('/')
            .ok_or(VrfError::DecodeError("group parameters must be <curve>/<lambda>"))?;
        if curve != E::CURVE {
            return Err(VrfError::CurveMismatch { expected: E::CURVE, got: curve.to_owned() });
        }
        let lambda = u32::from_str(lambda)
            .map_err(|_| VrfError::DecodeError("security parameter is not an integer"))?;
        Self::generate::<E>(lambda)
    }

    #[must_use]
    pub const fn curve(&self) -> &'static str {
        self.curve
    }

    #[must_use]
    pub const fn security(&self) -> u32 {
        self.security
    }
}

impl fmt::Display for GroupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.curve, self.security)
    }
}

/// Public generator `g`, held in both source groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Generator<E: Pairing> {
    pub g1: E::G1Affine,
    pub g2: E::G2Affine,
}

impl<E: Pairing> Generator<E> {
    /// Fresh generator `(s·P1, s·P2)` for a random non-zero `s`.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut s = E::ScalarField::rand(rng);
        while s.is_zero() {
            s = E::ScalarField::rand(rng);
        }
        Self {
            g1: (E::G1::generator() * s).into_affine(),
            g2: (E::G2::generator() * s).into_affine(),
        }
    }

    /// Both halves non-identity and sharing one discrete log.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !self.g1.is_zero()
            && !self.g2.is_zero()
            && E::pairing(self.g1, E::G2Affine::generator())
                == E::pairing(E::G1Affine::generator(), self.g2)
    }

    /// Compressed canonical bytes of `(g1, g2)`.
    ///
    /// # Errors
    /// Returns `VrfError::Serialization` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VrfError> {
        let mut buf = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut buf)?;
        Ok(buf)
    }

    /// # Errors
    /// Returns `VrfError::InvalidGenerator` unless the bytes decode to a
    /// consistent generator.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VrfError> {
        let g: Self = ser::decode_element_bytes(bytes)?;
        if !g.is_consistent() {
            return Err(VrfError::InvalidGenerator);
        }
        Ok(g)
    }

    /// Hex form used by the string export.
    ///
    /// # Errors
    /// Returns `VrfError::Serialization` if encoding fails.
    pub fn marshal(&self) -> Result<String, VrfError> {
        ser::encode_element(self)
    }

    /// # Errors
    /// Returns `VrfError` on malformed hex or an invalid generator.
    pub fn unmarshal(s: &str) -> Result<Self, VrfError> {
        let bytes = hex::decode(s).map_err(|_| VrfError::DecodeError("invalid hex"))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use crate::test_rng;

    #[test]
    fn security_parameter_bounds() {
        assert!(GroupParams::generate::<Bls12_381>(128).is_ok());
        assert!(GroupParams::generate::<Bls12_381>(80).is_ok());
        assert!(matches!(
            GroupParams::generate::<Bls12_381>(0),
            Err(VrfError::UnsupportedSecurity { requested: 0, max: 128, .. })
        ));
        assert!(GroupParams::generate::<Bls12_381>(256).is_err());
    }

    #[test]
    fn params_string_round_trip() {
        let p = GroupParams::generate::<Bls12_381>(128).unwrap();
        assert_eq!(p.to_string(), "bls12-381/128");
        assert_eq!(GroupParams::parse::<Bls12_381>(&p.to_string()).unwrap(), p);
    }

    #[test]
    fn foreign_params_rejected() {
        assert!(matches!(
            GroupParams::parse::<Bls12_381>("bn254/100"),
            Err(VrfError::CurveMismatch { .. })
        ));
        assert!(GroupParams::parse::<Bls12_381>("bls12-381").is_err());
        assert!(GroupParams::parse::<Bls12_381>("bls12-381/x").is_err());
        assert!(GroupParams::parse::<Bls12_381>("bls12-381/512").is_err());
    }

    #[test]
    fn generator_round_trip() {
        let mut rng = test_rng();
        let g = Generator::<Bls12_381>::random(&mut rng);
        assert!(g.is_consistent());
        assert_eq!(Generator::from_bytes(&g.to_bytes().unwrap()).unwrap(), g);
        assert_eq!(Generator::unmarshal(&g.marshal().unwrap()).unwrap(), g);
    }

    #[test]
    fn mismatched_generator_rejected() {
        let mut rng = test_rng();
        let a = Generator::<Bls12_381>::random(&mut rng);
        let b = Generator::<Bls12_381>::random(&mut rng);
        let mixed = Generator::<Bls12_381> { g1: a.g1, g2: b.g2 };
        assert!(!mixed.is_consistent());
        assert!(matches!(
            Generator::<Bls12_381>::from_bytes(&mixed.to_bytes().unwrap()),
            Err(VrfError::InvalidGenerator)
        ));
    }
}
