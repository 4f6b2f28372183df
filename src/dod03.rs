//! DOD03 VRF: selective exponentiation along the full codeword.
//!
//! sk = (h, u[1..=lCode]), pk = (h, h^u[1], ..., h^u[lCode]).
//! Eval: v[0] = g1, v[i] = v[i-1]^u[i] where fx[i] = 1 and v[i-1] otherwise;
//! the value is v[lCode] itself.
//! Verify: e(v[i-1], fx[i] ? pk[i] : h) == e(v[i], h) for every i.

use core::fmt;

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};
use ark_std::UniformRand;
use num_bigint::BigUint;
use zeroize::Zeroize;

use crate::{
    errors::VrfError,
    group::{Generator, PairingGroup},
    hcode, ser,
    types::{Proof, Scheme, Value, CODE_BITS},
    vrf::Construction,
};

/// Marker for the DOD03 construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dod03;

#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct SecretKey<E: Pairing> {
    h: E::G2Affine,
    u: Vec<E::ScalarField>,
}

impl<E: Pairing> SecretKey<E> {
    /// `u` must hold one scalar per codeword position.
    #[must_use]
    pub fn new(h: E::G2Affine, u: Vec<E::ScalarField>) -> Self {
        Self { h, u }
    }
}

impl<E: Pairing> fmt::Debug for SecretKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").field("h", &self.h).finish_non_exhaustive()
    }
}

impl<E: Pairing> Drop for SecretKey<E> {
    fn drop(&mut self) {
        self.u.zeroize();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicKey<E: Pairing> {
    pub h: E::G2Affine,
    /// `h^u[i]`
    pub hu: Vec<E::G2Affine>,
}

impl<E: PairingGroup> Construction<E> for Dod03 {
    const SCHEME: Scheme = Scheme::Dod03;
    type SecretKey = SecretKey<E>;
    type PublicKey = PublicKey<E>;

    fn keygen<R: RngCore + CryptoRng>(g: &Generator<E>, rng: &mut R) -> SecretKey<E> {
        let h = (g.g2 * E::ScalarField::rand(rng)).into_affine();
        let u = (0..CODE_BITS).map(|_| E::ScalarField::rand(rng)).collect();
        SecretKey::new(h, u)
    }

    fn derive_public_key(_g: &Generator<E>, sk: &SecretKey<E>) -> PublicKey<E> {
        let hu: Vec<E::G2> = sk.u.iter().map(|u| sk.h * *u).collect();
        PublicKey { h: sk.h, hu: E::G2::normalize_batch(&hu) }
    }

    fn eval(g: &Generator<E>, sk: &SecretKey<E>, x: &BigUint) -> Result<(Value<E>, Proof<E>), VrfError> {
        <Self as Construction<E>>::check_secret_key(sk)?;
        let fx = hcode::input_codeword(Scheme::Dod03, x)?;
        let mut v = Vec::with_capacity(CODE_BITS + 1);
        let mut acc = g.g1.into_group();
        v.push(acc);
        for (bit, u) in fx.iter().zip(&sk.u) {
            if *bit {
                acc *= *u;
            }
            v.push(acc);
        }
        let v = E::G1::normalize_batch(&v);
        Ok((Value::Source(v[CODE_BITS]), Proof::Chain(v)))
    }

    fn verify(
        g: &Generator<E>,
        pk: &PublicKey<E>,
        x: &BigUint,
        value: &Value<E>,
        proof: &Proof<E>,
    ) -> Result<bool, VrfError> {
        <Self as Construction<E>>::check_public_key(pk)?;
        let fx = hcode::input_codeword(Scheme::Dod03, x)?;
        let (Value::Source(y), Proof::Chain(v)) = (value, proof) else {
            tracing::debug!("value or proof has the wrong shape");
            return Ok(false);
        };
        if v.len() != CODE_BITS + 1 || v[0] != g.g1 {
            tracing::debug!(len = v.len(), "chain does not start at the generator");
            return Ok(false);
        }
        for (i, ((bit, hu), link)) in fx.iter().zip(&pk.hu).zip(v.windows(2)).enumerate() {
            let base = if *bit { *hu } else { pk.h };
            if E::pairing(link[0], base) != E::pairing(link[1], pk.h) {
                tracing::debug!(link = i + 1, "chain link rejected");
                return Ok(false);
            }
        }
        if *y != v[CODE_BITS] {
            tracing::debug!("value does not match the chain end");
            return Ok(false);
        }
        Ok(true)
    }

    fn marshal_public_key(pk: &PublicKey<E>) -> Result<Vec<String>, VrfError> {
        core::iter::once(&pk.h).chain(&pk.hu).map(ser::encode_element).collect()
    }

    fn unmarshal_public_key(parts: &[String]) -> Result<PublicKey<E>, VrfError> {
        let (h, tail) = ser::split_head(parts, CODE_BITS)?;
        Ok(PublicKey {
            h: ser::decode_element(h)?,
            hu: ser::decode_all(tail, ser::decode_element::<E::G2Affine>)?,
        })
    }

    fn marshal_secret_key(sk: &SecretKey<E>) -> Result<Vec<String>, VrfError> {
        let mut out = Vec::with_capacity(sk.u.len() + 1);
        out.push(ser::encode_element(&sk.h)?);
        out.extend(sk.u.iter().map(ser::encode_scalar));
        Ok(out)
    }

    fn unmarshal_secret_key(parts: &[String]) -> Result<SecretKey<E>, VrfError> {
        let (h, tail) = ser::split_head(parts, CODE_BITS)?;
        Ok(SecretKey::new(
            ser::decode_element(h)?,
            ser::decode_all(tail, ser::decode_scalar::<E::ScalarField>)?,
        ))
    }

    fn check_public_key(pk: &PublicKey<E>) -> Result<(), VrfError> {
        if pk.hu.len() != CODE_BITS {
            return Err(VrfError::InvalidLength { expected: CODE_BITS + 1, got: pk.hu.len() + 1 });
        }
        // with h = 1 every link check is trivially satisfied
        if pk.h.is_zero() {
            return Err(VrfError::DecodeError("h is the identity"));
        }
        Ok(())
    }

    fn check_secret_key(sk: &SecretKey<E>) -> Result<(), VrfError> {
        if sk.u.len() != CODE_BITS {
            return Err(VrfError::InvalidLength { expected: CODE_BITS + 1, got: sk.u.len() + 1 });
        }
        if sk.h.is_zero() {
            return Err(VrfError::DecodeError("h is the identity"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use crate::test_rng;

    type C = Dod03;
    type E = Bls12_381;

    fn setup() -> (Generator<E>, SecretKey<E>, PublicKey<E>) {
        let mut rng = test_rng();
        let g = Generator::random(&mut rng);
        let sk = <C as Construction<E>>::keygen(&g, &mut rng);
        let pk = <C as Construction<E>>::derive_public_key(&g, &sk);
        (g, sk, pk)
    }

    #[test]
    fn eval_then_verify() {
        let (g, sk, pk) = setup();
        for x in [0u64, 100, u64::MAX] {
            let x = BigUint::from(x);
            let (y, pi) = C::eval(&g, &sk, &x).unwrap();
            assert_eq!(pi.len(), CODE_BITS + 1);
            assert!(C::verify(&g, &pk, &x, &y, &pi).unwrap());
        }
    }

    #[test]
    fn zero_input_value_is_generator() {
        // the all-zero codeword never exponentiates
        let (g, sk, _) = setup();
        let (y, _) = C::eval(&g, &sk, &BigUint::from(0u32)).unwrap();
        assert_eq!(y, Value::Source(g.g1));
    }

    #[test]
    fn public_key_is_based_on_h() {
        let (g, sk, pk) = setup();
        assert_eq!(pk.h, sk.h);
        assert_eq!(pk.hu[0], (sk.h * sk.u[0]).into_affine());
        assert_ne!(pk.hu[0], (g.g2 * sk.u[0]).into_affine());
    }

    #[test]
    fn every_link_is_checked() {
        let (g, sk, pk) = setup();
        let x = BigUint::from(100u32);
        let (y, pi) = C::eval(&g, &sk, &x).unwrap();
        let Proof::Chain(v) = pi else { unreachable!() };
        for i in [0, 1, 35, CODE_BITS] {
            let mut bad = v.clone();
            bad[i] = (bad[i] + g.g1).into_affine();
            assert!(!C::verify(&g, &pk, &x, &y, &Proof::Chain(bad)).unwrap(), "link {i}");
        }
    }

    #[test]
    fn substituted_value_rejected() {
        let (g, sk, pk) = setup();
        let x = BigUint::from(100u32);
        let (_, pi) = C::eval(&g, &sk, &x).unwrap();
        let (other, _) = C::eval(&g, &sk, &BigUint::from(101u32)).unwrap();
        assert!(!C::verify(&g, &pk, &x, &other, &pi).unwrap());
    }

    #[test]
    fn over_wide_input_rejected() {
        let (g, sk, _) = setup();
        let x = BigUint::from(1u32) << 70;
        assert!(matches!(C::eval(&g, &sk, &x), Err(VrfError::InputTooLong { bits: 71, .. })));
    }

    #[test]
    fn key_strings_round_trip() {
        let (_, sk, pk) = setup();
        let pks = <C as Construction<E>>::marshal_public_key(&pk).unwrap();
        assert_eq!(pks.len(), CODE_BITS + 1);
        assert_eq!(<C as Construction<E>>::unmarshal_public_key(&pks).unwrap(), pk);
        let sks = <C as Construction<E>>::marshal_secret_key(&sk).unwrap();
        let back: SecretKey<E> = <C as Construction<E>>::unmarshal_secret_key(&sks).unwrap();
        assert_eq!(back.u, sk.u);
    }
}
