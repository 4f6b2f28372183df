//! Dodis–Yampolskiy VRF.
//!
//! - Gen: sk = r, pk = g1^r
//! - Eval: t = 1/(x + r), proof w = g2^t, value y = e(g1, w)
//! - Verify: e(g1^x · pk, w) == e(g1, g2) and e(g1, w) == y

use core::fmt;

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};
use ark_std::UniformRand;
use num_bigint::BigUint;
use zeroize::Zeroize;

use crate::{
    errors::VrfError,
    group::{Generator, PairingGroup},
    ser,
    types::{Proof, Scheme, Value},
    vrf::Construction,
};

/// Marker for the DY05 construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dy05;

#[derive(Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct SecretKey<E: Pairing> {
    r: E::ScalarField,
}

impl<E: Pairing> SecretKey<E> {
    #[must_use]
    pub const fn new(r: E::ScalarField) -> Self {
        Self { r }
    }
}

impl<E: Pairing> fmt::Debug for SecretKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl<E: Pairing> Drop for SecretKey<E> {
    fn drop(&mut self) {
        self.r.zeroize();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicKey<E: Pairing> {
    pub pk: E::G1Affine,
}

/// Input integer reduced into the scalar field.
fn to_scalar<F: PrimeField>(x: &BigUint) -> F {
    F::from_be_bytes_mod_order(&x.to_bytes_be())
}

impl<E: PairingGroup> Construction<E> for Dy05 {
    const SCHEME: Scheme = Scheme::Dy05;
    type SecretKey = SecretKey<E>;
    type PublicKey = PublicKey<E>;

    fn keygen<R: RngCore + CryptoRng>(_g: &Generator<E>, rng: &mut R) -> SecretKey<E> {
        SecretKey::new(E::ScalarField::rand(rng))
    }

    fn derive_public_key(g: &Generator<E>, sk: &SecretKey<E>) -> PublicKey<E> {
        PublicKey { pk: (g.g1 * sk.r).into_affine() }
    }

    fn eval(g: &Generator<E>, sk: &SecretKey<E>, x: &BigUint) -> Result<(Value<E>, Proof<E>), VrfError> {
        let t = (to_scalar::<E::ScalarField>(x) + sk.r)
            .inverse()
            .ok_or(VrfError::ZeroInverse)?;
        let w = (g.g2 * t).into_affine();
        let value = E::pairing(g.g1, w);
        Ok((Value::Target(value), Proof::Point(w)))
    }

    fn verify(
        g: &Generator<E>,
        pk: &PublicKey<E>,
        x: &BigUint,
        value: &Value<E>,
        proof: &Proof<E>,
    ) -> Result<bool, VrfError> {
        <Self as Construction<E>>::check_public_key(pk)?;
        let (Value::Target(y), Proof::Point(w)) = (value, proof) else {
            tracing::debug!("value or proof has the wrong shape");
            return Ok(false);
        };
        let gx_pk = g.g1 * to_scalar::<E::ScalarField>(x) + pk.pk;
        if E::pairing(gx_pk, *w) != E::pairing(g.g1, g.g2) {
            tracing::debug!("proof does not invert x + sk");
            return Ok(false);
        }
        if E::pairing(g.g1, *w) != *y {
            tracing::debug!("value does not match proof");
            return Ok(false);
        }
        Ok(true)
    }

    fn marshal_public_key(pk: &PublicKey<E>) -> Result<Vec<String>, VrfError> {
        Ok(vec![ser::encode_element(&pk.pk)?])
    }

    fn unmarshal_public_key(parts: &[String]) -> Result<PublicKey<E>, VrfError> {
        match parts {
            [pk] => Ok(PublicKey { pk: ser::decode_element(pk)? }),
            _ => Err(VrfError::InvalidLength { expected: 1, got: parts.len() }),
        }
    }

    fn marshal_secret_key(sk: &SecretKey<E>) -> Result<Vec<String>, VrfError> {
        Ok(vec![ser::encode_scalar(&sk.r)])
    }

    fn unmarshal_secret_key(parts: &[String]) -> Result<SecretKey<E>, VrfError> {
        match parts {
            [r] => Ok(SecretKey::new(ser::decode_scalar(r)?)),
            _ => Err(VrfError::InvalidLength { expected: 1, got: parts.len() }),
        }
    }

    fn check_public_key(pk: &PublicKey<E>) -> Result<(), VrfError> {
        if pk.pk.is_zero() {
            return Err(VrfError::DecodeError("public key is the identity"));
        }
        Ok(())
    }

    fn check_secret_key(_sk: &SecretKey<E>) -> Result<(), VrfError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use crate::test_rng;

    type C = Dy05;

    fn setup() -> (Generator<Bls12_381>, SecretKey<Bls12_381>, PublicKey<Bls12_381>) {
        let mut rng = test_rng();
        let g = Generator::random(&mut rng);
        let sk = <C as Construction<Bls12_381>>::keygen(&g, &mut rng);
        let pk = <C as Construction<Bls12_381>>::derive_public_key(&g, &sk);
        (g, sk, pk)
    }

    #[test]
    fn eval_then_verify() {
        let (g, sk, pk) = setup();
        for x in [0u64, 1, 100, u64::MAX] {
            let x = BigUint::from(x);
            let (y, pi) = C::eval(&g, &sk, &x).unwrap();
            assert!(C::verify(&g, &pk, &x, &y, &pi).unwrap());
        }
    }

    #[test]
    fn large_inputs_reduce_mod_order() {
        let (g, sk, pk) = setup();
        let x = BigUint::from(7u32) << 400;
        let (y, pi) = C::eval(&g, &sk, &x).unwrap();
        assert!(C::verify(&g, &pk, &x, &y, &pi).unwrap());
        let modulus: BigUint = Fr::MODULUS.into();
        let (y2, _) = C::eval(&g, &sk, &(&x + &modulus)).unwrap();
        assert_eq!(y, y2);
    }

    #[test]
    fn wrong_input_rejected() {
        let (g, sk, pk) = setup();
        let (y, pi) = C::eval(&g, &sk, &BigUint::from(100u32)).unwrap();
        assert!(!C::verify(&g, &pk, &BigUint::from(101u32), &y, &pi).unwrap());
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
    fn identity_public_key_is_an_error() {
        let (g, sk, _) = setup();
        let x = BigUint::from(100u32);
        let (y, pi) = C::eval(&g, &sk, &x).unwrap();
        let pk = PublicKey::<Bls12_381> { pk: G1Affine::zero() };
        assert!(matches!(C::verify(&g, &pk, &x, &y, &pi), Err(VrfError::DecodeError(_))));
    }

    #[test]
    fn tampered_proof_rejected() {
        let (g, sk, pk) = setup();
        let x = BigUint::from(100u32);
        let (y, pi) = C::eval(&g, &sk, &x).unwrap();
        let Proof::Point(w) = pi else { unreachable!() };
        let bad = Proof::Point((w + g.g2).into_affine());
        assert!(!C::verify(&g, &pk, &x, &y, &bad).unwrap());
        assert!(!C::verify(&g, &pk, &x, &y, &Proof::Chain(vec![g.g1])).unwrap());
    }

    #[test]
    fn zero_divisor_is_fatal() {
        let mut rng = test_rng();
        let g = Generator::<Bls12_381>::random(&mut rng);
        // r = -100 makes x + r vanish at x = 100
        let sk = SecretKey::<Bls12_381>::new(-Fr::from(100u64));
        assert!(matches!(
            C::eval(&g, &sk, &BigUint::from(100u32)),
            Err(VrfError::ZeroInverse)
        ));
    }

    #[test]
    fn key_strings_round_trip() {
        let (_, sk, pk) = setup();
        let pks = <C as Construction<Bls12_381>>::marshal_public_key(&pk).unwrap();
        assert_eq!(<C as Construction<Bls12_381>>::unmarshal_public_key(&pks).unwrap(), pk);
        let sks = <C as Construction<Bls12_381>>::marshal_secret_key(&sk).unwrap();
        let back: SecretKey<Bls12_381> = <C as Construction<Bls12_381>>::unmarshal_secret_key(&sks).unwrap();
        assert_eq!(back.r, sk.r);
        assert!(<C as Construction<Bls12_381>>::unmarshal_secret_key(&[]).is_err());
    }
}
