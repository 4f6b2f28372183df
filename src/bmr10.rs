//! BMR10 VRF: a chain of inversions keyed by the codeword of the input.
//!
//! sk = (h, u[1..=lCode]), pk = (h, g2^u[1], ..., g2^u[lCode]).
//! Eval walks the first lIn codeword bits: v[0] = g1,
//! v[i] = v[i-1]^(1/(fx[i] + u[i])); value = e(v[lIn], h).
//! Verify checks e(v[i], g2^fx[i] · pk[i]) == e(v[i-1], g2) per link and
//! value == e(v[lIn], h).

use core::fmt;

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::{CryptoRng, RngCore};
use ark_std::UniformRand;
use num_bigint::BigUint;
use zeroize::Zeroize;

use crate::{
    errors::VrfError,
    group::{Generator, PairingGroup},
    hcode, ser,
    types::{Proof, Scheme, Value, CODE_BITS, INPUT_BITS},
    vrf::Construction,
};

/// Marker for the BMR10 construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bmr10;

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
    /// `g2^u[i]`
    pub gu: Vec<E::G2Affine>,
}

impl<E: PairingGroup> Construction<E> for Bmr10 {
    const SCHEME: Scheme = Scheme::Bmr10;
    type SecretKey = SecretKey<E>;
    type PublicKey = PublicKey<E>;

    fn keygen<R: RngCore + CryptoRng>(g: &Generator<E>, rng: &mut R) -> SecretKey<E> {
        let h = (g.g2 * E::ScalarField::rand(rng)).into_affine();
        let u = (0..CODE_BITS).map(|_| E::ScalarField::rand(rng)).collect();
        SecretKey::new(h, u)
    }

    fn derive_public_key(g: &Generator<E>, sk: &SecretKey<E>) -> PublicKey<E> {
        let gu: Vec<E::G2> = sk.u.iter().map(|u| g.g2 * *u).collect();
        PublicKey { h: sk.h, gu: E::G2::normalize_batch(&gu) }
    }

    fn eval(g: &Generator<E>, sk: &SecretKey<E>, x: &BigUint) -> Result<(Value<E>, Proof<E>), VrfError> {
        <Self as Construction<E>>::check_secret_key(sk)?;
        let fx = hcode::input_codeword(Scheme::Bmr10, x)?;
        let mut v = Vec::with_capacity(INPUT_BITS + 1);
        let mut acc = g.g1.into_group();
        v.push(acc);
        // only the first lIn codeword bits are walked
        for (bit, u) in fx.iter().zip(&sk.u).take(INPUT_BITS) {
            let e = (E::ScalarField::from(*bit) + u).inverse().ok_or(VrfError::ZeroInverse)?;
            acc *= e;
            v.push(acc);
        }
        let v = E::G1::normalize_batch(&v);
        let value = E::pairing(v[INPUT_BITS], sk.h);
        Ok((Value::Target(value), Proof::Chain(v)))
    }

    fn verify(
        g: &Generator<E>,
        pk: &PublicKey<E>,
        x: &BigUint,
        value: &Value<E>,
        proof: &Proof<E>,
    ) -> Result<bool, VrfError> {
        <Self as Construction<E>>::check_public_key(pk)?;
        let fx = hcode::input_codeword(Scheme::Bmr10, x)?;
        let (Value::Target(y), Proof::Chain(v)) = (value, proof) else {
            tracing::debug!("value or proof has the wrong shape");
            return Ok(false);
        };
        if v.len() != INPUT_BITS + 1 || v[0] != g.g1 {
            tracing::debug!(len = v.len(), "chain does not start at the generator");
            return Ok(false);
        }
        for (i, ((bit, gu), link)) in fx.iter().zip(&pk.gu).zip(v.windows(2)).enumerate() {
            let base = if *bit { g.g2 + *gu } else { gu.into_group() };
            if E::pairing(link[1], base) != E::pairing(link[0], g.g2) {
                tracing::debug!(link = i + 1, "chain link rejected");
                return Ok(false);
            }
        }
        if *y != E::pairing(v[INPUT_BITS], pk.h) {
            tracing::debug!("value does not match the chain end");
            return Ok(false);
        }
        Ok(true)
    }

    fn marshal_public_key(pk: &PublicKey<E>) -> Result<Vec<String>, VrfError> {
        core::iter::once(&pk.h).chain(&pk.gu).map(ser::encode_element).collect()
    }

    fn unmarshal_public_key(parts: &[String]) -> Result<PublicKey<E>, VrfError> {
        let (h, tail) = ser::split_head(parts, CODE_BITS)?;
        Ok(PublicKey {
            h: ser::decode_element(h)?,
            gu: ser::decode_all(tail, ser::decode_element::<E::G2Affine>)?,
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
        if pk.gu.len() != CODE_BITS {
            return Err(VrfError::InvalidLength { expected: CODE_BITS + 1, got: pk.gu.len() + 1 });
        }
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
