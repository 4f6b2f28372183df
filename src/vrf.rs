//! VRF engine: per-construction instances holding parameters and key
//! material, plus the runtime [`Vrf`] dispatcher selected by scheme tag.

use core::fmt;
use core::marker::PhantomData;

use ark_bls12_381::Bls12_381;
use ark_std::rand::{CryptoRng, RngCore};
use num_bigint::BigUint;
use rand_core::OsRng;

use crate::{
    bmr10::Bmr10,
    dod03::Dod03,
    dy05::Dy05,
    errors::VrfError,
    group::{Generator, GroupParams, PairingGroup},
    ser,
    types::{Lengths, Proof, Scheme, Value},
};

/// One VRF construction over the pairing group `E`.
///
/// Implementors are stateless markers; all state lives in [`Instance`].
pub trait Construction<E: PairingGroup> {
    const SCHEME: Scheme;
    type SecretKey: Clone + fmt::Debug + Send + Sync;
    type PublicKey: Clone + fmt::Debug + PartialEq + Send + Sync;

    fn keygen<R: RngCore + CryptoRng>(g: &Generator<E>, rng: &mut R) -> Self::SecretKey;

    /// Deterministic in `sk` and `g`.
    fn derive_public_key(g: &Generator<E>, sk: &Self::SecretKey) -> Self::PublicKey;

    /// # Errors
    /// Fails on a zero inversion, an over-wide input, or a malformed key.
    fn eval(
        g: &Generator<E>,
        sk: &Self::SecretKey,
        x: &BigUint,
    ) -> Result<(Value<E>, Proof<E>), VrfError>;

    /// A cryptographic mismatch is `Ok(false)`.
    ///
    /// # Errors
    /// Fails only on inputs the construction cannot encode or a malformed key.
    fn verify(
        g: &Generator<E>,
        pk: &Self::PublicKey,
        x: &BigUint,
        value: &Value<E>,
        proof: &Proof<E>,
    ) -> Result<bool, VrfError>;

    /// # Errors
    /// Returns `VrfError::Serialization` if an element cannot be encoded.
    fn marshal_public_key(pk: &Self::PublicKey) -> Result<Vec<String>, VrfError>;

    /// # Errors
    /// Returns `VrfError` on wrong arity or an invalid element.
    fn unmarshal_public_key(parts: &[String]) -> Result<Self::PublicKey, VrfError>;

    /// # Errors
    /// Returns `VrfError::Serialization` if an element cannot be encoded.
    fn marshal_secret_key(sk: &Self::SecretKey) -> Result<Vec<String>, VrfError>;

    /// # Errors
    /// Returns `VrfError` on wrong arity or an invalid element.
    fn unmarshal_secret_key(parts: &[String]) -> Result<Self::SecretKey, VrfError>;

    /// # Errors
    /// Returns `VrfError` if the key has the wrong shape for this construction.
    fn check_public_key(pk: &Self::PublicKey) -> Result<(), VrfError>;

    /// # Errors
    /// Returns `VrfError` if the key has the wrong shape for this construction.
    fn check_secret_key(sk: &Self::SecretKey) -> Result<(), VrfError>;
}

/// Public parameter tuple as returned by [`Instance::params`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicParams {
    /// `"<curve>/<lambda>"`
    pub group: String,
    /// Compressed `(g1, g2)`.
    pub generator: Vec<u8>,
    pub lengths: Lengths,
}

/// State of one party running construction `C`.
pub struct Instance<E: PairingGroup, C: Construction<E>> {
    setup: Option<(GroupParams, Generator<E>)>,
    secret: Option<C::SecretKey>,
    public: Option<C::PublicKey>,
    _scheme: PhantomData<C>,
}

impl<E: PairingGroup, C: Construction<E>> Default for Instance<E, C> {
    fn default() -> Self {
        Self { setup: None, secret: None, public: None, _scheme: PhantomData }
    }
}

impl<E: PairingGroup, C: Construction<E>> Clone for Instance<E, C> {
    fn clone(&self) -> Self {
        Self {
            setup: self.setup,
            secret: self.secret.clone(),
            public: self.public.clone(),
            _scheme: PhantomData,
        }
    }
}

impl<E: PairingGroup, C: Construction<E>> fmt::Debug for Instance<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("scheme", &C::SCHEME)
            .field("params", &self.setup.as_ref().map(|(p, _)| p))
            .field("has_secret_key", &self.secret.is_some())
            .field("public_key", &self.public)
            .finish()
    }
}

impl<E: PairingGroup, C: Construction<E>> Instance<E, C> {
    /// Empty instance: no parameters, no keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        C::SCHEME
    }

    /// Fresh group parameters, generator and key pair from the OS RNG.
    ///
    /// # Errors
    /// Returns `VrfError::UnsupportedSecurity` for an invalid `lambda`.
    pub fn generate(&mut self, lambda: u32) -> Result<(), VrfError> {
        self.generate_with_rng(lambda, &mut OsRng)
    }

    /// As [`Instance::generate`] with a caller-provided RNG.
    ///
    /// # Errors
    /// Returns `VrfError::UnsupportedSecurity` for an invalid `lambda`.
    #[tracing::instrument(level = "debug", skip_all, fields(scheme = %C::SCHEME, lambda = lambda))]
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        lambda: u32,
        rng: &mut R,
    ) -> Result<(), VrfError> {
        let params = GroupParams::generate::<E>(lambda)?;
        let g = Generator::random(rng);
        let sk = C::keygen(&g, rng);
        let pk = C::derive_public_key(&g, &sk);
        self.setup = Some((params, g));
        self.secret = Some(sk);
        self.public = Some(pk);
        tracing::debug!(%params, "generated parameters and key pair");
        Ok(())
    }

    /// # Errors
    /// Returns `VrfError::MissingSecretKey`/`MissingParams` if not set up, or
    /// any evaluation failure of the construction.
    #[tracing::instrument(level = "debug", skip_all, fields(scheme = %C::SCHEME))]
    pub fn eval(&self, x: &BigUint) -> Result<(Value<E>, Proof<E>), VrfError> {
        let sk = self.secret.as_ref().ok_or(VrfError::MissingSecretKey)?;
        C::eval(self.generator()?, sk, x)
    }

    /// Never mutates the instance. A mismatch is `Ok(false)`.
    ///
    /// # Errors
    /// Returns `VrfError::MissingPublicKey`/`MissingParams` if not set up, or
    /// an input the construction cannot encode.
    #[tracing::instrument(level = "debug", skip_all, fields(scheme = %C::SCHEME))]
    pub fn verify(&self, x: &BigUint, value: &Value<E>, proof: &Proof<E>) -> Result<bool, VrfError> {
        let pk = self.public.as_ref().ok_or(VrfError::MissingPublicKey)?;
        C::verify(self.generator()?, pk, x, value, proof)
    }

    /// # Errors
    /// Returns `VrfError::MissingParams` before parameters are set.
    pub fn generator(&self) -> Result<&Generator<E>, VrfError> {
        self.setup.as_ref().map(|(_, g)| g).ok_or(VrfError::MissingParams)
    }

    /// # Errors
    /// Returns `VrfError::MissingParams` before parameters are set.
    pub fn group_params(&self) -> Result<GroupParams, VrfError> {
        self.setup.as_ref().map(|(p, _)| *p).ok_or(VrfError::MissingParams)
    }

    fn check_lengths(input_bits: usize, code_bits: usize) -> Result<(), VrfError> {
        let expected = C::SCHEME.lengths();
        if expected != (Lengths { input_bits, code_bits }) {
            return Err(VrfError::LengthMismatch {
                scheme: C::SCHEME,
                expected_in: expected.input_bits,
                expected_code: expected.code_bits,
                got_in: input_bits,
                got_code: code_bits,
            });
        }
        Ok(())
    }

    /// Store parameters; a held secret key gets its public key re-derived
    /// under the new generator.
    fn install(&mut self, params: GroupParams, g: Generator<E>) {
        if let Some(sk) = &self.secret {
            self.public = Some(C::derive_public_key(&g, sk));
        }
        self.setup = Some((params, g));
        tracing::debug!(scheme = %C::SCHEME, %params, "imported parameters");
    }

    /// Install the public parameter tuple. A held secret key is kept and its
    /// public key re-derived.
    ///
    /// # Errors
    /// Returns `VrfError` on a foreign curve, an invalid generator, or lengths
    /// other than the construction's.
    pub fn set_params(
        &mut self,
        group: &str,
        generator: &[u8],
        input_bits: usize,
        code_bits: usize,
    ) -> Result<(), VrfError> {
        Self::check_lengths(input_bits, code_bits)?;
        let params = GroupParams::parse::<E>(group)?;
        let g = Generator::from_bytes(generator)?;
        self.install(params, g);
        Ok(())
    }

    /// # Errors
    /// Returns `VrfError::MissingParams` before parameters are set.
    pub fn params(&self) -> Result<PublicParams, VrfError> {
        let (params, g) = self.setup.as_ref().ok_or(VrfError::MissingParams)?;
        Ok(PublicParams {
            group: params.to_string(),
            generator: g.to_bytes()?,
            lengths: C::SCHEME.lengths(),
        })
    }

    /// `[group, generator, lIn, lCode]` with decimal lengths.
    ///
    /// # Errors
    /// Returns `VrfError::MissingParams` before parameters are set.
    pub fn marshal_params(&self) -> Result<[String; 4], VrfError> {
        let (params, g) = self.setup.as_ref().ok_or(VrfError::MissingParams)?;
        let lengths = C::SCHEME.lengths();
        Ok([
            params.to_string(),
            g.marshal()?,
            lengths.input_bits.to_string(),
            lengths.code_bits.to_string(),
        ])
    }

    /// Inverse of [`Instance::marshal_params`]. Empty length fields read as 0.
    ///
    /// # Errors
    /// Returns `VrfError` on anything but exactly four valid fields.
    pub fn unmarshal_params(&mut self, parts: &[String]) -> Result<(), VrfError> {
        let [group, generator, input_bits, code_bits] = parts else {
            return Err(VrfError::InvalidLength { expected: 4, got: parts.len() });
        };
        let input_bits = ser::decode_length(input_bits)?;
        let code_bits = ser::decode_length(code_bits)?;
        Self::check_lengths(input_bits, code_bits)?;
        let params = GroupParams::parse::<E>(group)?;
        let g = Generator::unmarshal(generator)?;
        self.install(params, g);
        Ok(())
    }

    /// Owned copy of the public key.
    ///
    /// # Errors
    /// Returns `VrfError::MissingPublicKey` if none is held.
    pub fn public_key(&self) -> Result<C::PublicKey, VrfError> {
        self.public.clone().ok_or(VrfError::MissingPublicKey)
    }

    /// Owned copy of the secret key.
    ///
    /// # Errors
    /// Returns `VrfError::MissingSecretKey` if none is held.
    pub fn secret_key(&self) -> Result<C::SecretKey, VrfError> {
        self.secret.clone().ok_or(VrfError::MissingSecretKey)
    }

    /// While a secret key is held, only its own public key is accepted.
    ///
    /// # Errors
    /// Returns `VrfError` if the key has the wrong shape, or
    /// `VrfError::KeyMismatch` if it differs from the held secret key's.
    pub fn set_public_key(&mut self, pk: C::PublicKey) -> Result<(), VrfError> {
        C::check_public_key(&pk)?;
        if let (Some(sk), Some((_, g))) = (&self.secret, &self.setup) {
            if C::derive_public_key(g, sk) != pk {
                return Err(VrfError::KeyMismatch);
            }
        }
        self.public = Some(pk);
        Ok(())
    }

    /// Store `sk` and re-derive the public key from it.
    ///
    /// # Errors
    /// Returns `VrfError::MissingParams` before parameters are set, or an
    /// error if the key has the wrong shape.
    pub fn set_secret_key(&mut self, sk: C::SecretKey) -> Result<(), VrfError> {
        C::check_secret_key(&sk)?;
        let pk = C::derive_public_key(self.generator()?, &sk);
        self.secret = Some(sk);
        self.public = Some(pk);
        Ok(())
    }

    /// # Errors
    /// Returns `VrfError::MissingPublicKey` if none is held.
    pub fn marshal_public_key(&self) -> Result<Vec<String>, VrfError> {
        C::marshal_public_key(self.public.as_ref().ok_or(VrfError::MissingPublicKey)?)
    }

    /// Decode, validate and store a public key.
    ///
    /// # Errors
    /// Returns `VrfError` on wrong arity or an element outside the local group.
    pub fn unmarshal_public_key(&mut self, parts: &[String]) -> Result<(), VrfError> {
        let pk = C::unmarshal_public_key(parts)?;
        self.set_public_key(pk)?;
        tracing::debug!(scheme = %C::SCHEME, elements = parts.len(), "imported public key");
        Ok(())
    }

    /// # Errors
    /// Returns `VrfError::MissingSecretKey` if none is held.
    pub fn marshal_secret_key(&self) -> Result<Vec<String>, VrfError> {
        C::marshal_secret_key(self.secret.as_ref().ok_or(VrfError::MissingSecretKey)?)
    }

    /// Decode and store a secret key, re-deriving the public key.
    ///
    /// # Errors
    /// Returns `VrfError` on wrong arity, a malformed element, or missing
    /// parameters.
    pub fn unmarshal_secret_key(&mut self, parts: &[String]) -> Result<(), VrfError> {
        let sk = C::unmarshal_secret_key(parts)?;
        self.set_secret_key(sk)?;
        tracing::debug!(scheme = %C::SCHEME, elements = parts.len(), "imported secret key");
        Ok(())
    }
}

/// Runtime-selected construction over `E`.
#[derive(Debug, Clone)]
pub enum Vrf<E: PairingGroup = Bls12_381> {
    Dy05(Instance<E, Dy05>),
    Bmr10(Instance<E, Bmr10>),
    Dod03(Instance<E, Dod03>),
}

macro_rules! dispatch {
    ($vrf:expr, $inst:ident => $body:expr) => {
        match $vrf {
            Vrf::Dy05($inst) => $body,
            Vrf::Bmr10($inst) => $body,
            Vrf::Dod03($inst) => $body,
        }
    };
}

impl<E: PairingGroup> Vrf<E> {
    #[must_use]
    pub fn new(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Dy05 => Self::Dy05(Instance::new()),
            Scheme::Bmr10 => Self::Bmr10(Instance::new()),
            Scheme::Dod03 => Self::Dod03(Instance::new()),
        }
    }

    /// # Errors
    /// Returns `VrfError::UnknownScheme` for anything but `DY05`, `BMR10`, `DOD03`.
    pub fn from_tag(tag: &str) -> Result<Self, VrfError> {
        Ok(Self::new(tag.parse()?))
    }

    #[must_use]
    pub fn scheme(&self) -> Scheme {
        dispatch!(self, i => i.scheme())
    }

    /// # Errors
    /// See [`Instance::generate`].
    pub fn generate(&mut self, lambda: u32) -> Result<(), VrfError> {
        dispatch!(self, i => i.generate(lambda))
    }

    /// # Errors
    /// See [`Instance::generate_with_rng`].
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        lambda: u32,
        rng: &mut R,
    ) -> Result<(), VrfError> {
        dispatch!(self, i => i.generate_with_rng(lambda, rng))
    }

    /// # Errors
    /// See [`Instance::eval`].
    pub fn eval(&self, x: &BigUint) -> Result<(Value<E>, Proof<E>), VrfError> {
        dispatch!(self, i => i.eval(x))
    }

    /// # Errors
    /// See [`Instance::verify`].
    pub fn verify(&self, x: &BigUint, value: &Value<E>, proof: &Proof<E>) -> Result<bool, VrfError> {
        dispatch!(self, i => i.verify(x, value, proof))
    }

    /// # Errors
    /// See [`Instance::set_params`].
    pub fn set_params(
        &mut self,
        group: &str,
        generator: &[u8],
        input_bits: usize,
        code_bits: usize,
    ) -> Result<(), VrfError> {
        dispatch!(self, i => i.set_params(group, generator, input_bits, code_bits))
    }

    /// # Errors
    /// See [`Instance::params`].
    pub fn params(&self) -> Result<PublicParams, VrfError> {
        dispatch!(self, i => i.params())
    }

    /// # Errors
    /// See [`Instance::marshal_params`].
    pub fn marshal_params(&self) -> Result<[String; 4], VrfError> {
        dispatch!(self, i => i.marshal_params())
    }

    /// # Errors
    /// See [`Instance::unmarshal_params`].
    pub fn unmarshal_params(&mut self, parts: &[String]) -> Result<(), VrfError> {
        dispatch!(self, i => i.unmarshal_params(parts))
    }

    /// # Errors
    /// See [`Instance::marshal_public_key`].
    pub fn marshal_public_key(&self) -> Result<Vec<String>, VrfError> {
        dispatch!(self, i => i.marshal_public_key())
    }

    /// # Errors
    /// See [`Instance::unmarshal_public_key`].
    pub fn unmarshal_public_key(&mut self, parts: &[String]) -> Result<(), VrfError> {
        dispatch!(self, i => i.unmarshal_public_key(parts))
    }

    /// # Errors
    /// See [`Instance::marshal_secret_key`].
    pub fn marshal_secret_key(&self) -> Result<Vec<String>, VrfError> {
        dispatch!(self, i => i.marshal_secret_key())
    }

    /// # Errors
    /// See [`Instance::unmarshal_secret_key`].
    pub fn unmarshal_secret_key(&mut self, parts: &[String]) -> Result<(), VrfError> {
        dispatch!(self, i => i.unmarshal_secret_key(parts))
    }

    /// Parse a value string produced by this construction.
    ///
    /// # Errors
    /// See [`Value::unmarshal`].
    pub fn unmarshal_value(&self, s: &str) -> Result<Value<E>, VrfError> {
        Value::unmarshal(self.scheme(), s)
    }

    /// Parse proof strings produced by this construction.
    ///
    /// # Errors
    /// See [`Proof::unmarshal`].
    pub fn unmarshal_proof(&self, parts: &[String]) -> Result<Proof<E>, VrfError> {
        Proof::unmarshal(self.scheme(), parts)
    }
}
