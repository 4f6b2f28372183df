use ark_serialize::SerializationError;
use thiserror::Error;

use crate::types::Scheme;

#[derive(Debug, Error)]
pub enum VrfError {
    #[error("unknown VRF scheme tag: {0:?}")]
    UnknownScheme(String),

    #[error("security parameter {requested} not supported by {curve} (accepted: 1..={max})")]
    UnsupportedSecurity { curve: &'static str, requested: u32, max: u32 },

    #[error("group parameters have not been set")]
    MissingParams,

    #[error("secret key has not been set")]
    MissingSecretKey,

    #[error("public key has not been set")]
    MissingPublicKey,

    #[error("input needs {bits} bits but {scheme} accepts at most {max}")]
    InputTooLong { scheme: Scheme, bits: u64, max: usize },

    #[error("codeword length mismatch: expected {expected} got {got}")]
    CodewordLength { expected: usize, got: usize },

    #[error("invalid bit {0:?} in bit string")]
    InvalidBit(char),

    #[error("scalar inversion of zero during evaluation")]
    ZeroInverse,

    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("{scheme} expects lengths ({expected_in}, {expected_code}), got ({got_in}, {got_code})")]
    LengthMismatch {
        scheme: Scheme,
        expected_in: usize,
        expected_code: usize,
        got_in: usize,
        got_code: usize,
    },

    #[error("group parameters are for {got:?}, this instance uses {expected}")]
    CurveMismatch { expected: &'static str, got: String },

    #[error("invalid generator")]
    InvalidGenerator,

    #[error("public key does not match the held secret key")]
    KeyMismatch,

    #[error("decode error: {0}")]
    DecodeError(&'static str),

    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}
