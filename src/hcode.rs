//! Structured code ("HCode"): Hamming-style layout binding a fixed-width
//! input to a longer codeword. Redundancy bits sit at the power-of-two
//! positions (1-indexed) and each one is the parity of every other position
//! sharing its set bit, so flipping one data bit flips at least two
//! redundancy bits as well.

use num_bigint::BigUint;

use crate::{errors::VrfError, types::Scheme};

#[inline]
const fn is_redundancy_position(p: usize) -> bool {
    p & (p - 1) == 0
}

/// Codeword length for `input_bits` data bits (64 → 71).
#[must_use]
pub const fn code_len(input_bits: usize) -> usize {
    let mut placed = 0;
    let mut pos = 0;
    while placed < input_bits {
        pos += 1;
        if !is_redundancy_position(pos) {
            placed += 1;
        }
    }
    pos
}

/// Encode a `'0'`/`'1'` string into its codeword.
///
/// # Errors
/// Returns `VrfError::InvalidBit` on any other character.
pub fn encode(data: &str) -> Result<String, VrfError> {
    let len = code_len(data.len());
    let mut bits = vec![0u8; len + 1]; // index 0 unused
    let mut input = data.chars();
    for (pos, bit) in bits.iter_mut().enumerate().skip(1) {
        if is_redundancy_position(pos) {
            continue;
        }
        *bit = match input.next() {
            Some('0') => 0,
            Some('1') => 1,
            Some(c) => return Err(VrfError::InvalidBit(c)),
            None => break,
        };
    }

    let mut p = 1;
    while p <= len {
        let parity = (1..=len)
            .filter(|&i| i != p && i & p != 0)
            .fold(0, |acc, i| acc ^ bits[i]);
        bits[p] = parity;
        p <<= 1;
    }

    Ok(bits[1..].iter().map(|&b| char::from(b'0' + b)).collect())
}

/// Big-endian binary digits of `x`, left-padded with `'0'` to `width`.
///
/// # Errors
/// Returns `VrfError::InvalidLength` if `x` needs more than `width` bits.
pub fn to_padded_bits(x: &BigUint, width: usize) -> Result<String, VrfError> {
    let bits = x.bits();
    if bits > width as u64 {
        return Err(VrfError::InvalidLength {
            expected: width,
            got: usize::try_from(bits).unwrap_or(usize::MAX),
        });
    }
    Ok(format!("{x:0>width$b}"))
}

/// Codeword of `x` as booleans, checked against the expected widths.
pub(crate) fn codeword(x: &BigUint, input_bits: usize, code_bits: usize) -> Result<Vec<bool>, VrfError> {
    let fx = encode(&to_padded_bits(x, input_bits)?)?;
    if fx.len() != code_bits {
        return Err(VrfError::CodewordLength { expected: code_bits, got: fx.len() });
    }
    Ok(fx.bytes().map(|b| b == b'1').collect())
}

/// Codeword of a VRF input for one of the coded schemes. Over-wide inputs are
/// rejected here, before any group operation runs.
pub(crate) fn input_codeword(scheme: Scheme, x: &BigUint) -> Result<Vec<bool>, VrfError> {
    let lengths = scheme.lengths();
    if x.bits() > lengths.input_bits as u64 {
        return Err(VrfError::InputTooLong { scheme, bits: x.bits(), max: lengths.input_bits });
    }
    codeword(x, lengths.input_bits, lengths.code_bits)
}
