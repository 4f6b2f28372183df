use core::fmt;
use core::str::FromStr;

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::CanonicalSerialize;

use crate::{errors::VrfError, ser};

pub const DOMAIN_TAG: &[u8; 14] = b"pairing-vrf/v1"; // 14-byte ASCII
pub const INPUT_BITS: usize = 64; // lIn for the coded schemes
pub const CODE_BITS: usize = 71; // lCode = lIn + 7 redundancy positions
pub const OUTPUT_LEN: usize = 32; // BLAKE3 digest of a value

/// Construction tag. Parsing rejects anything but the three known tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// Dodis–Yampolskiy.
    #[default]
    Dy05,
    Bmr10,
    Dod03,
}

impl Scheme {
    pub const ALL: [Self; 3] = [Self::Dy05, Self::Bmr10, Self::Dod03];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dy05 => "DY05",
            Self::Bmr10 => "BMR10",
            Self::Dod03 => "DOD03",
        }
    }

    /// Fixed (lIn, lCode) pair of the construction.
    #[must_use]
    pub const fn lengths(self) -> Lengths {
        match self {
            Self::Dy05 => Lengths::UNCODED,
            Self::Bmr10 | Self::Dod03 => Lengths::CODED,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = VrfError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == tag)
            .ok_or_else(|| VrfError::UnknownScheme(tag.to_owned()))
    }
}

/// Bit lengths of VRF inputs and of their codewords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lengths {
    pub input_bits: usize,
    pub code_bits: usize,
}

impl Lengths {
    /// DY05 reduces arbitrary integers mod the group order, no fixed width.
    pub const UNCODED: Self = Self { input_bits: 0, code_bits: 0 };
    pub const CODED: Self = Self { input_bits: INPUT_BITS, code_bits: CODE_BITS };
}

/// VRF output. DY05 and BMR10 land in the target group, DOD03 stops at the
/// last chain element in G1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value<E: Pairing> {
    Target(PairingOutput<E>),
    Source(E::G1Affine),
}

impl<E: Pairing> Value<E> {
    /// BLAKE3( `DOMAIN_TAG` || compressed value ), for callers that want bytes.
    ///
    /// # Errors
    /// Returns `VrfError::Serialization` if the element cannot be encoded.
    pub fn output_bytes(&self) -> Result<[u8; OUTPUT_LEN], VrfError> {
        let mut buf = Vec::new();
        match self {
            Self::Target(t) => t.serialize_compressed(&mut buf)?,
            Self::Source(p) => p.serialize_compressed(&mut buf)?,
        }
        let mut h = blake3::Hasher::new();
        h.update(DOMAIN_TAG);
        h.update(&buf);
        Ok(*h.finalize().as_bytes())
    }

    /// # Errors
    /// Returns `VrfError::Serialization` if the element cannot be encoded.
    pub fn marshal(&self) -> Result<String, VrfError> {
        match self {
            Self::Target(t) => ser::encode_element(t),
            Self::Source(p) => ser::encode_element(p),
        }
    }

    /// Parse a value produced by `scheme`.
    ///
    /// # Errors
    /// Returns `VrfError` if the string is not a valid element of the expected group.
    pub fn unmarshal(scheme: Scheme, s: &str) -> Result<Self, VrfError> {
        match scheme {
            Scheme::Dy05 | Scheme::Bmr10 => ser::decode_element(s).map(Self::Target),
            Scheme::Dod03 => ser::decode_element(s).map(Self::Source),
        }
    }
}

/// Proof of correct evaluation: one G2 element for DY05, the G1 chain
/// `v[0..=n]` for BMR10 (n = lIn) and DOD03 (n = lCode).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Proof<E: Pairing> {
    Point(E::G2Affine),
    Chain(Vec<E::G1Affine>),
}

impl<E: Pairing> Proof<E> {
    /// Number of group elements carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::Chain(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Errors
    /// Returns `VrfError::Serialization` if an element cannot be encoded.
    pub fn marshal(&self) -> Result<Vec<String>, VrfError> {
        match self {
            Self::Point(w) => Ok(vec![ser::encode_element(w)?]),
            Self::Chain(v) => v.iter().map(ser::encode_element).collect(),
        }
    }

    /// Parse a proof produced by `scheme`, enforcing its exact arity.
    ///
    /// # Errors
    /// Returns `VrfError::InvalidLength` on a wrong element count, or a decode
    /// error for a malformed element.
    pub fn unmarshal(scheme: Scheme, parts: &[String]) -> Result<Self, VrfError> {
        let expected = match scheme {
            Scheme::Dy05 => 1,
            Scheme::Bmr10 => INPUT_BITS + 1,
            Scheme::Dod03 => CODE_BITS + 1,
        };
        if parts.len() != expected {
            return Err(VrfError::InvalidLength { expected, got: parts.len() });
        }
        match scheme {
            Scheme::Dy05 => ser::decode_element(&parts[0]).map(Self::Point),
            Scheme::Bmr10 | Scheme::Dod03 => parts
                .iter()
                .map(|p| ser::decode_element(p))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Chain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_tags_round_trip() {
        for s in Scheme::ALL {
            assert_eq!(s.to_string().parse::<Scheme>().unwrap(), s);
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        for tag in ["", "dy05", "HW10", "DY05 "] {
            assert!(matches!(tag.parse::<Scheme>(), Err(VrfError::UnknownScheme(t)) if t == tag));
        }
    }

    #[test]
    fn default_scheme_is_dy05() {
        assert_eq!(Scheme::default(), Scheme::Dy05);
    }

    #[test]
    fn coded_lengths() {
        assert_eq!(Scheme::Dy05.lengths(), Lengths::UNCODED);
        assert_eq!(Scheme::Bmr10.lengths(), Lengths { input_bits: 64, code_bits: 71 });
        assert_eq!(Scheme::Dod03.lengths(), Scheme::Bmr10.lengths());
    }
}
