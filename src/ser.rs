use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;

use crate::errors::VrfError;

/// Group element as lowercase hex of its compressed canonical encoding.
///
/// # Errors
/// Returns `VrfError::Serialization` if the element cannot be encoded.
pub fn encode_element<T: CanonicalSerialize>(e: &T) -> Result<String, VrfError> {
    let mut buf = Vec::with_capacity(e.compressed_size());
    e.serialize_compressed(&mut buf)?;
    Ok(hex::encode(buf))
}

/// Inverse of [`encode_element`]. Deserialization is validated (on-curve and
/// subgroup checks), so the result always belongs to the local group.
///
/// # Errors
/// Returns `VrfError` on bad hex, an invalid point, or trailing bytes.
pub fn decode_element<T: CanonicalDeserialize>(s: &str) -> Result<T, VrfError> {
    let bytes = hex::decode(s).map_err(|_| VrfError::DecodeError("invalid hex"))?;
    decode_element_bytes(&bytes)
}

/// Validated decode of raw compressed bytes; no trailing bytes allowed.
///
/// # Errors
/// Returns `VrfError` on an invalid encoding or trailing bytes.
pub fn decode_element_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, VrfError> {
    let mut reader = bytes;
    let e = T::deserialize_compressed(&mut reader)?;
    if !reader.is_empty() {
        return Err(VrfError::DecodeError("trailing bytes"));
    }
    Ok(e)
}

/// Scalar as its canonical decimal representative.
#[must_use]
pub fn encode_scalar<F: PrimeField>(f: &F) -> String {
    let n: BigUint = (*f).into();
    n.to_str_radix(10)
}

/// Parse a canonical decimal scalar (digits only, strictly below the modulus).
///
/// # Errors
/// Returns `VrfError::DecodeError` on anything else.
pub fn decode_scalar<F: PrimeField>(s: &str) -> Result<F, VrfError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VrfError::DecodeError("scalar is not a decimal string"));
    }
    let n = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or(VrfError::DecodeError("scalar is not a decimal string"))?;
    let modulus: BigUint = F::MODULUS.into();
    if n >= modulus {
        return Err(VrfError::DecodeError("scalar out of range"));
    }
    Ok(F::from_be_bytes_mod_order(&n.to_bytes_be()))
}

/// Length field of the parameter export. An empty string reads as zero.
///
/// # Errors
/// Returns `VrfError::DecodeError` if the field is not a decimal integer.
pub fn decode_length(s: &str) -> Result<usize, VrfError> {
    if s.is_empty() {
        return Ok(0);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VrfError::DecodeError("length is not a decimal string"));
    }
    s.parse().map_err(|_| VrfError::DecodeError("length out of range"))
}

/// Map a sequence of strings through `f`, failing on the first bad element.
pub(crate) fn decode_all<T>(
    parts: &[String],
    f: impl Fn(&str) -> Result<T, VrfError>,
) -> Result<Vec<T>, VrfError> {
    parts.iter().map(|p| f(p)).collect()
}

/// Split `[head] ++ tail`, requiring exactly `tail_len` trailing parts.
pub(crate) fn split_head(parts: &[String], tail_len: usize) -> Result<(&str, &[String]), VrfError> {
    match parts.split_first() {
        Some((head, tail)) if tail.len() == tail_len => Ok((head.as_str(), tail)),
        _ => Err(VrfError::InvalidLength { expected: tail_len + 1, got: parts.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use ark_ec::AffineRepr;
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn scalars_are_decimal() {
        assert_eq!(encode_scalar(&Fr::from(0u64)), "0");
        assert_eq!(encode_scalar(&Fr::from(1234u64)), "1234");
        let f: Fr = decode_scalar("1234").unwrap();
        assert_eq!(f, Fr::from(1234u64));
    }

    #[test]
    fn scalar_round_trip() {
        let mut rng = test_rng();
        for _ in 0..8 {
            let f = Fr::rand(&mut rng);
            assert_eq!(decode_scalar::<Fr>(&encode_scalar(&f)).unwrap(), f);
        }
    }

    #[test]
    fn non_canonical_scalars_rejected() {
        let modulus: BigUint = Fr::MODULUS.into();
        assert!(decode_scalar::<Fr>(&modulus.to_str_radix(10)).is_err());
        for bad in ["", "-1", "+1", "12a", "1_000", " 1"] {
            assert!(decode_scalar::<Fr>(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn element_round_trip() {
        let p = G1Affine::generator();
        let q = G2Affine::generator();
        assert_eq!(decode_element::<G1Affine>(&encode_element(&p).unwrap()).unwrap(), p);
        assert_eq!(decode_element::<G2Affine>(&encode_element(&q).unwrap()).unwrap(), q);
    }

    #[test]
    fn malformed_elements_rejected() {
        let p = encode_element(&G1Affine::generator()).unwrap();
        assert!(decode_element::<G1Affine>("zz").is_err());
        assert!(decode_element::<G1Affine>(&p[..p.len() - 2]).is_err());
        assert!(decode_element::<G1Affine>(&format!("{p}00")).is_err());
        // a G1 encoding is not a G2 element
        assert!(decode_element::<G2Affine>(&p).is_err());
    }

    #[test]
    fn lengths() {
        assert_eq!(decode_length("").unwrap(), 0);
        assert_eq!(decode_length("71").unwrap(), 71);
        assert!(decode_length("-1").is_err());
        assert!(decode_length("x").is_err());
    }
}
