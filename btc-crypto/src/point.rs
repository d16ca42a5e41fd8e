// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint};

pub const COMPRESSED_SIZE: usize = 33;
pub const UNCOMPRESSED_SIZE: usize = 65;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointError {
    #[error("point: invalid encoding length {0}")]
    InvalidLength(usize),

    #[error("point: invalid prefix byte {0:#04x}")]
    InvalidPrefix(u8),

    #[error("point: not on the secp256k1 curve")]
    NotOnCurve,
}

/// Returns true when the bytes are a canonical SEC1 public key: 33 bytes with
/// prefix 0x02/0x03 or 65 bytes with prefix 0x04. Hybrid and infinity
/// encodings are not canonical.
pub fn is_pub_key_canonical(bytes: &[u8]) -> bool {
    check_sec1_shape(bytes).is_ok()
}

fn check_sec1_shape(bytes: &[u8]) -> Result<(), PointError> {
    let prefix = *bytes.first().ok_or(PointError::InvalidLength(0))?;
    let expected = match prefix {
        0x02 | 0x03 => COMPRESSED_SIZE,
        0x04 => UNCOMPRESSED_SIZE,
        other => return Err(PointError::InvalidPrefix(other)),
    };
    if bytes.len() != expected {
        return Err(PointError::InvalidLength(bytes.len()));
    }
    Ok(())
}

fn decode_affine(bytes: &[u8]) -> Result<AffinePoint, PointError> {
    let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| PointError::NotOnCurve)?;
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(PointError::NotOnCurve)
}

/// A point on secp256k1 together with the compression flag of its SEC1
/// encoding. The flag is representational only: switching it never changes
/// the affine coordinates, but it changes every identifier derived from the
/// encoded bytes, addresses included.
///
/// The decoded affine form is cached on first use, so keys loaded from bytes
/// pay for y-coordinate recovery only when they actually verify or sign.
#[derive(Clone)]
pub struct EcPoint {
    encoded: Vec<u8>,
    decoded: OnceLock<Option<AffinePoint>>,
}

impl EcPoint {
    /// Parse a SEC1 encoding, validating shape and curve membership up front.
    /// Rejects hybrid (0x06/0x07) and infinity (0x00) encodings.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, PointError> {
        check_sec1_shape(bytes)?;
        let affine = decode_affine(bytes)?;

        let decoded = OnceLock::new();
        let _ = decoded.set(Some(affine));
        Ok(Self { encoded: bytes.to_vec(), decoded })
    }

    /// Parse a SEC1 encoding checking only the prefix and length, deferring
    /// curve membership to the first access that needs the y coordinate.
    /// Reserved for bytes that round-trip from our own encodings.
    pub(crate) fn from_sec1_bytes_lazy(bytes: &[u8]) -> Result<Self, PointError> {
        check_sec1_shape(bytes)?;
        Ok(Self { encoded: bytes.to_vec(), decoded: OnceLock::new() })
    }

    /// Wrap an already-validated affine point, encoding it with the requested
    /// compression flag. Must not be called with the identity.
    pub fn from_affine(point: AffinePoint, compressed: bool) -> Self {
        let encoded = point.to_encoded_point(compressed).as_bytes().to_vec();
        let decoded = OnceLock::new();
        let _ = decoded.set(Some(point));
        Self { encoded, decoded }
    }

    /// The decoded affine point. Fails only for lazily-constructed points
    /// whose bytes turn out not to be on the curve.
    pub fn affine(&self) -> Result<AffinePoint, PointError> {
        self.decoded
            .get_or_init(|| decode_affine(&self.encoded).ok())
            .as_ref()
            .copied()
            .ok_or(PointError::NotOnCurve)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoded.clone()
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.encoded[0] != 0x04
    }

    /// The same point re-encoded with the requested compression flag.
    pub fn with_compression(&self, compressed: bool) -> Result<Self, PointError> {
        if self.is_compressed() == compressed {
            return Ok(self.clone());
        }
        Ok(Self::from_affine(self.affine()?, compressed))
    }

    pub fn to_compressed(&self) -> Result<Self, PointError> {
        self.with_compression(true)
    }

    pub fn to_uncompressed(&self) -> Result<Self, PointError> {
        self.with_compression(false)
    }
}

// Canonical SEC1 encodings are injective over (x, y, compression flag), so
// byte equality is exactly the affine-plus-flag equality the key layer needs.
impl PartialEq for EcPoint {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for EcPoint {}

impl Hash for EcPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.encoded.hash(state);
    }
}

impl fmt::Debug for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcPoint({})", hex::encode(&self.encoded))
    }
}

impl fmt::Display for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_base::encoding::DecodeHex;

    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GENERATOR_UNCOMPRESSED: &str =
        "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
         483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    fn generator(compressed: bool) -> Vec<u8> {
        let hex = if compressed { GENERATOR_COMPRESSED } else { GENERATOR_UNCOMPRESSED };
        hex.decode_hex().expect("fixture")
    }

    #[test]
    fn roundtrips_preserve_bytes() {
        for compressed in [true, false] {
            let bytes = generator(compressed);
            let point = EcPoint::from_sec1_bytes(&bytes).expect("valid point");
            assert_eq!(point.as_bytes(), bytes.as_slice());
            assert_eq!(point.is_compressed(), compressed);
        }
    }

    #[test]
    fn compression_flip_preserves_coordinates() {
        let compressed = EcPoint::from_sec1_bytes(&generator(true)).expect("valid point");
        let uncompressed = compressed.to_uncompressed().expect("on curve");

        assert_eq!(uncompressed.as_bytes(), generator(false).as_slice());
        assert_eq!(compressed.affine().expect("decoded"), uncompressed.affine().expect("decoded"));
        assert_ne!(compressed, uncompressed);

        let recompressed = uncompressed.to_compressed().expect("on curve");
        assert_eq!(recompressed, compressed);
    }

    #[test]
    fn rejects_bad_prefixes() {
        for prefix in [0x00u8, 0x01, 0x05, 0x06, 0x07] {
            let mut bytes = generator(false);
            bytes[0] = prefix;
            assert_eq!(
                EcPoint::from_sec1_bytes(&bytes),
                Err(PointError::InvalidPrefix(prefix))
            );
            assert!(!is_pub_key_canonical(&bytes));
        }
        assert_eq!(EcPoint::from_sec1_bytes(&[]), Err(PointError::InvalidLength(0)));
    }

    #[test]
    fn rejects_bad_lengths() {
        let mut bytes = generator(true);
        bytes.pop();
        assert_eq!(
            EcPoint::from_sec1_bytes(&bytes),
            Err(PointError::InvalidLength(32))
        );
        assert!(!is_pub_key_canonical(&bytes));
    }

    #[test]
    fn rejects_x_out_of_field() {
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&[0xFF; 32]);
        assert_eq!(EcPoint::from_sec1_bytes(&bytes), Err(PointError::NotOnCurve));
    }

    #[test]
    fn lazy_decode_defers_curve_check() {
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&[0xFF; 32]);
        let point = EcPoint::from_sec1_bytes_lazy(&bytes).expect("shape is fine");
        assert_eq!(point.affine(), Err(PointError::NotOnCurve));
    }
}
