// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

use std::fmt;

use k256::ecdsa::Signature as K256Signature;
use k256::elliptic_curve::scalar::IsHigh;
use k256::NonZeroScalar;

use btc_base::encoding::ToHex;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature: invalid DER encoding")]
    InvalidDer,

    #[error("signature: component is zero or out of range")]
    InvalidComponent,

    #[error("signature: signing failed")]
    SigningFailed,
}

/// An ECDSA signature as the ordered pair (r, s), both strictly positive
/// scalars modulo the group order.
///
/// Low-s normalization is deliberately an explicit operation rather than
/// something applied on construction: signatures received from elsewhere must
/// be verifiable in the exact form they arrived in.
#[derive(Clone, Copy)]
pub struct EcdsaSignature {
    r: NonZeroScalar,
    s: NonZeroScalar,
}

impl PartialEq for EcdsaSignature {
    fn eq(&self, other: &Self) -> bool {
        self.r.to_bytes() == other.r.to_bytes() && self.s.to_bytes() == other.s.to_bytes()
    }
}

impl Eq for EcdsaSignature {}

impl EcdsaSignature {
    #[inline]
    pub fn from_scalars(r: NonZeroScalar, s: NonZeroScalar) -> Self {
        Self { r, s }
    }

    /// Build a signature from 32-byte big-endian components. Zero components
    /// and values at or above the group order are rejected.
    pub fn from_be_bytes(r: &[u8; 32], s: &[u8; 32]) -> Result<Self, SignatureError> {
        let r = Option::<NonZeroScalar>::from(NonZeroScalar::from_repr((*r).into()))
            .ok_or(SignatureError::InvalidComponent)?;
        let s = Option::<NonZeroScalar>::from(NonZeroScalar::from_repr((*s).into()))
            .ok_or(SignatureError::InvalidComponent)?;
        Ok(Self { r, s })
    }

    #[inline]
    pub fn r(&self) -> NonZeroScalar {
        self.r
    }

    #[inline]
    pub fn s(&self) -> NonZeroScalar {
        self.s
    }

    #[inline]
    pub fn r_bytes(&self) -> [u8; 32] {
        self.r.to_bytes().into()
    }

    #[inline]
    pub fn s_bytes(&self) -> [u8; 32] {
        self.s.to_bytes().into()
    }

    /// ASN.1/DER rendering: a SEQUENCE of the two INTEGERs, minimally encoded.
    pub fn to_der(&self) -> Vec<u8> {
        self.backend().to_der().as_ref().to_vec()
    }

    /// Strict DER parsing. Trailing bytes, padding and non-minimal integers
    /// are all rejected.
    pub fn from_der(der: &[u8]) -> Result<Self, SignatureError> {
        let signature = K256Signature::from_der(der).map_err(|_| SignatureError::InvalidDer)?;
        let (r, s) = signature.split_scalars();
        Ok(Self { r, s })
    }

    /// True when s is in the lower half of the group order.
    #[inline]
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// The canonical low-s twin: if s > n/2, replaces s with n - s, which
    /// leaves the signature valid for the same digest and key.
    pub fn normalize_s(&self) -> Self {
        match self.backend().normalize_s() {
            Some(normalized) => {
                let (r, s) = normalized.split_scalars();
                Self { r, s }
            }
            None => *self,
        }
    }

    fn backend(&self) -> K256Signature {
        K256Signature::from_scalars(self.r.to_bytes(), self.s.to_bytes())
            .expect("both components are non-zero")
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaSignature")
            .field("r", &self.r_bytes().to_hex())
            .field("s", &self.s_bytes().to_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EcdsaSignature {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r[31] = 0x11;
        s[31] = 0x2A;
        EcdsaSignature::from_be_bytes(&r, &s).expect("small scalars are valid")
    }

    #[test]
    fn der_roundtrip() {
        let signature = sample();
        let der = signature.to_der();
        assert_eq!(EcdsaSignature::from_der(&der).expect("roundtrip"), signature);
    }

    #[test]
    fn der_rejects_trailing_bytes() {
        let mut der = sample().to_der();
        der.push(0x00);
        assert_eq!(EcdsaSignature::from_der(&der), Err(SignatureError::InvalidDer));
    }

    #[test]
    fn der_rejects_truncation() {
        let der = sample().to_der();
        assert_eq!(
            EcdsaSignature::from_der(&der[..der.len() - 1]),
            Err(SignatureError::InvalidDer)
        );
    }

    #[test]
    fn rejects_zero_components() {
        let zero = [0u8; 32];
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(
            EcdsaSignature::from_be_bytes(&zero, &one),
            Err(SignatureError::InvalidComponent)
        );
        assert_eq!(
            EcdsaSignature::from_be_bytes(&one, &zero),
            Err(SignatureError::InvalidComponent)
        );
    }

    #[test]
    fn normalization_is_an_involution_on_the_high_half() {
        let low = sample();
        assert!(low.is_low_s());
        assert_eq!(low.normalize_s(), low);

        let high_scalar = -*low.s();
        let high = EcdsaSignature::from_scalars(
            low.r(),
            Option::from(NonZeroScalar::new(high_scalar)).expect("negation of non-zero"),
        );
        assert!(!high.is_low_s());

        let normalized = high.normalize_s();
        assert_eq!(normalized, low);
        // n - s' recovers the original high value
        assert_eq!(-*normalized.s(), *high.s());
    }
}
