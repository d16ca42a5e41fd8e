// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

//! The OpenSSL `EC_PRIVATEKEY` structure, as stored by the reference client:
//!
//! ```text
//! SEQUENCE {
//!   INTEGER version = 1,
//!   OCTET STRING privateKey (32 bytes),
//!   [0] EXPLICIT ECPKPARAMETERS (named curve OID),
//!   [1] EXPLICIT BIT STRING publicKey (SEC1)
//! }
//! ```

use sec1::der::asn1::ObjectIdentifier;
use sec1::der::{Decode, Encode};
use sec1::{EcParameters, EcPrivateKey};

use crate::key::EcKey;

const SECP256K1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Asn1Error {
    #[error("asn1: malformed EC private key structure")]
    Malformed,

    #[error("asn1: missing curve parameters")]
    MissingParameters,

    #[error("asn1: unsupported curve")]
    UnsupportedCurve,

    #[error("asn1: missing public key")]
    MissingPublicKey,

    #[error("asn1: invalid public key encoding")]
    InvalidPublicKey,

    #[error("asn1: invalid private key scalar")]
    InvalidPrivateKey,

    #[error("asn1: public key does not match the private key")]
    PublicKeyMismatch,
}

/// Render the private scalar and SEC1 public bytes as a DER `EC_PRIVATEKEY`.
pub fn encode_ec_private_key(
    private_bytes: &[u8; 32],
    public_bytes: &[u8],
) -> Result<Vec<u8>, Asn1Error> {
    let document = EcPrivateKey {
        private_key: private_bytes,
        parameters: Some(EcParameters::NamedCurve(SECP256K1_OID)),
        public_key: Some(public_bytes),
    };
    document.to_der().map_err(|_| Asn1Error::Malformed)
}

/// Strictly parse a DER `EC_PRIVATEKEY` and rebuild the key. All four fields
/// must be present, the version must be 1 (enforced by the DER layer), no
/// trailing bytes are tolerated, and the embedded public key must equal the
/// one recomputed from the private scalar.
pub fn decode_ec_private_key(der: &[u8]) -> Result<EcKey, Asn1Error> {
    let parsed = EcPrivateKey::from_der(der).map_err(|_| Asn1Error::Malformed)?;

    let parameters = parsed.parameters.ok_or(Asn1Error::MissingParameters)?;
    if parameters.named_curve() != Some(SECP256K1_OID) {
        return Err(Asn1Error::UnsupportedCurve);
    }

    let public = parsed.public_key.ok_or(Asn1Error::MissingPublicKey)?;
    if public.len() != 33 && public.len() != 65 {
        return Err(Asn1Error::InvalidPublicKey);
    }
    // compressed(2,3) and uncompressed(4) only; infinity(0) and hybrid(6,7)
    // never appear in well-formed key material
    if !(0x02..=0x04).contains(&public[0]) {
        return Err(Asn1Error::InvalidPublicKey);
    }

    if parsed.private_key.len() != 32 {
        return Err(Asn1Error::InvalidPrivateKey);
    }

    let compressed = public.len() == 33;
    let key = EcKey::from_private_bytes(parsed.private_key, compressed)
        .map_err(|_| Asn1Error::InvalidPrivateKey)?;

    if key.pub_bytes() != public {
        return Err(Asn1Error::PublicKeyMismatch);
    }
    Ok(key)
}
