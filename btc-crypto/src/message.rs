// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

//! Human-readable message signing in the reference client's format: the
//! network magic and the UTF-8 message, each varint length framed, hashed
//! with double SHA-256 and signed. The wire form is base64 over 65 bytes,
//! one header byte carrying the recovery id and compression flag followed by
//! r and s as 32-byte big-endian integers.
//!
//! This is distinct from signing raw bytes: use it only for text that is
//! shown to people.

use btc_base::encoding::{varint, FromBase64, FromBase64Error, ToBase64};
use btc_base::hash::double_sha256;
use btc_base::network::Network;

use crate::crypter::AesKey;
use crate::ecdsa;
use crate::key::{EcKey, KeyError};
use crate::signature::EcdsaSignature;

/// header byte + r + s
pub const MESSAGE_SIGNATURE_SIZE: usize = 65;

const HEADER_BASE: u8 = 27;
const HEADER_MAX: u8 = 34;
const HEADER_COMPRESSED_OFFSET: u8 = 4;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message: {0}")]
    Base64(#[from] FromBase64Error),

    #[error("message: signature must be {MESSAGE_SIGNATURE_SIZE} bytes, got {0}")]
    InvalidLength(usize),

    #[error("message: header byte {0} out of range [27, 34]")]
    HeaderOutOfRange(u8),

    #[error("message: signature component is zero or out of range")]
    InvalidComponent,

    #[error("message: could not recover a public key from the signature")]
    RecoveryFailed,

    #[error("message: signature did not match the expected key")]
    SignatureMismatch,

    // Every well-formed key matches one of the four recovery ids; running out
    // means a bug, not bad input.
    #[error("message: no recovery id reproduces this key")]
    RecoveryIdExhausted,

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// The exact byte string whose double SHA-256 gets signed.
pub fn format_for_signing(network: &Network, message: &str) -> Vec<u8> {
    let magic = network.signed_message_magic.as_bytes();
    let text = message.as_bytes();

    let mut payload = Vec::with_capacity(
        varint::varint_len(magic.len() as u64)
            + magic.len()
            + varint::varint_len(text.len() as u64)
            + text.len(),
    );
    varint::write_varint(&mut payload, magic.len() as u64);
    payload.extend_from_slice(magic);
    varint::write_varint(&mut payload, text.len() as u64);
    payload.extend_from_slice(text);
    payload
}

/// The digest message signatures commit to.
pub fn message_digest(network: &Network, message: &str) -> [u8; 32] {
    double_sha256(format_for_signing(network, message))
}

impl EcKey {
    /// Sign a text message, returning the base64 wire form. An encrypted key
    /// needs its AES key; see [`EcKey::sign_digest`].
    pub fn sign_message(
        &self,
        network: &Network,
        message: &str,
        aes_key: Option<&AesKey>,
    ) -> Result<String, MessageError> {
        let digest = message_digest(network, message);
        let signature = self.sign_digest(&digest, aes_key)?;

        // Work backwards to the recovery id by trying all four candidates
        // against our own public key.
        let mut rec_id = None;
        for candidate in 0..4u8 {
            let recovered =
                ecdsa::recover_from_signature(candidate, &signature, &digest, self.is_compressed());
            if recovered.as_ref() == Some(self.pub_point()) {
                rec_id = Some(candidate);
                break;
            }
        }
        let rec_id = rec_id.ok_or(MessageError::RecoveryIdExhausted)?;

        let mut data = [0u8; MESSAGE_SIGNATURE_SIZE];
        data[0] = HEADER_BASE
            + rec_id
            + if self.is_compressed() { HEADER_COMPRESSED_OFFSET } else { 0 };
        data[1..33].copy_from_slice(&signature.r_bytes());
        data[33..65].copy_from_slice(&signature.s_bytes());
        Ok(data.to_base64())
    }

    /// Check a message signature against this key. Succeeds exactly when the
    /// recovered signer is this key's public point.
    pub fn verify_message(
        &self,
        network: &Network,
        message: &str,
        signature_base64: &str,
    ) -> Result<(), MessageError> {
        let signer = recover_signer(network, message, signature_base64)?;
        if signer.pub_point() == self.pub_point() {
            Ok(())
        } else {
            Err(MessageError::SignatureMismatch)
        }
    }
}

/// Recover the signer of a message from its base64 signature, returning a
/// verification-only key. Compare the result to an expected key to decide
/// whether the signature is genuine.
pub fn recover_signer(
    network: &Network,
    message: &str,
    signature_base64: &str,
) -> Result<EcKey, MessageError> {
    let raw = Vec::from_base64(&signature_base64)?;
    if raw.len() != MESSAGE_SIGNATURE_SIZE {
        return Err(MessageError::InvalidLength(raw.len()));
    }

    let mut header = raw[0];
    if !(HEADER_BASE..=HEADER_MAX).contains(&header) {
        return Err(MessageError::HeaderOutOfRange(header));
    }
    let compressed = header >= HEADER_BASE + HEADER_COMPRESSED_OFFSET;
    if compressed {
        header -= HEADER_COMPRESSED_OFFSET;
    }
    let rec_id = header - HEADER_BASE;

    let r: [u8; 32] = raw[1..33].try_into().expect("length checked above");
    let s: [u8; 32] = raw[33..65].try_into().expect("length checked above");
    let signature =
        EcdsaSignature::from_be_bytes(&r, &s).map_err(|_| MessageError::InvalidComponent)?;

    let digest = message_digest(network, message);
    let signer = ecdsa::recover_from_signature(rec_id, &signature, &digest, compressed)
        .ok_or(MessageError::RecoveryFailed)?;
    Ok(EcKey::from_public_only(signer))
}
