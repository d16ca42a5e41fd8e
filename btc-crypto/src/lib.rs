// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

//! secp256k1 keypairs for Bitcoin-compatible software.
//!
//! The central type is [`EcKey`]: an immutable public point with an optional
//! private scalar that can sign digests, verify signatures, recover signer
//! identities, sign human-readable messages in the reference client's
//! format, and keep its private part encrypted at rest through a pluggable
//! [`KeyCrypter`].

pub mod asn1;
pub mod crypter;
pub mod ecdsa;
pub mod key;
pub mod message;
pub mod point;
pub mod signature;

pub use asn1::Asn1Error;
pub use crypter::{
    AesKey, CrypterError, EncryptedData, EncryptionType, KeyCrypter, ScryptAesCrypter,
    ScryptParams,
};
pub use key::{compare_by_age, encryption_is_reversible, EcKey, EncryptableItem, KeyError};
pub use message::{recover_signer, MessageError};
pub use point::{is_pub_key_canonical, EcPoint, PointError};
pub use signature::{EcdsaSignature, SignatureError};
