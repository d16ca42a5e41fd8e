// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

//! Pluggable symmetric encryption of private key material at rest. The key
//! layer only ever feeds the 32-byte private scalar through a crypter; the
//! public point always stays in cleartext.

use std::fmt;
use std::sync::Arc;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand_core::{CryptoRngCore, OsRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const AES_KEY_SIZE: usize = 32;

const AES_BLOCK_SIZE: usize = 16;
const SALT_SIZE: usize = 8;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrypterError {
    #[error("crypter: invalid key derivation parameters")]
    InvalidKdfParams,

    #[error("crypter: key derivation failed")]
    DeriveFailed,

    #[error("crypter: invalid initialization vector")]
    InvalidIv,

    #[error("crypter: ciphertext is malformed")]
    InvalidCiphertext,
}

/// Encryption schemes understood by this library. The tag is persisted next
/// to the ciphertext so decoders can select the matching crypter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionType {
    Unencrypted,
    ScryptAes,
}

/// Ciphertext together with the IV it was created under. Opaque to the key
/// layer; wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct EncryptedData {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl fmt::Debug for EncryptedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedData")
            .field("iv", &self.iv.len())
            .field("ciphertext", &self.ciphertext.len())
            .finish()
    }
}

/// A 256-bit symmetric key. Deriving one is slow, so callers hold on to it
/// across operations; the bytes are wiped on drop and compared in constant
/// time.
#[derive(Clone, ZeroizeOnDrop)]
pub struct AesKey {
    key: [u8; AES_KEY_SIZE],
}

impl AesKey {
    #[inline]
    pub fn new(key: [u8; AES_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// use it carefully
    #[inline]
    pub fn as_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.key
    }
}

impl From<[u8; AES_KEY_SIZE]> for AesKey {
    #[inline]
    fn from(key: [u8; AES_KEY_SIZE]) -> Self {
        Self { key }
    }
}

impl Eq for AesKey {}

impl PartialEq for AesKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key.ct_eq(&other.key).into()
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesKey(..)")
    }
}

/// A provider of symmetric encryption for secret bytes. Implementations own
/// their KDF parameters; the same instance (or one with an equal
/// fingerprint) must be presented again at decryption time.
pub trait KeyCrypter: Send + Sync {
    /// Derive the symmetric key from a passphrase. Slow by design; callers
    /// cache the result.
    fn derive_key(&self, passphrase: &str) -> Result<AesKey, CrypterError>;

    fn encrypt(&self, plaintext: &[u8], aes_key: &AesKey) -> Result<EncryptedData, CrypterError>;

    fn decrypt(
        &self,
        data: &EncryptedData,
        aes_key: &AesKey,
    ) -> Result<Zeroizing<Vec<u8>>, CrypterError>;

    /// The scheme tag persisted alongside ciphertext produced by this
    /// crypter.
    fn encryption_type(&self) -> EncryptionType;

    /// The parameters that identify this crypter instance. Two crypters with
    /// the same type and fingerprint decrypt each other's output.
    fn fingerprint(&self) -> Vec<u8>;
}

pub(crate) fn same_crypter(a: &Arc<dyn KeyCrypter>, b: &Arc<dyn KeyCrypter>) -> bool {
    a.encryption_type() == b.encryption_type() && a.fingerprint() == b.fingerprint()
}

/// Cost parameters for the scrypt KDF. `n` must be a power of two.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    pub n: u64,
    pub r: u32,
    pub p: u32,
}

impl Default for ScryptParams {
    #[inline]
    fn default() -> Self {
        Self { n: 16384, r: 8, p: 1 }
    }
}

/// The standard crypter: salted scrypt to a 256-bit key, AES-256-CBC with a
/// fresh random IV per encryption, PKCS#7 padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryptAesCrypter {
    params: ScryptParams,
    salt: [u8; SALT_SIZE],
}

impl ScryptAesCrypter {
    /// A crypter with default cost parameters and a fresh random salt.
    pub fn new() -> Self {
        Self::with_rng(&mut OsRng)
    }

    pub fn with_rng(rng: &mut impl CryptoRngCore) -> Self {
        let mut salt = [0u8; SALT_SIZE];
        rng.fill_bytes(&mut salt);
        Self { params: ScryptParams::default(), salt }
    }

    pub fn with_params(params: ScryptParams, salt: [u8; SALT_SIZE]) -> Self {
        Self { params, salt }
    }

    #[inline]
    pub fn params(&self) -> ScryptParams {
        self.params
    }

    #[inline]
    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }
}

impl Default for ScryptAesCrypter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyCrypter for ScryptAesCrypter {
    fn derive_key(&self, passphrase: &str) -> Result<AesKey, CrypterError> {
        if self.params.n.count_ones() != 1 {
            return Err(CrypterError::InvalidKdfParams);
        }
        let params = scrypt::Params::new(
            self.params.n.ilog2() as u8,
            self.params.r,
            self.params.p,
            AES_KEY_SIZE,
        )
        .map_err(|_| CrypterError::InvalidKdfParams)?;

        let mut derived = Zeroizing::new([0u8; AES_KEY_SIZE]);
        scrypt::scrypt(passphrase.as_bytes(), &self.salt, &params, derived.as_mut())
            .map_err(|_| CrypterError::DeriveFailed)?;

        Ok(AesKey::new(*derived))
    }

    fn encrypt(&self, plaintext: &[u8], aes_key: &AesKey) -> Result<EncryptedData, CrypterError> {
        let mut iv = [0u8; AES_BLOCK_SIZE];
        OsRng.fill_bytes(&mut iv);

        let cipher = Aes256CbcEnc::new_from_slices(aes_key.as_bytes(), &iv)
            .map_err(|_| CrypterError::InvalidIv)?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(EncryptedData { iv: iv.to_vec(), ciphertext })
    }

    fn decrypt(
        &self,
        data: &EncryptedData,
        aes_key: &AesKey,
    ) -> Result<Zeroizing<Vec<u8>>, CrypterError> {
        if data.iv.len() != AES_BLOCK_SIZE {
            return Err(CrypterError::InvalidIv);
        }
        if data.ciphertext.is_empty() || data.ciphertext.len() % AES_BLOCK_SIZE != 0 {
            return Err(CrypterError::InvalidCiphertext);
        }

        let cipher = Aes256CbcDec::new_from_slices(aes_key.as_bytes(), &data.iv)
            .map_err(|_| CrypterError::InvalidIv)?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&data.ciphertext)
            .map_err(|_| CrypterError::InvalidCiphertext)?;

        Ok(Zeroizing::new(plaintext))
    }

    #[inline]
    fn encryption_type(&self) -> EncryptionType {
        EncryptionType::ScryptAes
    }

    fn fingerprint(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_SIZE + 16);
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.params.n.to_le_bytes());
        bytes.extend_from_slice(&self.params.r.to_le_bytes());
        bytes.extend_from_slice(&self.params.p.to_le_bytes());
        bytes
    }
}
