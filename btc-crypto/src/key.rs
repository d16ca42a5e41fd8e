// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

//! The keypair value type: an immutable secp256k1 public point with an
//! optional private scalar that may additionally live encrypted at rest.
//!
//! A key constructed from the public part alone can verify signatures but
//! not create them. A key whose private part is encrypted signs only when
//! the matching AES key is presented, decrypting transiently. Encrypting
//! never mutates a key; it produces a new one.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use k256::{Scalar, SecretKey};
use rand_core::{CryptoRngCore, OsRng};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use btc_base::encoding::{ToHex, WifDecode, WifDecodeError, WifEncode};
use btc_base::hash::hash160;
use btc_base::network::Network;
use btc_base::{time, Address};

use crate::asn1::{self, Asn1Error};
use crate::crypter::{
    same_crypter, AesKey, CrypterError, EncryptedData, EncryptionType, KeyCrypter,
};
use crate::ecdsa;
use crate::point::{EcPoint, PointError};
use crate::signature::{EcdsaSignature, SignatureError};

pub const PRIVATE_KEY_SIZE: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key: private key is missing (public-only key)")]
    MissingPrivateKey,

    #[error("key: private key is encrypted and no AES key was supplied")]
    KeyIsEncrypted,

    #[error("key: not encrypted")]
    NotEncrypted,

    #[error("key: crypter does not match the one used at encryption time")]
    CrypterMismatch,

    #[error("key: decryption produced a different public key, wrong AES key")]
    WrongAesKey,

    #[error("key: signature did not match")]
    SignatureMismatch,

    #[error("key: private scalar out of range")]
    InvalidPrivateKey,

    #[error("key: WIF version byte {actual:#04x} does not match the network ({expected:#04x})")]
    WifVersion { expected: u8, actual: u8 },

    #[error(transparent)]
    Point(#[from] PointError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Crypter(#[from] CrypterError),

    #[error(transparent)]
    Asn1(#[from] Asn1Error),

    #[error("key: {0}")]
    Wif(#[from] WifDecodeError),
}

/// The capability set wallet layers consume when persisting keys: cleartext
/// secret bytes when available, the encrypted blob otherwise, and the scheme
/// tag recorded next to it.
pub trait EncryptableItem {
    fn secret_bytes(&self) -> Option<Zeroizing<[u8; PRIVATE_KEY_SIZE]>>;

    fn encrypted_data(&self) -> Option<&EncryptedData>;

    fn encryption_type(&self) -> EncryptionType;
}

#[derive(Clone)]
pub struct EcKey {
    // If the private part is set the public one is always derivable; if only
    // the public part is set the key verifies but never signs.
    priv_key: Option<SecretKey>,
    pub_key: EcPoint,

    // Seconds since the epoch, zero when unknown (deserialized from a source
    // that never recorded it).
    creation_time_secs: u64,

    crypter: Option<Arc<dyn KeyCrypter>>,
    encrypted_priv: Option<EncryptedData>,

    pub_hash: OnceLock<[u8; 20]>,
}

impl EcKey {
    /// Generate a fresh keypair from the process RNG. The public key is
    /// compressed.
    pub fn new_random() -> Self {
        Self::new_random_with(&mut OsRng)
    }

    /// Generate a fresh keypair from the supplied RNG.
    pub fn new_random_with(rng: &mut impl CryptoRngCore) -> Self {
        let secret = SecretKey::random(rng);
        let public = EcPoint::from_affine(*secret.public_key().as_affine(), true);
        Self {
            priv_key: Some(secret),
            pub_key: public,
            creation_time_secs: time::now_seconds(),
            crypter: None,
            encrypted_priv: None,
            pub_hash: OnceLock::new(),
        }
    }

    /// Build a key from the private scalar alone, deriving the public point
    /// (one fixed-base multiply). Scalars 0 and 1 are rejected: both are
    /// sentinel values that type-confusion bugs in callers tend to produce.
    pub fn from_private(secret: SecretKey, compressed: bool) -> Result<Self, KeyError> {
        if *secret.to_nonzero_scalar() == Scalar::ONE {
            return Err(KeyError::InvalidPrivateKey);
        }
        let public = EcPoint::from_affine(*secret.public_key().as_affine(), compressed);
        Ok(Self {
            priv_key: Some(secret),
            pub_key: public,
            creation_time_secs: 0,
            crypter: None,
            encrypted_priv: None,
            pub_hash: OnceLock::new(),
        })
    }

    /// Build a key from 32 big-endian private bytes.
    pub fn from_private_bytes(bytes: &[u8], compressed: bool) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_private(secret, compressed)
    }

    /// Build a key from a private scalar and its already-computed public
    /// encoding. Trusts the caller that the point really is d·G; the
    /// compression flag of the encoding is preserved.
    pub fn from_private_and_public(secret: SecretKey, pub_bytes: &[u8]) -> Result<Self, KeyError> {
        if *secret.to_nonzero_scalar() == Scalar::ONE {
            return Err(KeyError::InvalidPrivateKey);
        }
        let public = EcPoint::from_sec1_bytes(pub_bytes)?;
        Ok(Self {
            priv_key: Some(secret),
            pub_key: public,
            creation_time_secs: 0,
            crypter: None,
            encrypted_priv: None,
            pub_hash: OnceLock::new(),
        })
    }

    /// A verification-only key around an existing point.
    pub fn from_public_only(public: EcPoint) -> Self {
        Self {
            priv_key: None,
            pub_key: public,
            creation_time_secs: 0,
            crypter: None,
            encrypted_priv: None,
            pub_hash: OnceLock::new(),
        }
    }

    /// A verification-only key from SEC1 bytes, validated on the curve.
    pub fn from_public_only_bytes(pub_bytes: &[u8]) -> Result<Self, KeyError> {
        Ok(Self::from_public_only(EcPoint::from_sec1_bytes(pub_bytes)?))
    }

    /// A key whose private part exists only as ciphertext. It cannot sign
    /// until decrypted with the matching AES key. The public bytes come from
    /// our own storage round-trip, so curve membership is checked lazily.
    pub fn from_encrypted(
        encrypted: EncryptedData,
        crypter: Arc<dyn KeyCrypter>,
        pub_bytes: &[u8],
    ) -> Result<Self, KeyError> {
        let public = EcPoint::from_sec1_bytes_lazy(pub_bytes)?;
        Ok(Self {
            priv_key: None,
            pub_key: public,
            creation_time_secs: 0,
            crypter: Some(crypter),
            encrypted_priv: Some(encrypted),
            pub_hash: OnceLock::new(),
        })
    }

    /// Parse an OpenSSL `EC_PRIVATEKEY` structure, validating that the
    /// embedded public key matches the private scalar.
    pub fn from_asn1(der: &[u8]) -> Result<Self, KeyError> {
        Ok(asn1::decode_ec_private_key(der)?)
    }

    /// Render this key as an OpenSSL `EC_PRIVATEKEY` structure.
    pub fn to_asn1(&self) -> Result<Vec<u8>, KeyError> {
        let private = self.priv_bytes()?;
        Ok(asn1::encode_ec_private_key(&private, self.pub_bytes())?)
    }

    /// The SEC1 encoding of the public key, compression flag preserved.
    #[inline]
    pub fn pub_bytes(&self) -> &[u8] {
        self.pub_key.as_bytes()
    }

    #[inline]
    pub fn pub_point(&self) -> &EcPoint {
        &self.pub_key
    }

    #[inline]
    pub fn pub_hex(&self) -> String {
        self.pub_bytes().to_hex()
    }

    /// RIPEMD-160(SHA-256(pub_bytes)), the form addresses are built from.
    /// Computed once and cached.
    pub fn pub_hash(&self) -> [u8; 20] {
        *self.pub_hash.get_or_init(|| hash160(self.pub_key.as_bytes()))
    }

    /// The 32 big-endian private bytes. Distinguishes a key that never had a
    /// private part from one whose private part is merely encrypted.
    pub fn priv_bytes(&self) -> Result<Zeroizing<[u8; PRIVATE_KEY_SIZE]>, KeyError> {
        match &self.priv_key {
            Some(secret) => Ok(Zeroizing::new(secret.to_bytes().into())),
            None if self.is_encrypted() => Err(KeyError::KeyIsEncrypted),
            None => Err(KeyError::MissingPrivateKey),
        }
    }

    pub fn priv_hex(&self) -> Result<String, KeyError> {
        Ok(self.priv_bytes()?.to_hex())
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.pub_key.is_compressed()
    }

    /// True when there is no cleartext private part, whether because this is
    /// a watching key or because the private part is encrypted.
    #[inline]
    pub fn is_pub_only(&self) -> bool {
        self.priv_key.is_none()
    }

    #[inline]
    pub fn has_priv_key(&self) -> bool {
        self.priv_key.is_some()
    }

    /// Encrypted means a crypter is recorded and a non-empty ciphertext is
    /// present.
    pub fn is_encrypted(&self) -> bool {
        self.crypter.is_some()
            && self
                .encrypted_priv
                .as_ref()
                .is_some_and(|data| !data.ciphertext.is_empty())
    }

    /// A watching key has a public part only and is not encrypted.
    #[inline]
    pub fn is_watching(&self) -> bool {
        self.is_pub_only() && !self.is_encrypted()
    }

    #[inline]
    pub fn creation_time_secs(&self) -> u64 {
        self.creation_time_secs
    }

    /// Stamp the creation time. Zero means "unknown" by convention.
    #[inline]
    pub fn set_creation_time_secs(&mut self, secs: u64) {
        self.creation_time_secs = secs;
    }

    #[inline]
    pub fn crypter(&self) -> Option<&Arc<dyn KeyCrypter>> {
        self.crypter.as_ref()
    }

    #[inline]
    pub fn encrypted_private_key(&self) -> Option<&EncryptedData> {
        self.encrypted_priv.as_ref()
    }

    /// A copy of this key with the public point in uncompressed form. The
    /// derived address changes with it.
    pub fn decompress(&self) -> Result<Self, KeyError> {
        if !self.is_compressed() {
            return Ok(self.clone());
        }
        Ok(Self {
            priv_key: self.priv_key.clone(),
            pub_key: self.pub_key.to_uncompressed()?,
            creation_time_secs: self.creation_time_secs,
            crypter: self.crypter.clone(),
            encrypted_priv: self.encrypted_priv.clone(),
            pub_hash: OnceLock::new(),
        })
    }

    /// The pay-to-pubkey-hash address of this key on the given network.
    pub fn to_address(&self, network: &Network) -> Address {
        Address::new(network.address_version, self.pub_hash())
    }

    /// Export the private key in the dumped wallet-import format.
    pub fn to_wif(&self, network: &Network) -> Result<String, KeyError> {
        Ok(self
            .priv_bytes()?
            .wif_encode(network.wif_version, self.is_compressed()))
    }

    /// Import a private key from the dumped wallet-import format, checking
    /// the version byte against the network.
    pub fn from_wif(wif: &str, network: &Network) -> Result<Self, KeyError> {
        let decoded = wif.wif_decode(PRIVATE_KEY_SIZE)?;
        if decoded.version() != network.wif_version {
            return Err(KeyError::WifVersion {
                expected: network.wif_version,
                actual: decoded.version(),
            });
        }
        Self::from_private_bytes(decoded.data(), decoded.compressed())
    }

    /// Sign a 32-byte digest. For an encrypted key the AES key is mandatory:
    /// the private part is decrypted transiently, used, and discarded. For a
    /// cleartext key it is ignored.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
        aes_key: Option<&AesKey>,
    ) -> Result<EcdsaSignature, KeyError> {
        if self.is_encrypted() {
            let aes_key = aes_key.ok_or(KeyError::KeyIsEncrypted)?;
            let transient = self.decrypt_with(aes_key)?;
            return transient.sign_digest(digest, None);
        }
        let secret = self.priv_key.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        Ok(ecdsa::sign_prehashed(secret, digest)?)
    }

    /// Verify (r, s) over a digest with this key's public point.
    pub fn verify_digest(
        &self,
        digest: &[u8; 32],
        signature: &EcdsaSignature,
    ) -> Result<bool, KeyError> {
        Ok(ecdsa::verify_prehashed(&self.pub_key, digest, signature)?)
    }

    /// Verify a DER-encoded signature over a digest.
    pub fn verify_der(&self, digest: &[u8; 32], der: &[u8]) -> Result<bool, KeyError> {
        let signature = EcdsaSignature::from_der(der)?;
        self.verify_digest(digest, &signature)
    }

    /// Like [`verify_digest`](Self::verify_digest), but an invalid signature
    /// is an error distinct from malformed input.
    pub fn verify_digest_or_fail(
        &self,
        digest: &[u8; 32],
        signature: &EcdsaSignature,
    ) -> Result<(), KeyError> {
        if self.verify_digest(digest, signature)? {
            Ok(())
        } else {
            Err(KeyError::SignatureMismatch)
        }
    }

    pub fn verify_der_or_fail(&self, digest: &[u8; 32], der: &[u8]) -> Result<(), KeyError> {
        let signature = EcdsaSignature::from_der(der)?;
        self.verify_digest_or_fail(digest, &signature)
    }

    /// Encrypt the private part, returning a new key that carries the
    /// ciphertext and crypter instead of the cleartext scalar. The original
    /// is left untouched; the creation time is carried over.
    pub fn encrypt(
        &self,
        crypter: Arc<dyn KeyCrypter>,
        aes_key: &AesKey,
    ) -> Result<Self, KeyError> {
        let private = self.priv_bytes()?;
        let encrypted = crypter.encrypt(private.as_ref(), aes_key)?;
        let mut key = Self::from_encrypted(encrypted, crypter, self.pub_bytes())?;
        key.creation_time_secs = self.creation_time_secs;
        Ok(key)
    }

    /// Decrypt with an explicitly supplied crypter, which must match the one
    /// recorded at encryption time. A wrong AES key surfaces either as a
    /// cipher-level failure or as a derived public key that does not match.
    pub fn decrypt(
        &self,
        crypter: Arc<dyn KeyCrypter>,
        aes_key: &AesKey,
    ) -> Result<Self, KeyError> {
        if let Some(own) = &self.crypter {
            if !same_crypter(own, &crypter) {
                return Err(KeyError::CrypterMismatch);
            }
        }
        let encrypted = self.encrypted_priv.as_ref().ok_or(KeyError::NotEncrypted)?;

        let plaintext = crypter.decrypt(encrypted, aes_key)?;
        if plaintext.len() != PRIVATE_KEY_SIZE {
            return Err(KeyError::WrongAesKey);
        }
        let mut key = Self::from_private_bytes(&plaintext, self.is_compressed())
            .map_err(|_| KeyError::WrongAesKey)?;
        if key.pub_bytes() != self.pub_bytes() {
            return Err(KeyError::WrongAesKey);
        }
        key.creation_time_secs = self.creation_time_secs;
        Ok(key)
    }

    /// Decrypt with the crypter recorded at encryption time.
    pub fn decrypt_with(&self, aes_key: &AesKey) -> Result<Self, KeyError> {
        let crypter = self.crypter.clone().ok_or(KeyError::NotEncrypted)?;
        self.decrypt(crypter, aes_key)
    }

    /// Decrypt when both encrypted and given a key; identity otherwise.
    pub fn maybe_decrypt(&self, aes_key: Option<&AesKey>) -> Result<Self, KeyError> {
        match aes_key {
            Some(aes_key) if self.is_encrypted() => self.decrypt_with(aes_key),
            _ => Ok(self.clone()),
        }
    }
}

/// Confirm, before committing to an encrypted key, that decrypting it with
/// the same crypter and AES key reproduces the original private bytes.
/// Losing this property means losing every coin the key controls, so wallet
/// encryption runs it up front.
pub fn encryption_is_reversible(
    original: &EcKey,
    encrypted: &EcKey,
    crypter: Arc<dyn KeyCrypter>,
    aes_key: &AesKey,
) -> bool {
    let reborn = match encrypted.decrypt(crypter, aes_key) {
        Ok(key) => key,
        Err(err) => {
            tracing::error!("encryption reversibility check failed to decrypt: {err}");
            return false;
        }
    };
    match (original.priv_bytes(), reborn.priv_bytes()) {
        (Ok(original_bytes), Ok(reborn_bytes)) => {
            if bool::from(original_bytes.ct_eq(reborn_bytes.as_ref())) {
                true
            } else {
                tracing::error!("encryption reversibility check produced different key bytes");
                false
            }
        }
        _ => {
            tracing::error!("encryption reversibility check is missing private bytes");
            false
        }
    }
}

/// Total order by age: oldest keys first, public bytes as a deterministic
/// tiebreak for equal timestamps.
pub fn compare_by_age(a: &EcKey, b: &EcKey) -> Ordering {
    a.creation_time_secs
        .cmp(&b.creation_time_secs)
        .then_with(|| a.pub_bytes().cmp(b.pub_bytes()))
}

impl EncryptableItem for EcKey {
    fn secret_bytes(&self) -> Option<Zeroizing<[u8; PRIVATE_KEY_SIZE]>> {
        self.priv_bytes().ok()
    }

    fn encrypted_data(&self) -> Option<&EncryptedData> {
        self.encrypted_priv.as_ref()
    }

    fn encryption_type(&self) -> EncryptionType {
        self.crypter
            .as_ref()
            .map(|crypter| crypter.encryption_type())
            .unwrap_or(EncryptionType::Unencrypted)
    }
}

impl PartialEq for EcKey {
    fn eq(&self, other: &Self) -> bool {
        let priv_eq = match (&self.priv_key, &other.priv_key) {
            (Some(a), Some(b)) => {
                let a = Zeroizing::new(a.to_bytes());
                let b = Zeroizing::new(b.to_bytes());
                bool::from(a.ct_eq(&b))
            }
            (None, None) => true,
            _ => false,
        };
        let crypter_eq = match (&self.crypter, &other.crypter) {
            (Some(a), Some(b)) => same_crypter(a, b),
            (None, None) => true,
            _ => false,
        };

        priv_eq
            && crypter_eq
            && self.pub_key == other.pub_key
            && self.creation_time_secs == other.creation_time_secs
            && self.encrypted_priv == other.encrypted_priv
    }
}

impl Eq for EcKey {}

// Public keys are uniformly distributed, so their bytes alone make a sound
// hash; equality still checks every component.
impl Hash for EcKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pub_key.hash(state);
    }
}

impl fmt::Debug for EcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKey")
            .field("pub", &self.pub_hex())
            .field("creation_time_secs", &self.creation_time_secs)
            .field("is_encrypted", &self.is_encrypted())
            .field("is_pub_only", &self.is_pub_only())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypter::{ScryptAesCrypter, ScryptParams};
    use btc_base::encoding::DecodeHex;

    fn test_crypter() -> Arc<dyn KeyCrypter> {
        Arc::new(ScryptAesCrypter::with_params(
            ScryptParams { n: 2, r: 1, p: 1 },
            [1u8; 8],
        ))
    }

    fn scalar_bytes(value: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = value;
        bytes
    }

    #[test]
    fn rejects_sentinel_scalars() {
        assert!(matches!(
            EcKey::from_private_bytes(&scalar_bytes(0), true),
            Err(KeyError::InvalidPrivateKey)
        ));
        assert!(matches!(
            EcKey::from_private_bytes(&scalar_bytes(1), true),
            Err(KeyError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn smallest_valid_scalar_derives_two_g() {
        let key = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        assert_eq!(
            key.pub_hex(),
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"
        );
    }

    #[test]
    fn random_key_roundtrips_through_pub_bytes() {
        let key = EcKey::new_random();
        assert!(key.is_compressed());
        assert_eq!(key.pub_bytes().len(), 33);

        let restored = EcKey::from_public_only_bytes(key.pub_bytes()).expect("valid point");
        assert_eq!(restored.pub_bytes(), key.pub_bytes());
        assert_eq!(restored.pub_hash(), hash160(key.pub_bytes()));
        assert!(restored.is_watching());
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let key = EcKey::new_random();
        let digest = btc_base::hash::double_sha256(b"digest to sign");

        let signature = key.sign_digest(&digest, None).expect("signs");
        assert!(key.verify_digest(&digest, &signature).expect("verifies"));
        assert!(key.verify_der(&digest, &signature.to_der()).expect("verifies"));
        key.verify_digest_or_fail(&digest, &signature).expect("matches");

        let mut other = digest;
        other[0] ^= 0x01;
        assert!(!key.verify_digest(&other, &signature).expect("verifies"));
        assert!(matches!(
            key.verify_digest_or_fail(&other, &signature),
            Err(KeyError::SignatureMismatch)
        ));
    }

    #[test]
    fn public_only_keys_cannot_sign() {
        let key = EcKey::new_random();
        let watching = EcKey::from_public_only_bytes(key.pub_bytes()).expect("valid point");
        let digest = [0x11u8; 32];
        assert!(matches!(
            watching.sign_digest(&digest, None),
            Err(KeyError::MissingPrivateKey)
        ));
        assert!(matches!(watching.priv_bytes(), Err(KeyError::MissingPrivateKey)));
    }

    #[test]
    fn decompress_preserves_identity_and_changes_address() {
        let key = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        let decompressed = key.decompress().expect("on curve");

        assert!(!decompressed.is_compressed());
        assert_eq!(decompressed.pub_bytes().len(), 65);
        assert_eq!(
            decompressed.pub_point().affine().expect("decoded"),
            key.pub_point().affine().expect("decoded")
        );
        assert_ne!(
            key.to_address(&Network::MAINNET),
            decompressed.to_address(&Network::MAINNET)
        );
    }

    #[test]
    fn generator_point_address_matches_reference() {
        let generator = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            .decode_hex()
            .expect("fixture");
        let key = EcKey::from_public_only_bytes(&generator).expect("valid point");
        assert_eq!(
            key.to_address(&Network::MAINNET).to_string(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
    }

    #[test]
    fn wif_roundtrip_and_version_check() {
        let key = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        let wif = key.to_wif(&Network::MAINNET).expect("has private part");
        let restored = EcKey::from_wif(&wif, &Network::MAINNET).expect("roundtrip");
        assert_eq!(restored, key);
        assert!(restored.is_compressed());

        assert!(matches!(
            EcKey::from_wif(&wif, &Network::TESTNET),
            Err(KeyError::WifVersion { expected: 0xEF, actual: 0x80 })
        ));
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let crypter = test_crypter();
        let aes_key = crypter.derive_key("correct horse").expect("derives");

        let mut key = EcKey::new_random();
        key.set_creation_time_secs(1_700_000_000);

        let encrypted = key.encrypt(crypter.clone(), &aes_key).expect("encrypts");
        assert!(encrypted.is_encrypted());
        assert!(encrypted.is_pub_only());
        assert!(!encrypted.is_watching());
        assert_eq!(encrypted.creation_time_secs(), 1_700_000_000);
        assert_eq!(encrypted.pub_bytes(), key.pub_bytes());
        assert!(matches!(encrypted.priv_bytes(), Err(KeyError::KeyIsEncrypted)));

        let decrypted = encrypted.decrypt(crypter.clone(), &aes_key).expect("decrypts");
        assert_eq!(decrypted, key);

        assert!(encryption_is_reversible(&key, &encrypted, crypter, &aes_key));
    }

    #[test]
    fn encrypted_key_signs_transiently() {
        let crypter = test_crypter();
        let aes_key = crypter.derive_key("correct horse").expect("derives");

        let key = EcKey::new_random();
        let encrypted = key.encrypt(crypter, &aes_key).expect("encrypts");

        let digest = [0x22u8; 32];
        assert!(matches!(
            encrypted.sign_digest(&digest, None),
            Err(KeyError::KeyIsEncrypted)
        ));

        let signature = encrypted.sign_digest(&digest, Some(&aes_key)).expect("signs");
        assert!(key.verify_digest(&digest, &signature).expect("verifies"));
    }

    #[test]
    fn wrong_aes_key_is_detected() {
        let crypter = test_crypter();
        let right = crypter.derive_key("correct horse").expect("derives");
        let wrong = crypter.derive_key("battery staple").expect("derives");

        let key = EcKey::new_random();
        let encrypted = key.encrypt(crypter.clone(), &right).expect("encrypts");
        assert!(encrypted.decrypt(crypter.clone(), &wrong).is_err());
        assert!(!encryption_is_reversible(&key, &encrypted, crypter, &wrong));
    }

    #[test]
    fn mismatched_crypter_is_rejected() {
        let crypter = test_crypter();
        let aes_key = crypter.derive_key("correct horse").expect("derives");
        let other: Arc<dyn KeyCrypter> = Arc::new(ScryptAesCrypter::with_params(
            ScryptParams { n: 2, r: 1, p: 1 },
            [2u8; 8],
        ));

        let key = EcKey::new_random();
        let encrypted = key.encrypt(crypter, &aes_key).expect("encrypts");
        assert!(matches!(
            encrypted.decrypt(other, &aes_key),
            Err(KeyError::CrypterMismatch)
        ));
    }

    #[test]
    fn maybe_decrypt_is_identity_without_key_or_encryption() {
        let crypter = test_crypter();
        let aes_key = crypter.derive_key("correct horse").expect("derives");

        let key = EcKey::new_random();
        assert_eq!(key.maybe_decrypt(Some(&aes_key)).expect("identity"), key);

        let encrypted = key.encrypt(crypter, &aes_key).expect("encrypts");
        assert_eq!(encrypted.maybe_decrypt(None).expect("identity"), encrypted);
        assert_eq!(
            encrypted.maybe_decrypt(Some(&aes_key)).expect("decrypts"),
            key
        );
    }

    #[test]
    fn equality_covers_every_component() {
        let key = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        let same = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        assert_eq!(key, same);

        let uncompressed = key.decompress().expect("on curve");
        assert_ne!(key, uncompressed);

        let mut stamped = same.clone();
        stamped.set_creation_time_secs(42);
        assert_ne!(key, stamped);

        let watching = EcKey::from_public_only_bytes(key.pub_bytes()).expect("valid point");
        assert_ne!(key, watching);
    }

    #[test]
    fn age_ordering_breaks_ties_on_pub_bytes() {
        let mut old = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        let mut new = EcKey::from_private_bytes(&scalar_bytes(3), true).expect("valid scalar");
        old.set_creation_time_secs(100);
        new.set_creation_time_secs(200);
        assert_eq!(compare_by_age(&old, &new), Ordering::Less);
        assert_eq!(compare_by_age(&new, &old), Ordering::Greater);

        new.set_creation_time_secs(100);
        assert_eq!(
            compare_by_age(&old, &new),
            old.pub_bytes().cmp(new.pub_bytes())
        );
        assert_eq!(compare_by_age(&old, &old.clone()), Ordering::Equal);
    }

    #[test]
    fn encryptable_item_reports_state() {
        let crypter = test_crypter();
        let aes_key = crypter.derive_key("correct horse").expect("derives");

        let key = EcKey::new_random();
        assert!(key.secret_bytes().is_some());
        assert!(key.encrypted_data().is_none());
        assert_eq!(EncryptableItem::encryption_type(&key), EncryptionType::Unencrypted);

        let encrypted = key.encrypt(crypter, &aes_key).expect("encrypts");
        assert!(encrypted.secret_bytes().is_none());
        assert!(encrypted.encrypted_data().is_some());
        assert_eq!(
            EncryptableItem::encryption_type(&encrypted),
            EncryptionType::ScryptAes
        );
    }

    #[test]
    fn debug_output_never_contains_private_material() {
        let key = EcKey::from_private_bytes(&scalar_bytes(2), true).expect("valid scalar");
        let rendered = format!("{key:?}");
        assert!(rendered.contains(&key.pub_hex()));
        assert!(!rendered.contains(&key.priv_hex().expect("has private part")));
    }
}
