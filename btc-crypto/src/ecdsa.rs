// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

//! The ECDSA engine over secp256k1: deterministic signing of 32-byte
//! digests, verification, and public-key recovery per SEC1 v2 §4.1.6.

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature as K256Signature, SigningKey};
use k256::elliptic_curve::bigint::{ArrayEncoding, CheckedAdd, U256};
use k256::elliptic_curve::ops::{Invert, LinearCombination, Reduce};
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::{Curve, Group};
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar, Secp256k1, SecretKey};

use crate::point::{EcPoint, PointError};
use crate::signature::{EcdsaSignature, SignatureError};

/// The secp256k1 field prime p = 2^256 - 2^32 - 977. Recovery candidates
/// r + i·n are x coordinates and must stay below it.
const FIELD_PRIME: U256 =
    U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");

/// Interpret a digest as an integer modulo the group order.
fn digest_scalar(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(digest))
}

/// Sign a 32-byte digest. The per-signature nonce is derived
/// deterministically from the key and digest (RFC 6979), so no entropy is
/// consumed here; the emitted signature is in low-s form.
pub fn sign_prehashed(
    secret: &SecretKey,
    digest: &[u8; 32],
) -> Result<EcdsaSignature, SignatureError> {
    let signing_key = SigningKey::from(secret);
    let signature: K256Signature = signing_key
        .sign_prehash(digest)
        .map_err(|_| SignatureError::SigningFailed)?;
    let (r, s) = signature.split_scalars();
    Ok(EcdsaSignature::from_scalars(r, s))
}

/// Verify (r, s) over a 32-byte digest against a public point:
/// w = s⁻¹, u₁ = e·w, u₂ = r·w, accept iff P = u₁·G + u₂·Q is finite with
/// P.x ≡ r (mod n). Both low-s and high-s signatures are accepted.
pub fn verify_prehashed(
    public: &EcPoint,
    digest: &[u8; 32],
    signature: &EcdsaSignature,
) -> Result<bool, PointError> {
    let q = ProjectivePoint::from(public.affine()?);

    let e = digest_scalar(digest);
    let s_inv = *signature.s().invert();
    let u1 = e * s_inv;
    let u2 = *signature.r() * s_inv;

    let p = ProjectivePoint::lincomb(&ProjectivePoint::GENERATOR, &u1, &q, &u2);
    if bool::from(p.is_identity()) {
        return Ok(false);
    }

    let x_mod_n = <Scalar as Reduce<U256>>::reduce_bytes(&p.to_affine().x());
    Ok(x_mod_n == *signature.r())
}

/// Recover the public key that produced (r, s) over `digest`, per SEC1 v2
/// §4.1.6. `rec_id` selects among the up-to-four candidates: bit 0 carries
/// the parity of R.y, bit 1 whether r overflowed the group order. Returns
/// `None` when no key exists for this combination; callers iterate rec_id.
pub fn recover_from_signature(
    rec_id: u8,
    signature: &EcdsaSignature,
    digest: &[u8; 32],
    compressed: bool,
) -> Option<EcPoint> {
    if rec_id > 3 {
        return None;
    }

    // Candidate x = r + i·n, taken back out of the scalar field.
    let mut x = U256::from_be_byte_array(signature.r().to_bytes());
    if rec_id >= 2 {
        x = Option::from(x.checked_add(&Secp256k1::ORDER))?;
    }
    if x >= FIELD_PRIME {
        return None;
    }

    // Rebuild R from x and the parity bit. Decompression only succeeds for
    // points on the curve, and secp256k1 has cofactor 1, so the n·R = O check
    // of the standard is already satisfied by any point produced here.
    let y_is_odd = Choice::from(rec_id & 1);
    let r_point: AffinePoint =
        Option::from(AffinePoint::decompress(&x.to_be_byte_array(), y_is_odd))?;

    // Q = r⁻¹·(s·R − e·G), computed as the sum of two multiplies.
    let e = digest_scalar(digest);
    let r_inv = *signature.r().invert();
    let u1 = -(r_inv * e);
    let u2 = r_inv * *signature.s();

    let q = ProjectivePoint::lincomb(
        &ProjectivePoint::GENERATOR,
        &u1,
        &ProjectivePoint::from(r_point),
        &u2,
    );
    if bool::from(q.is_identity()) {
        return None;
    }

    Some(EcPoint::from_affine(q.to_affine(), compressed))
}
