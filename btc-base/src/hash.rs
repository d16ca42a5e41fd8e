use sha2::{Digest, Sha256};

/// Compute a single round of SHA-256 over the provided bytes.
#[inline]
pub fn sha256<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(data.as_ref());
    h.finalize().into()
}

/// Compute two rounds of SHA-256, the digest Bitcoin signs and checksums with.
#[inline]
pub fn double_sha256<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    sha256(sha256(data))
}

/// Compute RIPEMD-160.
#[inline]
pub fn ripemd160<T: AsRef<[u8]>>(data: T) -> [u8; 20] {
    let mut h = ripemd::Ripemd160::new();
    h.update(data.as_ref());
    h.finalize().into()
}

/// Compute RIPEMD-160(SHA-256(data)), the form public keys take in addresses.
#[inline]
pub fn hash160<T: AsRef<[u8]>>(data: T) -> [u8; 20] {
    ripemd160(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{DecodeHex, ToHex};

    #[test]
    fn sha256_vector() {
        assert_eq!(
            sha256(b"hello").to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn double_sha256_vector() {
        assert_eq!(
            double_sha256(b"hello").to_hex(),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }

    #[test]
    fn ripemd160_vector() {
        assert_eq!(
            ripemd160(b"").to_hex(),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn hash160_of_generator_point() {
        let generator = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            .decode_hex()
            .expect("fixture");
        assert_eq!(
            hash160(generator).to_hex(),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }
}
