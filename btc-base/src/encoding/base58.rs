// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

use crate::hash::double_sha256;

pub trait ToBase58Check {
    fn to_base58_check(&self) -> String;
}

impl<T: AsRef<[u8]>> ToBase58Check for T {
    fn to_base58_check(&self) -> String {
        let payload = self.as_ref();
        let mut buf = Vec::with_capacity(payload.len() + 4);
        buf.extend_from_slice(payload);

        let check = double_sha256(&buf);
        buf.extend_from_slice(&check[..4]);

        bs58::encode(buf).into_string()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FromBase58CheckError {
    #[error("base58check: invalid character")]
    InvalidChar,

    #[error("base58check: invalid length")]
    InvalidLength,

    #[error("base58check: invalid checksum")]
    InvalidChecksum,
}

pub trait FromBase58Check: Sized {
    type Error;

    fn from_base58_check<T: AsRef<str>>(src: T) -> Result<Self, Self::Error>;
}

impl FromBase58Check for Vec<u8> {
    type Error = FromBase58CheckError;

    fn from_base58_check<T: AsRef<str>>(src: T) -> Result<Vec<u8>, Self::Error> {
        let raw = bs58::decode(src.as_ref())
            .into_vec()
            .map_err(|err| match err {
                bs58::decode::Error::InvalidCharacter { .. }
                | bs58::decode::Error::NonAsciiCharacter { .. } => {
                    FromBase58CheckError::InvalidChar
                }
                _ => FromBase58CheckError::InvalidLength,
            })?;

        if raw.len() < 4 {
            return Err(FromBase58CheckError::InvalidLength);
        }

        let (payload, check) = raw.split_at(raw.len() - 4);
        if double_sha256(payload)[..4] != *check {
            return Err(FromBase58CheckError::InvalidChecksum);
        }

        Ok(payload.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ToHex;

    #[test]
    fn decodes_mainnet_address_payload() {
        let payload = Vec::from_base58_check("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH")
            .expect("valid address");
        assert_eq!(payload.to_hex(), "00751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn roundtrip() {
        let payload = b"base58check payload";
        let encoded = payload.to_base58_check();
        let decoded = Vec::from_base58_check(&encoded).expect("roundtrip");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn rejects_corruption() {
        let mut encoded = b"some payload".to_base58_check();
        // swap two distinct characters to break the checksum
        let replacement = if encoded.ends_with('1') { '2' } else { '1' };
        encoded.pop();
        encoded.push(replacement);
        assert_eq!(
            Vec::from_base58_check(&encoded),
            Err(FromBase58CheckError::InvalidChecksum)
        );

        assert_eq!(
            Vec::from_base58_check("0OIl"),
            Err(FromBase58CheckError::InvalidChar)
        );
        assert_eq!(
            Vec::from_base58_check("11"),
            Err(FromBase58CheckError::InvalidLength)
        );
    }
}
