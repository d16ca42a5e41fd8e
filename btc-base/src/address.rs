// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

use std::fmt;
use std::str::FromStr;

use crate::encoding::{FromBase58Check, ToBase58Check};

pub const HASH160_SIZE: usize = 20;

/// A legacy pay-to-pubkey-hash address: a network version byte over the
/// RIPEMD-160(SHA-256(pubkey)) digest, rendered in Base58Check.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    version: u8,
    hash160: [u8; HASH160_SIZE],
}

impl Address {
    #[inline]
    pub fn new(version: u8, hash160: [u8; HASH160_SIZE]) -> Self {
        Self { version, hash160 }
    }

    #[inline]
    pub fn version(&self) -> u8 {
        self.version
    }

    #[inline]
    pub fn hash160(&self) -> &[u8; HASH160_SIZE] {
        &self.hash160
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = [0u8; 1 + HASH160_SIZE];
        payload[0] = self.version;
        payload[1..].copy_from_slice(&self.hash160);
        f.write_str(&payload.to_base58_check())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address: invalid base58check encoding")]
    InvalidBase58Check,

    #[error("address: invalid payload length {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload =
            Vec::from_base58_check(s).map_err(|_| AddressParseError::InvalidBase58Check)?;
        if payload.len() != 1 + HASH160_SIZE {
            return Err(AddressParseError::InvalidLength(payload.len()));
        }

        let mut hash160 = [0u8; HASH160_SIZE];
        hash160.copy_from_slice(&payload[1..]);
        Ok(Address { version: payload[0], hash160 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::DecodeHex;

    fn generator_hash160() -> [u8; HASH160_SIZE] {
        let bytes = "751e76e8199196d454941c45d1b3a323f1433bd6"
            .decode_hex()
            .expect("fixture");
        let mut hash = [0u8; HASH160_SIZE];
        hash.copy_from_slice(&bytes);
        hash
    }

    #[test]
    fn renders_mainnet_address() {
        let address = Address::new(0x00, generator_hash160());
        assert_eq!(address.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn parse_roundtrip() {
        let address = Address::new(0x6F, generator_hash160());
        let parsed: Address = address.to_string().parse().expect("roundtrip");
        assert_eq!(parsed, address);
        assert_eq!(parsed.version(), 0x6F);
    }

    #[test]
    fn rejects_wrong_payload_length() {
        let encoded = [0u8; 10].to_base58_check();
        assert_eq!(
            encoded.parse::<Address>(),
            Err(AddressParseError::InvalidLength(10))
        );
    }
}
