// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

use crate::encoding::{FromBase58Check, ToBase58Check};

/// A decoded wallet-import-format private key: the network version byte, the
/// raw key bytes and whether the corresponding public key is compressed
/// (marked by a trailing 0x01 in the encoding).
#[derive(Debug, Clone)]
pub struct Wif {
    version: u8,
    compressed: bool,
    data: Vec<u8>,
}

impl Wif {
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

pub trait WifEncode {
    fn wif_encode(&self, version: u8, compressed: bool) -> String;
}

impl<T: AsRef<[u8]>> WifEncode for T {
    fn wif_encode(&self, version: u8, compressed: bool) -> String {
        let data = self.as_ref();
        let mut buf = Vec::with_capacity(1 + data.len() + 1);

        buf.push(version);
        buf.extend_from_slice(data);
        if compressed {
            buf.push(0x01);
        }

        buf.to_base58_check()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WifDecodeError {
    #[error("wif: invalid base58check encoding")]
    InvalidBase58Check,

    #[error("wif: invalid length {0}")]
    InvalidLength(usize),

    #[error("wif: invalid compression marker {0:#04x}")]
    InvalidCompressionMarker(u8),
}

pub trait WifDecode {
    type Error;

    fn wif_decode(&self, expected_data_len: usize) -> Result<Wif, Self::Error>;
}

impl<T: AsRef<str>> WifDecode for T {
    type Error = WifDecodeError;

    fn wif_decode(&self, expected_data_len: usize) -> Result<Wif, Self::Error> {
        let payload = Vec::from_base58_check(self.as_ref())
            .map_err(|_| WifDecodeError::InvalidBase58Check)?;

        let len = payload.len();
        if len != expected_data_len + 1 && len != expected_data_len + 2 {
            return Err(WifDecodeError::InvalidLength(len));
        }

        let compressed = len == expected_data_len + 2;
        if compressed {
            let marker = payload[len - 1];
            if marker != 0x01 {
                return Err(WifDecodeError::InvalidCompressionMarker(marker));
            }
        }

        let data_end = if compressed { len - 1 } else { len };
        Ok(Wif {
            version: payload[0],
            compressed,
            data: payload[1..data_end].to_vec(),
        })
    }
}
