// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

pub trait ToHex {
    fn to_hex(&self) -> String;

    fn to_hex_upper(&self) -> String;
}

impl<T: AsRef<[u8]>> ToHex for T {
    #[inline]
    fn to_hex(&self) -> String {
        hex::encode(self.as_ref())
    }

    #[inline]
    fn to_hex_upper(&self) -> String {
        hex::encode_upper(self.as_ref())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeHexError {
    #[error("hex: invalid character '{0}'")]
    InvalidChar(char),

    #[error("hex: odd length")]
    OddLength,
}

pub trait DecodeHex {
    fn decode_hex(&self) -> Result<Vec<u8>, DecodeHexError>;
}

impl<T: AsRef<[u8]>> DecodeHex for T {
    fn decode_hex(&self) -> Result<Vec<u8>, DecodeHexError> {
        hex::decode(self.as_ref()).map_err(|err| match err {
            hex::FromHexError::InvalidHexCharacter { c, .. } => DecodeHexError::InvalidChar(c),
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                DecodeHexError::OddLength
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let data = [0x00u8, 0x01, 0xab, 0xff];
        assert_eq!(data.to_hex(), "0001abff");
        assert_eq!(data.to_hex_upper(), "0001ABFF");
        assert_eq!("0001abff".decode_hex().expect("valid hex"), data);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!("0g".decode_hex(), Err(DecodeHexError::InvalidChar('g')));
        assert_eq!("abc".decode_hex(), Err(DecodeHexError::OddLength));
    }
}
