// Copyright @ 2025 - present, R3E Network
// All Rights Reserved

/// Parameters of a Bitcoin-compatible network that affect how keys and
/// signed messages are rendered: the version bytes for addresses and dumped
/// private keys, and the magic string framed into text-message signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    pub name: &'static str,
    pub address_version: u8,
    pub wif_version: u8,
    pub signed_message_magic: &'static str,
}

const BITCOIN_SIGNED_MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

impl Network {
    pub const MAINNET: Network = Network {
        name: "mainnet",
        address_version: 0x00,
        wif_version: 0x80,
        signed_message_magic: BITCOIN_SIGNED_MESSAGE_MAGIC,
    };

    pub const TESTNET: Network = Network {
        name: "testnet",
        address_version: 0x6F,
        wif_version: 0xEF,
        signed_message_magic: BITCOIN_SIGNED_MESSAGE_MAGIC,
    };

    pub const REGTEST: Network = Network {
        name: "regtest",
        address_version: 0x6F,
        wif_version: 0xEF,
        signed_message_magic: BITCOIN_SIGNED_MESSAGE_MAGIC,
    };
}
