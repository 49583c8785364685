//! Text forms of raw bytes
//!
//! NEAR tooling moves the same bytes around as hex, base58 (hashes and keys)
//! or base64 (signed transactions over RPC). These are transport encodings
//! only; the payload underneath is identical.

use crate::error::Result;
use crate::transaction::{parse_block_hash, BLOCK_HASH_LEN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Hex,
    #[default]
    Base58,
    Base64,
}

impl Encoding {
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base58 => bs58::encode(bytes).into_string(),
            Encoding::Base64 => base64::encode(bytes),
        }
    }

    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        match self {
            Encoding::Hex => {
                let digits = text.strip_prefix("0x").unwrap_or(text);
                Ok(hex::decode(digits)?)
            }
            Encoding::Base58 => Ok(bs58::decode(text).into_vec()?),
            Encoding::Base64 => Ok(base64::decode(text)?),
        }
    }
}

/// Decode a block hash, rejecting anything that is not exactly 32 bytes
pub fn decode_block_hash(text: &str, encoding: Encoding) -> Result<[u8; BLOCK_HASH_LEN]> {
    parse_block_hash(&encoding.decode(text)?)
}
