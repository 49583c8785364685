//! Fixed-width 128-bit token amounts
//!
//! Amounts cross the API boundary as 16 little-endian bytes, which is also
//! their wire form. Arithmetic belongs in `u128`; convert with
//! [`Balance::as_u128`] and [`Balance::from_u128`].

use crate::error::{NearTxError, Result};
use crate::serialization::{
    decode_array, encode_bytes, impl_borsh_serialize, pad_u128_le, ByteDeserialize,
    ByteSerialize, U128_LEN,
};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// A yoctoNEAR amount in its little-endian wire representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Balance([u8; U128_LEN]);

impl Balance {
    pub const ZERO: Balance = Balance([0u8; U128_LEN]);

    pub fn from_u128(value: u128) -> Self {
        Self(value.to_le_bytes())
    }

    /// Accept a little-endian byte string of at most 16 bytes, zero-padding
    /// the high-order end
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self(pad_u128_le(bytes)?))
    }

    pub fn as_u128(&self) -> u128 {
        u128::from_le_bytes(self.0)
    }

    pub fn to_le_bytes(&self) -> [u8; U128_LEN] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; U128_LEN]
    }
}

impl From<u128> for Balance {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u128())
    }
}

/// Parses a decimal yoctoNEAR string, the form NEAR JSON-RPC uses for amounts
impl FromStr for Balance {
    type Err = NearTxError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u128>()
            .map(Self::from_u128)
            .map_err(|e| NearTxError::InvalidAmount(format!("{:?}: {}", s, e)))
    }
}

impl ByteSerialize for Balance {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_bytes(&self.0, writer);
        Ok(())
    }

    fn byte_size(&self) -> usize {
        U128_LEN
    }
}

impl ByteDeserialize for Balance {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Self(decode_array(cursor)?))
    }
}

impl_borsh_serialize!(Balance);

impl borsh::BorshDeserialize for Balance {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut bytes = [0u8; U128_LEN];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }
}
