//! Low-level byte serialization utilities for NEAR transactions
//!
//! NEAR encodes transactions with a borsh-compatible layout: fixed-width
//! little-endian integers, `u32` length prefixes for strings, byte vectors and
//! sequences, and a single discriminant byte in front of each enum variant.
//! Nothing is self-describing; every width is implied by the schema position.

use crate::error::{NearTxError, Result};
use std::io::Cursor;

/// Width of an encoded `u128` amount.
pub const U128_LEN: usize = 16;

/// Trait for types that can be serialized at the byte level
pub trait ByteSerialize {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()>;
    fn byte_size(&self) -> usize;

    /// Serialize into a freshly allocated buffer
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.byte_size());
        self.serialize_bytes(&mut bytes)?;
        Ok(bytes)
    }
}

/// Trait for types that can be deserialized from bytes
pub trait ByteDeserialize: Sized {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self>;

    /// Decode a value that must span the whole slice
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let value = Self::deserialize_bytes(&mut cursor)?;
        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(NearTxError::DecodingError(format!(
                "{} trailing bytes after value",
                bytes.len() - consumed
            )));
        }
        Ok(value)
    }
}

/// Encode a u8
pub fn encode_u8(value: u8, writer: &mut Vec<u8>) {
    writer.push(value);
}

/// Encode a u32 in little-endian format
pub fn encode_u32(value: u32, writer: &mut Vec<u8>) {
    writer.extend_from_slice(&value.to_le_bytes());
}

/// Encode a u64 in little-endian format
pub fn encode_u64(value: u64, writer: &mut Vec<u8>) {
    writer.extend_from_slice(&value.to_le_bytes());
}

/// Encode a u128 in little-endian format (always 16 bytes)
pub fn encode_u128(value: u128, writer: &mut Vec<u8>) {
    writer.extend_from_slice(&value.to_le_bytes());
}

/// Widen an already little-endian amount to exactly 16 bytes.
///
/// Upstream big-number code often hands over the minimal little-endian form,
/// so shorter input is zero-padded on the high-order end.
pub fn pad_u128_le(bytes: &[u8]) -> Result<[u8; U128_LEN]> {
    if bytes.len() > U128_LEN {
        return Err(NearTxError::InvalidAmount(format!(
            "{} bytes does not fit in a u128",
            bytes.len()
        )));
    }
    let mut padded = [0u8; U128_LEN];
    padded[..bytes.len()].copy_from_slice(bytes);
    Ok(padded)
}

/// Encode a little-endian amount given as raw bytes, zero-padding to 16 bytes
pub fn encode_u128_le_bytes(bytes: &[u8], writer: &mut Vec<u8>) -> Result<()> {
    writer.extend_from_slice(&pad_u128_le(bytes)?);
    Ok(())
}

fn encode_len(len: usize, writer: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| {
        NearTxError::EncodingError(format!("length {} exceeds u32 prefix", len))
    })?;
    encode_u32(len, writer);
    Ok(())
}

/// Encode raw bytes with no length prefix (hashes, keys, signatures)
pub fn encode_bytes(data: &[u8], writer: &mut Vec<u8>) {
    writer.extend_from_slice(data);
}

/// Encode a byte vector with a u32 length prefix
pub fn encode_length_prefixed(data: &[u8], writer: &mut Vec<u8>) -> Result<()> {
    encode_len(data.len(), writer)?;
    writer.extend_from_slice(data);
    Ok(())
}

/// Encode a string as u32 length followed by its UTF-8 bytes
pub fn encode_string(value: &str, writer: &mut Vec<u8>) -> Result<()> {
    encode_length_prefixed(value.as_bytes(), writer)
}

/// Encode bytes that must be UTF-8 as a string
///
/// For callers holding raw bytes rather than `&str`, such as account ids read
/// off the wire. Typed paths go through [`encode_string`].
pub fn encode_utf8(data: &[u8], writer: &mut Vec<u8>) -> Result<()> {
    let value = std::str::from_utf8(data)
        .map_err(|e| NearTxError::EncodingError(format!("invalid UTF-8: {}", e)))?;
    encode_string(value, writer)
}

/// Encode a sequence as u32 count followed by each element
pub fn encode_sequence<T, F>(items: &[T], writer: &mut Vec<u8>, mut encode_item: F) -> Result<()>
where
    F: FnMut(&T, &mut Vec<u8>) -> Result<()>,
{
    encode_len(items.len(), writer)?;
    for item in items {
        encode_item(item, writer)?;
    }
    Ok(())
}

/// Encode an optional value as a 0/1 flag byte followed by the value
pub fn encode_option<T, F>(value: Option<&T>, writer: &mut Vec<u8>, encode_value: F) -> Result<()>
where
    F: FnOnce(&T, &mut Vec<u8>) -> Result<()>,
{
    match value {
        None => {
            encode_u8(0, writer);
            Ok(())
        }
        Some(value) => {
            encode_u8(1, writer);
            encode_value(value, writer)
        }
    }
}

/// Byte size of a length-prefixed field
pub fn length_prefixed_size(len: usize) -> usize {
    4 + len
}

/// Borrow the next `len` bytes and advance the cursor
pub fn take_bytes<'a>(cursor: &mut Cursor<&'a [u8]>, len: usize) -> Result<&'a [u8]> {
    let position = cursor.position() as usize;
    let data: &'a [u8] = *cursor.get_ref();
    let end = position.checked_add(len).ok_or(NearTxError::BufferTooSmall {
        needed: usize::MAX,
        available: data.len(),
    })?;

    if end > data.len() {
        return Err(NearTxError::BufferTooSmall {
            needed: end,
            available: data.len(),
        });
    }

    cursor.set_position(end as u64);
    Ok(&data[position..end])
}

/// Decode a fixed-size byte array
pub fn decode_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(take_bytes(cursor, N)?);
    Ok(out)
}

/// Decode a u8
pub fn decode_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8> {
    Ok(decode_array::<1>(cursor)?[0])
}

/// Decode a u32 in little-endian format
pub fn decode_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    Ok(u32::from_le_bytes(decode_array(cursor)?))
}

/// Decode a u64 in little-endian format
pub fn decode_u64(cursor: &mut Cursor<&[u8]>) -> Result<u64> {
    Ok(u64::from_le_bytes(decode_array(cursor)?))
}

/// Decode a u128 in little-endian format
pub fn decode_u128(cursor: &mut Cursor<&[u8]>) -> Result<u128> {
    Ok(u128::from_le_bytes(decode_array(cursor)?))
}

/// Decode a u32-length-prefixed byte vector
pub fn decode_length_prefixed(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>> {
    let len = decode_u32(cursor)? as usize;
    Ok(take_bytes(cursor, len)?.to_vec())
}

/// Decode a u32-length-prefixed UTF-8 string
pub fn decode_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let bytes = decode_length_prefixed(cursor)?;
    String::from_utf8(bytes)
        .map_err(|e| NearTxError::DecodingError(format!("invalid UTF-8 string: {}", e)))
}

/// Decode a u32-count-prefixed sequence
pub fn decode_sequence<T, F>(cursor: &mut Cursor<&[u8]>, mut decode_item: F) -> Result<Vec<T>>
where
    F: FnMut(&mut Cursor<&[u8]>) -> Result<T>,
{
    let count = decode_u32(cursor)? as usize;
    let remaining = cursor.get_ref().len().saturating_sub(cursor.position() as usize);
    let mut items = Vec::with_capacity(count.min(remaining));
    for _ in 0..count {
        items.push(decode_item(cursor)?);
    }
    Ok(items)
}

/// Decode a 0/1-flagged optional value
pub fn decode_option<T, F>(cursor: &mut Cursor<&[u8]>, decode_value: F) -> Result<Option<T>>
where
    F: FnOnce(&mut Cursor<&[u8]>) -> Result<T>,
{
    match decode_u8(cursor)? {
        0 => Ok(None),
        1 => Ok(Some(decode_value(cursor)?)),
        flag => Err(NearTxError::DecodingError(format!(
            "invalid option flag {}",
            flag
        ))),
    }
}

/// Implements `borsh::BorshSerialize` on top of [`ByteSerialize`], so crate
/// types can be nested inside borsh-derived structs from other NEAR tooling.
macro_rules! impl_borsh_serialize {
    ($($ty:ty),+ $(,)?) => {$(
        impl borsh::BorshSerialize for $ty {
            fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
                let bytes = $crate::serialization::ByteSerialize::to_bytes(self).map_err(|e| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?;
                writer.write_all(&bytes)
            }
        }
    )+};
}

pub(crate) use impl_borsh_serialize;
