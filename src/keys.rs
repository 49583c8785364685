//! Key and signature types
//!
//! NEAR tags every key and signature with a one-byte curve identifier.
//! Ed25519 is the only curve this crate signs with; secp256k1 keys are still
//! representable because they can appear inside `AddKey`, `DeleteKey` and
//! `Stake` actions.

use crate::error::{NearTxError, Result};
use crate::serialization::{
    decode_u8, encode_bytes, encode_u8, impl_borsh_serialize, take_bytes, ByteDeserialize,
    ByteSerialize,
};
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

pub const ED25519_PUBLIC_KEY_LEN: usize = 32;
pub const ED25519_SECRET_KEY_LEN: usize = 32;
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Curve identifier written in front of keys and signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Ed25519,
    Secp256k1,
}

impl KeyType {
    pub fn as_u8(self) -> u8 {
        match self {
            KeyType::Ed25519 => 0,
            KeyType::Secp256k1 => 1,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(KeyType::Ed25519),
            1 => Ok(KeyType::Secp256k1),
            other => Err(NearTxError::DecodingError(format!(
                "unknown key type {}",
                other
            ))),
        }
    }

    pub fn public_key_len(self) -> usize {
        match self {
            KeyType::Ed25519 => ED25519_PUBLIC_KEY_LEN,
            KeyType::Secp256k1 => 64,
        }
    }

    pub fn signature_len(self) -> usize {
        match self {
            KeyType::Ed25519 => ED25519_SIGNATURE_LEN,
            KeyType::Secp256k1 => 65,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Secp256k1 => "secp256k1",
        }
    }

    fn from_prefix(prefix: &str) -> Result<Self> {
        match prefix {
            "ed25519" => Ok(KeyType::Ed25519),
            "secp256k1" => Ok(KeyType::Secp256k1),
            other => Err(NearTxError::InvalidPublicKey(format!(
                "unknown key prefix {:?}",
                other
            ))),
        }
    }
}

/// Splits `curve:base58` text, defaulting to ed25519 when the prefix is absent
fn split_key_text(s: &str) -> Result<(KeyType, Vec<u8>)> {
    let (key_type, body) = match s.split_once(':') {
        Some((prefix, body)) => (KeyType::from_prefix(prefix)?, body),
        None => (KeyType::Ed25519, s),
    };
    Ok((key_type, bs58::decode(body).into_vec()?))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: Vec<u8>,
}

impl PublicKey {
    pub fn new(key_type: KeyType, data: &[u8]) -> Result<Self> {
        let expected = key_type.public_key_len();
        if data.len() != expected {
            return Err(NearTxError::InvalidKeyLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            key_type,
            data: data.to_vec(),
        })
    }

    pub fn ed25519(data: [u8; ED25519_PUBLIC_KEY_LEN]) -> Self {
        Self {
            key_type: KeyType::Ed25519,
            data: data.to_vec(),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check an Ed25519 signature made by this key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        if self.key_type != KeyType::Ed25519 || signature.key_type != KeyType::Ed25519 {
            return Err(NearTxError::SignatureError(format!(
                "cannot verify {} signature with {} key",
                signature.key_type.prefix(),
                self.key_type.prefix()
            )));
        }

        let key_bytes: [u8; ED25519_PUBLIC_KEY_LEN] = self
            .data
            .as_slice()
            .try_into()
            .map_err(|_| NearTxError::InvalidPublicKey("bad ed25519 key".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)?;
        let sig = ed25519_dalek::Signature::from_slice(&signature.data)?;
        verifying_key.verify(message, &sig)?;
        Ok(())
    }
}

/// Writes the key type byte then the raw key data
pub fn encode_public_key(key: &PublicKey, writer: &mut Vec<u8>) -> Result<()> {
    let expected = key.key_type.public_key_len();
    if key.data.len() != expected {
        return Err(NearTxError::InvalidKeyLength {
            expected,
            actual: key.data.len(),
        });
    }
    encode_u8(key.key_type.as_u8(), writer);
    encode_bytes(&key.data, writer);
    Ok(())
}

pub fn decode_public_key(cursor: &mut Cursor<&[u8]>) -> Result<PublicKey> {
    let key_type = KeyType::from_u8(decode_u8(cursor)?)?;
    let data = take_bytes(cursor, key_type.public_key_len())?;
    PublicKey::new(key_type, data)
}

impl ByteSerialize for PublicKey {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_public_key(self, writer)
    }

    fn byte_size(&self) -> usize {
        1 + self.data.len()
    }
}

impl ByteDeserialize for PublicKey {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        decode_public_key(cursor)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.key_type.prefix(),
            bs58::encode(&self.data).into_string()
        )
    }
}

/// Parses NEAR's `ed25519:<base58>` form
impl FromStr for PublicKey {
    type Err = NearTxError;

    fn from_str(s: &str) -> Result<Self> {
        let (key_type, data) = split_key_text(s)?;
        PublicKey::new(key_type, &data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    key_type: KeyType,
    data: Vec<u8>,
}

impl Signature {
    pub fn new(key_type: KeyType, data: &[u8]) -> Result<Self> {
        let expected = key_type.signature_len();
        if data.len() != expected {
            return Err(NearTxError::InvalidKeyLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            key_type,
            data: data.to_vec(),
        })
    }

    pub fn ed25519(data: [u8; ED25519_SIGNATURE_LEN]) -> Self {
        Self {
            key_type: KeyType::Ed25519,
            data: data.to_vec(),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ByteSerialize for Signature {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_u8(self.key_type.as_u8(), writer);
        encode_bytes(&self.data, writer);
        Ok(())
    }

    fn byte_size(&self) -> usize {
        1 + self.data.len()
    }
}

impl ByteDeserialize for Signature {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let key_type = KeyType::from_u8(decode_u8(cursor)?)?;
        let data = take_bytes(cursor, key_type.signature_len())?;
        Signature::new(key_type, data)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.key_type.prefix(),
            bs58::encode(&self.data).into_string()
        )
    }
}

impl_borsh_serialize!(PublicKey, Signature);

impl borsh::BorshDeserialize for PublicKey {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let key_type = read_key_type(reader)?;
        let mut data = vec![0u8; key_type.public_key_len()];
        reader.read_exact(&mut data)?;
        Ok(Self { key_type, data })
    }
}

impl borsh::BorshDeserialize for Signature {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let key_type = read_key_type(reader)?;
        let mut data = vec![0u8; key_type.signature_len()];
        reader.read_exact(&mut data)?;
        Ok(Self { key_type, data })
    }
}

fn read_key_type<R: std::io::Read>(reader: &mut R) -> std::io::Result<KeyType> {
    let mut tag = [0u8; 1];
    reader.read_exact(&mut tag)?;
    KeyType::from_u8(tag[0])
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
}

/// An Ed25519 signing key
///
/// Holds only the 32-byte seed; the expanded key material is zeroized on drop
/// by `ed25519-dalek`. `Debug` never prints the secret.
#[derive(Clone)]
pub struct SecretKey(SigningKey);

impl SecretKey {
    /// Accepts a 32-byte seed, or NEAR's 64-byte `seed || public key` form
    /// whose tail must match the key derived from the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            ED25519_SECRET_KEY_LEN => {
                let mut seed = [0u8; ED25519_SECRET_KEY_LEN];
                seed.copy_from_slice(bytes);
                Ok(Self(SigningKey::from_bytes(&seed)))
            }
            64 => {
                let key = Self::from_bytes(&bytes[..ED25519_SECRET_KEY_LEN])?;
                if key.0.verifying_key().as_bytes() != &bytes[ED25519_SECRET_KEY_LEN..] {
                    return Err(NearTxError::InvalidPrivateKey(
                        "public half does not match seed".to_string(),
                    ));
                }
                Ok(key)
            }
            other => Err(NearTxError::InvalidKeyLength {
                expected: ED25519_SECRET_KEY_LEN,
                actual: other,
            }),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::ed25519(self.0.verifying_key().to_bytes())
    }

    /// Raw Ed25519 over `message`; no protocol-level hashing happens here
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::ed25519(self.0.sign(message).to_bytes())
    }

    /// The 32-byte seed
    pub fn to_seed_bytes(&self) -> [u8; ED25519_SECRET_KEY_LEN] {
        self.0.to_bytes()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey").field(&"<redacted>").finish()
    }
}

/// Parses `ed25519:<base58>` secret keys as exported by NEAR wallets
impl FromStr for SecretKey {
    type Err = NearTxError;

    fn from_str(s: &str) -> Result<Self> {
        let (key_type, data) = split_key_text(s)
            .map_err(|e| NearTxError::InvalidPrivateKey(e.to_string()))?;
        if key_type != KeyType::Ed25519 {
            return Err(NearTxError::InvalidPrivateKey(format!(
                "{} secret keys are not supported",
                key_type.prefix()
            )));
        }
        SecretKey::from_bytes(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8737b99bf16fba78e1e753e23ba00c4b5423ac9c45d9b9caae9a519434786568";
    const PUBLIC: &str = "917b3d268d4b58f7fec1b150bd68d69be3ee5d4cc39855e341538465bb77860d";

    #[test]
    fn test_public_key_derivation() {
        let secret = SecretKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
        assert_eq!(hex::encode(secret.public_key().data()), PUBLIC);
        assert_eq!(
            secret.public_key().to_string(),
            "ed25519:Anu7LYDfpLtkP7E16LT9imXF694BdQaa9ufVkQiwTQxC"
        );
    }

    #[test]
    fn test_expanded_secret_key() {
        let mut expanded = hex::decode(SECRET).unwrap();
        expanded.extend(hex::decode(PUBLIC).unwrap());
        let secret = SecretKey::from_bytes(&expanded).unwrap();
        assert_eq!(hex::encode(secret.to_seed_bytes()), SECRET);

        let text = format!("ed25519:{}", bs58::encode(&expanded).into_string());
        assert!(text.parse::<SecretKey>().is_ok());

        *expanded.last_mut().unwrap() ^= 1;
        assert!(matches!(
            SecretKey::from_bytes(&expanded),
            Err(NearTxError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_wrong_length_secret() {
        let err = SecretKey::from_bytes(&[1u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            NearTxError::InvalidKeyLength { expected: 32, actual: 31 }
        ));
        assert_eq!(err.kind(), crate::error::ErrorKind::InputValidation);

        let err = SecretKey::from_bytes(&[1u8; 48]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InputValidation);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
        assert!(!format!("{:?}", secret).contains("8737"));
    }

    #[test]
    fn test_public_key_encoding() {
        let key: PublicKey = "ed25519:C2P7YcEmBv31vtCHLBcESteN4Yi4vSCkXEXMTANyB649"
            .parse()
            .unwrap();
        let bytes = key.to_bytes().unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "00a3cb23dbb9810abd4a6804328eec47a17236383b5c234cae903b064e9dc426da"
        );
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), key);
        assert_eq!(borsh::from_slice::<PublicKey>(&bytes).unwrap(), key);
        assert_eq!(borsh::to_vec(&key).unwrap(), bytes);
    }

    #[test]
    fn test_public_key_length_check() {
        let err = PublicKey::new(KeyType::Ed25519, &[0u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            NearTxError::InvalidKeyLength { expected: 32, actual: 31 }
        ));
        assert!("ed448:abc".parse::<PublicKey>().is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let secret = SecretKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
        let signature = secret.sign(b"hello near");
        assert_eq!(signature.data().len(), ED25519_SIGNATURE_LEN);
        assert_eq!(signature.to_bytes().unwrap().len(), 65);

        let public = secret.public_key();
        public.verify(b"hello near", &signature).unwrap();
        assert!(public.verify(b"hello near!", &signature).is_err());
    }
}
