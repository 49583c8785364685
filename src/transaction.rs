//! Transaction assembly with byte-level control
//!
//! The unsigned transaction is serialized exactly once. Those bytes are what
//! gets signed, and the signed transaction is those same bytes with the
//! signature appended, so the body can never drift from what was signed.

use crate::action::{decode_action, encode_action, Action};
use crate::error::{NearTxError, Result};
use crate::keys::{decode_public_key, encode_public_key, PublicKey, SecretKey, Signature};
use crate::serialization::{
    decode_array, decode_sequence, decode_string, decode_u64, encode_bytes, encode_sequence,
    encode_string, encode_u64, impl_borsh_serialize, length_prefixed_size, ByteDeserialize,
    ByteSerialize,
};
use crate::signer::SigningInput;
use sha2::{Digest, Sha256};
use std::io::Cursor;

pub const BLOCK_HASH_LEN: usize = 32;

/// Check that a block reference is exactly 32 bytes
pub fn parse_block_hash(bytes: &[u8]) -> Result<[u8; BLOCK_HASH_LEN]> {
    bytes
        .try_into()
        .map_err(|_| NearTxError::InvalidBlockHash(bytes.len()))
}

/// The transaction body that gets signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub signer_id: String,
    pub public_key: PublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; BLOCK_HASH_LEN],
    pub actions: Vec<Action>,
}

impl UnsignedTransaction {
    /// Build the transaction described by a signing request, deriving the
    /// signer's public key from its private key
    pub fn from_input(input: &SigningInput) -> Result<Self> {
        let secret = SecretKey::from_bytes(&input.private_key)?;
        TransactionBuilder::new()
            .signer_id(input.signer_id.clone())
            .public_key(secret.public_key())
            .nonce(input.nonce)
            .receiver_id(input.receiver_id.clone())
            .block_hash(&input.block_hash)
            .add_actions(input.actions.clone())
            .build()
    }

    /// SHA-256 of the serialized body; NEAR uses this as the transaction id
    pub fn hash(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.to_bytes()?).into())
    }
}

impl ByteSerialize for UnsignedTransaction {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_string(&self.signer_id, writer)?;
        encode_public_key(&self.public_key, writer)?;
        encode_u64(self.nonce, writer);
        encode_string(&self.receiver_id, writer)?;
        encode_bytes(&self.block_hash, writer);
        encode_sequence(&self.actions, writer, encode_action)?;
        Ok(())
    }

    fn byte_size(&self) -> usize {
        length_prefixed_size(self.signer_id.len())
            + self.public_key.byte_size()
            + 8
            + length_prefixed_size(self.receiver_id.len())
            + BLOCK_HASH_LEN
            + 4
            + self.actions.iter().map(|a| a.byte_size()).sum::<usize>()
    }
}

impl ByteDeserialize for UnsignedTransaction {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Self {
            signer_id: decode_string(cursor)?,
            public_key: decode_public_key(cursor)?,
            nonce: decode_u64(cursor)?,
            receiver_id: decode_string(cursor)?,
            block_hash: decode_array(cursor)?,
            actions: decode_sequence(cursor, decode_action)?,
        })
    }
}

/// Serialize the unsigned transaction for a signing request
pub fn build_unsigned(input: &SigningInput) -> Result<Vec<u8>> {
    UnsignedTransaction::from_input(input)?.to_bytes()
}

/// An unsigned transaction followed by its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub signature: Signature,
}

impl SignedTransaction {
    /// Re-serialize the body, then check the signature against the embedded
    /// public key using NEAR's signing rule
    pub fn verify(&self) -> Result<()> {
        let hash = self.transaction.hash()?;
        self.transaction.public_key.verify(&hash, &self.signature)
    }

    pub fn hash(&self) -> Result<[u8; 32]> {
        self.transaction.hash()
    }
}

impl ByteSerialize for SignedTransaction {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        self.transaction.serialize_bytes(writer)?;
        self.signature.serialize_bytes(writer)
    }

    fn byte_size(&self) -> usize {
        self.transaction.byte_size() + self.signature.byte_size()
    }
}

impl ByteDeserialize for SignedTransaction {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Self {
            transaction: UnsignedTransaction::deserialize_bytes(cursor)?,
            signature: Signature::deserialize_bytes(cursor)?,
        })
    }
}

impl_borsh_serialize!(UnsignedTransaction, SignedTransaction);

/// Transaction builder with fluent API
pub struct TransactionBuilder {
    signer_id: Option<String>,
    public_key: Option<PublicKey>,
    nonce: Option<u64>,
    receiver_id: Option<String>,
    block_hash: Option<Vec<u8>>,
    actions: Vec<Action>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            signer_id: None,
            public_key: None,
            nonce: None,
            receiver_id: None,
            block_hash: None,
            actions: Vec::new(),
        }
    }

    /// Set the signing account
    pub fn signer_id(mut self, signer_id: impl Into<String>) -> Self {
        self.signer_id = Some(signer_id.into());
        self
    }

    /// Set the access key the transaction is signed with
    pub fn public_key(mut self, public_key: PublicKey) -> Self {
        self.public_key = Some(public_key);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn receiver_id(mut self, receiver_id: impl Into<String>) -> Self {
        self.receiver_id = Some(receiver_id.into());
        self
    }

    /// Set the recent block hash; length is checked at build time
    pub fn block_hash(mut self, block_hash: &[u8]) -> Self {
        self.block_hash = Some(block_hash.to_vec());
        self
    }

    /// Add an action
    pub fn add_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add multiple actions
    pub fn add_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn build(self) -> Result<UnsignedTransaction> {
        let signer_id = self.signer_id.ok_or(NearTxError::MissingField("signer_id"))?;
        let public_key = self.public_key.ok_or(NearTxError::MissingField("public_key"))?;
        let nonce = self.nonce.ok_or(NearTxError::MissingField("nonce"))?;
        let receiver_id = self.receiver_id.ok_or(NearTxError::MissingField("receiver_id"))?;
        let block_hash = self.block_hash.ok_or(NearTxError::MissingField("block_hash"))?;
        let block_hash = parse_block_hash(&block_hash)?;

        if self.actions.is_empty() {
            return Err(NearTxError::EmptyActionList);
        }

        Ok(UnsignedTransaction {
            signer_id,
            public_key,
            nonce,
            receiver_id,
            block_hash,
            actions: self.actions,
        })
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_HASH: &str = "0fa473fd26901df296be6adc4cc4df34d040efa2435224b6986910e630c2fef6";
    const UNSIGNED_TRANSFER: &str = "09000000746573742e6e65617200917b3d268d4b58f7fec1b150bd68d69be3ee5d4cc39855e341538465bb77860d01000000000000000d00000077686174657665722e6e6561720fa473fd26901df296be6adc4cc4df34d040efa2435224b6986910e630c2fef6010000000301000000000000000000000000000000";

    fn signer_key() -> PublicKey {
        "ed25519:Anu7LYDfpLtkP7E16LT9imXF694BdQaa9ufVkQiwTQxC".parse().unwrap()
    }

    fn transfer_builder() -> TransactionBuilder {
        TransactionBuilder::new()
            .signer_id("test.near")
            .public_key(signer_key())
            .nonce(1)
            .receiver_id("whatever.near")
            .block_hash(&hex::decode(BLOCK_HASH).unwrap())
    }

    #[test]
    fn test_unsigned_transfer_layout() {
        let tx = transfer_builder().add_action(Action::transfer(1u128)).build().unwrap();
        let bytes = tx.to_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), UNSIGNED_TRANSFER);
        assert_eq!(bytes.len(), tx.byte_size());
        assert_eq!(
            hex::encode(tx.hash().unwrap()),
            "eea6e680f3ea51a7f667e9a801d0bfadf66e03d41ed54975b3c6006351461b32"
        );
    }

    #[test]
    fn test_unsigned_round_trip() {
        let tx = transfer_builder()
            .add_action(Action::transfer(1u128))
            .add_action(Action::CreateAccount)
            .build()
            .unwrap();
        let decoded = UnsignedTransaction::from_bytes(&tx.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(borsh::to_vec(&tx).unwrap(), tx.to_bytes().unwrap());
    }

    #[test]
    fn test_empty_action_list() {
        let err = transfer_builder().build().unwrap_err();
        assert!(matches!(err, NearTxError::EmptyActionList));
    }

    #[test]
    fn test_block_hash_must_be_32_bytes() {
        let err = transfer_builder()
            .block_hash(&[0u8; 33])
            .add_action(Action::transfer(1u128))
            .build()
            .unwrap_err();
        assert!(matches!(err, NearTxError::InvalidBlockHash(33)));
    }

    #[test]
    fn test_missing_field() {
        let err = TransactionBuilder::new()
            .add_action(Action::transfer(1u128))
            .build()
            .unwrap_err();
        assert!(matches!(err, NearTxError::MissingField("signer_id")));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = hex::decode(UNSIGNED_TRANSFER).unwrap();
        bytes.push(0);
        assert!(UnsignedTransaction::from_bytes(&bytes).is_err());
    }
}
