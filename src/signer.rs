//! Signing pipeline
//!
//! `SigningInput -> unsigned bytes -> signature -> signed bytes -> SigningOutput`.
//! Each stage consumes the previous stage's output and any failure aborts the
//! whole call; nothing partial is returned.
//!
//! NEAR signs the SHA-256 digest of the unsigned transaction bytes, and that
//! same digest is the transaction hash reported to callers.

use crate::action::Action;
use crate::encoding::Encoding;
use crate::error::{NearTxError, Result};
use crate::keys::{PublicKey, SecretKey, Signature};
use crate::serialization::{ByteDeserialize, ByteSerialize};
use crate::transaction::{SignedTransaction, UnsignedTransaction};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, instrument};

/// Everything needed to produce one signed transaction
#[derive(Clone, PartialEq, Eq)]
pub struct SigningInput {
    pub signer_id: String,
    pub nonce: u64,
    pub receiver_id: String,
    /// 32-byte Ed25519 seed (or NEAR's 64-byte `seed || public key` form)
    pub private_key: Vec<u8>,
    /// 32-byte hash of a recent block
    pub block_hash: Vec<u8>,
    pub actions: Vec<Action>,
}

impl fmt::Debug for SigningInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningInput")
            .field("signer_id", &self.signer_id)
            .field("nonce", &self.nonce)
            .field("receiver_id", &self.receiver_id)
            .field("private_key", &"<redacted>")
            .field("block_hash", &hex::encode(&self.block_hash))
            .field("actions", &self.actions)
            .finish()
    }
}

impl SigningInput {
    pub fn sign(&self) -> Result<SigningOutput> {
        sign_transaction(self)
    }
}

/// The wire-ready payload and its tracking hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    pub signed_transaction: Vec<u8>,
    pub hash: [u8; 32],
}

impl SigningOutput {
    /// Base64 form accepted by NEAR's `broadcast_tx_*` RPC methods
    pub fn signed_transaction_base64(&self) -> String {
        Encoding::Base64.encode(&self.signed_transaction)
    }

    pub fn signed_transaction_hex(&self) -> String {
        Encoding::Hex.encode(&self.signed_transaction)
    }

    pub fn hash_hex(&self) -> String {
        Encoding::Hex.encode(&self.hash)
    }

    /// The form explorers and RPC responses use for transaction hashes
    pub fn hash_base58(&self) -> String {
        Encoding::Base58.encode(&self.hash)
    }

    /// Decode the payload back into its structured form
    pub fn decode(&self) -> Result<SignedTransaction> {
        SignedTransaction::from_bytes(&self.signed_transaction)
    }
}

/// Sign serialized unsigned transaction bytes.
///
/// Callers pass the raw bytes; hashing to the 32-byte digest NEAR signs over
/// happens here. Returns the signature and the public key it verifies under.
pub fn sign(unsigned_bytes: &[u8], private_key: &[u8]) -> Result<(Signature, PublicKey)> {
    let secret = SecretKey::from_bytes(private_key)?;
    let digest = Sha256::digest(unsigned_bytes);
    Ok((secret.sign(&digest), secret.public_key()))
}

/// Append the signature to the unsigned bytes without touching the body
pub fn build_signed(unsigned_bytes: &[u8], signature: &Signature) -> Result<Vec<u8>> {
    let mut signed = Vec::with_capacity(unsigned_bytes.len() + signature.byte_size());
    signed.extend_from_slice(unsigned_bytes);
    signature.serialize_bytes(&mut signed)?;
    Ok(signed)
}

/// Package the signed payload with the transaction hash
pub fn finalize(unsigned_bytes: &[u8], signed_bytes: Vec<u8>) -> SigningOutput {
    SigningOutput {
        signed_transaction: signed_bytes,
        hash: Sha256::digest(unsigned_bytes).into(),
    }
}

/// Run the full pipeline for one request
#[instrument(
    level = "debug",
    skip(input),
    fields(signer = %input.signer_id, receiver = %input.receiver_id, nonce = input.nonce)
)]
pub fn sign_transaction(input: &SigningInput) -> Result<SigningOutput> {
    let transaction = UnsignedTransaction::from_input(input)?;
    let unsigned_bytes = transaction.to_bytes()?;
    debug!(
        len = unsigned_bytes.len(),
        actions = transaction.actions.len(),
        "assembled unsigned transaction"
    );

    let (signature, derived_key) = sign(&unsigned_bytes, &input.private_key)?;
    if derived_key != transaction.public_key {
        return Err(NearTxError::PublicKeyMismatch {
            derived: derived_key.to_string(),
            embedded: transaction.public_key.to_string(),
        });
    }

    let signed_bytes = build_signed(&unsigned_bytes, &signature)?;
    debug!(len = signed_bytes.len(), "signed transaction");

    let output = finalize(&unsigned_bytes, signed_bytes);
    debug!(hash = %output.hash_base58(), "finalized transaction");
    Ok(output)
}
