//! Error types for NearTx

use thiserror::Error;

/// Broad failure category, so callers can tell bad input from an encoder bug
/// from a cryptographic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed; fix the input and retry.
    InputValidation,
    /// Bytes could not be produced or parsed in the wire format.
    Encoding,
    /// Key material or signature handling failed.
    Crypto,
}

#[derive(Error, Debug)]
pub enum NearTxError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        expected: usize,
        actual: usize,
    },

    #[error("Invalid block hash: expected 32 bytes, got {0}")]
    InvalidBlockHash(usize),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Transaction has no actions")]
    EmptyActionList,

    #[error("Missing transaction field: {0}")]
    MissingField(&'static str),

    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid signing request: {0}")]
    InvalidRequest(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Buffer too small: needed {needed} bytes, got {available}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
    },

    #[error("Signature error: {0}")]
    SignatureError(String),

    #[error("Derived public key {derived} does not match transaction key {embedded}")]
    PublicKeyMismatch {
        derived: String,
        embedded: String,
    },
}

impl NearTxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NearTxError::InvalidPublicKey(_)
            | NearTxError::InvalidKeyLength { .. }
            | NearTxError::InvalidBlockHash(_)
            | NearTxError::InvalidAmount(_)
            | NearTxError::EmptyActionList
            | NearTxError::MissingField(_)
            | NearTxError::InvalidEncoding(_)
            | NearTxError::InvalidRequest(_) => ErrorKind::InputValidation,
            NearTxError::EncodingError(_)
            | NearTxError::DecodingError(_)
            | NearTxError::BufferTooSmall { .. } => ErrorKind::Encoding,
            NearTxError::InvalidPrivateKey(_)
            | NearTxError::SignatureError(_)
            | NearTxError::PublicKeyMismatch { .. } => ErrorKind::Crypto,
        }
    }
}

impl From<bs58::decode::Error> for NearTxError {
    fn from(err: bs58::decode::Error) -> Self {
        NearTxError::InvalidEncoding(format!("base58: {}", err))
    }
}

impl From<base64::DecodeError> for NearTxError {
    fn from(err: base64::DecodeError) -> Self {
        NearTxError::InvalidEncoding(format!("base64: {}", err))
    }
}

impl From<hex::FromHexError> for NearTxError {
    fn from(err: hex::FromHexError) -> Self {
        NearTxError::InvalidEncoding(format!("hex: {}", err))
    }
}

impl From<ed25519_dalek::SignatureError> for NearTxError {
    fn from(err: ed25519_dalek::SignatureError) -> Self {
        NearTxError::SignatureError(err.to_string())
    }
}

impl From<serde_json::Error> for NearTxError {
    fn from(err: serde_json::Error) -> Self {
        NearTxError::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NearTxError>;
