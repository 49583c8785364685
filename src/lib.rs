//! NearTx - Byte-Exact NEAR Transaction Signer
//!
//! Builds NEAR transactions at the byte level, signs them with Ed25519 and
//! returns the wire-ready payload together with the transaction hash.
//! Signing is pure and stateless: no I/O, no caches, no retained key material.

pub mod serialization;
pub mod amount;
pub mod keys;
pub mod action;
pub mod transaction;
pub mod signer;
pub mod encoding;
pub mod request;
pub mod error;

pub use error::{ErrorKind, NearTxError};
pub use amount::Balance;
pub use keys::{KeyType, PublicKey, SecretKey, Signature};
pub use action::{AccessKey, AccessKeyPermission, Action};
pub use transaction::{SignedTransaction, TransactionBuilder, UnsignedTransaction};
pub use signer::{sign_transaction, SigningInput, SigningOutput};
pub use encoding::Encoding;
pub use request::SigningRequest;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::action::{AccessKey, AccessKeyPermission, Action};
    pub use crate::amount::Balance;
    pub use crate::encoding::Encoding;
    pub use crate::error::{ErrorKind, NearTxError};
    pub use crate::keys::{PublicKey, SecretKey};
    pub use crate::request::SigningRequest;
    pub use crate::serialization::{ByteDeserialize, ByteSerialize};
    pub use crate::signer::{sign_transaction, SigningInput, SigningOutput};
    pub use crate::transaction::{SignedTransaction, TransactionBuilder, UnsignedTransaction};
}
