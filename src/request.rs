//! JSON signing requests
//!
//! Wallet front-ends describe a transaction as JSON: amounts as decimal
//! yoctoNEAR strings, keys as `ed25519:<base58>`, contract code and call
//! arguments as base64. [`SigningRequest`] parses that shape and converts it
//! into a [`SigningInput`].

use crate::action::{AccessKey, AccessKeyPermission, Action};
use crate::amount::Balance;
use crate::encoding::{decode_block_hash, Encoding};
use crate::error::{NearTxError, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::signer::SigningInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRequest {
    pub signer_id: String,
    pub receiver_id: String,
    pub nonce: u64,
    /// Hex seed, or `ed25519:<base58>` as exported by NEAR wallets
    pub private_key: String,
    pub block_hash: String,
    #[serde(default)]
    pub block_hash_encoding: Encoding,
    pub actions: Vec<ActionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionRequest {
    CreateAccount,
    DeployContract {
        code: String,
    },
    FunctionCall {
        method_name: String,
        #[serde(default)]
        args: String,
        gas: u64,
        #[serde(default = "zero_amount")]
        deposit: String,
    },
    Transfer {
        deposit: String,
    },
    Stake {
        stake: String,
        public_key: String,
    },
    AddKey {
        public_key: String,
        #[serde(default)]
        nonce: u64,
        permission: PermissionRequest,
    },
    DeleteKey {
        public_key: String,
    },
    DeleteAccount {
        beneficiary_id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PermissionRequest {
    FullAccess,
    FunctionCall {
        #[serde(default)]
        allowance: Option<String>,
        receiver_id: String,
        #[serde(default)]
        method_names: Vec<String>,
    },
}

fn zero_amount() -> String {
    "0".to_string()
}

fn parse_public_key(text: &str) -> Result<PublicKey> {
    text.parse::<PublicKey>()
        .map_err(|e| NearTxError::InvalidRequest(format!("public key {:?}: {}", text, e)))
}

fn parse_private_key(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let secret = if text.contains(':') {
        text.parse::<SecretKey>()?
    } else {
        SecretKey::from_bytes(&Encoding::Hex.decode(text)?)?
    };
    Ok(secret.to_seed_bytes().to_vec())
}

impl ActionRequest {
    pub fn into_action(self) -> Result<Action> {
        let action = match self {
            ActionRequest::CreateAccount => Action::CreateAccount,
            ActionRequest::DeployContract { code } => Action::DeployContract {
                code: Encoding::Base64.decode(&code)?,
            },
            ActionRequest::FunctionCall {
                method_name,
                args,
                gas,
                deposit,
            } => Action::FunctionCall {
                method_name,
                args: Encoding::Base64.decode(&args)?,
                gas,
                deposit: deposit.parse()?,
            },
            ActionRequest::Transfer { deposit } => Action::Transfer {
                deposit: deposit.parse()?,
            },
            ActionRequest::Stake { stake, public_key } => Action::Stake {
                stake: stake.parse()?,
                public_key: parse_public_key(&public_key)?,
            },
            ActionRequest::AddKey {
                public_key,
                nonce,
                permission,
            } => Action::AddKey {
                public_key: parse_public_key(&public_key)?,
                access_key: AccessKey {
                    nonce,
                    permission: permission.into_permission()?,
                },
            },
            ActionRequest::DeleteKey { public_key } => Action::DeleteKey {
                public_key: parse_public_key(&public_key)?,
            },
            ActionRequest::DeleteAccount { beneficiary_id } => {
                Action::DeleteAccount { beneficiary_id }
            }
        };
        Ok(action)
    }
}

impl PermissionRequest {
    fn into_permission(self) -> Result<AccessKeyPermission> {
        match self {
            PermissionRequest::FullAccess => Ok(AccessKeyPermission::FullAccess),
            PermissionRequest::FunctionCall {
                allowance,
                receiver_id,
                method_names,
            } => Ok(AccessKeyPermission::FunctionCall {
                allowance: allowance.map(|a| a.parse::<Balance>()).transpose()?,
                receiver_id,
                method_names,
            }),
        }
    }
}

impl SigningRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_signing_input(self) -> Result<SigningInput> {
        let private_key = parse_private_key(&self.private_key)?;
        let block_hash = decode_block_hash(&self.block_hash, self.block_hash_encoding)?;
        let actions = self
            .actions
            .into_iter()
            .map(ActionRequest::into_action)
            .collect::<Result<Vec<_>>>()?;

        if actions.is_empty() {
            return Err(NearTxError::EmptyActionList);
        }

        Ok(SigningInput {
            signer_id: self.signer_id,
            nonce: self.nonce,
            receiver_id: self.receiver_id,
            private_key,
            block_hash: block_hash.to_vec(),
            actions,
        })
    }
}
