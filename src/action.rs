//! Transaction actions
//!
//! An action is a tagged union. On the wire each action is one discriminant
//! byte followed by the variant's payload. Discriminants are protocol
//! constants from [`discriminant`]; reordering the enum must never change them.

use crate::amount::Balance;
use crate::error::{NearTxError, Result};
use crate::keys::{decode_public_key, encode_public_key, PublicKey};
use crate::serialization::{
    decode_length_prefixed, decode_option, decode_sequence, decode_string, decode_u64,
    decode_u8, encode_length_prefixed, encode_option, encode_sequence, encode_string,
    encode_u64, encode_u8, impl_borsh_serialize, length_prefixed_size, ByteDeserialize,
    ByteSerialize,
};
use std::io::Cursor;

/// Wire discriminants of [`Action`] variants
pub mod discriminant {
    pub const CREATE_ACCOUNT: u8 = 0;
    pub const DEPLOY_CONTRACT: u8 = 1;
    pub const FUNCTION_CALL: u8 = 2;
    pub const TRANSFER: u8 = 3;
    pub const STAKE: u8 = 4;
    pub const ADD_KEY: u8 = 5;
    pub const DELETE_KEY: u8 = 6;
    pub const DELETE_ACCOUNT: u8 = 7;

    /// Access key permission tags
    pub const PERMISSION_FUNCTION_CALL: u8 = 0;
    pub const PERMISSION_FULL_ACCESS: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateAccount,
    DeployContract {
        code: Vec<u8>,
    },
    FunctionCall {
        method_name: String,
        args: Vec<u8>,
        gas: u64,
        deposit: Balance,
    },
    Transfer {
        deposit: Balance,
    },
    Stake {
        stake: Balance,
        public_key: PublicKey,
    },
    AddKey {
        public_key: PublicKey,
        access_key: AccessKey,
    },
    DeleteKey {
        public_key: PublicKey,
    },
    DeleteAccount {
        beneficiary_id: String,
    },
}

impl Action {
    pub fn transfer(deposit: impl Into<Balance>) -> Self {
        Action::Transfer {
            deposit: deposit.into(),
        }
    }

    pub fn stake(stake: impl Into<Balance>, public_key: PublicKey) -> Self {
        Action::Stake {
            stake: stake.into(),
            public_key,
        }
    }

    pub fn function_call(
        method_name: impl Into<String>,
        args: Vec<u8>,
        gas: u64,
        deposit: impl Into<Balance>,
    ) -> Self {
        Action::FunctionCall {
            method_name: method_name.into(),
            args,
            gas,
            deposit: deposit.into(),
        }
    }

    pub fn discriminant(&self) -> u8 {
        match self {
            Action::CreateAccount => discriminant::CREATE_ACCOUNT,
            Action::DeployContract { .. } => discriminant::DEPLOY_CONTRACT,
            Action::FunctionCall { .. } => discriminant::FUNCTION_CALL,
            Action::Transfer { .. } => discriminant::TRANSFER,
            Action::Stake { .. } => discriminant::STAKE,
            Action::AddKey { .. } => discriminant::ADD_KEY,
            Action::DeleteKey { .. } => discriminant::DELETE_KEY,
            Action::DeleteAccount { .. } => discriminant::DELETE_ACCOUNT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateAccount => "CreateAccount",
            Action::DeployContract { .. } => "DeployContract",
            Action::FunctionCall { .. } => "FunctionCall",
            Action::Transfer { .. } => "Transfer",
            Action::Stake { .. } => "Stake",
            Action::AddKey { .. } => "AddKey",
            Action::DeleteKey { .. } => "DeleteKey",
            Action::DeleteAccount { .. } => "DeleteAccount",
        }
    }
}

/// Writes the discriminant byte followed by the variant payload
pub fn encode_action(action: &Action, writer: &mut Vec<u8>) -> Result<()> {
    encode_u8(action.discriminant(), writer);
    match action {
        Action::CreateAccount => {}
        Action::DeployContract { code } => encode_length_prefixed(code, writer)?,
        Action::FunctionCall {
            method_name,
            args,
            gas,
            deposit,
        } => {
            encode_string(method_name, writer)?;
            encode_length_prefixed(args, writer)?;
            encode_u64(*gas, writer);
            deposit.serialize_bytes(writer)?;
        }
        Action::Transfer { deposit } => deposit.serialize_bytes(writer)?,
        Action::Stake { stake, public_key } => {
            stake.serialize_bytes(writer)?;
            encode_public_key(public_key, writer)?;
        }
        Action::AddKey {
            public_key,
            access_key,
        } => {
            encode_public_key(public_key, writer)?;
            access_key.serialize_bytes(writer)?;
        }
        Action::DeleteKey { public_key } => encode_public_key(public_key, writer)?,
        Action::DeleteAccount { beneficiary_id } => encode_string(beneficiary_id, writer)?,
    }
    Ok(())
}

pub fn decode_action(cursor: &mut Cursor<&[u8]>) -> Result<Action> {
    let action = match decode_u8(cursor)? {
        discriminant::CREATE_ACCOUNT => Action::CreateAccount,
        discriminant::DEPLOY_CONTRACT => Action::DeployContract {
            code: decode_length_prefixed(cursor)?,
        },
        discriminant::FUNCTION_CALL => Action::FunctionCall {
            method_name: decode_string(cursor)?,
            args: decode_length_prefixed(cursor)?,
            gas: decode_u64(cursor)?,
            deposit: Balance::deserialize_bytes(cursor)?,
        },
        discriminant::TRANSFER => Action::Transfer {
            deposit: Balance::deserialize_bytes(cursor)?,
        },
        discriminant::STAKE => Action::Stake {
            stake: Balance::deserialize_bytes(cursor)?,
            public_key: decode_public_key(cursor)?,
        },
        discriminant::ADD_KEY => Action::AddKey {
            public_key: decode_public_key(cursor)?,
            access_key: AccessKey::deserialize_bytes(cursor)?,
        },
        discriminant::DELETE_KEY => Action::DeleteKey {
            public_key: decode_public_key(cursor)?,
        },
        discriminant::DELETE_ACCOUNT => Action::DeleteAccount {
            beneficiary_id: decode_string(cursor)?,
        },
        other => {
            return Err(NearTxError::DecodingError(format!(
                "unknown action discriminant {}",
                other
            )))
        }
    };
    Ok(action)
}

impl ByteSerialize for Action {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_action(self, writer)
    }

    fn byte_size(&self) -> usize {
        let payload = match self {
            Action::CreateAccount => 0,
            Action::DeployContract { code } => length_prefixed_size(code.len()),
            Action::FunctionCall {
                method_name, args, ..
            } => {
                length_prefixed_size(method_name.len()) + length_prefixed_size(args.len()) + 8 + 16
            }
            Action::Transfer { .. } => 16,
            Action::Stake { public_key, .. } => 16 + public_key.byte_size(),
            Action::AddKey {
                public_key,
                access_key,
            } => public_key.byte_size() + access_key.byte_size(),
            Action::DeleteKey { public_key } => public_key.byte_size(),
            Action::DeleteAccount { beneficiary_id } => length_prefixed_size(beneficiary_id.len()),
        };
        1 + payload
    }
}

impl ByteDeserialize for Action {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        decode_action(cursor)
    }
}

/// Access key granted by an `AddKey` action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKey {
    /// Starting nonce for transactions signed with the new key
    pub nonce: u64,
    pub permission: AccessKeyPermission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessKeyPermission {
    /// Restricted to calling methods on one contract
    FunctionCall {
        allowance: Option<Balance>,
        receiver_id: String,
        method_names: Vec<String>,
    },
    FullAccess,
}

impl AccessKey {
    pub fn full_access() -> Self {
        Self {
            nonce: 0,
            permission: AccessKeyPermission::FullAccess,
        }
    }

    pub fn function_call(
        allowance: Option<Balance>,
        receiver_id: impl Into<String>,
        method_names: Vec<String>,
    ) -> Self {
        Self {
            nonce: 0,
            permission: AccessKeyPermission::FunctionCall {
                allowance,
                receiver_id: receiver_id.into(),
                method_names,
            },
        }
    }
}

impl ByteSerialize for AccessKey {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_u64(self.nonce, writer);
        match &self.permission {
            AccessKeyPermission::FunctionCall {
                allowance,
                receiver_id,
                method_names,
            } => {
                encode_u8(discriminant::PERMISSION_FUNCTION_CALL, writer);
                encode_option(allowance.as_ref(), writer, |a, w| a.serialize_bytes(w))?;
                encode_string(receiver_id, writer)?;
                encode_sequence(method_names, writer, |name, w| encode_string(name, w))?;
            }
            AccessKeyPermission::FullAccess => {
                encode_u8(discriminant::PERMISSION_FULL_ACCESS, writer);
            }
        }
        Ok(())
    }

    fn byte_size(&self) -> usize {
        let permission = match &self.permission {
            AccessKeyPermission::FunctionCall {
                allowance,
                receiver_id,
                method_names,
            } => {
                1 + allowance.map_or(0, |_| 16)
                    + length_prefixed_size(receiver_id.len())
                    + 4
                    + method_names
                        .iter()
                        .map(|m| length_prefixed_size(m.len()))
                        .sum::<usize>()
            }
            AccessKeyPermission::FullAccess => 0,
        };
        8 + 1 + permission
    }
}

impl ByteDeserialize for AccessKey {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let nonce = decode_u64(cursor)?;
        let permission = match decode_u8(cursor)? {
            discriminant::PERMISSION_FUNCTION_CALL => AccessKeyPermission::FunctionCall {
                allowance: decode_option(cursor, Balance::deserialize_bytes)?,
                receiver_id: decode_string(cursor)?,
                method_names: decode_sequence(cursor, decode_string)?,
            },
            discriminant::PERMISSION_FULL_ACCESS => AccessKeyPermission::FullAccess,
            other => {
                return Err(NearTxError::DecodingError(format!(
                    "unknown access key permission {}",
                    other
                )))
            }
        };
        Ok(Self { nonce, permission })
    }
}

impl_borsh_serialize!(Action, AccessKey);

#[cfg(test)]
mod tests {
    use super::*;

    fn stake_key() -> PublicKey {
        "ed25519:C2P7YcEmBv31vtCHLBcESteN4Yi4vSCkXEXMTANyB649".parse().unwrap()
    }

    #[test]
    fn test_transfer_encoding() {
        let bytes = Action::transfer(1u128).to_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), "0301000000000000000000000000000000");
        assert_eq!(bytes.len(), Action::transfer(1u128).byte_size());
    }

    #[test]
    fn test_stake_encoding() {
        let stake: Balance = "2490000000000000000000000000".parse().unwrap();
        let action = Action::stake(stake, stake_key());
        let bytes = action.to_bytes().unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "04000000fa4f3f757902ae0b080000000000a3cb23dbb9810abd4a6804328eec47a17236383b5c234cae903b064e9dc426da"
        );
        assert_eq!(bytes.len(), 1 + 16 + 33);
        assert_eq!(Action::from_bytes(&bytes).unwrap(), action);
    }

    #[test]
    fn test_discriminant_table() {
        let key = stake_key();
        let actions = [
            (Action::CreateAccount, 0u8),
            (Action::DeployContract { code: vec![] }, 1),
            (Action::function_call("m", vec![], 0, 0u128), 2),
            (Action::transfer(0u128), 3),
            (Action::stake(0u128, key.clone()), 4),
            (
                Action::AddKey {
                    public_key: key.clone(),
                    access_key: AccessKey::full_access(),
                },
                5,
            ),
            (Action::DeleteKey { public_key: key }, 6),
            (
                Action::DeleteAccount {
                    beneficiary_id: "bob.near".to_string(),
                },
                7,
            ),
        ];

        for (action, expected) in actions {
            let bytes = action.to_bytes().unwrap();
            assert_eq!(bytes[0], expected, "{}", action.name());
            assert_eq!(bytes.len(), action.byte_size(), "{}", action.name());
            assert_eq!(Action::from_bytes(&bytes).unwrap(), action);
        }
    }

    #[test]
    fn test_function_call_encoding() {
        let action = Action::function_call("ping", b"{}".to_vec(), 30_000_000_000_000, 0u128);
        assert_eq!(
            hex::encode(action.to_bytes().unwrap()),
            "020400000070696e67020000007b7d00e057eb481b000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_function_call_access_key() {
        let action = Action::AddKey {
            public_key: stake_key(),
            access_key: AccessKey::function_call(
                Some(Balance::from(250_000_000_000_000_000_000_000u128)),
                "app.near",
                vec!["ping".to_string(), "pong".to_string()],
            ),
        };
        let bytes = action.to_bytes().unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "0500a3cb23dbb9810abd4a6804328eec47a17236383b5c234cae903b064e9dc426da00000000000000000001000040683bb3f386f034000000000000080000006170702e6e656172020000000400000070696e6704000000706f6e67"
        );
        assert_eq!(bytes.len(), action.byte_size());
        assert_eq!(Action::from_bytes(&bytes).unwrap(), action);
    }

    #[test]
    fn test_unknown_discriminant() {
        let err = Action::from_bytes(&[8]).unwrap_err();
        assert!(matches!(err, NearTxError::DecodingError(_)));
    }

    #[test]
    fn test_truncated_stake() {
        let bytes = Action::stake(1u128, stake_key()).to_bytes().unwrap();
        assert!(Action::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_borsh_vec_of_actions() {
        let actions = vec![Action::transfer(1u128), Action::stake(2u128, stake_key())];
        let mut expected = Vec::new();
        encode_sequence(&actions, &mut expected, encode_action).unwrap();
        assert_eq!(borsh::to_vec(&actions).unwrap(), expected);
    }
}
