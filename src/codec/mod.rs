//! Chain wire messages.
//!
//! A proposal carries an ordered list of messages that the DAO executes
//! once the vote passes. [`WireMessage`] mirrors the chain's JSON shape: an
//! externally tagged union keyed by category (`bank`, `wasm`, ...), each
//! holding category-specific variants.
//!
//! Anything that does not parse as a known, well-formed message is kept
//! verbatim in [`WireMessage::Opaque`] and serializes back to the same
//! JSON. Unknown fields are rejected on the known shapes for the same
//! reason: a message that would lose data on re-serialization stays opaque.

pub mod binary;
pub mod contracts;
pub mod envelope;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::Coin;

pub use binary::Binary;
pub use envelope::{bank_send, decode_contract_call, wasm_execute, ContractCall};

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// A message executed by the chain on behalf of the DAO
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum WireMessage {
    /// Native token transfers
    Bank(BankMsg),
    /// Native staking
    Staking(StakingMsg),
    /// Staking reward distribution
    Distribution(DistributionMsg),
    /// Smart contract calls and lifecycle
    Wasm(WasmMsg),
    /// Protobuf-encoded SDK message
    Stargate {
        /// Protobuf type URL (e.g. `/cosmos.gov.v1beta1.MsgVote`)
        type_url: String,
        /// Encoded protobuf bytes
        value: Binary,
    },
    /// Chain-specific extension message
    Custom(Value),
    /// Any JSON not recognized as a well-formed message above
    #[serde(untagged)]
    Opaque(Value),
}

impl WireMessage {
    /// Top-level category name, used in logs
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Bank(_) => "bank",
            Self::Staking(_) => "staking",
            Self::Distribution(_) => "distribution",
            Self::Wasm(_) => "wasm",
            Self::Stargate { .. } => "stargate",
            Self::Custom(_) => "custom",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Structured JSON form of the message
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> CodecResult<Value> {
        serde_json::to_value(self).map_err(|e| CodecError::Json(e.to_string()))
    }

    /// Parse a message from its JSON form
    ///
    /// Never fails for well-formed JSON values: unknown shapes become
    /// [`WireMessage::Opaque`].
    ///
    /// # Errors
    /// Returns error only if deserialization itself fails
    pub fn from_json(value: Value) -> CodecResult<Self> {
        serde_json::from_value(value).map_err(|e| CodecError::Json(e.to_string()))
    }
}

/// Native token transfers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum BankMsg {
    /// Send coins from the DAO treasury
    Send {
        /// Recipient
        to_address: String,
        /// Coins to send
        amount: Vec<Coin>,
    },
    /// Burn coins from the DAO treasury
    Burn {
        /// Coins to burn
        amount: Vec<Coin>,
    },
}

/// Native staking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum StakingMsg {
    /// Bond tokens to a validator
    Delegate {
        /// Validator operator address
        validator: String,
        /// Amount to bond
        amount: Coin,
    },
    /// Start unbonding from a validator
    Undelegate {
        /// Validator operator address
        validator: String,
        /// Amount to unbond
        amount: Coin,
    },
    /// Move bonded tokens between validators
    Redelegate {
        /// Current validator
        src_validator: String,
        /// New validator
        dst_validator: String,
        /// Amount to move
        amount: Coin,
    },
}

/// Staking reward distribution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum DistributionMsg {
    /// Change where rewards are paid
    SetWithdrawAddress {
        /// Reward recipient
        address: String,
    },
    /// Claim pending rewards from one validator
    WithdrawDelegatorReward {
        /// Validator operator address
        validator: String,
    },
}

/// Smart contract calls and lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum WasmMsg {
    /// Call a contract
    Execute {
        /// Target contract
        contract_addr: String,
        /// JSON payload
        msg: Binary,
        /// Coins attached to the call
        funds: Vec<Coin>,
    },
    /// Create a contract from stored code
    Instantiate {
        /// Migration admin; the key must be present, `null` for none
        #[serde(deserialize_with = "required_option")]
        admin: Option<String>,
        /// Stored code ID
        code_id: u64,
        /// JSON instantiate payload
        msg: Binary,
        /// Coins attached to the call
        funds: Vec<Coin>,
        /// Human-readable contract label
        label: String,
    },
    /// Create a contract at a predictable address
    Instantiate2 {
        /// Migration admin; the key must be present, `null` for none
        #[serde(deserialize_with = "required_option")]
        admin: Option<String>,
        /// Stored code ID
        code_id: u64,
        /// Human-readable contract label
        label: String,
        /// JSON instantiate payload
        msg: Binary,
        /// Coins attached to the call
        funds: Vec<Coin>,
        /// Address derivation salt
        salt: Binary,
    },
    /// Migrate a contract to new code
    Migrate {
        /// Contract to migrate
        contract_addr: String,
        /// Target code ID
        new_code_id: u64,
        /// JSON migrate payload
        msg: Binary,
    },
    /// Change a contract's admin
    UpdateAdmin {
        /// Contract to update
        contract_addr: String,
        /// New admin
        admin: String,
    },
    /// Remove a contract's admin
    ClearAdmin {
        /// Contract to update
        contract_addr: String,
    },
}

/// Deserialize an `Option` field whose key is still mandatory.
///
/// Serde reads a missing `Option` key as `None`, which serializes back as
/// `null`. Routing the field through `deserialize_with` turns the missing
/// key into an error, so such a message falls through to `Opaque`.
pub(crate) fn required_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// JSON (de)serialization failed
    #[error("json error: {0}")]
    Json(String),
    /// Invalid base64 text
    #[error("base64 error: {0}")]
    Base64(String),
    /// Payload is not UTF-8 text
    #[error("payload is not valid UTF-8")]
    NotUtf8,
}
