//! Proposal actions.
//!
//! An action is a user-composable governance operation (spend funds, mint
//! tokens, migrate a contract, ...) that translates to and from one or more
//! wire messages.
//!
//! ## Architecture
//!
//! 1. **[`Action`]**: typed definition. Each kind has its own form data
//!    struct and implements encode, decode and validation against it.
//! 2. **[`ActionHandler`]**: object-safe view over JSON form data, which is
//!    what the registry, dispatcher and proposal drafts work with.
//! 3. **[`registry::ActionRegistry`]**: ordered catalog of handlers.
//!
//! Matching is first-match-wins in registration order, so specific actions
//! come first and the catch-all [`custom::Custom`] comes last.

pub mod admin;
pub mod create_account;
pub mod custom;
pub mod execute;
pub mod instantiate;
pub mod migrate;
pub mod mint;
pub mod registry;
pub mod spend;
pub mod stake;
pub mod treasury_token;
pub mod update_info;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::codec::{CodecError, WireMessage};
use crate::context::ActionContext;
use crate::types::{validate_address, Amount, AmountError};

pub use registry::{ActionRegistry, RegistryBuilder, RegistryError};

/// Result type for action operations
pub type ActionResult<T> = Result<T, ActionError>;

/// Stable identifier of an action kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    /// Send tokens from the treasury
    Spend,
    /// Mint governance tokens
    Mint,
    /// Delegate, undelegate, redelegate or claim rewards
    Stake,
    /// Show a cw20 token in the treasury
    AddTreasuryToken,
    /// Hide a cw20 token from the treasury
    RemoveTreasuryToken,
    /// Change the DAO's name, description and image
    UpdateInfo,
    /// Create a DAO sub-account and fund it
    CreateFundedAccount,
    /// Instantiate a contract
    Instantiate,
    /// Migrate a contract
    Migrate,
    /// Change a contract's admin
    UpdateAdmin,
    /// Remove a contract's admin
    ClearAdmin,
    /// Execute an arbitrary contract call
    Execute,
    /// Raw message
    Custom,
}

impl ActionKey {
    /// Every key, in catalog order
    pub const ALL: [Self; 13] = [
        Self::Spend,
        Self::Mint,
        Self::Stake,
        Self::AddTreasuryToken,
        Self::RemoveTreasuryToken,
        Self::UpdateInfo,
        Self::CreateFundedAccount,
        Self::Instantiate,
        Self::Migrate,
        Self::UpdateAdmin,
        Self::ClearAdmin,
        Self::Execute,
        Self::Custom,
    ];

    /// Serialized name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spend => "spend",
            Self::Mint => "mint",
            Self::Stake => "stake",
            Self::AddTreasuryToken => "add_treasury_token",
            Self::RemoveTreasuryToken => "remove_treasury_token",
            Self::UpdateInfo => "update_info",
            Self::CreateFundedAccount => "create_funded_account",
            Self::Instantiate => "instantiate",
            Self::Migrate => "migrate",
            Self::UpdateAdmin => "update_admin",
            Self::ClearAdmin => "clear_admin",
            Self::Execute => "execute",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKey {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ActionError::UnknownKey(s.to_string()))
    }
}

/// Outcome of a successful match: how many leading messages were claimed
/// and the form data recovered from them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded<T> {
    /// Number of leading messages consumed (at least 1)
    pub consumed: usize,
    /// Recovered form data
    pub data: T,
}

impl<T> Decoded<T> {
    /// A match that consumed exactly one message
    pub fn single(data: T) -> Self {
        Self { consumed: 1, data }
    }
}

/// Type-erased match outcome
pub type Matched = Decoded<Value>;

/// A validation problem tied to one form field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path relative to the action's form (e.g. `amount`)
    pub path: String,
    /// User-facing message
    pub message: String,
}

impl FieldError {
    /// Create a field error
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Scope the path under a namespace prefix such as `"2."`
    #[must_use]
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.path = format!("{prefix}{}", self.path);
        self
    }
}

/// A typed action definition.
///
/// `encode` assumes data that already passed [`Action::validate`]; it does
/// no user-facing validation of its own. `decode` receives the remaining
/// messages of a proposal and either claims a leading run of them or
/// declines with `Ok(None)`. Multi-message actions must claim their whole
/// pattern or nothing.
pub trait Action: Send + Sync {
    /// Form data of this action
    type Data: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug;

    /// Unique key
    fn key(&self) -> ActionKey;

    /// Human-readable name
    fn label(&self) -> &'static str;

    /// Display icon
    fn icon(&self) -> &'static str;

    /// Initial form data when the user adds this action
    fn default_data(&self, ctx: &ActionContext) -> Self::Data;

    /// Check form data before encoding
    fn validate(&self, _ctx: &ActionContext, _data: &Self::Data) -> Vec<FieldError> {
        Vec::new()
    }

    /// Turn form data into wire messages
    fn encode(&self, ctx: &ActionContext, data: &Self::Data) -> ActionResult<Vec<WireMessage>>;

    /// Recognize this action at the start of `msgs`
    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<Self::Data>>>;

    /// Whether this action accepts any message
    fn is_catch_all(&self) -> bool {
        false
    }
}

/// Object-safe action interface over JSON form data
pub trait ActionHandler: Send + Sync {
    /// Unique key
    fn key(&self) -> ActionKey;

    /// Human-readable name
    fn label(&self) -> &'static str;

    /// Display icon
    fn icon(&self) -> &'static str;

    /// Whether this handler accepts any message
    fn is_catch_all(&self) -> bool;

    /// Initial form data
    fn default_data(&self, ctx: &ActionContext) -> ActionResult<Value>;

    /// Check form data; `Err` means the data has the wrong shape entirely
    fn validate(&self, ctx: &ActionContext, data: &Value) -> ActionResult<Vec<FieldError>>;

    /// Turn form data into wire messages
    fn encode(&self, ctx: &ActionContext, data: &Value) -> ActionResult<Vec<WireMessage>>;

    /// Recognize this action at the start of `msgs`
    fn match_messages(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Matched>>;
}

/// Adapter exposing a typed [`Action`] as an [`ActionHandler`]
pub struct Erased<A>(pub A);

/// Box a typed action for the registry
#[must_use]
pub fn handler<A: Action + 'static>(action: A) -> Box<dyn ActionHandler> {
    Box::new(Erased(action))
}

impl<A: Action> Erased<A> {
    fn typed(&self, data: &Value) -> ActionResult<A::Data> {
        <A::Data as Deserialize>::deserialize(data).map_err(|e| {
            error!(
                action = %self.0.key(),
                error = %e,
                "Form data does not match action shape"
            );
            ActionError::InvalidData {
                key: self.0.key(),
                reason: e.to_string(),
            }
        })
    }

    fn erase(data: &A::Data) -> ActionResult<Value> {
        serde_json::to_value(data).map_err(|e| CodecError::Json(e.to_string()).into())
    }
}

impl<A: Action> ActionHandler for Erased<A> {
    fn key(&self) -> ActionKey {
        self.0.key()
    }

    fn label(&self) -> &'static str {
        self.0.label()
    }

    fn icon(&self) -> &'static str {
        self.0.icon()
    }

    fn is_catch_all(&self) -> bool {
        self.0.is_catch_all()
    }

    fn default_data(&self, ctx: &ActionContext) -> ActionResult<Value> {
        Self::erase(&self.0.default_data(ctx))
    }

    fn validate(&self, ctx: &ActionContext, data: &Value) -> ActionResult<Vec<FieldError>> {
        let data = self.typed(data)?;
        Ok(self.0.validate(ctx, &data))
    }

    fn encode(&self, ctx: &ActionContext, data: &Value) -> ActionResult<Vec<WireMessage>> {
        let data = self.typed(data)?;
        self.0.encode(ctx, &data)
    }

    fn match_messages(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Matched>> {
        match self.0.decode(ctx, msgs)? {
            Some(decoded) => Ok(Some(Matched {
                consumed: decoded.consumed,
                data: Self::erase(&decoded.data)?,
            })),
            None => Ok(None),
        }
    }
}

/// Action errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Form data does not have the shape the action expects
    #[error("invalid {key} data: {reason}")]
    InvalidData {
        /// Action the data was given to
        key: ActionKey,
        /// What was wrong
        reason: String,
    },

    /// Chain data the action depends on has not been loaded
    #[error("{key} is unavailable: {reason}")]
    Unavailable {
        /// Affected action
        key: ActionKey,
        /// Missing data
        reason: String,
    },

    /// No action with this key
    #[error("unknown action: {0}")]
    UnknownKey(String),

    /// Wire encoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Amount conversion failed
    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl ActionError {
    pub(crate) fn unavailable(key: ActionKey, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            key,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(key: ActionKey, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            key,
            reason: reason.into(),
        }
    }
}

// Validation helpers shared by the action modules.

pub(crate) fn check_address(
    errors: &mut Vec<FieldError>,
    ctx: &ActionContext,
    path: &str,
    address: &str,
) {
    if let Err(e) = validate_address(address, ctx.bech32_prefix()) {
        errors.push(FieldError::new(path, e.to_string()));
    }
}

/// The amount must stay non-zero once converted to micro-units. Without
/// `decimals` (unknown token) only the decimal text can be checked.
pub(crate) fn check_positive(
    errors: &mut Vec<FieldError>,
    path: &str,
    amount: &Amount,
    decimals: Option<u32>,
) {
    if amount.is_zero() {
        errors.push(FieldError::new(path, "amount must be greater than zero"));
        return;
    }
    let Some(decimals) = decimals else {
        return;
    };
    match amount.to_micro(decimals) {
        Ok(micro) if micro.is_zero() => errors.push(FieldError::new(
            path,
            format!("amount is below the smallest unit ({decimals} decimals)"),
        )),
        Ok(_) => {}
        Err(e) => errors.push(FieldError::new(path, e.to_string())),
    }
}

pub(crate) fn check_required(errors: &mut Vec<FieldError>, path: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(path, "required"));
    }
}

pub(crate) fn check_json_object(errors: &mut Vec<FieldError>, path: &str, text: &str) {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(_)) => {}
        Ok(_) => errors.push(FieldError::new(path, "message must be a JSON object")),
        Err(e) => errors.push(FieldError::new(path, format!("invalid JSON: {e}"))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the action tests.

    use crate::config::{ChainConfig, TokenInfo};
    use crate::context::ActionContext;
    use crate::types::encode_address;

    pub const DAO: &str = "juno1dao";
    pub const GOV_TOKEN: &str = "juno1govtoken";
    pub const USDC: &str = "juno1usdctoken";
    pub const ACCOUNT_CODE_ID: u64 = 4021;

    pub fn config() -> ChainConfig {
        ChainConfig {
            chain_id: "juno-1".to_string(),
            bech32_prefix: "juno".to_string(),
            native_denom: "ujuno".to_string(),
            native_symbol: "JUNO".to_string(),
            native_decimals: 6,
            dao_address: DAO.to_string(),
            governance_token: Some(GOV_TOKEN.to_string()),
            account_code_id: Some(ACCOUNT_CODE_ID),
            proposal_module: Some("juno1proposals".to_string()),
            tokens: vec![
                TokenInfo::cw20(GOV_TOKEN, "GOV", 6),
                TokenInfo::cw20(USDC, "USDC", 8),
            ],
        }
    }

    pub fn ctx() -> ActionContext {
        ActionContext::new(config())
    }

    pub fn address(seed: u8) -> String {
        encode_address("juno", &[seed; 20])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_names_roundtrip() {
        for key in ActionKey::ALL {
            let json = serde_json::to_value(key).unwrap();
            assert_eq!(json, Value::String(key.as_str().to_string()));
            assert_eq!(key.as_str().parse::<ActionKey>().unwrap(), key);
        }
        assert!("teleport".parse::<ActionKey>().is_err());
    }

    #[test]
    fn test_invalid_shape_is_programming_error() {
        let ctx = testing::ctx();
        let spend = handler(spend::Spend);
        let err = spend.encode(&ctx, &json!({"to": 5})).unwrap_err();
        assert!(matches!(
            err,
            ActionError::InvalidData {
                key: ActionKey::Spend,
                ..
            }
        ));
    }

    #[test]
    fn test_field_error_prefix() {
        let err = FieldError::new("amount", "required").prefixed("3.");
        assert_eq!(err.path, "3.amount");
    }
}
