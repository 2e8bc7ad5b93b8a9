//! Create a DAO sub-account and fund it in the same proposal.
//!
//! Encodes to two messages that must stay adjacent: an `instantiate2` of
//! the configured account code, then a bank send to the account's
//! predicted address. The address is derived upstream from the code
//! checksum, creator and salt, and supplied in the form data.

use serde::{Deserialize, Serialize};

use super::{
    check_address, check_positive, check_required, Action, ActionContext, ActionError, ActionKey,
    ActionResult, Decoded, FieldError,
};
use crate::codec::contracts::AccountInstantiateMsg;
use crate::codec::{bank_send, BankMsg, Binary, WasmMsg, WireMessage};
use crate::config::TokenKind;
use crate::types::{Amount, Coin};

/// Number of wire messages this action spans
pub const MESSAGE_COUNT: usize = 2;

/// Create-and-fund form data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFundedAccountData {
    /// Account owner
    pub owner: String,
    /// Contract label
    pub label: String,
    /// Migration admin (normally the DAO)
    pub admin: Option<String>,
    /// Address derivation salt
    pub salt: String,
    /// Predicted account address
    pub account_address: String,
    /// Funding amount in whole-token units
    pub amount: Amount,
    /// Native denom to fund with
    pub denom: String,
}

/// Instantiate a sub-account with a predictable address, then fund it
#[derive(Clone, Copy, Debug, Default)]
pub struct CreateFundedAccount;

impl CreateFundedAccount {
    fn code_id(ctx: &ActionContext) -> Option<u64> {
        ctx.config().account_code_id
    }
}

impl Action for CreateFundedAccount {
    type Data = CreateFundedAccountData;

    fn key(&self) -> ActionKey {
        ActionKey::CreateFundedAccount
    }

    fn label(&self) -> &'static str {
        "Create Funded Account"
    }

    fn icon(&self) -> &'static str {
        "🏦"
    }

    fn default_data(&self, ctx: &ActionContext) -> CreateFundedAccountData {
        CreateFundedAccountData {
            owner: ctx.dao_address().to_string(),
            label: String::new(),
            admin: Some(ctx.dao_address().to_string()),
            salt: String::new(),
            account_address: String::new(),
            amount: Amount::zero(),
            denom: ctx.native_token().denom.clone(),
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &CreateFundedAccountData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "owner", &data.owner);
        check_required(&mut errors, "label", &data.label);
        check_required(&mut errors, "salt", &data.salt);
        check_address(&mut errors, ctx, "account_address", &data.account_address);
        if let Some(admin) = &data.admin {
            check_address(&mut errors, ctx, "admin", admin);
        }
        let token = ctx
            .token(&data.denom)
            .filter(|t| t.kind == TokenKind::Native);
        check_positive(&mut errors, "amount", &data.amount, token.map(|t| t.decimals));
        if token.is_none() {
            errors.push(FieldError::new("denom", "unknown native token"));
        }
        if Self::code_id(ctx).is_none() {
            errors.push(FieldError::new("label", "no account code configured"));
        }
        errors
    }

    fn encode(
        &self,
        ctx: &ActionContext,
        data: &CreateFundedAccountData,
    ) -> ActionResult<Vec<WireMessage>> {
        let code_id = Self::code_id(ctx)
            .ok_or_else(|| ActionError::unavailable(self.key(), "no account code id"))?;
        let token = ctx
            .token(&data.denom)
            .filter(|t| t.kind == TokenKind::Native)
            .ok_or_else(|| {
                ActionError::unavailable(self.key(), format!("no metadata for {}", data.denom))
            })?;

        let instantiate = WireMessage::Wasm(WasmMsg::Instantiate2 {
            admin: data.admin.clone(),
            code_id,
            label: data.label.clone(),
            msg: Binary::from_json(&AccountInstantiateMsg {
                owner: data.owner.clone(),
            })?,
            funds: vec![],
            salt: Binary::from(data.salt.as_str()),
        });
        let fund = bank_send(
            &data.account_address,
            vec![Coin::new(data.amount.to_micro(token.decimals)?, &data.denom)],
        );
        Ok(vec![instantiate, fund])
    }

    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<CreateFundedAccountData>>> {
        let Some(expected_code_id) = Self::code_id(ctx) else {
            return Ok(None);
        };
        // Both halves or nothing.
        let [first, second, ..] = msgs else {
            return Ok(None);
        };

        let WireMessage::Wasm(WasmMsg::Instantiate2 {
            admin,
            code_id,
            label,
            msg,
            funds,
            salt,
        }) = first
        else {
            return Ok(None);
        };
        if *code_id != expected_code_id || !funds.is_empty() {
            return Ok(None);
        }
        let Ok(init) = msg.parse_json::<AccountInstantiateMsg>() else {
            return Ok(None);
        };
        let Ok(salt) = salt.as_utf8() else {
            return Ok(None);
        };

        let WireMessage::Bank(BankMsg::Send { to_address, amount }) = second else {
            return Ok(None);
        };
        let [coin] = amount.as_slice() else {
            return Ok(None);
        };
        let Some(token) = ctx.token(&coin.denom).filter(|t| t.kind == TokenKind::Native) else {
            return Ok(None);
        };

        Ok(Some(Decoded {
            consumed: MESSAGE_COUNT,
            data: CreateFundedAccountData {
                owner: init.owner,
                label: label.clone(),
                admin: admin.clone(),
                salt: salt.to_string(),
                account_address: to_address.clone(),
                amount: Amount::from_micro(coin.amount, token.decimals)?,
                denom: coin.denom.clone(),
            },
        }))
    }
}
