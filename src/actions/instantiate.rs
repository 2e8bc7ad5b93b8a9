//! Instantiate a new contract from stored code.

use serde::{Deserialize, Serialize};

use super::{
    check_address, check_json_object, check_required, Action, ActionContext, ActionKey,
    ActionResult, Decoded, FieldError,
};
use crate::codec::{Binary, WasmMsg, WireMessage};
use crate::types::Coin;

/// Instantiate form data.
///
/// `message` is kept as the exact JSON text the user entered (or the chain
/// carried) so decoding and re-encoding preserves the payload bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateData {
    /// Migration admin; `None` makes the contract immutable
    pub admin: Option<String>,
    /// Stored code ID
    pub code_id: u64,
    /// Contract label
    pub label: String,
    /// Instantiate payload as JSON text
    pub message: String,
    /// Coins sent with the call, in micro-units
    #[serde(default)]
    pub funds: Vec<Coin>,
    /// Salt for a predictable address; switches to `instantiate2`
    #[serde(default)]
    pub salt: Option<String>,
}

/// Instantiate a contract
#[derive(Clone, Copy, Debug, Default)]
pub struct Instantiate;

impl Action for Instantiate {
    type Data = InstantiateData;

    fn key(&self) -> ActionKey {
        ActionKey::Instantiate
    }

    fn label(&self) -> &'static str {
        "Instantiate Smart Contract"
    }

    fn icon(&self) -> &'static str {
        "📩"
    }

    fn default_data(&self, ctx: &ActionContext) -> InstantiateData {
        InstantiateData {
            admin: Some(ctx.dao_address().to_string()),
            code_id: 0,
            label: String::new(),
            message: "{}".to_string(),
            funds: vec![],
            salt: None,
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &InstantiateData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(admin) = &data.admin {
            check_address(&mut errors, ctx, "admin", admin);
        }
        if data.code_id == 0 {
            errors.push(FieldError::new("code_id", "required"));
        }
        check_required(&mut errors, "label", &data.label);
        check_json_object(&mut errors, "message", &data.message);
        for (i, coin) in data.funds.iter().enumerate() {
            if coin.amount.is_zero() {
                errors.push(FieldError::new(
                    format!("funds.{i}.amount"),
                    "amount must be greater than zero",
                ));
            }
        }
        if matches!(&data.salt, Some(salt) if salt.is_empty()) {
            errors.push(FieldError::new("salt", "salt must not be empty"));
        }
        errors
    }

    fn encode(
        &self,
        _ctx: &ActionContext,
        data: &InstantiateData,
    ) -> ActionResult<Vec<WireMessage>> {
        let msg = Binary::from(data.message.as_str());
        let wasm = match &data.salt {
            Some(salt) => WasmMsg::Instantiate2 {
                admin: data.admin.clone(),
                code_id: data.code_id,
                label: data.label.clone(),
                msg,
                funds: data.funds.clone(),
                salt: Binary::from(salt.as_str()),
            },
            None => WasmMsg::Instantiate {
                admin: data.admin.clone(),
                code_id: data.code_id,
                msg,
                funds: data.funds.clone(),
                label: data.label.clone(),
            },
        };
        Ok(vec![WireMessage::Wasm(wasm)])
    }

    fn decode(
        &self,
        _ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<InstantiateData>>> {
        let (admin, code_id, label, msg, funds, salt) = match msgs.first() {
            Some(WireMessage::Wasm(WasmMsg::Instantiate {
                admin,
                code_id,
                msg,
                funds,
                label,
            })) => (admin, code_id, label, msg, funds, None),
            Some(WireMessage::Wasm(WasmMsg::Instantiate2 {
                admin,
                code_id,
                label,
                msg,
                funds,
                salt,
            })) => (admin, code_id, label, msg, funds, Some(salt)),
            _ => return Ok(None),
        };

        // Binary payloads and salts can't be edited as text.
        let Ok(message) = msg.as_utf8() else {
            return Ok(None);
        };
        let salt = match salt.map(Binary::as_utf8).transpose() {
            Ok(salt) => salt.map(str::to_string),
            Err(_) => return Ok(None),
        };

        Ok(Some(Decoded::single(InstantiateData {
            admin: admin.clone(),
            code_id: *code_id,
            label: label.clone(),
            message: message.to_string(),
            funds: funds.clone(),
            salt,
        })))
    }
}
