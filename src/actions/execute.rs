//! Execute an arbitrary smart contract call.

use serde::{Deserialize, Serialize};

use super::{
    check_address, check_json_object, Action, ActionContext, ActionKey, ActionResult, Decoded,
    FieldError,
};
use crate::codec::{Binary, WasmMsg, WireMessage};
use crate::types::Coin;

/// Execute form data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteData {
    /// Target contract
    pub address: String,
    /// Execute payload as JSON text, carried byte for byte
    pub message: String,
    /// Coins sent with the call, in micro-units
    #[serde(default)]
    pub funds: Vec<Coin>,
}

/// Generic contract call.
///
/// Registered after the contract-specific actions so that a recognizable
/// spend or mint is claimed by them first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Execute;

impl Action for Execute {
    type Data = ExecuteData;

    fn key(&self) -> ActionKey {
        ActionKey::Execute
    }

    fn label(&self) -> &'static str {
        "Execute Smart Contract"
    }

    fn icon(&self) -> &'static str {
        "⚙️"
    }

    fn default_data(&self, _ctx: &ActionContext) -> ExecuteData {
        ExecuteData {
            address: String::new(),
            message: "{}".to_string(),
            funds: vec![],
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &ExecuteData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "address", &data.address);
        check_json_object(&mut errors, "message", &data.message);
        for (i, coin) in data.funds.iter().enumerate() {
            if coin.amount.is_zero() {
                errors.push(FieldError::new(
                    format!("funds.{i}.amount"),
                    "amount must be greater than zero",
                ));
            }
        }
        errors
    }

    fn encode(&self, _ctx: &ActionContext, data: &ExecuteData) -> ActionResult<Vec<WireMessage>> {
        Ok(vec![WireMessage::Wasm(WasmMsg::Execute {
            contract_addr: data.address.clone(),
            msg: Binary::from(data.message.as_str()),
            funds: data.funds.clone(),
        })])
    }

    fn decode(
        &self,
        _ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<ExecuteData>>> {
        let Some(WireMessage::Wasm(WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        })) = msgs.first()
        else {
            return Ok(None);
        };
        let Ok(message) = msg.as_utf8() else {
            return Ok(None);
        };

        Ok(Some(Decoded::single(ExecuteData {
            address: contract_addr.clone(),
            message: message.to_string(),
            funds: funds.clone(),
        })))
    }
}
