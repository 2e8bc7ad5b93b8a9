//! Migrate a contract to a new code ID.

use serde::{Deserialize, Serialize};

use super::{
    check_address, check_json_object, Action, ActionContext, ActionKey, ActionResult, Decoded,
    FieldError,
};
use crate::codec::{Binary, WasmMsg, WireMessage};

/// Migrate form data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateData {
    /// Contract to migrate
    pub contract: String,
    /// New code ID
    pub code_id: u64,
    /// Migrate payload as JSON text
    pub message: String,
}

/// Migrate a contract the DAO administers
#[derive(Clone, Copy, Debug, Default)]
pub struct Migrate;

impl Action for Migrate {
    type Data = MigrateData;

    fn key(&self) -> ActionKey {
        ActionKey::Migrate
    }

    fn label(&self) -> &'static str {
        "Migrate Smart Contract"
    }

    fn icon(&self) -> &'static str {
        "🐋"
    }

    fn default_data(&self, _ctx: &ActionContext) -> MigrateData {
        MigrateData {
            contract: String::new(),
            code_id: 0,
            message: "{}".to_string(),
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &MigrateData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "contract", &data.contract);
        if data.code_id == 0 {
            errors.push(FieldError::new("code_id", "required"));
        }
        check_json_object(&mut errors, "message", &data.message);
        errors
    }

    fn encode(&self, _ctx: &ActionContext, data: &MigrateData) -> ActionResult<Vec<WireMessage>> {
        Ok(vec![WireMessage::Wasm(WasmMsg::Migrate {
            contract_addr: data.contract.clone(),
            new_code_id: data.code_id,
            msg: Binary::from(data.message.as_str()),
        })])
    }

    fn decode(
        &self,
        _ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<MigrateData>>> {
        let Some(WireMessage::Wasm(WasmMsg::Migrate {
            contract_addr,
            new_code_id,
            msg,
        })) = msgs.first()
        else {
            return Ok(None);
        };
        let Ok(message) = msg.as_utf8() else {
            return Ok(None);
        };

        Ok(Some(Decoded::single(MigrateData {
            contract: contract_addr.clone(),
            code_id: *new_code_id,
            message: message.to_string(),
        })))
    }
}
