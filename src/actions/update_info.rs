//! Update the DAO's name, description and image.

use super::{check_required, Action, ActionContext, ActionKey, ActionResult, Decoded, FieldError};
use crate::codec::contracts::{DaoConfig, DaoCoreExecuteMsg};
use crate::codec::{decode_contract_call, wasm_execute, WireMessage};

/// Replace the DAO core's display config
#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateInfo;

impl Action for UpdateInfo {
    type Data = DaoConfig;

    fn key(&self) -> ActionKey {
        ActionKey::UpdateInfo
    }

    fn label(&self) -> &'static str {
        "Update Info"
    }

    fn icon(&self) -> &'static str {
        "ℹ️"
    }

    /// Starts from the DAO's current config when it has been loaded
    fn default_data(&self, ctx: &ActionContext) -> DaoConfig {
        ctx.dao_info().cloned().unwrap_or_default()
    }

    fn validate(&self, _ctx: &ActionContext, data: &DaoConfig) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_required(&mut errors, "name", &data.name);
        check_required(&mut errors, "description", &data.description);
        if let Some(url) = &data.image_url {
            if !(url.starts_with("https://") || url.starts_with("ipfs://")) {
                errors.push(FieldError::new("image_url", "must be an https or ipfs URL"));
            }
        }
        errors
    }

    fn encode(&self, ctx: &ActionContext, data: &DaoConfig) -> ActionResult<Vec<WireMessage>> {
        let msg = wasm_execute(
            ctx.dao_address(),
            &DaoCoreExecuteMsg::UpdateConfig {
                config: data.clone(),
            },
            vec![],
        )?;
        Ok(vec![msg])
    }

    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<DaoConfig>>> {
        let Some(call) = msgs.first().and_then(decode_contract_call::<DaoCoreExecuteMsg>) else {
            return Ok(None);
        };
        match call.msg {
            DaoCoreExecuteMsg::UpdateConfig { config }
                if call.contract == ctx.dao_address() && call.funds.is_empty() =>
            {
                Ok(Some(Decoded::single(config)))
            }
            _ => Ok(None),
        }
    }
}
