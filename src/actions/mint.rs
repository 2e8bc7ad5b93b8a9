//! Mint: create new governance tokens.

use serde::{Deserialize, Serialize};

use super::{
    check_address, check_positive, Action, ActionContext, ActionError, ActionKey, ActionResult,
    Decoded, FieldError,
};
use crate::codec::contracts::Cw20ExecuteMsg;
use crate::codec::{decode_contract_call, wasm_execute, WireMessage};
use crate::types::Amount;

/// Mint form data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintData {
    /// Recipient address
    pub to: String,
    /// Amount in whole-token units
    pub amount: Amount,
}

/// Mint governance tokens; requires a token-based DAO
#[derive(Clone, Copy, Debug, Default)]
pub struct Mint;

impl Action for Mint {
    type Data = MintData;

    fn key(&self) -> ActionKey {
        ActionKey::Mint
    }

    fn label(&self) -> &'static str {
        "Mint"
    }

    fn icon(&self) -> &'static str {
        "🌿"
    }

    fn default_data(&self, _ctx: &ActionContext) -> MintData {
        MintData {
            to: String::new(),
            amount: Amount::from_whole(1),
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &MintData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "to", &data.to);
        let token = ctx.governance_token();
        check_positive(&mut errors, "amount", &data.amount, token.map(|t| t.decimals));
        if token.is_none() {
            errors.push(FieldError::new("amount", "governance token is not loaded"));
        }
        errors
    }

    fn encode(&self, ctx: &ActionContext, data: &MintData) -> ActionResult<Vec<WireMessage>> {
        let token = ctx
            .governance_token()
            .ok_or_else(|| ActionError::unavailable(self.key(), "no governance token"))?;
        let amount = data.amount.to_micro(token.decimals)?;

        let msg = wasm_execute(
            &token.denom,
            &Cw20ExecuteMsg::Mint {
                recipient: data.to.clone(),
                amount,
            },
            vec![],
        )?;
        Ok(vec![msg])
    }

    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<MintData>>> {
        let Some(token) = ctx.governance_token() else {
            return Ok(None);
        };
        let Some(call) = msgs.first().and_then(decode_contract_call::<Cw20ExecuteMsg>) else {
            return Ok(None);
        };
        if call.contract != token.denom || !call.funds.is_empty() {
            return Ok(None);
        }
        let Cw20ExecuteMsg::Mint { recipient, amount } = call.msg else {
            return Ok(None);
        };

        Ok(Some(Decoded::single(MintData {
            to: recipient,
            amount: Amount::from_micro(amount, token.decimals)?,
        })))
    }
}
