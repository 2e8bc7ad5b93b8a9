//! Spend: send native or cw20 tokens from the treasury.

use serde::{Deserialize, Serialize};

use super::{
    check_address, check_positive, Action, ActionContext, ActionError, ActionKey, ActionResult,
    Decoded, FieldError,
};
use crate::codec::contracts::Cw20ExecuteMsg;
use crate::codec::{bank_send, decode_contract_call, wasm_execute, BankMsg, WireMessage};
use crate::config::TokenKind;
use crate::types::{Amount, Coin};

/// Spend form data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendData {
    /// Recipient address
    pub to: String,
    /// Amount in whole-token units
    pub amount: Amount,
    /// Bank denom or cw20 contract address
    pub denom: String,
}

/// Treasury spend
#[derive(Clone, Copy, Debug, Default)]
pub struct Spend;

impl Action for Spend {
    type Data = SpendData;

    fn key(&self) -> ActionKey {
        ActionKey::Spend
    }

    fn label(&self) -> &'static str {
        "Spend"
    }

    fn icon(&self) -> &'static str {
        "💵"
    }

    fn default_data(&self, ctx: &ActionContext) -> SpendData {
        SpendData {
            to: String::new(),
            amount: Amount::zero(),
            denom: ctx.native_token().denom.clone(),
        }
    }

    fn validate(&self, ctx: &ActionContext, data: &SpendData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "to", &data.to);
        let token = ctx.token(&data.denom);
        check_positive(&mut errors, "amount", &data.amount, token.map(|t| t.decimals));
        if token.is_none() {
            errors.push(FieldError::new("denom", "unknown token"));
        }
        errors
    }

    fn encode(&self, ctx: &ActionContext, data: &SpendData) -> ActionResult<Vec<WireMessage>> {
        let token = ctx.token(&data.denom).ok_or_else(|| {
            ActionError::unavailable(self.key(), format!("no metadata for {}", data.denom))
        })?;
        let amount = data.amount.to_micro(token.decimals)?;

        let msg = match token.kind {
            TokenKind::Native => bank_send(&data.to, vec![Coin::new(amount, &data.denom)]),
            TokenKind::Cw20 => wasm_execute(
                &data.denom,
                &Cw20ExecuteMsg::Transfer {
                    recipient: data.to.clone(),
                    amount,
                },
                vec![],
            )?,
        };
        Ok(vec![msg])
    }

    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<SpendData>>> {
        let Some(msg) = msgs.first() else {
            return Ok(None);
        };

        if let WireMessage::Bank(BankMsg::Send { to_address, amount }) = msg {
            let [coin] = amount.as_slice() else {
                return Ok(None);
            };
            let Some(token) = ctx.token(&coin.denom).filter(|t| t.kind == TokenKind::Native)
            else {
                return Ok(None);
            };
            return Ok(Some(Decoded::single(SpendData {
                to: to_address.clone(),
                amount: Amount::from_micro(coin.amount, token.decimals)?,
                denom: coin.denom.clone(),
            })));
        }

        let Some(call) = decode_contract_call::<Cw20ExecuteMsg>(msg) else {
            return Ok(None);
        };
        let (Cw20ExecuteMsg::Transfer { recipient, amount }, Some(token), []) =
            (call.msg, ctx.cw20(call.contract), call.funds)
        else {
            return Ok(None);
        };

        Ok(Some(Decoded::single(SpendData {
            to: recipient,
            amount: Amount::from_micro(amount, token.decimals)?,
            denom: call.contract.to_string(),
        })))
    }
}
