//! Add or remove a cw20 token from the treasury display list.

use serde::{Deserialize, Serialize};

use super::{check_address, Action, ActionContext, ActionKey, ActionResult, Decoded, FieldError};
use crate::codec::contracts::DaoCoreExecuteMsg;
use crate::codec::{decode_contract_call, wasm_execute, WireMessage};

/// Treasury token form data
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTokenData {
    /// cw20 contract address
    pub address: String,
}

/// Whether the token is being added or removed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Add,
    Remove,
}

/// Update the DAO's cw20 list with a single token
#[derive(Clone, Copy, Debug)]
pub struct TreasuryToken {
    mode: Mode,
}

impl TreasuryToken {
    /// Action that adds a token
    #[must_use]
    pub const fn add() -> Self {
        Self { mode: Mode::Add }
    }

    /// Action that removes a token
    #[must_use]
    pub const fn remove() -> Self {
        Self { mode: Mode::Remove }
    }
}

impl Action for TreasuryToken {
    type Data = TreasuryTokenData;

    fn key(&self) -> ActionKey {
        match self.mode {
            Mode::Add => ActionKey::AddTreasuryToken,
            Mode::Remove => ActionKey::RemoveTreasuryToken,
        }
    }

    fn label(&self) -> &'static str {
        match self.mode {
            Mode::Add => "Display Token Balance in Treasury",
            Mode::Remove => "Stop Displaying Token Balance in Treasury",
        }
    }

    fn icon(&self) -> &'static str {
        match self.mode {
            Mode::Add => "🔘",
            Mode::Remove => "⭕️",
        }
    }

    fn default_data(&self, _ctx: &ActionContext) -> TreasuryTokenData {
        TreasuryTokenData::default()
    }

    fn validate(&self, ctx: &ActionContext, data: &TreasuryTokenData) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_address(&mut errors, ctx, "address", &data.address);
        errors
    }

    fn encode(
        &self,
        ctx: &ActionContext,
        data: &TreasuryTokenData,
    ) -> ActionResult<Vec<WireMessage>> {
        let (to_add, to_remove) = match self.mode {
            Mode::Add => (vec![data.address.clone()], vec![]),
            Mode::Remove => (vec![], vec![data.address.clone()]),
        };
        let msg = wasm_execute(
            ctx.dao_address(),
            &DaoCoreExecuteMsg::UpdateCw20List { to_add, to_remove },
            vec![],
        )?;
        Ok(vec![msg])
    }

    fn decode(
        &self,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ActionResult<Option<Decoded<TreasuryTokenData>>> {
        let Some(call) = msgs.first().and_then(decode_contract_call::<DaoCoreExecuteMsg>) else {
            return Ok(None);
        };
        if call.contract != ctx.dao_address() || !call.funds.is_empty() {
            return Ok(None);
        }
        let DaoCoreExecuteMsg::UpdateCw20List { to_add, to_remove } = call.msg else {
            return Ok(None);
        };

        let (mut claimed, other) = match self.mode {
            Mode::Add => (to_add, to_remove),
            Mode::Remove => (to_remove, to_add),
        };
        if claimed.len() != 1 || !other.is_empty() {
            return Ok(None);
        }

        Ok(claimed.pop().map(|address| Decoded::single(TreasuryTokenData { address })))
    }
}
