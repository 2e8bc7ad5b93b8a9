//! Wrapping contract-call payloads into wire messages and back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{BankMsg, Binary, CodecResult, WasmMsg, WireMessage};
use crate::types::Coin;

/// Build a `wasm.execute` message carrying `msg` as its JSON payload
///
/// # Errors
/// Returns error if `msg` cannot be serialized
pub fn wasm_execute<T: Serialize + ?Sized>(
    contract: impl Into<String>,
    msg: &T,
    funds: Vec<Coin>,
) -> CodecResult<WireMessage> {
    Ok(WireMessage::Wasm(WasmMsg::Execute {
        contract_addr: contract.into(),
        msg: Binary::from_json(msg)?,
        funds,
    }))
}

/// Build a `bank.send` message
#[must_use]
pub fn bank_send(to_address: impl Into<String>, amount: Vec<Coin>) -> WireMessage {
    WireMessage::Bank(BankMsg::Send {
        to_address: to_address.into(),
        amount,
    })
}

/// A decoded `wasm.execute` message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall<'a, T> {
    /// Target contract
    pub contract: &'a str,
    /// Parsed payload
    pub msg: T,
    /// Coins attached to the call
    pub funds: &'a [Coin],
}

/// Unwrap a `wasm.execute` message whose payload parses as `T`.
///
/// Returns `None` for any other message, or when the payload is not a `T`.
#[must_use]
pub fn decode_contract_call<T: DeserializeOwned>(msg: &WireMessage) -> Option<ContractCall<'_, T>> {
    let WireMessage::Wasm(WasmMsg::Execute {
        contract_addr,
        msg,
        funds,
    }) = msg
    else {
        return None;
    };

    let payload = msg.parse_json().ok()?;
    Some(ContractCall {
        contract: contract_addr,
        msg: payload,
        funds,
    })
}
