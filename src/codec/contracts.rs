//! JSON payloads of the contracts a DAO talks to.
//!
//! Only the variants the actions produce or recognize are modeled. Unknown
//! fields are rejected so a payload is only claimed when re-encoding it
//! loses nothing.

use serde::{Deserialize, Serialize};

use super::WireMessage;
use crate::types::Uint128;

/// cw20 token contract calls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Cw20ExecuteMsg {
    /// Move tokens from the caller to `recipient`
    Transfer {
        /// Receiving address
        recipient: String,
        /// Micro-denominated amount
        amount: Uint128,
    },
    /// Create new tokens (caller must be the minter)
    Mint {
        /// Receiving address
        recipient: String,
        /// Micro-denominated amount
        amount: Uint128,
    },
}

/// DAO core contract calls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum DaoCoreExecuteMsg {
    /// Change the set of cw20 tokens shown in the treasury
    UpdateCw20List {
        /// Token contracts to add
        to_add: Vec<String>,
        /// Token contracts to remove
        to_remove: Vec<String>,
    },
    /// Replace the DAO's display configuration
    UpdateConfig {
        /// New configuration
        config: DaoConfig,
    },
}

/// DAO display configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaoConfig {
    /// DAO name
    pub name: String,
    /// Longer description
    pub description: String,
    /// Logo URL; the key must be present, `null` for none
    #[serde(deserialize_with = "super::required_option")]
    pub image_url: Option<String>,
    /// Track cw20 tokens received by the treasury automatically
    pub automatically_add_cw20s: bool,
    /// Track cw721 collections received by the treasury automatically
    pub automatically_add_cw721s: bool,
}

/// Instantiate payload of a DAO-owned sub-account contract
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountInstantiateMsg {
    /// Account owner
    pub owner: String,
}

/// Proposal module calls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalExecuteMsg {
    /// Open a new proposal
    Propose {
        /// Proposal title
        title: String,
        /// Proposal description (markdown)
        description: String,
        /// Messages executed if the proposal passes
        msgs: Vec<WireMessage>,
    },
}
