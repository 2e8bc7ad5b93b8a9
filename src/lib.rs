//! # DAO proposal actions
//!
//! Translates between the actions a DAO member composes in a proposal form
//! (spend, mint, migrate a contract, ...) and the chain messages the DAO
//! executes when the proposal passes.
//!
//! ## Architecture
//!
//! - **Actions** describe one kind of operation each: default form data,
//!   validation, encoding to messages and recognizing messages again
//! - **Registry** holds the actions in matching priority, with the raw
//!   catch-all last
//! - **Dispatcher** classifies an existing proposal's messages back into
//!   actions, first match wins
//! - **Drafts** hold the actions being composed and aggregate them into a
//!   submission
//!
//! Encoding and matching are pure: everything they need from the chain is
//! resolved beforehand into an [`ActionContext`].

#![forbid(unsafe_code)]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(clippy::pedantic, clippy::nursery, missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Token decimals are small and bounded
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    // Const fn not always beneficial for complex types
    clippy::missing_const_for_fn,
    // Self methods kept for API consistency even if unused
    clippy::unused_self,
    // must_use on every fn is excessive
    clippy::must_use_candidate,
    // Pass by value is fine for small Copy types
    clippy::needless_pass_by_value,
    // Field naming matches chain message terminology
    clippy::struct_field_names,
    // Match arms with same body are sometimes clearer separate
    clippy::match_same_arms
)]

pub mod actions;
pub mod codec;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod proposal;
pub mod types;

pub use actions::{
    handler, Action, ActionError, ActionHandler, ActionKey, ActionRegistry, Decoded, FieldError,
    RegistryBuilder, RegistryError,
};
pub use codec::{Binary, CodecError, WireMessage};
pub use config::{ChainConfig, ConfigError, TokenInfo, TokenKind};
pub use context::ActionContext;
pub use dispatch::{classify, Classified, ClassifyError};
pub use proposal::{
    ActionInstance, DraftEntry, DraftError, InstanceId, ProposalDraft, ProposalSubmission,
    SubmitError,
};
pub use types::{Amount, AmountError, Coin, Uint128};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
