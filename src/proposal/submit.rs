//! Turning a draft into the messages of a proposal.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::ProposalDraft;
use crate::actions::{ActionError, ActionKey, ActionRegistry};
use crate::codec::contracts::ProposalExecuteMsg;
use crate::codec::{wasm_execute, CodecResult, WireMessage};
use crate::context::ActionContext;

/// Result type for submission
pub type SubmitResult<T> = Result<T, SubmitError>;

/// An action in the draft failed to encode; nothing is submitted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("action {position} ({key}) failed to encode: {source}")]
pub struct SubmitError {
    /// Position of the failing action
    pub position: usize,
    /// Its action key
    pub key: ActionKey,
    /// Underlying failure
    #[source]
    pub source: ActionError,
}

impl ProposalDraft {
    /// Encode every action in order and concatenate the messages.
    ///
    /// Stops at the first failing action and returns nothing partial.
    pub fn encode_all(
        &self,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> SubmitResult<Vec<WireMessage>> {
        let mut msgs = Vec::new();
        for (position, instance) in self.iter().enumerate() {
            let key = instance.action_key;
            let encoded = registry
                .get(key)
                .ok_or_else(|| ActionError::UnknownKey(key.to_string()))
                .and_then(|h| h.encode(ctx, &instance.data));

            match encoded {
                Ok(encoded) => msgs.extend(encoded),
                Err(source) => {
                    error!(position, action = %key, error = %source, "Failed to encode action");
                    return Err(SubmitError {
                        position,
                        key,
                        source,
                    });
                }
            }
        }
        Ok(msgs)
    }
}

/// A proposal ready to be submitted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSubmission {
    /// Title
    pub title: String,
    /// Description (markdown)
    pub description: String,
    /// Messages executed if the proposal passes
    pub msgs: Vec<WireMessage>,
}

impl ProposalSubmission {
    /// Encode a draft into a submission
    pub fn build(
        title: impl Into<String>,
        description: impl Into<String>,
        draft: &ProposalDraft,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> SubmitResult<Self> {
        let msgs = draft.encode_all(registry, ctx)?;
        let submission = Self {
            title: title.into(),
            description: description.into(),
            msgs,
        };
        info!(
            title = %submission.title,
            actions = draft.len(),
            messages = submission.msgs.len(),
            "Proposal assembled"
        );
        Ok(submission)
    }

    /// Wrap into the `propose` call on a proposal module
    ///
    /// # Errors
    /// Returns error if the payload cannot be serialized
    pub fn into_propose_message(self, proposal_module: &str) -> CodecResult<WireMessage> {
        wasm_execute(
            proposal_module,
            &ProposalExecuteMsg::Propose {
                title: self.title,
                description: self.description,
                msgs: self.msgs,
            },
            vec![],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{address, config, ctx};
    use crate::codec::decode_contract_call;
    use crate::context::ActionContext;
    use serde_json::json;

    #[test]
    fn test_encode_all_flattens_in_order() {
        let registry = ActionRegistry::standard().unwrap();
        let ctx = ctx();
        let mut draft = ProposalDraft::new();
        draft.add(
            ActionKey::Spend,
            json!({"to": address(1), "amount": "2", "denom": "ujuno"}),
        );
        draft.add(
            ActionKey::ClearAdmin,
            json!({"contract": address(2)}),
        );

        let msgs = draft.encode_all(&registry, &ctx).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].category(), "bank");
        assert_eq!(msgs[1].category(), "wasm");
    }

    #[test]
    fn test_first_failure_aborts() {
        let registry = ActionRegistry::standard().unwrap();
        let mut config = config();
        config.governance_token = None;
        let ctx = ActionContext::new(config);

        let mut draft = ProposalDraft::new();
        draft.add(ActionKey::ClearAdmin, json!({"contract": address(2)}));
        draft.add(ActionKey::Mint, json!({"to": address(1), "amount": "1"}));
        draft.add(ActionKey::Spend, json!({"to": 7}));

        let err = draft.encode_all(&registry, &ctx).unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.key, ActionKey::Mint);
        assert!(matches!(err.source, ActionError::Unavailable { .. }));
    }

    #[test]
    fn test_propose_message() {
        let registry = ActionRegistry::standard().unwrap();
        let ctx = ctx();
        let mut draft = ProposalDraft::new();
        draft.add(ActionKey::ClearAdmin, json!({"contract": address(2)}));

        let submission =
            ProposalSubmission::build("Lock contract", "Remove admin", &draft, &registry, &ctx)
                .unwrap();
        let wrapped = submission.clone().into_propose_message("juno1proposals").unwrap();

        let call = decode_contract_call::<ProposalExecuteMsg>(&wrapped).unwrap();
        assert_eq!(call.contract, "juno1proposals");
        let ProposalExecuteMsg::Propose { title, msgs, .. } = call.msg;
        assert_eq!(title, "Lock contract");
        assert_eq!(msgs, submission.msgs);
    }
}
