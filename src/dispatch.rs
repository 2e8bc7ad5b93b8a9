//! Message classification.
//!
//! Walks a proposal's message list with a cursor and asks each registered
//! handler, in registration order, whether it recognizes the messages at
//! the cursor. The first handler that claims a run wins; the cursor moves
//! past the run and the search restarts from the first handler.

use std::ops::Range;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::actions::{ActionKey, ActionRegistry};
use crate::codec::WireMessage;
use crate::context::ActionContext;

/// Result type for classification
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// One recognized action within a message list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classified {
    /// Action that claimed the messages
    pub key: ActionKey,
    /// Recovered form data
    pub data: Value,
    /// Indices of the claimed messages
    pub span: Range<usize>,
}

/// Classify every message in `msgs`.
///
/// A handler error is logged and counts as a decline, so a message that
/// trips up a specific action still falls through to a more general one.
/// Likewise a handler that claims zero messages, or more than remain, is
/// ignored.
pub fn classify(
    registry: &ActionRegistry,
    ctx: &ActionContext,
    msgs: &[WireMessage],
) -> ClassifyResult<Vec<Classified>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    while cursor < msgs.len() {
        let remaining = &msgs[cursor..];
        let mut claimed = None;

        for h in registry.list_ordered() {
            let matched = match h.match_messages(ctx, remaining) {
                Ok(Some(matched)) => matched,
                Ok(None) => continue,
                Err(e) => {
                    warn!(
                        action = %h.key(),
                        index = cursor,
                        error = %e,
                        "Action failed to decode message, trying next"
                    );
                    continue;
                }
            };

            if matched.consumed == 0 || matched.consumed > remaining.len() {
                warn!(
                    action = %h.key(),
                    index = cursor,
                    consumed = matched.consumed,
                    remaining = remaining.len(),
                    "Action claimed an impossible message count, ignoring"
                );
                continue;
            }

            debug!(
                action = %h.key(),
                index = cursor,
                consumed = matched.consumed,
                category = remaining[0].category(),
                "Matched messages"
            );
            claimed = Some((h.key(), matched));
            break;
        }

        let Some((key, matched)) = claimed else {
            return Err(ClassifyError::Unclassified {
                index: cursor,
                message: Box::new(msgs[cursor].clone()),
            });
        };

        let end = cursor + matched.consumed;
        out.push(Classified {
            key,
            data: matched.data,
            span: cursor..end,
        });
        cursor = end;
    }

    Ok(out)
}

/// Classification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// No registered action recognized the message
    #[error("no action matches message {index} ({})", .message.category())]
    Unclassified {
        /// Position in the input list
        index: usize,
        /// The message itself
        message: Box<WireMessage>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::spend::Spend;
    use crate::actions::testing::ctx;
    use crate::actions::{handler, Action, ActionResult, Decoded, RegistryBuilder};
    use crate::codec::bank_send;
    use crate::types::Coin;
    use proptest::prelude::*;
    use serde_json::json;

    fn msgs() -> Vec<WireMessage> {
        vec![
            bank_send("juno1alice", vec![Coin::new(1_000_000u128, "ujuno")]),
            WireMessage::from_json(json!({"ibc": {"close_channel": {"channel_id": "c"}}})).unwrap(),
            bank_send("juno1bob", vec![Coin::new(2_500_000u128, "ujuno")]),
        ]
    }

    #[test]
    fn test_classifies_in_order() {
        let registry = ActionRegistry::standard().unwrap();
        let classified = classify(&registry, &ctx(), &msgs()).unwrap();

        let keys: Vec<_> = classified.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![ActionKey::Spend, ActionKey::Custom, ActionKey::Spend]);
        assert_eq!(classified[2].span, 2..3);
        assert_eq!(classified[2].data["amount"], "2.5");
    }

    #[test]
    fn test_empty_input() {
        let registry = ActionRegistry::standard().unwrap();
        assert!(classify(&registry, &ctx(), &[]).unwrap().is_empty());
    }

    /// Claims everything, including messages it was not given
    struct Greedy;

    impl Action for Greedy {
        type Data = ();

        fn key(&self) -> ActionKey {
            ActionKey::Custom
        }
        fn label(&self) -> &'static str {
            "Greedy"
        }
        fn icon(&self) -> &'static str {
            ""
        }
        fn default_data(&self, _ctx: &ActionContext) {}
        fn encode(&self, _ctx: &ActionContext, _data: &()) -> ActionResult<Vec<WireMessage>> {
            Ok(vec![])
        }
        fn decode(
            &self,
            _ctx: &ActionContext,
            msgs: &[WireMessage],
        ) -> ActionResult<Option<Decoded<()>>> {
            Ok(Some(Decoded {
                consumed: msgs.len() + 1,
                data: (),
            }))
        }
        fn is_catch_all(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_overreaching_handler_is_ignored() {
        let registry = RegistryBuilder::new()
            .register([handler(Spend), handler(Greedy)])
            .build()
            .unwrap();

        let err = classify(&registry, &ctx(), &msgs()).unwrap_err();
        let ClassifyError::Unclassified { index, message } = err;
        assert_eq!(index, 1);
        assert_eq!(message.category(), "opaque");
    }

    proptest! {
        #[test]
        fn prop_classification_is_deterministic(
            picks in proptest::collection::vec(0usize..3, 0..12)
        ) {
            let pool = msgs();
            let input: Vec<_> = picks.iter().map(|&i| pool[i].clone()).collect();
            let registry = ActionRegistry::standard().unwrap();
            let ctx = ctx();

            let first = classify(&registry, &ctx, &input).unwrap();
            let second = classify(&registry, &ctx, &input).unwrap();
            prop_assert_eq!(&first, &second);

            // Spans tile the input exactly.
            let mut next = 0;
            for c in &first {
                prop_assert_eq!(c.span.start, next);
                next = c.span.end;
            }
            prop_assert_eq!(next, input.len());
        }
    }
}
