//! Proposal drafts.
//!
//! A draft is the ordered list of actions a user is composing. Instances
//! live in an arena keyed by a stable [`InstanceId`]; the order vector
//! decides their position. Form field paths are namespaced by position
//! (`"0.amount"`, `"1.to"`, ...) and are always recomputed from the order,
//! so removing or moving an instance re-indexes everything after it while
//! ids held by callers stay valid.

pub mod submit;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::actions::{ActionError, ActionKey, ActionRegistry, FieldError};
use crate::codec::WireMessage;
use crate::context::ActionContext;
use crate::dispatch::{classify, ClassifyResult};

pub use submit::{ProposalSubmission, SubmitError, SubmitResult};

/// Result type for draft operations
pub type DraftResult<T> = Result<T, DraftError>;

/// Stable handle to an action within a draft
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One action placed in a draft
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInstance {
    /// Stable handle
    pub id: InstanceId,
    /// Which action this is
    pub action_key: ActionKey,
    /// Current form data
    pub data: Value,
}

/// Serialized form of one draft entry, as read from and written to files
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    /// Action key
    pub action: ActionKey,
    /// Form data
    pub data: Value,
}

/// The actions of a proposal being composed
#[derive(Clone, Debug, Default)]
pub struct ProposalDraft {
    instances: BTreeMap<InstanceId, ActionInstance>,
    order: Vec<InstanceId>,
    next_id: u64,
}

impl ProposalDraft {
    /// Create an empty draft
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action with the given form data
    pub fn add(&mut self, action_key: ActionKey, data: Value) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(
            id,
            ActionInstance {
                id,
                action_key,
                data,
            },
        );
        self.order.push(id);
        debug!(
            instance = %id,
            action = %action_key,
            position = self.order.len() - 1,
            "Action added"
        );
        id
    }

    /// Append an action with its default form data
    pub fn add_default(
        &mut self,
        registry: &ActionRegistry,
        ctx: &ActionContext,
        action_key: ActionKey,
    ) -> DraftResult<InstanceId> {
        let handler = registry
            .get(action_key)
            .ok_or_else(|| DraftError::UnknownAction(action_key))?;
        let data = handler.default_data(ctx)?;
        Ok(self.add(action_key, data))
    }

    /// Remove an action; later actions move up one position
    pub fn remove(&mut self, id: InstanceId) -> DraftResult<ActionInstance> {
        let position = self.position(id).ok_or(DraftError::UnknownInstance(id))?;
        self.order.remove(position);
        let instance = self
            .instances
            .remove(&id)
            .ok_or(DraftError::UnknownInstance(id))?;
        debug!(instance = %id, position, "Action removed");
        Ok(instance)
    }

    /// Move an action to `position`, shifting the others
    pub fn move_to(&mut self, id: InstanceId, position: usize) -> DraftResult<()> {
        let from = self.position(id).ok_or(DraftError::UnknownInstance(id))?;
        if position >= self.order.len() {
            return Err(DraftError::PositionOutOfRange {
                position,
                len: self.order.len(),
            });
        }
        let id = self.order.remove(from);
        self.order.insert(position, id);
        Ok(())
    }

    /// Get an action by id
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&ActionInstance> {
        self.instances.get(&id)
    }

    /// Get the action at `position`
    #[must_use]
    pub fn at(&self, position: usize) -> Option<&ActionInstance> {
        self.order.get(position).and_then(|id| self.instances.get(id))
    }

    /// Replace an action's form data
    pub fn update(&mut self, id: InstanceId, data: Value) -> DraftResult<()> {
        let instance = self
            .instances
            .get_mut(&id)
            .ok_or(DraftError::UnknownInstance(id))?;
        instance.data = data;
        Ok(())
    }

    /// Actions in proposal order
    pub fn iter(&self) -> impl Iterator<Item = &ActionInstance> {
        self.order.iter().filter_map(|id| self.instances.get(id))
    }

    /// Current position of an action
    #[must_use]
    pub fn position(&self, id: InstanceId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Number of actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check for an empty draft
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Field path prefix of an action, e.g. `"2."`
    pub fn field_path(&self, id: InstanceId) -> DraftResult<String> {
        self.position(id)
            .map(|i| format!("{i}."))
            .ok_or(DraftError::UnknownInstance(id))
    }

    /// Split a namespaced path such as `"2.amount"` into the action it
    /// belongs to and the path within that action's form
    pub fn resolve_field_path<'a>(&self, path: &'a str) -> DraftResult<(InstanceId, &'a str)> {
        let invalid = || DraftError::InvalidFieldPath(path.to_string());
        let (index, rest) = path.split_once('.').ok_or_else(invalid)?;
        let position: usize = index.parse().map_err(|_| invalid())?;
        let id = self.order.get(position).copied().ok_or_else(invalid)?;
        Ok((id, rest))
    }

    /// Validate every action, namespacing field errors by position
    pub fn validate_all(
        &self,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> DraftResult<Vec<FieldError>> {
        let mut errors = Vec::new();
        for (position, instance) in self.iter().enumerate() {
            let handler = registry
                .get(instance.action_key)
                .ok_or(DraftError::UnknownAction(instance.action_key))?;
            let prefix = format!("{position}.");
            errors.extend(
                handler
                    .validate(ctx, &instance.data)?
                    .into_iter()
                    .map(|e| e.prefixed(&prefix)),
            );
        }
        Ok(errors)
    }

    /// Rebuild a draft from an existing proposal's messages
    pub fn from_messages(
        registry: &ActionRegistry,
        ctx: &ActionContext,
        msgs: &[WireMessage],
    ) -> ClassifyResult<Self> {
        let mut draft = Self::new();
        for classified in classify(registry, ctx, msgs)? {
            draft.add(classified.key, classified.data);
        }
        Ok(draft)
    }

    /// Build a draft from file entries
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = DraftEntry>) -> Self {
        let mut draft = Self::new();
        for entry in entries {
            draft.add(entry.action, entry.data);
        }
        draft
    }

    /// Entries in proposal order, for writing to files
    #[must_use]
    pub fn to_entries(&self) -> Vec<DraftEntry> {
        self.iter()
            .map(|i| DraftEntry {
                action: i.action_key,
                data: i.data.clone(),
            })
            .collect()
    }
}

/// Draft errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// Id not present in this draft
    #[error("no action {0} in draft")]
    UnknownInstance(InstanceId),
    /// No handler registered for the key
    #[error("action not registered: {0}")]
    UnknownAction(ActionKey),
    /// Target position past the end
    #[error("position {position} out of range for {len} actions")]
    PositionOutOfRange {
        /// Requested position
        position: usize,
        /// Draft length
        len: usize,
    },
    /// Path is not `"{position}.{field}"` for an existing position
    #[error("invalid field path: {0:?}")]
    InvalidFieldPath(String),
    /// Handler rejected the data
    #[error(transparent)]
    Action(#[from] ActionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::ctx;
    use serde_json::json;

    fn draft_of(n: usize) -> (ProposalDraft, Vec<InstanceId>) {
        let mut draft = ProposalDraft::new();
        let ids = (0..n)
            .map(|i| draft.add(ActionKey::Custom, json!({"message": format!("{{\"n\":{i}}}")})))
            .collect();
        (draft, ids)
    }

    #[test]
    fn test_remove_reindexes_later_only() {
        let (mut draft, ids) = draft_of(4);
        assert_eq!(draft.field_path(ids[2]).unwrap(), "2.");

        let removed = draft.remove(ids[1]).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert_eq!(draft.len(), 3);

        assert_eq!(draft.field_path(ids[0]).unwrap(), "0.");
        assert_eq!(draft.field_path(ids[2]).unwrap(), "1.");
        assert_eq!(draft.field_path(ids[3]).unwrap(), "2.");
        assert_eq!(
            draft.field_path(ids[1]),
            Err(DraftError::UnknownInstance(ids[1]))
        );

        // Data follows the id, not the position.
        assert_eq!(draft.get(ids[2]).unwrap().data["message"], "{\"n\":2}");
    }

    #[test]
    fn test_ids_are_never_reused() {
        let (mut draft, ids) = draft_of(2);
        draft.remove(ids[1]).unwrap();
        let fresh = draft.add(ActionKey::Custom, json!({}));
        assert!(!ids.contains(&fresh));
    }

    #[test]
    fn test_move_to() {
        let (mut draft, ids) = draft_of(3);
        draft.move_to(ids[2], 0).unwrap();
        let order: Vec<_> = draft.iter().map(|i| i.id).collect();
        assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
        assert_eq!(draft.at(1).unwrap().id, ids[0]);

        assert_eq!(
            draft.move_to(ids[0], 3),
            Err(DraftError::PositionOutOfRange { position: 3, len: 3 })
        );
    }

    #[test]
    fn test_resolve_field_path() {
        let (draft, ids) = draft_of(3);
        assert_eq!(draft.resolve_field_path("2.amount").unwrap(), (ids[2], "amount"));
        assert_eq!(
            draft.resolve_field_path("0.funds.1.denom").unwrap(),
            (ids[0], "funds.1.denom")
        );
        assert!(draft.resolve_field_path("3.amount").is_err());
        assert!(draft.resolve_field_path("amount").is_err());
        assert!(draft.resolve_field_path("x.amount").is_err());
    }

    #[test]
    fn test_update() {
        let (mut draft, ids) = draft_of(1);
        draft.update(ids[0], json!({"message": "{}"})).unwrap();
        assert_eq!(draft.get(ids[0]).unwrap().data, json!({"message": "{}"}));
    }

    #[test]
    fn test_validate_all_prefixes_paths() {
        let registry = ActionRegistry::standard().unwrap();
        let ctx = ctx();
        let mut draft = ProposalDraft::new();
        draft.add_default(&registry, &ctx, ActionKey::Custom).unwrap();
        draft.add_default(&registry, &ctx, ActionKey::Spend).unwrap();

        let paths: Vec<_> = draft
            .validate_all(&registry, &ctx)
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(paths, vec!["0.message", "1.to", "1.amount"]);
    }

    #[test]
    fn test_entries_roundtrip() {
        let (draft, _) = draft_of(2);
        let rebuilt = ProposalDraft::from_entries(draft.to_entries());
        assert_eq!(rebuilt.to_entries(), draft.to_entries());
    }
}
