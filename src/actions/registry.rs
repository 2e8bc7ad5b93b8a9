//! Ordered catalog of action handlers.
//!
//! Registration order is matching priority. The registry is assembled once
//! through [`RegistryBuilder`] and is read-only afterwards, so it can be
//! shared behind an `Arc` across threads.

use std::fmt;

use tracing::info;

use super::admin::{ClearAdmin, UpdateAdmin};
use super::create_account::CreateFundedAccount;
use super::custom::Custom;
use super::execute::Execute;
use super::instantiate::Instantiate;
use super::migrate::Migrate;
use super::mint::Mint;
use super::spend::Spend;
use super::stake::Stake;
use super::treasury_token::TreasuryToken;
use super::update_info::UpdateInfo;
use super::{handler, ActionHandler, ActionKey};

/// Result type for registry construction
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Collects handlers before the ordering invariants are checked
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: Vec<Box<dyn ActionHandler>>,
}

impl RegistryBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append handlers, keeping the caller's order
    #[must_use]
    pub fn register(mut self, handlers: impl IntoIterator<Item = Box<dyn ActionHandler>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Check invariants and freeze the catalog.
    ///
    /// Keys must be unique, and exactly one catch-all must be registered,
    /// in last position, so every message is classifiable and nothing is
    /// shadowed by it.
    pub fn build(self) -> RegistryResult<ActionRegistry> {
        let mut seen = Vec::with_capacity(self.handlers.len());
        for h in &self.handlers {
            if seen.contains(&h.key()) {
                return Err(RegistryError::DuplicateKey(h.key()));
            }
            seen.push(h.key());
        }

        let catch_alls: Vec<usize> = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_catch_all())
            .map(|(i, _)| i)
            .collect();
        match catch_alls.as_slice() {
            [] => return Err(RegistryError::MissingCatchAll),
            [i] if *i + 1 != self.handlers.len() => {
                return Err(RegistryError::CatchAllNotLast(self.handlers[*i].key()));
            }
            [_] => {}
            [..] => {
                return Err(RegistryError::MultipleCatchAll(
                    catch_alls.iter().map(|&i| self.handlers[i].key()).collect(),
                ));
            }
        }

        info!(
            actions = self.handlers.len(),
            order = ?seen,
            "Action registry built"
        );
        Ok(ActionRegistry {
            handlers: self.handlers,
        })
    }
}

/// Registry of action handlers, in matching order
///
/// Note: Cannot derive Clone or Debug because it contains trait objects
pub struct ActionRegistry {
    handlers: Vec<Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Start assembling a registry
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The full set of governance actions, specific ones first and the raw
    /// catch-all last
    pub fn standard() -> RegistryResult<Self> {
        RegistryBuilder::new()
            .register([
                handler(Spend),
                handler(Mint),
                handler(Stake),
                handler(TreasuryToken::add()),
                handler(TreasuryToken::remove()),
                handler(UpdateInfo),
                handler(CreateFundedAccount),
                handler(Instantiate),
                handler(Migrate),
                handler(UpdateAdmin),
                handler(ClearAdmin),
                handler(Execute),
                handler(Custom),
            ])
            .build()
    }

    /// Handlers in registration order
    #[must_use]
    pub fn list_ordered(&self) -> &[Box<dyn ActionHandler>] {
        &self.handlers
    }

    /// Get handler by key
    #[must_use]
    pub fn get(&self, key: ActionKey) -> Option<&dyn ActionHandler> {
        self.handlers
            .iter()
            .find(|h| h.key() == key)
            .map(std::convert::AsRef::as_ref)
    }

    /// Check if a handler is registered for `key`
    #[must_use]
    pub fn contains(&self, key: ActionKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Always false for a built registry, which holds at least the catch-all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.key()))
            .finish()
    }
}

/// Registry construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two handlers share a key
    #[error("action registered twice: {0}")]
    DuplicateKey(ActionKey),
    /// No handler accepts arbitrary messages
    #[error("no catch-all action registered")]
    MissingCatchAll,
    /// Handlers after the catch-all could never match
    #[error("catch-all action {0} must be registered last")]
    CatchAllNotLast(ActionKey),
    /// More than one catch-all
    #[error("multiple catch-all actions registered: {0:?}")]
    MultipleCatchAll(Vec<ActionKey>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let registry = ActionRegistry::standard().unwrap();
        let keys: Vec<_> = registry.list_ordered().iter().map(|h| h.key()).collect();
        assert_eq!(keys, ActionKey::ALL.to_vec());
        assert_eq!(registry.len(), 13);
        assert!(registry.get(ActionKey::Migrate).is_some());
    }

    #[test]
    fn test_duplicate_key() {
        let err = RegistryBuilder::new()
            .register([handler(Spend), handler(Spend), handler(Custom)])
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKey(ActionKey::Spend));
    }

    #[test]
    fn test_missing_catch_all() {
        let err = RegistryBuilder::new()
            .register([handler(Spend)])
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::MissingCatchAll);
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let err = RegistryBuilder::new()
            .register([handler(Custom), handler(Spend)])
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::CatchAllNotLast(ActionKey::Custom));
    }

    #[test]
    fn test_multiple_catch_alls() {
        use crate::actions::{Action, ActionContext, ActionResult, Decoded};
        use crate::codec::WireMessage;

        struct Swallow;

        impl Action for Swallow {
            type Data = ();

            fn key(&self) -> ActionKey {
                ActionKey::Execute
            }
            fn label(&self) -> &'static str {
                "Swallow"
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
                Ok((!msgs.is_empty()).then(|| Decoded::single(())))
            }
            fn is_catch_all(&self) -> bool {
                true
            }
        }

        let err = RegistryBuilder::new()
            .register([handler(Swallow), handler(Custom)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::MultipleCatchAll(vec![ActionKey::Execute, ActionKey::Custom])
        );
    }

    #[test]
    fn test_builder_keeps_caller_order() {
        let registry = ActionRegistry::builder()
            .register([handler(Migrate)])
            .register([handler(Spend), handler(Custom)])
            .build()
            .unwrap();
        assert_eq!(
            format!("{registry:?}"),
            format!(
                "{:?}",
                [ActionKey::Migrate, ActionKey::Spend, ActionKey::Custom]
            )
        );
        assert!(!registry.contains(ActionKey::Mint));
    }
}
