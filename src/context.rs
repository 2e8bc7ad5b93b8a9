//! Read-only chain data handed to every action.
//!
//! Encoding and matching are pure functions. Anything they need from the
//! chain (token decimals, the DAO's current config) is fetched beforehand
//! and placed here. Missing entries make the dependent action report
//! itself unavailable instead of guessing.

use std::collections::BTreeMap;

use crate::codec::contracts::DaoConfig;
use crate::config::{ChainConfig, TokenInfo, TokenKind};

/// Snapshot of chain data used by encode and match
#[derive(Clone, Debug)]
pub struct ActionContext {
    config: ChainConfig,
    native: TokenInfo,
    tokens: BTreeMap<String, TokenInfo>,
    dao_info: Option<DaoConfig>,
}

impl ActionContext {
    /// Build a context from config; the native token and every configured
    /// token are registered immediately.
    #[must_use]
    pub fn new(config: ChainConfig) -> Self {
        let native = config.native_token();
        let extra = config.tokens.clone();
        let mut ctx = Self {
            config,
            tokens: BTreeMap::from([(native.denom.clone(), native.clone())]),
            native,
            dao_info: None,
        };
        for token in extra {
            ctx.insert_token(token);
        }
        ctx
    }

    /// Register a token whose metadata finished loading.
    ///
    /// The native denomination always comes from [`ChainConfig`].
    pub fn insert_token(&mut self, token: TokenInfo) {
        if token.denom == self.native.denom {
            return;
        }
        self.tokens.insert(token.denom.clone(), token);
    }

    /// Attach the DAO's current display config
    #[must_use]
    pub fn with_dao_info(mut self, info: DaoConfig) -> Self {
        self.dao_info = Some(info);
        self
    }

    /// Chain configuration
    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Look up a token by bank denom or cw20 address
    #[must_use]
    pub fn token(&self, denom: &str) -> Option<&TokenInfo> {
        self.tokens.get(denom)
    }

    /// Look up a cw20 token by contract address
    #[must_use]
    pub fn cw20(&self, address: &str) -> Option<&TokenInfo> {
        self.token(address).filter(|t| t.kind == TokenKind::Cw20)
    }

    /// All known tokens, ordered by denom
    pub fn tokens(&self) -> impl Iterator<Item = &TokenInfo> {
        self.tokens.values()
    }

    /// Native staking token
    #[must_use]
    pub fn native_token(&self) -> &TokenInfo {
        &self.native
    }

    /// Governance cw20, if the DAO has one and its metadata is loaded
    #[must_use]
    pub fn governance_token(&self) -> Option<&TokenInfo> {
        self.config
            .governance_token
            .as_deref()
            .and_then(|address| self.cw20(address))
    }

    /// DAO core contract address
    #[must_use]
    pub fn dao_address(&self) -> &str {
        &self.config.dao_address
    }

    /// Address prefix for validation
    #[must_use]
    pub fn bech32_prefix(&self) -> &str {
        &self.config.bech32_prefix
    }

    /// DAO display config, if loaded
    #[must_use]
    pub fn dao_info(&self) -> Option<&DaoConfig> {
        self.dao_info.as_ref()
    }
}
