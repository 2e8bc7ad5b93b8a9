//! TOML chain configuration.
//!
//! Actions need a little read-only knowledge about the chain and the DAO:
//! the address prefix, the native denomination, the DAO's contract
//! addresses and code IDs, and the decimals of the tokens it holds. This
//! is loaded once from a TOML file (or built in code) and handed to the
//! pipeline through [`crate::ActionContext`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default decimal count of native staking denominations
pub const DEFAULT_NATIVE_DECIMALS: u32 = 6;

/// File name looked up in the user config directory
pub const CONFIG_FILE_NAME: &str = "chain.toml";

/// Kind of token a denomination refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bank-module denomination
    Native,
    /// cw20 contract; the denom is the contract address
    Cw20,
}

/// Display and precision data for one token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Bank denom, or cw20 contract address
    pub denom: String,
    /// Ticker shown to users
    pub symbol: String,
    /// Number of decimal places between whole and micro units
    #[serde(default = "default_native_decimals")]
    pub decimals: u32,
    /// Native or cw20
    #[serde(default = "default_token_kind")]
    pub kind: TokenKind,
}

impl TokenInfo {
    /// Create a native token entry
    #[must_use]
    pub fn native(denom: impl Into<String>, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            denom: denom.into(),
            symbol: symbol.into(),
            decimals,
            kind: TokenKind::Native,
        }
    }

    /// Create a cw20 token entry
    #[must_use]
    pub fn cw20(address: impl Into<String>, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            denom: address.into(),
            symbol: symbol.into(),
            decimals,
            kind: TokenKind::Cw20,
        }
    }
}

/// Chain and DAO configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain identifier
    pub chain_id: String,
    /// Bech32 human-readable prefix for addresses
    pub bech32_prefix: String,
    /// Native staking denomination
    pub native_denom: String,
    /// Ticker of the native denomination
    #[serde(default = "default_native_symbol")]
    pub native_symbol: String,
    /// Decimals of the native denomination (default: 6)
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u32,
    /// DAO core contract address
    pub dao_address: String,
    /// Governance cw20 token address (token-based DAOs only)
    #[serde(default)]
    pub governance_token: Option<String>,
    /// Code ID used for DAO sub-accounts
    #[serde(default)]
    pub account_code_id: Option<u64>,
    /// Proposal module that receives `propose` calls
    #[serde(default)]
    pub proposal_module: Option<String>,
    /// Additional tokens the DAO holds
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
}

fn default_native_decimals() -> u32 {
    DEFAULT_NATIVE_DECIMALS
}

fn default_native_symbol() -> String {
    "NATIVE".to_string()
}

fn default_token_kind() -> TokenKind {
    TokenKind::Native
}

impl ChainConfig {
    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not a valid config
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Save to a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Native token entry
    #[must_use]
    pub fn native_token(&self) -> TokenInfo {
        TokenInfo::native(&self.native_denom, &self.native_symbol, self.native_decimals)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.bech32_prefix.is_empty() {
            return Err(ConfigError::Invalid("bech32_prefix is empty".to_string()));
        }
        if self.native_denom.is_empty() {
            return Err(ConfigError::Invalid("native_denom is empty".to_string()));
        }
        if let Some(token) = self
            .tokens
            .iter()
            .find(|t| t.decimals > crate::types::MAX_DECIMALS)
        {
            return Err(ConfigError::Invalid(format!(
                "token {} has {} decimals",
                token.denom, token.decimals
            )));
        }
        Ok(())
    }
}

/// Default config path: `<config dir>/dao-actions/chain.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dao-actions").join(CONFIG_FILE_NAME))
}

/// Create a default local-testnet config
#[must_use]
pub fn default_testnet_config() -> ChainConfig {
    ChainConfig {
        chain_id: "uni-6".to_string(),
        bech32_prefix: "juno".to_string(),
        native_denom: "ujunox".to_string(),
        native_symbol: "JUNOX".to_string(),
        native_decimals: DEFAULT_NATIVE_DECIMALS,
        dao_address: "<dao-core-address>".to_string(),
        governance_token: None,
        account_code_id: None,
        proposal_module: None,
        tokens: Vec::new(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML could not be parsed or produced
    #[error("parse error: {0}")]
    Parse(String),
    /// Parsed but inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}
