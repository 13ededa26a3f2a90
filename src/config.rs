//! Configuration for a console session.
//!
//! Every field has a default, so an empty file, a partial file, or no file at all is
//! accepted.

use serde::Deserialize;
use tracing::{info, warn};

use crate::buffer::Overflow;
use crate::error::ConfigError;
use crate::key::KeyStrategyKind;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub accounts: AccountsConfig,
    pub inbox: InboxConfig,
    pub trash: TrashConfig,
    pub mailbox: MailboxConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Fixed number of buckets in the account table.
    pub bucket_count: usize,
    pub key_strategy: KeyStrategyKind,
}

/// Notebooks received from other accounts, waiting to be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    pub capacity: usize,
    pub overflow: Overflow,
}

/// Deleted notebooks kept for undo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrashConfig {
    pub capacity: usize,
    pub overflow: Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: AccountsConfig::default(),
            inbox: InboxConfig::default(),
            trash: TrashConfig::default(),
            mailbox: MailboxConfig::default(),
        }
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            bucket_count: 64,
            key_strategy: KeyStrategyKind::Positional,
        }
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            overflow: Overflow::Reject,
        }
    }
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            overflow: Overflow::Evict,
        }
    }
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    Config::from_toml(&source)
}

/// Loads `path` if given, falling back to the defaults when it cannot be read or parsed.
pub fn load_config_or_default(path: Option<&str>) -> Config {
    match path {
        Some(path) => match load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from: {}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}. Using defaults.", path, e);
                Config::default()
            }
        },
        None => Config::default(),
    }
}
