//! Deserializable store configuration.
//!
//! Embed [`StoreConfig`] in an application's config file, or read it from the
//! environment, then hand it to
//! [`RecordStoreBuilder::from_config`](crate::RecordStoreBuilder::from_config).

use crate::error::{Error, Result};
use crate::store::PersistPolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming the backing file.
pub const ENV_PATH: &str = "RECORD_STORE_PATH";
/// Environment variable toggling pretty-printed output.
pub const ENV_PRETTY: &str = "RECORD_STORE_PRETTY";
/// Environment variable toggling fsync on every write.
pub const ENV_SYNC: &str = "RECORD_STORE_SYNC";
/// Environment variable selecting the strict persistence policy.
pub const ENV_STRICT: &str = "RECORD_STORE_STRICT";

/// Where and how the store keeps its backing file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Backing file location.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Indent the JSON snapshot.
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// fsync each snapshot before acknowledging a mutation.
    #[serde(default = "default_true")]
    pub sync: bool,
    /// Fail (and roll back) a mutation whose snapshot could not be written.
    #[serde(default)]
    pub strict_persistence: bool,
}

fn default_path() -> PathBuf {
    PathBuf::from("data/articles.json")
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            pretty: true,
            sync: true,
            strict_persistence: false,
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `RECORD_STORE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(path) = lookup(ENV_PATH) {
            cfg.path = PathBuf::from(path);
        }
        if let Some(v) = lookup(ENV_PRETTY) {
            cfg.pretty = parse_flag(ENV_PRETTY, &v)?;
        }
        if let Some(v) = lookup(ENV_SYNC) {
            cfg.sync = parse_flag(ENV_SYNC, &v)?;
        }
        if let Some(v) = lookup(ENV_STRICT) {
            cfg.strict_persistence = parse_flag(ENV_STRICT, &v)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects an empty backing-file path.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("backing file path is empty".into()));
        }
        Ok(())
    }

    /// Persistence policy implied by `strict_persistence`.
    pub fn policy(&self) -> PersistPolicy {
        if self.strict_persistence {
            PersistPolicy::Strict
        } else {
            PersistPolicy::Lenient
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{key}: expected a boolean, got `{other}`"))),
    }
}
