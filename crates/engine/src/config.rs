//! Engine configuration via `overlay.toml`
//!
//! Two policies are configurable. Both have defaults, so an empty file (or
//! no file at all) is a valid configuration.

use overlay_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "overlay.toml";

/// When a logical write notifies the host's dirty tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyPolicy {
    /// Skip the notification (and the rewrite) when the serialized value
    /// equals what is already stored
    #[default]
    CompareBeforeMark,
    /// Notify on every write
    AlwaysMark,
}

/// What happens when two fields of one overlay share a store key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail the declaration with `DuplicateStoreKey`
    #[default]
    Reject,
    /// Keep both fields; the later declaration owns the key for reads.
    /// Logged as a warning.
    LastWins,
}

/// Engine configuration loaded from `overlay.toml`.
///
/// # Example
///
/// ```toml
/// # "compare_before_mark" (default) or "always_mark"
/// dirty_policy = "compare_before_mark"
///
/// # "reject" (default) or "last_wins"
/// store_key_collisions = "reject"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Dirty notification policy.
    #[serde(default)]
    pub dirty_policy: DirtyPolicy,
    /// Store key collision policy.
    #[serde(default)]
    pub store_key_collisions: CollisionPolicy,
}

impl OverlayConfig {
    /// Set the dirty notification policy
    pub fn with_dirty_policy(mut self, policy: DirtyPolicy) -> Self {
        self.dirty_policy = policy;
        self
    }

    /// Set the store key collision policy
    pub fn with_store_key_collisions(mut self, policy: CollisionPolicy) -> Self {
        self.store_key_collisions = policy;
        self
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Overlay engine configuration
#
# Dirty policy: "compare_before_mark" (default) or "always_mark"
#   "compare_before_mark" = a write that stores the same string is a no-op
#   "always_mark"         = every write marks the physical attribute dirty
dirty_policy = "compare_before_mark"

# Store key collisions: "reject" (default) or "last_wins"
#   "reject"    = declaring two fields on one store key is an error
#   "last_wins" = allowed with a warning; the later field owns the key
store_key_collisions = "reject"
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or unknown policy values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize this config to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::InvalidConfig(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
