//! Registry configuration.
//!
//! ## Environment
//!
//! - `ATOMSPACE_ROOT_NAME`: name of the Global root atom (default: `global`)
//! - `ATOMSPACE_DUPLICATE_NAMES`: `reject` or `replace` (default: `reject`)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::path::{validate_name, NameError};

/// Default name of the Global root atom.
pub const DEFAULT_ROOT_NAME: &str = "global";

const ENV_ROOT_NAME: &str = "ATOMSPACE_ROOT_NAME";
const ENV_DUPLICATE_NAMES: &str = "ATOMSPACE_DUPLICATE_NAMES";

/// What the registry does when a new atom's path is already indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Refuse to create a sibling with an existing name.
    #[default]
    Reject,
    /// Create it anyway; the path index points at the newest atom while both
    /// stay reachable by id.
    Replace,
}

impl DuplicateNamePolicy {
    /// Parse policy from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "replace" | "last_write_wins" => Some(Self::Replace),
            _ => None,
        }
    }
}

impl fmt::Display for DuplicateNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

/// Error loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Root name is not a valid path segment.
    #[error("Invalid root name: {0}")]
    InvalidRootName(#[from] NameError),
    /// Unrecognized duplicate-name policy.
    #[error("Unknown duplicate name policy: {0:?} (expected \"reject\" or \"replace\")")]
    UnknownDuplicatePolicy(String),
}

/// Configuration for an [`AtomRegistry`](crate::registry::AtomRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Name of the Global root atom; first segment of every path.
    pub root_name: String,
    /// Handling of sibling name collisions.
    pub duplicate_names: DuplicateNamePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            duplicate_names: DuplicateNamePolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Config with a custom root name and default policy.
    pub fn with_root_name(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            ..Self::default()
        }
    }

    /// Set the duplicate-name policy.
    pub fn duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
        self.duplicate_names = policy;
        self
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root_name) = lookup(ENV_ROOT_NAME) {
            config.root_name = root_name;
        }
        if let Some(raw) = lookup(ENV_DUPLICATE_NAMES) {
            config.duplicate_names = DuplicateNamePolicy::from_str(&raw)
                .ok_or(ConfigError::UnknownDuplicatePolicy(raw))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can build a registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_name(&self.root_name)?;
        Ok(())
    }
}
