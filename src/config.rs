//! Extraction configuration, optionally loaded from TOML.
//!
//! ```toml
//! max_triples = 250000
//! parse_timeout_ms = 30000   # accepted, not enforced
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Limits applied to each graph before extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Reject graphs with more statements than this. `None` means unlimited.
    pub max_triples: Option<usize>,
    /// Reserved for a parse deadline. Nothing enforces it.
    pub parse_timeout_ms: Option<u64>,
}

impl ExtractionConfig {
    /// Replace the triple limit, e.g. from a command-line flag.
    pub fn with_max_triples(mut self, limit: usize) -> Self {
        self.max_triples = Some(limit);
        self
    }

    /// Parse a TOML document. Unknown keys are rejected.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        if let Some(ms) = config.parse_timeout_ms {
            tracing::debug!(parse_timeout_ms = ms, "parse timeout configured but not enforced");
        }
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
