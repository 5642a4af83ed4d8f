//! Engine configuration, persisted as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProofError, ProofResult};

/// Configuration of an [`Engine`](crate::engine::Engine) and its renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Spaces per nesting level when rendering proofs.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Reject inferences whose premises were not concluded earlier in the file.
    #[serde(default)]
    pub chronological: bool,
    /// Print justifications next to inference names.
    #[serde(default = "default_show_justifications")]
    pub show_justifications: bool,
}

fn default_indent() -> usize {
    2
}
fn default_show_justifications() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            chronological: false,
            show_justifications: default_show_justifications(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> ProofResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ProofError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ProofError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ProofResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ProofError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ProofError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn validate(&self) -> ProofResult<()> {
        if self.indent == 0 {
            return Err(ProofError::InvalidConfig {
                message: "indent must be at least 1".into(),
            });
        }
        Ok(())
    }
}
