//! Context configuration types

use serde::{Deserialize, Serialize};

/// Context configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextsConfig {
    /// Check passivating beans at deployment and their instances on creation
    pub validate_passivation: bool,
}

impl Default for ContextsConfig {
    fn default() -> Self {
        Self {
            validate_passivation: true,
        }
    }
}
