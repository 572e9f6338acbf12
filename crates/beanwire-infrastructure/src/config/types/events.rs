//! Event bus configuration types

use serde::{Deserialize, Serialize};

/// Event bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Cache observer resolution results per (event type, qualifiers)
    pub resolution_cache: bool,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            resolution_cache: true,
        }
    }
}
