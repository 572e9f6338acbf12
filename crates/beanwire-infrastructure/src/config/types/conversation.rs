//! Conversation configuration types

use crate::constants::CONVERSATION_REAPER_INTERVAL_MS;
use beanwire_application::ConversationSettings;
use beanwire_domain::constants::{
    CONVERSATION_CONCURRENT_ACCESS_TIMEOUT_MS, CONVERSATION_DEFAULT_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Conversation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Idle timeout of a long-running conversation (milliseconds)
    pub default_timeout_ms: u64,

    /// How long a unit of work waits for a busy conversation (milliseconds, 0 rejects at once)
    pub concurrent_access_timeout_ms: u64,

    /// Period of the background reaper (milliseconds)
    pub reaper_interval_ms: u64,
}

impl ConversationConfig {
    /// Settings handed to the conversation manager
    pub fn settings(&self) -> ConversationSettings {
        ConversationSettings {
            default_timeout: Duration::from_millis(self.default_timeout_ms),
            concurrent_access_timeout: Duration::from_millis(self.concurrent_access_timeout_ms),
        }
    }

    /// Reaper period
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_millis(self.reaper_interval_ms)
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: CONVERSATION_DEFAULT_TIMEOUT_MS,
            concurrent_access_timeout_ms: CONVERSATION_CONCURRENT_ACCESS_TIMEOUT_MS,
            reaper_interval_ms: CONVERSATION_REAPER_INTERVAL_MS,
        }
    }
}
