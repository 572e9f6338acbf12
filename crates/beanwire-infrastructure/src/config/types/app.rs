//! Main application configuration

use serde::{Deserialize, Serialize};

pub use super::contexts::ContextsConfig;
pub use super::conversation::ConversationConfig;
pub use super::events::EventsConfig;
pub use super::logging::LoggingConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Event bus configuration
    #[serde(default)]
    pub events: EventsConfig,
    /// Context configuration
    #[serde(default)]
    pub contexts: ContextsConfig,
    /// Conversation configuration
    #[serde(default)]
    pub conversation: ConversationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
