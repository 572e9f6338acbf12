//! Configuration
//!
//! [`AppConfig`] and its sections, loaded by [`ConfigLoader`] from defaults,
//! a TOML file and `BEANWIRE_*` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, ContextsConfig, ConversationConfig, EventsConfig, LoggingConfig};
