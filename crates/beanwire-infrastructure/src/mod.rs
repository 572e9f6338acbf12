//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the two engines of
//! `beanwire-application`.
//!
//! ### Configuration & Composition
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | figment-based configuration from TOML and environment |
//! | [`di`] | the [`Container`] composition root |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//!
//! ### Collaborators
//! | Module | Description |
//! |--------|-------------|
//! | [`infrastructure`] | local transactions, serialization facilities, conversation reaper |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod infrastructure;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use di::{Container, ContainerBuilder};
pub use error_ext::ErrorContext;
