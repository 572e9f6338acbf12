//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Container semantics defaults are defined in `beanwire_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "beanwire.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "beanwire";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "BEANWIRE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "BEANWIRE_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File name stem used when the log file path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "beanwire";

// ============================================================================
// CONVERSATION CONSTANTS
// ============================================================================

/// Default period of the background conversation reaper in milliseconds
pub const CONVERSATION_REAPER_INTERVAL_MS: u64 = 60_000;
