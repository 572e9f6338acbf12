//! Domain layer constants
//!
//! Defaults that belong to the container semantics and are shared by the
//! application layer. Infrastructure-specific constants remain in
//! `beanwire_infrastructure::constants`.

// ============================================================================
// CONVERSATION CONSTANTS
// ============================================================================

/// Default idle timeout of a long-running conversation in milliseconds (10 minutes)
pub const CONVERSATION_DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Default time a unit of work waits for a busy conversation in milliseconds
pub const CONVERSATION_CONCURRENT_ACCESS_TIMEOUT_MS: u64 = 1_000;

/// Name of the request parameter carrying a propagated conversation id
pub const CONVERSATION_ID_PARAMETER: &str = "cid";

// ============================================================================
// EVENT CONSTANTS
// ============================================================================

/// Class name of the injectable event handle; injecting it raw is a definition error
pub const EVENT_HANDLE_CLASS: &str = "Event";
