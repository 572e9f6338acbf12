//! Conversations
//!
//! A conversation spans several units of work of one session. It starts
//! transient (torn down with its unit of work) and becomes long-running on
//! `begin`, after which later units of work resume it by propagating its id.
//!
//! ```text
//!            begin                    end
//! Transient ───────► LongRunning ───────► Transient ──► torn down at dissociate
//!                        │
//!                        └── idle > timeout ──► evicted
//! ```

pub mod handle;
pub mod manager;
pub mod session;

pub use handle::Conversation;
pub use manager::{ConversationAssociation, ConversationManager, ConversationSettings};
pub use session::Session;
