//! Conversation value objects

use serde::{Deserialize, Serialize};

/// Conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConversationState {
    /// Lives for a single unit of work
    #[default]
    Transient,
    /// Promoted by `begin`; survives across units of work of its session
    LongRunning,
}

/// Condition signalled when a propagated conversation could not be used
///
/// The caller is still associated with a fresh transient conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationSignal {
    /// The conversation is bound to another unit of work
    Busy {
        /// Propagated id
        cid: String,
    },
    /// No live conversation has the propagated id
    Missing {
        /// Propagated id
        cid: String,
    },
}

impl ConversationSignal {
    /// Propagated id the signal is about
    pub fn cid(&self) -> &str {
        match self {
            ConversationSignal::Busy { cid } | ConversationSignal::Missing { cid } => cid,
        }
    }
}
