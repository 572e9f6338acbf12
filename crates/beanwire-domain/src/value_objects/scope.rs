//! Scope kinds
//!
//! Normal scopes cache one instance per contextual type per active context
//! and are reached through an indirection handle. The `Dependent`
//! pseudo-scope never caches. Passivating scopes may outlive a single unit
//! of work and therefore require passivation capable beans.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle/sharing policy of a contextual type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScopeKind {
    /// Pseudo-scope: a fresh instance per injection, owned by the creator
    #[default]
    Dependent,
    /// One instance per unit of work
    Request,
    /// One instance per session, shared by the session's units of work
    Session,
    /// One instance per conversation
    Conversation,
    /// One instance per container, shared by every thread
    Application,
    /// A user-provided normal scope
    Custom {
        /// Scope name
        name: Arc<str>,
        /// Whether instances of this scope may be passivated
        passivating: bool,
    },
}

impl ScopeKind {
    /// Create a custom normal scope
    pub fn custom(name: impl Into<Arc<str>>, passivating: bool) -> Self {
        Self::Custom {
            name: name.into(),
            passivating,
        }
    }

    /// True for every scope except the `Dependent` pseudo-scope
    pub fn is_normal(&self) -> bool {
        !matches!(self, ScopeKind::Dependent)
    }

    /// True for scopes whose instances may be passivated
    pub fn is_passivating(&self) -> bool {
        match self {
            ScopeKind::Session | ScopeKind::Conversation => true,
            ScopeKind::Custom { passivating, .. } => *passivating,
            _ => false,
        }
    }

    /// Human-readable scope name
    pub fn name(&self) -> &str {
        match self {
            ScopeKind::Dependent => "Dependent",
            ScopeKind::Request => "RequestScoped",
            ScopeKind::Session => "SessionScoped",
            ScopeKind::Conversation => "ConversationScoped",
            ScopeKind::Application => "ApplicationScoped",
            ScopeKind::Custom { name, .. } => name,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
