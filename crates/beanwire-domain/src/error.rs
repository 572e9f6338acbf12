//! Error handling types
//!
//! Every failure surfaced by the container is one of five families:
//!
//! | Family | Variants | Raised |
//! |--------|----------|--------|
//! | Definition | [`Error::Definition`] | while the container is built, before any dispatch |
//! | Resolution | [`Error::UnresolvedTypeVariable`], [`Error::DuplicateQualifier`], [`Error::NotAQualifier`], [`Error::ReservedEventType`] | synchronously to the offending caller |
//! | Activation | [`Error::ContextNotActive`], [`Error::AmbiguousActiveContext`] | synchronously |
//! | Observer invocation | [`Error::ObserverException`], [`Error::ObserverFailed`] | from `fire` for immediate observers only |
//! | Conversation | [`Error::ConversationAlreadyLongRunning`], [`Error::ConversationIdInUse`], [`Error::ConversationNotLongRunning`] | from `begin`/`end`, without state change |
//!
//! A busy or missing propagated conversation is not an error: the unit of
//! work proceeds on a fresh transient conversation and receives a
//! [`ConversationSignal`](crate::value_objects::ConversationSignal).

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error used for foreign failures carried as a source
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for beanwire
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Definition errors
    // ========================================================================
    /// One or more definition problems found while processing beans
    #[error("Definition error: {}", problems.join("; "))]
    Definition {
        /// Every problem found, in discovery order
        problems: Vec<String>,
    },

    // ========================================================================
    // Resolution errors
    // ========================================================================
    /// The runtime type of a fired event still contains a type variable
    #[error("Event type {event_type} contains an unresolved type variable")]
    UnresolvedTypeVariable {
        /// Rendered event type
        event_type: String,
    },

    /// Two instances of the same non-repeatable qualifier type were supplied
    #[error("Duplicate qualifier type: {qualifier}")]
    DuplicateQualifier {
        /// Qualifier type name
        qualifier: String,
    },

    /// An annotation that is not a qualifier was supplied where qualifiers are expected
    #[error("Annotation {annotation} is not a qualifier type")]
    NotAQualifier {
        /// Annotation type name
        annotation: String,
    },

    /// Applications may not fire events assignable to container lifecycle types
    #[error("Event type {event_type} is assignable to container lifecycle type {reserved} and cannot be fired by applications")]
    ReservedEventType {
        /// Rendered event type
        event_type: String,
        /// The reserved type it is assignable to
        reserved: String,
    },

    // ========================================================================
    // Activation errors
    // ========================================================================
    /// No active context exists for the scope on the calling thread
    #[error("No active context for scope {scope}")]
    ContextNotActive {
        /// Scope name
        scope: String,
    },

    /// More than one context is active for the same scope
    #[error("More than one active context for scope {scope} ({count} found)")]
    AmbiguousActiveContext {
        /// Scope name
        scope: String,
        /// Number of active contexts found
        count: usize,
    },

    // ========================================================================
    // Observer invocation errors
    // ========================================================================
    /// A checked failure raised by an observer, wrapped on the way out of `fire`
    #[error("Observer {observer} raised an exception: {source}")]
    ObserverException {
        /// Observer identity
        observer: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// An unchecked failure raised by an observer, propagated as-is
    #[error("{source}")]
    ObserverFailed {
        /// Observer identity
        observer: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// An observer tried to drive the transaction itself
    #[error("Illegal transaction operation: {message}")]
    IllegalTransactionOperation {
        /// Description of the rejected operation
        message: String,
    },

    // ========================================================================
    // Contextual instance errors
    // ========================================================================
    /// Creating a contextual instance failed
    #[error("Failed to create instance of {bean}: {message}")]
    Creation {
        /// Bean identity
        bean: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// A contextual type requested itself while it was being created
    #[error("Circular creation of {bean} detected in scope {scope}")]
    CircularCreation {
        /// Bean identity
        bean: String,
        /// Scope name
        scope: String,
    },

    /// No contextual type is registered under the identity
    #[error("Unknown bean: {bean}")]
    UnknownBean {
        /// Bean identity
        bean: String,
    },

    /// A value stored in a passivating scope cannot be serialized
    #[error("Instance of {bean} is not serializable: {message}")]
    NotSerializable {
        /// Bean identity
        bean: String,
        /// Description of the failure
        message: String,
    },

    // ========================================================================
    // Conversation errors
    // ========================================================================
    /// `begin` was called on a long-running conversation
    #[error("Conversation {cid} is already long-running")]
    ConversationAlreadyLongRunning {
        /// Conversation id
        cid: String,
    },

    /// `begin(id)` collides with another long-running conversation
    #[error("Conversation id {cid} is already in use")]
    ConversationIdInUse {
        /// Conversation id
        cid: String,
    },

    /// `end` was called on a transient conversation
    #[error("Conversation is transient and cannot be ended")]
    ConversationNotLongRunning,

    // ========================================================================
    // Ambient errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Failure of an infrastructure collaborator (files, runtime, subscribers)
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Resolution error creation methods
impl Error {
    /// Create a definition error from a list of problems
    pub fn definition<I, S>(problems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Definition {
            problems: problems.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an unresolved type variable error
    pub fn unresolved_type_variable(event_type: impl ToString) -> Self {
        Self::UnresolvedTypeVariable {
            event_type: event_type.to_string(),
        }
    }

    /// Create a duplicate qualifier error
    pub fn duplicate_qualifier<S: Into<String>>(qualifier: S) -> Self {
        Self::DuplicateQualifier {
            qualifier: qualifier.into(),
        }
    }

    /// Create a not-a-qualifier error
    pub fn not_a_qualifier<S: Into<String>>(annotation: S) -> Self {
        Self::NotAQualifier {
            annotation: annotation.into(),
        }
    }
}

// Activation error creation methods
impl Error {
    /// Create a context-not-active error
    pub fn context_not_active(scope: impl ToString) -> Self {
        Self::ContextNotActive {
            scope: scope.to_string(),
        }
    }

    /// Create an ambiguous-active-context error
    pub fn ambiguous_active_context(scope: impl ToString, count: usize) -> Self {
        Self::AmbiguousActiveContext {
            scope: scope.to_string(),
            count,
        }
    }
}

// Instance error creation methods
impl Error {
    /// Create a creation error
    pub fn creation<S: Into<String>>(bean: impl ToString, message: S) -> Self {
        Self::Creation {
            bean: bean.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a creation error with source
    pub fn creation_with_source<E: std::error::Error + Send + Sync + 'static>(
        bean: impl ToString,
        source: E,
    ) -> Self {
        Self::Creation {
            bean: bean.to_string(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown bean error
    pub fn unknown_bean(bean: impl ToString) -> Self {
        Self::UnknownBean {
            bean: bean.to_string(),
        }
    }

    /// Create a not-serializable error
    pub fn not_serializable<S: Into<String>>(bean: impl ToString, message: S) -> Self {
        Self::NotSerializable {
            bean: bean.to_string(),
            message: message.into(),
        }
    }
}

// Configuration and internal error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl Error {
    /// Returns a short stable label (snake_case) for use in log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::Definition { .. } => "definition",
            Error::UnresolvedTypeVariable { .. } => "unresolved_type_variable",
            Error::DuplicateQualifier { .. } => "duplicate_qualifier",
            Error::NotAQualifier { .. } => "not_a_qualifier",
            Error::ReservedEventType { .. } => "reserved_event_type",
            Error::ContextNotActive { .. } => "context_not_active",
            Error::AmbiguousActiveContext { .. } => "ambiguous_active_context",
            Error::ObserverException { .. } => "observer_exception",
            Error::ObserverFailed { .. } => "observer_failed",
            Error::IllegalTransactionOperation { .. } => "illegal_transaction_operation",
            Error::Creation { .. } => "creation",
            Error::CircularCreation { .. } => "circular_creation",
            Error::UnknownBean { .. } => "unknown_bean",
            Error::NotSerializable { .. } => "not_serializable",
            Error::ConversationAlreadyLongRunning { .. } => "conversation_already_long_running",
            Error::ConversationIdInUse { .. } => "conversation_id_in_use",
            Error::ConversationNotLongRunning => "conversation_not_long_running",
            Error::Json { .. } => "json",
            Error::Configuration { .. } => "configuration",
            Error::Infrastructure { .. } => "infrastructure",
            Error::Internal { .. } => "internal",
        }
    }

    /// True for failures raised by an observer during `fire`
    pub fn is_observer_failure(&self) -> bool {
        matches!(
            self,
            Error::ObserverException { .. } | Error::ObserverFailed { .. }
        )
    }
}
