//! Transaction Services Port
//!
//! The transaction manager is an external collaborator. The container only
//! needs to know whether a transaction is open, to register completion
//! callbacks on it, and to mark it for rollback on an observer's request.
//! Beginning, committing and rolling back are never exposed to observers.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome reported to after-completion callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// The transaction committed
    Committed,
    /// The transaction rolled back
    RolledBack,
}

/// Completion callback registered on the open transaction
pub trait Synchronization: Send + Sync {
    /// Called before the transaction starts completing
    fn before_completion(&self);

    /// Called once the transaction completed
    fn after_completion(&self, outcome: TransactionOutcome);
}

/// Ambient transaction manager as seen by the container
///
/// # Example
///
/// ```no_run
/// use beanwire_domain::ports::TransactionServices;
///
/// fn defer_or_run(tx: &dyn TransactionServices) -> &'static str {
///     if tx.is_transaction_active() { "deferred" } else { "immediate" }
/// }
/// ```
pub trait TransactionServices: Send + Sync {
    /// True when the calling thread has an open transaction
    fn is_transaction_active(&self) -> bool;

    /// Register a completion callback on the calling thread's transaction
    fn register_synchronization(&self, synchronization: Arc<dyn Synchronization>) -> Result<()>;

    /// Mark the calling thread's transaction for rollback
    fn set_rollback_only(&self) -> Result<()>;
}

/// Shared transaction services for dependency injection
pub type SharedTransactionServices = Arc<dyn TransactionServices>;
