//! Transaction services
//!
//! [`LocalTransactionManager`] is a small thread-bound transaction manager:
//! `begin` opens a transaction on the calling thread, `commit`/`rollback`
//! complete it and run the registered synchronizations on that same
//! thread. It has no resources of its own; it exists so transactional
//! observers work without an external transaction manager.
//!
//! [`NoTransactionServices`] reports that no transaction is ever active, so
//! every observer is notified immediately.

use beanwire_domain::error::{Error, Result};
use beanwire_domain::ports::{Synchronization, TransactionOutcome, TransactionServices};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, error, info};

#[derive(Default)]
struct LocalTransaction {
    synchronizations: Vec<Arc<dyn Synchronization>>,
    rollback_only: bool,
}

/// Thread-bound local transactions
#[derive(Default)]
pub struct LocalTransactionManager {
    transactions: DashMap<ThreadId, LocalTransaction>,
}

impl LocalTransactionManager {
    /// Manager without open transactions
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction on the calling thread
    pub fn begin(&self) -> Result<()> {
        match self.transactions.entry(thread::current().id()) {
            Entry::Occupied(_) => Err(illegal("a transaction is already active on this thread")),
            Entry::Vacant(slot) => {
                slot.insert(LocalTransaction::default());
                debug!("Transaction begun");
                Ok(())
            }
        }
    }

    /// Complete the calling thread's transaction
    ///
    /// Before-completion callbacks run first, including those registered
    /// while they run. The transaction then commits unless it was marked
    /// rollback-only, and after-completion callbacks receive the outcome.
    pub fn commit(&self) -> Result<TransactionOutcome> {
        let thread = thread::current().id();
        if !self.transactions.contains_key(&thread) {
            return Err(illegal("no transaction is active on this thread"));
        }
        self.run_before_completion(thread);
        let Some((_, transaction)) = self.transactions.remove(&thread) else {
            return Err(illegal("the transaction ended during before-completion"));
        };
        let outcome = if transaction.rollback_only {
            TransactionOutcome::RolledBack
        } else {
            TransactionOutcome::Committed
        };
        run_after_completion(transaction.synchronizations, outcome);
        info!(outcome = ?outcome, "Transaction completed");
        Ok(outcome)
    }

    /// Roll back the calling thread's transaction
    ///
    /// Before-completion callbacks are skipped.
    pub fn rollback(&self) -> Result<()> {
        let Some((_, transaction)) = self.transactions.remove(&thread::current().id()) else {
            return Err(illegal("no transaction is active on this thread"));
        };
        run_after_completion(transaction.synchronizations, TransactionOutcome::RolledBack);
        info!("Transaction rolled back");
        Ok(())
    }

    /// True when the calling thread's transaction is marked for rollback
    pub fn is_rollback_only(&self) -> bool {
        self.transactions
            .get(&thread::current().id())
            .is_some_and(|tx| tx.rollback_only)
    }

    /// Callbacks registered on the calling thread's transaction
    pub fn pending_synchronizations(&self) -> usize {
        self.transactions
            .get(&thread::current().id())
            .map_or(0, |tx| tx.synchronizations.len())
    }

    fn run_before_completion(&self, thread: ThreadId) {
        let mut index = 0;
        loop {
            // No map guard may be held while a callback runs
            let next = self
                .transactions
                .get(&thread)
                .and_then(|tx| tx.synchronizations.get(index).cloned());
            let Some(synchronization) = next else {
                break;
            };
            if catch_unwind(AssertUnwindSafe(|| synchronization.before_completion())).is_err() {
                error!("Synchronization panicked before completion, marking rollback-only");
                if let Some(mut tx) = self.transactions.get_mut(&thread) {
                    tx.rollback_only = true;
                }
            }
            index += 1;
        }
    }
}

impl TransactionServices for LocalTransactionManager {
    fn is_transaction_active(&self) -> bool {
        self.transactions.contains_key(&thread::current().id())
    }

    fn register_synchronization(&self, synchronization: Arc<dyn Synchronization>) -> Result<()> {
        let Some(mut tx) = self.transactions.get_mut(&thread::current().id()) else {
            return Err(illegal("no transaction is active on this thread"));
        };
        tx.synchronizations.push(synchronization);
        Ok(())
    }

    fn set_rollback_only(&self) -> Result<()> {
        let Some(mut tx) = self.transactions.get_mut(&thread::current().id()) else {
            return Err(illegal("no transaction is active on this thread"));
        };
        tx.rollback_only = true;
        debug!("Transaction marked rollback-only");
        Ok(())
    }
}

impl std::fmt::Debug for LocalTransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTransactionManager")
            .field("open", &self.transactions.len())
            .finish()
    }
}

fn run_after_completion(
    synchronizations: Vec<Arc<dyn Synchronization>>,
    outcome: TransactionOutcome,
) {
    for synchronization in synchronizations {
        if catch_unwind(AssertUnwindSafe(|| synchronization.after_completion(outcome))).is_err() {
            error!(outcome = ?outcome, "Synchronization panicked after completion");
        }
    }
}

fn illegal(message: &str) -> Error {
    Error::IllegalTransactionOperation {
        message: message.to_string(),
    }
}

/// Transaction services for deployments without transactions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransactionServices;

impl TransactionServices for NoTransactionServices {
    fn is_transaction_active(&self) -> bool {
        false
    }

    fn register_synchronization(&self, _synchronization: Arc<dyn Synchronization>) -> Result<()> {
        Err(illegal("transactions are not supported"))
    }

    fn set_rollback_only(&self) -> Result<()> {
        Err(illegal("transactions are not supported"))
    }
}
