//! Local Transaction Tests

use crate::support::{LoggingSynchronization, Recorder};
use beanwire_domain::error::Error;
use beanwire_domain::ports::{Synchronization, TransactionOutcome, TransactionServices};
use beanwire_infrastructure::infrastructure::{LocalTransactionManager, NoTransactionServices};
use std::sync::Arc;

fn sync(name: &'static str, recorder: &Recorder) -> Arc<dyn Synchronization> {
    Arc::new(LoggingSynchronization {
        name,
        recorder: recorder.clone(),
    })
}

#[test]
fn test_commit_runs_callbacks_in_phases() {
    let manager = LocalTransactionManager::new();
    let recorder = Recorder::default();

    manager.begin().unwrap();
    assert!(manager.is_transaction_active());
    manager.register_synchronization(sync("a", &recorder)).unwrap();
    manager.register_synchronization(sync("b", &recorder)).unwrap();
    assert_eq!(manager.pending_synchronizations(), 2);

    let outcome = manager.commit().unwrap();

    assert_eq!(outcome, TransactionOutcome::Committed);
    assert!(!manager.is_transaction_active());
    assert_eq!(
        recorder.entries(),
        vec!["a:before", "b:before", "a:Committed", "b:Committed"]
    );
}

#[test]
fn test_rollback_only_commit_rolls_back() {
    let manager = LocalTransactionManager::new();
    let recorder = Recorder::default();

    manager.begin().unwrap();
    manager.register_synchronization(sync("a", &recorder)).unwrap();
    manager.set_rollback_only().unwrap();
    assert!(manager.is_rollback_only());

    assert_eq!(manager.commit().unwrap(), TransactionOutcome::RolledBack);
    assert_eq!(recorder.entries(), vec!["a:before", "a:RolledBack"]);
}

#[test]
fn test_rollback_skips_before_completion() {
    let manager = LocalTransactionManager::new();
    let recorder = Recorder::default();

    manager.begin().unwrap();
    manager.register_synchronization(sync("a", &recorder)).unwrap();
    manager.rollback().unwrap();

    assert_eq!(recorder.entries(), vec!["a:RolledBack"]);
    assert!(!manager.is_transaction_active());
}

/// Registers another callback from its own before-completion
struct Chaining {
    manager: Arc<LocalTransactionManager>,
    recorder: Recorder,
}

impl Synchronization for Chaining {
    fn before_completion(&self) {
        self.recorder.push("chain:before");
        self.manager
            .register_synchronization(sync("late", &self.recorder))
            .unwrap();
        self.manager.set_rollback_only().unwrap();
    }

    fn after_completion(&self, outcome: TransactionOutcome) {
        self.recorder.push(format!("chain:{outcome:?}"));
    }
}

#[test]
fn test_callbacks_registered_during_before_completion_run() {
    let manager = Arc::new(LocalTransactionManager::new());
    let recorder = Recorder::default();

    manager.begin().unwrap();
    manager
        .register_synchronization(Arc::new(Chaining {
            manager: manager.clone(),
            recorder: recorder.clone(),
        }))
        .unwrap();

    assert_eq!(manager.commit().unwrap(), TransactionOutcome::RolledBack);
    assert_eq!(
        recorder.entries(),
        vec!["chain:before", "late:before", "chain:RolledBack", "late:RolledBack"]
    );
}

struct Panicking;

impl Synchronization for Panicking {
    fn before_completion(&self) {
        panic!("before");
    }

    fn after_completion(&self, _outcome: TransactionOutcome) {
        panic!("after");
    }
}

#[test]
fn test_panicking_callback_forces_rollback() {
    let manager = LocalTransactionManager::new();
    let recorder = Recorder::default();

    manager.begin().unwrap();
    manager.register_synchronization(Arc::new(Panicking)).unwrap();
    manager.register_synchronization(sync("b", &recorder)).unwrap();

    assert_eq!(manager.commit().unwrap(), TransactionOutcome::RolledBack);
    assert_eq!(recorder.entries(), vec!["b:before", "b:RolledBack"]);
}

#[test]
fn test_transactions_are_thread_bound() {
    let manager = Arc::new(LocalTransactionManager::new());
    manager.begin().unwrap();

    let other = manager.clone();
    let seen_elsewhere = std::thread::spawn(move || other.is_transaction_active())
        .join()
        .unwrap();

    assert!(!seen_elsewhere);
    assert!(manager.is_transaction_active());
    manager.rollback().unwrap();
}

#[test]
fn test_illegal_operations() {
    let manager = LocalTransactionManager::new();
    assert!(matches!(
        manager.commit(),
        Err(Error::IllegalTransactionOperation { .. })
    ));
    assert!(manager.rollback().is_err());
    assert!(manager.set_rollback_only().is_err());

    manager.begin().unwrap();
    assert!(matches!(
        manager.begin(),
        Err(Error::IllegalTransactionOperation { .. })
    ));
    manager.rollback().unwrap();
}

#[test]
fn test_no_transaction_services() {
    let services = NoTransactionServices;
    let recorder = Recorder::default();
    assert!(!services.is_transaction_active());
    assert!(services.register_synchronization(sync("a", &recorder)).is_err());
    assert!(services.set_rollback_only().is_err());
}
