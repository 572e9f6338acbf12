//! Ambient (non-transactional) state of the calling code
//!
//! Security identity and free-form attributes that travel with a fired
//! event into deferred observer notifications, which run later on whatever
//! thread completes the transaction.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

thread_local! {
    static CURRENT: RefCell<AmbientState> = RefCell::new(AmbientState::default());
}

/// Principal and attributes installed on the current thread
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientState {
    principal: Option<Arc<str>>,
    attributes: BTreeMap<Arc<str>, Arc<str>>,
}

impl AmbientState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the principal
    pub fn with_principal(mut self, principal: impl Into<Arc<str>>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Set an attribute
    pub fn with_attribute(mut self, key: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Principal, if any
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Attribute by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(AsRef::as_ref)
    }

    /// Snapshot of the current thread's state
    pub fn current() -> Self {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Install on the current thread until the guard drops
    pub fn install(self) -> AmbientGuard {
        let previous = CURRENT.with(|current| current.replace(self));
        AmbientGuard {
            previous: Some(previous),
        }
    }
}

/// Restores the previously installed ambient state on drop
#[must_use = "the ambient state is restored when the guard drops"]
pub struct AmbientGuard {
    previous: Option<AmbientState>,
}

impl Drop for AmbientGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            CURRENT.with(|current| {
                current.replace(previous);
            });
        }
    }
}
