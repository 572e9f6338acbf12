//! Instance storage of one active normal-scope context
//!
//! A store belongs to one activation: a request, a session, a conversation
//! or the application. Creation is serialized per contextual type so that
//! concurrent callers sharing a store (sessions, the application) still see
//! a single instance.

use super::contextual::{ContextualType, Instance};
use super::creational::CreationalContext;
use crate::utils::lock;
use crate::validation::PassivationValidator;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use dashmap::DashMap;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static IN_CREATION: RefCell<HashSet<(u64, BeanId)>> = RefCell::new(HashSet::new());
}

struct StoredInstance {
    contextual: Arc<ContextualType>,
    instance: Instance,
    creational: CreationalContext,
    sequence: u64,
}

/// Instances of one context activation
pub struct ContextStore {
    id: u64,
    scope: ScopeKind,
    entries: Mutex<HashMap<BeanId, StoredInstance>>,
    creation_locks: DashMap<BeanId, Arc<Mutex<()>>>,
    sequence: AtomicU64,
    validator: Option<Arc<PassivationValidator>>,
}

impl ContextStore {
    /// Empty store for `scope`
    pub fn new(scope: ScopeKind) -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            scope,
            entries: Mutex::new(HashMap::new()),
            creation_locks: DashMap::new(),
            sequence: AtomicU64::new(0),
            validator: None,
        }
    }

    /// Validate new instances with `validator` before storing them
    pub fn with_validator(mut self, validator: Arc<PassivationValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Scope of the store
    pub fn scope(&self) -> &ScopeKind {
        &self.scope
    }

    /// Existing instance of `bean`
    pub fn get_existing(&self, bean: &BeanId) -> Option<Instance> {
        lock(&self.entries).get(bean).map(|e| e.instance.clone())
    }

    /// Existing instance, or a new one built with `creational`
    pub fn get(
        &self,
        contextual: &Arc<ContextualType>,
        creational: Option<&CreationalContext>,
    ) -> Result<Option<Instance>> {
        let bean = contextual.id();
        if let Some(existing) = self.get_existing(bean) {
            return Ok(Some(existing));
        }
        let Some(creational) = creational else {
            return Ok(None);
        };

        let _reentry = CreationGuard::enter(self.id, bean).ok_or_else(|| Error::CircularCreation {
            bean: bean.to_string(),
            scope: self.scope.to_string(),
        })?;
        let creation_lock = self.creation_locks.entry(bean.clone()).or_default().clone();
        let _serialized = lock(&creation_lock);

        if let Some(existing) = self.get_existing(bean) {
            return Ok(Some(existing));
        }
        let instance = contextual.create_instance(creational)?;
        if let Some(validator) = &self.validator {
            if let Err(e) = validator.validate_instance(contextual.metadata(), &instance) {
                contextual.destroy_instance(instance, creational);
                return Err(e);
            }
        }
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).insert(
            bean.clone(),
            StoredInstance {
                contextual: contextual.clone(),
                instance: instance.clone(),
                creational: creational.clone(),
                sequence,
            },
        );
        Ok(Some(instance))
    }

    /// Remove and destroy the instance of `bean`; false when none existed
    pub fn destroy(&self, bean: &BeanId) -> bool {
        let removed = lock(&self.entries).remove(bean);
        match removed {
            Some(entry) => {
                entry
                    .contextual
                    .destroy_instance(entry.instance, &entry.creational);
                true
            }
            None => false,
        }
    }

    /// Destroy every instance, newest first
    pub fn destroy_all(&self) {
        let mut entries: Vec<StoredInstance> = lock(&self.entries).drain().map(|(_, e)| e).collect();
        entries.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        let count = entries.len();
        for entry in entries {
            entry
                .contextual
                .destroy_instance(entry.instance, &entry.creational);
        }
        debug!(scope = %self.scope, count, "Destroyed context store");
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// True when no instance lives in the store
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStore")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("instances", &self.len())
            .finish()
    }
}

/// Marks `(store, bean)` as under construction on this thread
struct CreationGuard {
    key: (u64, BeanId),
}

impl CreationGuard {
    fn enter(store: u64, bean: &BeanId) -> Option<Self> {
        let key = (store, bean.clone());
        let inserted = IN_CREATION.with(|set| set.borrow_mut().insert(key.clone()));
        inserted.then_some(Self { key })
    }
}

impl Drop for CreationGuard {
    fn drop(&mut self) {
        IN_CREATION.with(|set| {
            set.borrow_mut().remove(&self.key);
        });
    }
}
