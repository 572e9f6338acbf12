//! Container bootstrap
//!
//! The composition root. [`ContainerBuilder`] collects classes, beans,
//! observers, custom contexts and collaborators, then wires the engines
//! and runs deployment:
//!
//! ```text
//! register observers ─► BeforeBeanDiscovery ─► register beans
//!   ─► AfterBeanDiscovery ─► definition validation
//!   ─► AfterDeploymentValidation ─► @Initialized(Application)
//! ```
//!
//! The application context is activated before the first container event
//! so application-scoped extensions can observe discovery. A failed
//! deployment deactivates it again and returns the error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let container = ContainerBuilder::new(ConfigLoader::new().load()?)
//!     .declare_class(ClassInfo::new("Document"))
//!     .bean(ContextualType::from_fn(metadata, create))
//!     .observer(observer)
//!     .build()?;
//!
//! let unit = container.begin_unit_of_work(Some(&container.new_session()), None)?;
//! container.fire(FiredEvent::new(document, TypeDescriptor::class("Document")))?;
//! unit.end()?;
//! container.shutdown()?;
//! ```

use crate::config::AppConfig;
use crate::infrastructure::{
    NoTransactionServices, PermissiveSerialization, spawn_conversation_reaper,
};
use beanwire_application::{
    BeanRegistry, Context, ContextManager, ContextualReference, ContextualType,
    ConversationManager, DefinitionValidator, EventDispatcher, EventHandle, ObserverMethod,
    ObserverRegistry, PassivationValidator, ScopeLifecycle, Session, TypeAssignability,
    UnitOfWork,
};
use beanwire_domain::entities::{ClassInfo, FiredEvent, TypeHierarchy};
use beanwire_domain::error::{Error, Result};
use beanwire_domain::events::ContainerLifecycleEvent;
use beanwire_domain::ports::{
    SharedBeanMetadataProvider, SharedSerializationFacility, SharedTransactionServices,
};
use beanwire_domain::value_objects::{BeanId, TypeDescriptor};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Collects the deployment and builds a [`Container`]
pub struct ContainerBuilder {
    config: AppConfig,
    hierarchy: TypeHierarchy,
    beans: Vec<ContextualType>,
    observers: Vec<ObserverMethod>,
    contexts: Vec<Arc<dyn Context>>,
    transactions: Option<SharedTransactionServices>,
    serialization: Option<SharedSerializationFacility>,
}

impl ContainerBuilder {
    /// Empty deployment using `config`
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            hierarchy: TypeHierarchy::new(),
            beans: Vec::new(),
            observers: Vec::new(),
            contexts: Vec::new(),
            transactions: None,
            serialization: None,
        }
    }

    /// Replace the class hierarchy
    pub fn with_type_hierarchy(mut self, hierarchy: TypeHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Declare one class of the hierarchy
    pub fn declare_class(mut self, info: impl Into<ClassInfo>) -> Self {
        self.hierarchy.declare(info);
        self
    }

    /// Add a bean
    pub fn bean(mut self, bean: ContextualType) -> Self {
        self.beans.push(bean);
        self
    }

    /// Add an observer method
    pub fn observer(mut self, observer: ObserverMethod) -> Self {
        self.observers.push(observer);
        self
    }

    /// Add a context for a custom scope
    pub fn context(mut self, context: Arc<dyn Context>) -> Self {
        self.contexts.push(context);
        self
    }

    /// Use `transactions` instead of [`NoTransactionServices`]
    pub fn with_transactions(mut self, transactions: SharedTransactionServices) -> Self {
        self.transactions = Some(transactions);
        self
    }

    /// Use `serialization` instead of [`PermissiveSerialization`]
    pub fn with_serialization(mut self, serialization: SharedSerializationFacility) -> Self {
        self.serialization = Some(serialization);
        self
    }

    /// Wire the engines and deploy
    pub fn build(self) -> Result<Container> {
        info!("Building container");

        let config = Arc::new(self.config);
        let hierarchy = Arc::new(self.hierarchy);

        // ====================================================================
        // Registries
        // ====================================================================

        let beans = Arc::new(BeanRegistry::new());
        let metadata: SharedBeanMetadataProvider = beans.clone();
        let observers = Arc::new(
            ObserverRegistry::new(TypeAssignability::new(hierarchy), metadata)
                .with_cache(config.events.resolution_cache),
        );

        // ====================================================================
        // Engines
        // ====================================================================

        let passivation = config.contexts.validate_passivation.then(|| {
            let serialization = self
                .serialization
                .unwrap_or_else(|| Arc::new(PermissiveSerialization));
            Arc::new(PassivationValidator::new(serialization))
        });
        let contexts = Arc::new(ContextManager::new(beans.clone(), passivation.clone()));
        for context in self.contexts {
            contexts.add_context(context);
        }
        let transactions = self
            .transactions
            .unwrap_or_else(|| Arc::new(NoTransactionServices));
        let dispatcher = Arc::new(EventDispatcher::new(
            observers.clone(),
            contexts.clone(),
            transactions.clone(),
        ));
        let conversations = Arc::new(ConversationManager::new(
            config.conversation.settings(),
            contexts.clone(),
            dispatcher.clone(),
        ));
        let lifecycle = ScopeLifecycle::new(
            contexts.clone(),
            dispatcher.clone(),
            conversations.clone(),
        );

        info!("Created engines");

        // ====================================================================
        // Deployment
        // ====================================================================

        contexts.application().activate();
        let deployment = Deployment {
            beans: &beans,
            observers: &observers,
            dispatcher: &dispatcher,
            passivation: passivation.as_deref(),
        };
        if let Err(e) = deployment.run(self.observers, self.beans) {
            error!(error = %e, kind = e.as_label(), "Deployment failed");
            contexts.application().deactivate();
            return Err(e);
        }
        lifecycle.announce_application();

        info!(
            beans = beans.len(),
            observers = observers.len(),
            "Container started"
        );

        Ok(Container {
            config,
            beans,
            observers,
            contexts,
            dispatcher,
            conversations,
            lifecycle,
            transactions,
            shut_down: AtomicBool::new(false),
        })
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("config", &self.config)
            .field("beans", &self.beans.len())
            .field("observers", &self.observers.len())
            .field("contexts", &self.contexts.len())
            .finish_non_exhaustive()
    }
}

struct Deployment<'a> {
    beans: &'a BeanRegistry,
    observers: &'a ObserverRegistry,
    dispatcher: &'a EventDispatcher,
    passivation: Option<&'a PassivationValidator>,
}

impl Deployment<'_> {
    fn run(&self, observers: Vec<ObserverMethod>, beans: Vec<ContextualType>) -> Result<()> {
        for observer in observers {
            self.observers.register(observer);
        }
        self.container_event(ContainerLifecycleEvent::BeforeBeanDiscovery)?;

        for bean in beans {
            self.beans.register(bean);
        }
        self.container_event(ContainerLifecycleEvent::AfterBeanDiscovery)?;

        DefinitionValidator::new(self.passivation).validate(self.beans, self.observers)?;
        self.container_event(ContainerLifecycleEvent::AfterDeploymentValidation)
    }

    fn container_event(&self, kind: ContainerLifecycleEvent) -> Result<()> {
        self.dispatcher.fire_container_event(kind, Arc::new(kind))
    }
}

/// A running container
pub struct Container {
    config: Arc<AppConfig>,
    beans: Arc<BeanRegistry>,
    observers: Arc<ObserverRegistry>,
    contexts: Arc<ContextManager>,
    dispatcher: Arc<EventDispatcher>,
    conversations: Arc<ConversationManager>,
    lifecycle: ScopeLifecycle,
    transactions: SharedTransactionServices,
    shut_down: AtomicBool,
}

impl Container {
    // ========================================================================
    // Components
    // ========================================================================

    /// Configuration the container was built with
    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    /// Registered beans
    pub fn beans(&self) -> &Arc<BeanRegistry> {
        &self.beans
    }

    /// Registered observers
    pub fn observers(&self) -> &Arc<ObserverRegistry> {
        &self.observers
    }

    /// Context manager
    pub fn contexts(&self) -> &Arc<ContextManager> {
        &self.contexts
    }

    /// Event dispatcher
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Conversation manager
    pub fn conversations(&self) -> &Arc<ConversationManager> {
        &self.conversations
    }

    /// Scope lifecycle driver
    pub fn lifecycle(&self) -> &ScopeLifecycle {
        &self.lifecycle
    }

    /// Transaction services in use
    pub fn transactions(&self) -> &SharedTransactionServices {
        &self.transactions
    }

    // ========================================================================
    // Events and instances
    // ========================================================================

    /// Fire an application event
    pub fn fire(&self, event: FiredEvent) -> Result<()> {
        self.dispatcher.fire(event)
    }

    /// Event handle for `specified_type`
    pub fn event_handle(&self, specified_type: TypeDescriptor) -> EventHandle {
        EventHandle::new(self.dispatcher.clone(), specified_type)
    }

    /// Client reference to the current instance of a normal-scoped bean
    pub fn reference(&self, bean: &BeanId) -> Result<ContextualReference> {
        self.contexts.reference(bean)
    }

    // ========================================================================
    // Units of work and sessions
    // ========================================================================

    /// Start a unit of work on the calling thread
    pub fn begin_unit_of_work(
        &self,
        session: Option<&Arc<Session>>,
        propagated_cid: Option<&str>,
    ) -> Result<UnitOfWork> {
        if self.is_shut_down() {
            return Err(Error::internal("the container is shut down"));
        }
        self.lifecycle.begin(session, propagated_cid)
    }

    /// Create a session with a random id
    pub fn new_session(&self) -> Arc<Session> {
        self.conversations.create_session(None)
    }

    /// Live session by id
    pub fn session(&self, id: &str) -> Option<Arc<Session>> {
        self.conversations.session(id)
    }

    /// End a session
    pub fn invalidate_session(&self, session: &Session) {
        self.lifecycle.invalidate_session(session);
    }

    /// Spawn the background conversation reaper with the configured period
    pub fn spawn_reaper(&self, token: CancellationToken) -> JoinHandle<()> {
        spawn_conversation_reaper(
            self.conversations.clone(),
            self.config.conversation.reaper_interval(),
            token,
        )
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    /// True once [`Container::shutdown`] ran
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Fire `BeforeShutdown`, end every session and destroy the application context
    ///
    /// Teardown always completes; a failing `BeforeShutdown` observer is
    /// reported afterwards. Calling it again does nothing.
    pub fn shutdown(&self) -> Result<()> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Shutting down container");
        let notified = self.dispatcher.fire_container_event(
            ContainerLifecycleEvent::BeforeShutdown,
            Arc::new(ContainerLifecycleEvent::BeforeShutdown),
        );
        if let Err(e) = &notified {
            warn!(error = %e, "BeforeShutdown observer failed");
        }
        for session in self.conversations.sessions() {
            self.lifecycle.invalidate_session(&session);
        }
        self.lifecycle.stop_application();
        info!("Container shut down");
        notified
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("config", &self.config)
            .field("beans", &self.beans.len())
            .field("observers", &self.observers.len())
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

/// Build an empty container with default configuration
pub fn init_test_container() -> Result<Container> {
    ContainerBuilder::new(AppConfig::default()).build()
}
