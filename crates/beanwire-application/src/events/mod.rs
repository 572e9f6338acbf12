//! Event dispatch
//!
//! ```text
//! EventHandle::fire ─► EventDispatcher::fire
//!                        ├─ resolve type (hint), reject variables
//!                        ├─ reject reserved lifecycle types
//!                        ├─ ObserverRegistry::resolve
//!                        └─ per observer:
//!                             transactional + tx open ─► DeferredNotification (Synchronization)
//!                             scope inactive          ─► skip
//!                             otherwise               ─► notify now, first failure aborts
//! ```

pub mod ambient;
pub mod deferred;
pub mod dispatcher;
pub mod handle;

pub use ambient::{AmbientGuard, AmbientState};
pub use dispatcher::EventDispatcher;
pub use handle::EventHandle;
