//! Domain entities
//!
//! | Entity | Description |
//! |--------|-------------|
//! | [`ObserverDescriptor`] | immutable observer method metadata |
//! | [`BeanMetadata`] | scope, injection points and capabilities of a bean |
//! | [`FiredEvent`] | an event object in flight |
//! | [`TypeHierarchy`] | class declarations used for assignability |

pub mod bean;
pub mod event;
pub mod observer;
pub mod type_hierarchy;

pub use bean::{BeanKind, BeanMetadata, InjectionPoint};
pub use event::{EventMetadata, FiredEvent, Payload};
pub use observer::{ObserverDescriptor, Reception, TransactionPhase};
pub use type_hierarchy::{ClassInfo, TypeHierarchy};
