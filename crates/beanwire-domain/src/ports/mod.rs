//! Collaborator ports
//!
//! | Port | Collaborator |
//! |------|--------------|
//! | [`TransactionServices`] | ambient transaction manager |
//! | [`BeanMetadataProvider`] | bean/type metadata |
//! | [`SerializationFacility`] | passivation serializability checks |

pub mod metadata;
pub mod serialization;
pub mod transaction;

pub use metadata::{BeanMetadataProvider, SharedBeanMetadataProvider};
pub use serialization::{SerializationFacility, SharedSerializationFacility};
pub use transaction::{
    SharedTransactionServices, Synchronization, TransactionOutcome, TransactionServices,
};
