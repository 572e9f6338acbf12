//! Domain Layer - beanwire
//!
//! Value objects, entities and collaborator ports of the contextual
//! instance and event container. Nothing here holds state or performs
//! dispatch; the engines live in `beanwire-application`.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value_objects`] | qualifiers, type descriptors, scopes, identities |
//! | [`entities`] | observer descriptors, bean metadata, fired events, type hierarchy |
//! | [`events`] | container and scope lifecycle event types |
//! | [`ports`] | transaction, metadata and serialization collaborators |
//! | [`error`] | the crate-wide [`Error`] and [`Result`] |

pub mod constants;
pub mod entities;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use error::{BoxError, Error, Result};
