//! Default collaborators
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transaction`] | thread-bound local transactions and the no-transaction default |
//! | [`serialization`] | serde-backed and permissive serialization facilities |
//! | [`reaper`] | tokio task evicting idle conversations |

pub mod reaper;
pub mod serialization;
pub mod transaction;

pub use reaper::spawn_conversation_reaper;
pub use serialization::{PermissiveSerialization, SerdeSerializationFacility};
pub use transaction::{LocalTransactionManager, NoTransactionServices};
