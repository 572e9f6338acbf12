//! Definition-time and runtime validation

pub mod definition;
pub mod passivation;

pub use definition::DefinitionValidator;
pub use passivation::PassivationValidator;
