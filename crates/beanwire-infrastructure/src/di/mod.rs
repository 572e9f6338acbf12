//! Composition root
//!
//! Wires registries, engines and collaborators into a [`Container`].

pub mod bootstrap;

pub use bootstrap::{Container, ContainerBuilder, init_test_container};
