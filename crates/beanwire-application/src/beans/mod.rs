//! Registered beans

pub mod registry;

pub use registry::BeanRegistry;
