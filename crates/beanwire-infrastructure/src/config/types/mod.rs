//! Configuration types module

pub mod app;
pub mod contexts;
pub mod conversation;
pub mod events;
pub mod logging;

// Re-export main types
pub use app::*;
