//! Core type definitions for Hearth

pub mod agent;
pub mod conversation;
pub mod routing;

// Re-export commonly used types
pub use agent::*;
pub use conversation::*;
pub use routing::*;
