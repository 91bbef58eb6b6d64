//! Command handlers for the GEMS Agent CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod check;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use check::CheckCommand;
pub use serve::ServeCommand;
