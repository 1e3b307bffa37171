// All analysis lives in clauseguard-core
// This CLI is a thin wrapper: logging setup and report rendering

pub mod logging;
pub mod report;

// Re-export core types for convenience
pub use clauseguard_core::*;

pub use logging::init_logging;
