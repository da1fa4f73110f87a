// All conversion logic lives in mystify-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod project;

// Re-export core types for convenience
pub use mystify_core::*;

// Re-export CLI utilities
pub use project::find_project_root;
