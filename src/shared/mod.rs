// Shared Kernel - Domain Driven Design
// Following Clean Architecture + Hexagonal Architecture patterns

pub mod application;    // Shared application layer patterns
pub mod config;         // Pipeline configuration
pub mod domain;         // Shared domain concepts (artifacts, ports)
pub mod errors;         // Shared error types
pub mod infrastructure; // Shared infrastructure (artifact storage)
pub mod utils;          // Shared utilities

// Re-exports for convenience
pub use errors::{AppError, AppResult};
