/// Shared infrastructure concerns
///
/// This module contains infrastructure implementations that are shared across
/// multiple bounded contexts (modules).
pub mod storage;

// Re-exports for convenience
pub use storage::{load_model, save_model, CachingArtifactStore, FileArtifactStore};
