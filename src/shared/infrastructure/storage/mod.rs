pub mod caching_artifact_store;
pub mod file_artifact_store;

pub use caching_artifact_store::{CacheStats, CachingArtifactStore};
pub use file_artifact_store::{load_model, save_model, FileArtifactStore};
