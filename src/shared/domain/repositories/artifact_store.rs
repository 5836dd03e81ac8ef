use std::path::Path;

use crate::shared::errors::AppResult;

/// Port for persisting trained model artifacts
///
/// Artifacts are opaque byte blobs addressed by path. Infrastructure decides
/// where and how they are stored; trainers and recommenders only see this trait.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactStore: Send + Sync {
    /// Persist a blob, replacing any previous content at `path`
    fn save(&self, path: &Path, bytes: &[u8]) -> AppResult<()>;

    /// Load a blob; a missing artifact is `AppError::NotFound`
    fn load(&self, path: &Path) -> AppResult<Vec<u8>>;

    /// Check whether an artifact exists
    fn exists(&self, path: &Path) -> bool;

    /// Delete an artifact; removing one that does not exist is not an error
    fn remove(&self, path: &Path) -> AppResult<()>;
}
