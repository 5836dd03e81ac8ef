pub mod artifact_store;

pub use artifact_store::ArtifactStore;

#[cfg(test)]
pub use artifact_store::MockArtifactStore;
