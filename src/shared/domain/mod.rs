pub mod artifacts;
pub mod repositories;

pub use artifacts::{
    CollaborativeModelArtifact, ContentBasedModelArtifact, DataIngestionArtifact,
    DataTransformationArtifact,
};
pub use repositories::ArtifactStore;
