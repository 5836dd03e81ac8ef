/// Artifact entities produced by each pipeline stage
///
/// An artifact only records where a stage wrote its output, so the next
/// stage (or a later recommendation query) can pick it up.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub feature_store_anime_file_path: PathBuf,
    pub feature_store_userrating_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTransformationArtifact {
    pub merged_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBasedModelArtifact {
    pub cosine_similarity_model_file_path: PathBuf,
}

/// Only the path of the model that was actually trained is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborativeModelArtifact {
    pub svd_file_path: Option<PathBuf>,
    pub item_based_knn_file_path: Option<PathBuf>,
    pub user_based_knn_file_path: Option<PathBuf>,
}

impl CollaborativeModelArtifact {
    /// Combine artifacts of several trainer runs
    pub fn merge(self, other: CollaborativeModelArtifact) -> Self {
        Self {
            svd_file_path: self.svd_file_path.or(other.svd_file_path),
            item_based_knn_file_path: self
                .item_based_knn_file_path
                .or(other.item_based_knn_file_path),
            user_based_knn_file_path: self
                .user_based_knn_file_path
                .or(other.user_based_knn_file_path),
        }
    }

    pub fn paths(&self) -> Vec<&PathBuf> {
        [
            self.svd_file_path.as_ref(),
            self.item_based_knn_file_path.as_ref(),
            self.user_based_knn_file_path.as_ref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_collaborative_artifacts() {
        let svd = CollaborativeModelArtifact {
            svd_file_path: Some(PathBuf::from("svd.json")),
            ..Default::default()
        };
        let item = CollaborativeModelArtifact {
            item_based_knn_file_path: Some(PathBuf::from("item.json")),
            ..Default::default()
        };

        let merged = svd.merge(item);
        assert_eq!(merged.svd_file_path, Some(PathBuf::from("svd.json")));
        assert_eq!(merged.item_based_knn_file_path, Some(PathBuf::from("item.json")));
        assert!(merged.user_based_knn_file_path.is_none());
        assert_eq!(merged.paths().len(), 2);
    }
}
