use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

use crate::shared::{
    domain::repositories::ArtifactStore,
    errors::{AppError, AppResult},
    utils::LogContext,
};

/// Artifact store backed by the local file system
#[derive(Debug, Clone, Default)]
pub struct FileArtifactStore;

impl FileArtifactStore {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactStore for FileArtifactStore {
    fn save(&self, path: &Path, bytes: &[u8]) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    fn load(&self, path: &Path) -> AppResult<Vec<u8>> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "The file: {} does not exist",
                path.display()
            )));
        }
        Ok(fs::read(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove(&self, path: &Path) -> AppResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Serialize a model and persist it through the store
pub fn save_model<T: Serialize>(
    store: &dyn ArtifactStore,
    path: &Path,
    model: &T,
    kind: &str,
) -> AppResult<()> {
    let bytes = serde_json::to_vec(model)?;
    store
        .save(path, &bytes)
        .map_err(|e| e.with_context(&format!("save {}", kind)))?;
    LogContext::artifact_saved(kind, path);
    Ok(())
}

/// Load a model previously written with [`save_model`]
pub fn load_model<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    path: &Path,
    kind: &str,
) -> AppResult<T> {
    let bytes = store
        .load(path)
        .map_err(|e| e.with_context(&format!("load {}", kind)))?;
    let model = serde_json::from_slice(&bytes)?;
    LogContext::artifact_loaded(kind, path);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::domain::repositories::MockArtifactStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Toy {
        weights: Vec<f32>,
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/models/toy.json");
        let store = FileArtifactStore::new();

        store.save(&path, b"{}").unwrap();

        assert!(store.exists(&path));
        assert_eq!(store.load(&path).unwrap(), b"{}".to_vec());
    }

    #[test]
    fn test_remove_deletes_and_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item_knn.json");
        let store = FileArtifactStore::new();

        store.save(&path, b"{}").unwrap();
        store.remove(&path).unwrap();
        assert!(!store.exists(&path));
        assert!(store.remove(&path).is_ok());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new();

        let err = store.load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_model_roundtrip_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy.json");
        let store = FileArtifactStore::new();
        let toy = Toy {
            weights: vec![0.5, -1.25],
        };

        save_model(&store, &path, &toy, "toy").unwrap();
        let loaded: Toy = load_model(&store, &path, "toy").unwrap();

        assert_eq!(loaded, toy);
    }

    #[test]
    fn test_load_model_adds_context_to_store_errors() {
        let mut store = MockArtifactStore::new();
        store
            .expect_load()
            .returning(|_| Err(AppError::NotFound("gone".to_string())));

        let err = load_model::<Toy>(&store, Path::new("toy.json"), "toy").unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("[load toy]"));
    }

    #[test]
    fn test_load_model_rejects_corrupt_bytes() {
        let mut store = MockArtifactStore::new();
        store
            .expect_load()
            .returning(|_| Ok(b"not json".to_vec()));

        let err = load_model::<Toy>(&store, Path::new("toy.json"), "toy").unwrap_err();
        assert!(matches!(err, AppError::SerializationError(_)));
    }
}
