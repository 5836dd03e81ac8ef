use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::shared::{domain::repositories::ArtifactStore, errors::AppResult};

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Decorator that keeps loaded artifacts in memory
///
/// Repeated recommendation queries against the same model only read the
/// file once. Saves are written through to the inner store and refresh the
/// cached copy.
pub struct CachingArtifactStore {
    inner: Arc<dyn ArtifactStore>,
    cache: DashMap<PathBuf, Arc<Vec<u8>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachingArtifactStore {
    pub fn new(inner: Arc<dyn ArtifactStore>) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.cache.len(),
        }
    }

    pub fn invalidate(&self, path: &Path) {
        self.cache.remove(path);
    }
}

impl ArtifactStore for CachingArtifactStore {
    fn save(&self, path: &Path, bytes: &[u8]) -> AppResult<()> {
        self.inner.save(path, bytes)?;
        self.cache
            .insert(path.to_path_buf(), Arc::new(bytes.to_vec()));
        Ok(())
    }

    fn load(&self, path: &Path) -> AppResult<Vec<u8>> {
        if let Some(entry) = self.cache.get(path) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("Artifact cache HIT: {}", path.display());
            return Ok(entry.value().as_ref().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("Artifact cache MISS: {}", path.display());

        let bytes = self.inner.load(path)?;
        self.cache
            .insert(path.to_path_buf(), Arc::new(bytes.clone()));
        Ok(bytes)
    }

    fn exists(&self, path: &Path) -> bool {
        self.cache.contains_key(path) || self.inner.exists(path)
    }

    fn remove(&self, path: &Path) -> AppResult<()> {
        self.invalidate(path);
        self.inner.remove(path)
    }
}
