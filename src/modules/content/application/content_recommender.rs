use std::path::Path;
use std::sync::Arc;

use crate::modules::catalog::{AnimeCatalog, AnimeRecord, RecommendationTable};
use crate::modules::content::domain::ContentModel;
use crate::shared::{
    config::ContentBasedModelConfig,
    domain::ArtifactStore,
    errors::AppResult,
    infrastructure::{load_model, save_model, FileArtifactStore},
    utils::{LogContext, Validator},
};

const MODEL_KIND: &str = "content model";
const STRATEGY: &str = "content-based";

/// Recommends anime with similar genres
pub struct ContentBasedRecommender {
    model: ContentModel,
    catalog: AnimeCatalog,
    store: Arc<dyn ArtifactStore>,
}

impl ContentBasedRecommender {
    /// Train on the anime dataset
    pub fn new(records: &[AnimeRecord], config: &ContentBasedModelConfig) -> AppResult<Self> {
        Ok(Self::from_model(ContentModel::fit(records, config)?))
    }

    pub fn from_model(model: ContentModel) -> Self {
        let catalog = model.catalog();
        Self {
            model,
            catalog,
            store: Arc::new(FileArtifactStore::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    /// Load a model previously written with [`save_model`](Self::save_model)
    pub fn load(store: Arc<dyn ArtifactStore>, model_path: &Path) -> AppResult<Self> {
        let model: ContentModel = load_model(store.as_ref(), model_path, MODEL_KIND)?;
        model.check_consistency()?;
        Ok(Self::from_model(model).with_store(store))
    }

    pub fn model(&self) -> &ContentModel {
        &self.model
    }

    pub fn save_model(&self, model_path: &Path) -> AppResult<()> {
        save_model(self.store.as_ref(), model_path, &self.model, MODEL_KIND)
    }

    /// Reload the model stored at `model_path`, then recommend for `title`
    pub fn get_rec_cosine(
        &mut self,
        title: &str,
        model_path: &Path,
        n: usize,
    ) -> AppResult<RecommendationTable> {
        let model: ContentModel = load_model(self.store.as_ref(), model_path, MODEL_KIND)?;
        model.check_consistency()?;
        self.catalog = model.catalog();
        self.model = model;
        self.recommend(title, n)
    }

    /// The `n` anime whose genres are most similar to `title`'s
    pub fn recommend(&self, title: &str, n: usize) -> AppResult<RecommendationTable> {
        Validator::validate_anime_title(title)?;
        Validator::validate_top_n(n)?;
        LogContext::recommendation(STRATEGY, title, None);

        let row = self
            .catalog
            .id_by_name(title)
            .and_then(|id| self.catalog.position(id))
            .ok_or_else(|| self.catalog.unknown_title(title))?;

        if n > self.model.similarity.max_neighbors() {
            log::warn!(
                "Requested {} recommendations but the model keeps {} neighbors per anime",
                n,
                self.model.similarity.max_neighbors()
            );
        }

        let ids = self
            .model
            .similarity
            .top_n(row, n)
            .iter()
            .filter_map(|neighbor| self.catalog.id_at(neighbor.index));
        let table = self.catalog.table_for(ids);

        LogContext::recommendation(STRATEGY, title, Some(table.len()));
        Ok(table)
    }
}
