pub mod anime_catalog;
pub mod title_similarity;

pub use anime_catalog::AnimeCatalog;
pub use title_similarity::{
    HybridStrategy, JaroWinklerStrategy, LevenshteinStrategy, SimilarityStrategy, WordOverlapStrategy,
};
