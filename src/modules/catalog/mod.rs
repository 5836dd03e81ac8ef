//! Anime and rating datasets: records, CSV access and the lookup catalog
//! shared by every recommendation strategy.
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{
    AnimeCatalog, AnimeRecommendation, AnimeRecord, MergedRating, RatingRecord,
    RecommendationTable,
};
pub use infrastructure::csv_dataset;
