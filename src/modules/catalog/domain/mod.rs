pub mod entities;
pub mod services;

// Re-exports for easy access
pub use entities::{AnimeRecommendation, AnimeRecord, MergedRating, RatingRecord, RecommendationTable};
pub use services::AnimeCatalog;
