pub mod popularity_recommender;

pub use popularity_recommender::{PopularityBasedRecommender, DEFAULT_TOP_N};
