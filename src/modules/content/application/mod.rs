pub mod content_recommender;
pub mod content_trainer;

pub use content_recommender::ContentBasedRecommender;
pub use content_trainer::ContentBasedModelTrainer;
