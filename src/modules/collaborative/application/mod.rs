pub mod collaborative_recommender;
pub mod collaborative_trainer;

pub use collaborative_recommender::CollaborativeAnimeRecommender;
pub use collaborative_trainer::{
    CollaborativeModelTrainer, ITEM_KNN_MODEL_KIND, SVD_MODEL_KIND, USER_KNN_MODEL_KIND,
};
