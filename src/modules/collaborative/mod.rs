//! Rating-based recommendations: the user x anime matrix, biased SVD and
//! cosine KNN over users or anime.
pub mod application;
pub mod domain;

pub use application::{CollaborativeAnimeRecommender, CollaborativeModelTrainer};
pub use domain::{InteractionMatrix, KnnModel, ModelType, SvdModel};
