//! Genre similarity: TF-IDF over genre text and cosine neighbors.
pub mod application;
pub mod domain;

pub use application::{ContentBasedModelTrainer, ContentBasedRecommender};
pub use domain::{ContentModel, SimilarityIndex, TfidfVectorizer};
