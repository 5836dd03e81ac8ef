pub mod content_model;
pub mod similarity_index;
pub mod stop_words;
pub mod text_normalizer;
pub mod tfidf_vectorizer;

pub use content_model::ContentModel;
pub use similarity_index::{Neighbor, SimilarityIndex};
pub use text_normalizer::{TextNormalizer, TextTransformation};
pub use tfidf_vectorizer::TfidfVectorizer;
