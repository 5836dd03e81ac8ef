pub mod interaction_matrix;
pub mod knn;
pub mod model_type;
pub mod svd;

pub use interaction_matrix::{IdIndex, InteractionMatrix};
pub use knn::{KnnIndex, KnnModel, KnnOrientation};
pub use model_type::ModelType;
pub use svd::{SvdEvaluation, SvdModel};
