pub mod handlers;
pub mod training_pipeline;

pub use handlers::{
    RecommendationQuery, RecommendationQueryHandler, TrainCommand, TrainPipelineHandler,
};
pub use training_pipeline::{PipelineReport, StageTiming, TrainingPipeline};
