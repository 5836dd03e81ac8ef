//! End-to-end training run and the handlers the CLI calls into.
pub mod application;

pub use application::{
    PipelineReport, RecommendationQuery, RecommendationQueryHandler, TrainCommand,
    TrainPipelineHandler, TrainingPipeline,
};
