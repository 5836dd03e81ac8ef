use crate::shared::errors::AppResult;

/// A command handler: performs work and reports its outcome
///
/// Training runs are commands; they write artifacts and return a report.
///
/// ```rust,ignore
/// let report = TrainPipelineHandler::new(config)
///     .execute(TrainCommand::new(ModelType::ALL.to_vec()))?;
/// ```
pub trait UseCase<C, R> {
    fn execute(&self, command: C) -> AppResult<R>;
}

/// A read-only handler answered from published models
pub trait Query<Q, R> {
    fn execute(&self, query: Q) -> AppResult<R>;
}
