use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Prefix the error message with the stage or component it came from,
    /// keeping the variant intact.
    pub fn with_context(self, context: &str) -> Self {
        let wrap = |message: String| format!("[{}] {}", context, message);
        match self {
            AppError::NotFound(m) => AppError::NotFound(wrap(m)),
            AppError::InvalidInput(m) => AppError::InvalidInput(wrap(m)),
            AppError::ValidationError(m) => AppError::ValidationError(wrap(m)),
            AppError::DataError(m) => AppError::DataError(wrap(m)),
            AppError::IoError(m) => AppError::IoError(wrap(m)),
            AppError::SerializationError(m) => AppError::SerializationError(wrap(m)),
            AppError::ModelError(m) => AppError::ModelError(wrap(m)),
            AppError::InternalError(m) => AppError::InternalError(wrap(m)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(format!("File not found: {}", err)),
            _ => AppError::IoError(err.to_string()),
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                AppError::NotFound(format!("CSV file not found: {}", err))
            }
            csv::ErrorKind::Io(_) => AppError::IoError(err.to_string()),
            _ => AppError::DataError(format!("Malformed CSV: {}", err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::InvalidInput(format!("Invalid number: {}", err))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(err: std::num::ParseFloatError) -> Self {
        AppError::InvalidInput(format!("Invalid decimal number: {}", err))
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_keeps_variant() {
        let err = AppError::ModelError("empty matrix".to_string()).with_context("SvdTrainer");
        assert!(matches!(err, AppError::ModelError(_)));
        assert_eq!(err.to_string(), "Model error: [SvdTrainer] empty matrix");
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: AppError = io.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_io_errors_map_to_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::IoError(_)));
    }

    #[test]
    fn test_parse_errors_are_invalid_input() {
        let err: AppError = "abc".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err: AppError = "x.y".parse::<f32>().unwrap_err().into();
        assert!(err.to_string().contains("Invalid decimal number"));
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let err = AppError::NotFound("Anime 'Foo'".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "Anime 'Foo'");
    }
}
