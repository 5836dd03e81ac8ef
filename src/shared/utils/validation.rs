use crate::shared::errors::AppError;

pub struct Validator;

impl Validator {
    pub fn validate_anime_title(title: &str) -> Result<(), AppError> {
        if title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if title.len() > 255 {
            return Err(AppError::ValidationError(
                "Title too long (max 255 characters)".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of recommendations requested
    pub fn validate_top_n(n: usize) -> Result<(), AppError> {
        if n == 0 {
            return Err(AppError::ValidationError(
                "Number of recommendations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_fraction(name: &str, value: f64) -> Result<(), AppError> {
        if !(value > 0.0 && value < 1.0) {
            return Err(AppError::ValidationError(format!(
                "{} must be strictly between 0 and 1, got {}",
                name, value
            )));
        }
        Ok(())
    }
}
