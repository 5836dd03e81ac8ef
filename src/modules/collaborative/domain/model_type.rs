use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Collaborative models the trainer knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Svd,
    ItemKnn,
    UserKnn,
}

impl ModelType {
    pub const ALL: [ModelType; 3] = [ModelType::Svd, ModelType::ItemKnn, ModelType::UserKnn];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Svd => "svd",
            ModelType::ItemKnn => "item_knn",
            ModelType::UserKnn => "user_knn",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == wanted)
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Invalid model_type '{}'. Choose from 'svd', 'item_knn', or 'user_knn'.",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_types() {
        assert_eq!("svd".parse::<ModelType>().unwrap(), ModelType::Svd);
        assert_eq!(" Item_KNN ".parse::<ModelType>().unwrap(), ModelType::ItemKnn);
        assert_eq!("user_knn".parse::<ModelType>().unwrap(), ModelType::UserKnn);
    }

    #[test]
    fn test_unknown_model_type_is_invalid_input() {
        let err = "als".parse::<ModelType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("item_knn"));
    }
}
