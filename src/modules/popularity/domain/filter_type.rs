use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Ranking criteria offered by popularity-based filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    PopularAnimes,
    TopRankedAnimes,
    OverallTopRatedAnimes,
    FavoriteAnimes,
    TopAnimesMembers,
    PopularAnimeAmongMembers,
    TopAvgRated,
}

impl FilterType {
    pub const ALL: [FilterType; 7] = [
        FilterType::PopularAnimes,
        FilterType::TopRankedAnimes,
        FilterType::OverallTopRatedAnimes,
        FilterType::FavoriteAnimes,
        FilterType::TopAnimesMembers,
        FilterType::PopularAnimeAmongMembers,
        FilterType::TopAvgRated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::PopularAnimes => "popular_animes",
            FilterType::TopRankedAnimes => "top_ranked_animes",
            FilterType::OverallTopRatedAnimes => "overall_top_rated_animes",
            FilterType::FavoriteAnimes => "favorite_animes",
            FilterType::TopAnimesMembers => "top_animes_members",
            FilterType::PopularAnimeAmongMembers => "popular_anime_among_members",
            FilterType::TopAvgRated => "top_avg_rated",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(FilterType::as_str).collect();
                AppError::InvalidInput(format!(
                    "Unknown filter type '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_filter_name() {
        for filter in FilterType::ALL {
            assert_eq!(filter.to_string().parse::<FilterType>().unwrap(), filter);
        }
    }

    #[test]
    fn test_parse_accepts_dashes_and_case() {
        assert_eq!(
            "Top-Avg-Rated".parse::<FilterType>().unwrap(),
            FilterType::TopAvgRated
        );
    }

    #[test]
    fn test_unknown_filter_lists_choices() {
        let err = "trending".parse::<FilterType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("popular_animes"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&FilterType::FavoriteAnimes).unwrap();
        assert_eq!(json, "\"favorite_animes\"");
    }
}
