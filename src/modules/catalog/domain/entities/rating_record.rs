use serde::{Deserialize, Serialize};

use super::anime_record::{finite_option, AnimeRecord};

/// A single (user, anime, score) interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: i64,
    pub anime_id: i64,
    pub rating: f32,
}

impl RatingRecord {
    pub fn new(user_id: i64, anime_id: i64, rating: f32) -> Self {
        Self {
            user_id,
            anime_id,
            rating,
        }
    }

    /// Negative scores mark anime the user watched without rating
    pub fn is_rated(&self) -> bool {
        self.rating >= 0.0 && self.rating.is_finite()
    }
}

pub const RATING_REQUIRED_COLUMNS: &[&str] = &["user_id", "anime_id", "rating"];

/// A rating joined with the metadata of the rated anime
///
/// This is the row format of the transformed dataset the collaborative
/// models are trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRating {
    pub user_id: i64,
    pub anime_id: i64,
    pub rating: f32,
    pub name: String,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub genres: Option<String>,

    #[serde(rename = "image url", default, deserialize_with = "csv::invalid_option")]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "finite_option")]
    pub average_rating: Option<f32>,
}

impl MergedRating {
    pub fn from_parts(rating: &RatingRecord, anime: &AnimeRecord) -> Self {
        Self {
            user_id: rating.user_id,
            anime_id: rating.anime_id,
            rating: rating.rating,
            name: anime.name.clone(),
            genres: anime.genres.clone(),
            image_url: anime.image_url.clone(),
            average_rating: anime.average_rating,
        }
    }

    pub fn as_rating(&self) -> RatingRecord {
        RatingRecord::new(self.user_id, self.anime_id, self.rating)
    }
}

pub const MERGED_REQUIRED_COLUMNS: &[&str] = &["user_id", "anime_id", "rating", "name"];

pub const MERGED_COLUMN_COUNT: usize = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rating_is_unrated() {
        assert!(!RatingRecord::new(1, 1, -1.0).is_rated());
        assert!(RatingRecord::new(1, 1, 0.0).is_rated());
        assert!(RatingRecord::new(1, 1, 9.0).is_rated());
        assert!(!RatingRecord::new(1, 1, f32::NAN).is_rated());
    }

    #[test]
    fn test_merged_rating_copies_metadata() {
        let mut anime = AnimeRecord::new(21, "One Piece");
        anime.genres = Some("Action, Adventure, Fantasy".to_string());
        anime.average_rating = Some(8.7);

        let merged = MergedRating::from_parts(&RatingRecord::new(5, 21, 10.0), &anime);

        assert_eq!(merged.name, "One Piece");
        assert_eq!(merged.average_rating, Some(8.7));
        assert_eq!(merged.as_rating(), RatingRecord::new(5, 21, 10.0));
    }
}
