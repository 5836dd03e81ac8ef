pub mod anime_record;
pub mod rating_record;
pub mod recommendation;

pub use anime_record::AnimeRecord;
pub use rating_record::{MergedRating, RatingRecord};
pub use recommendation::{AnimeRecommendation, RecommendationTable};
