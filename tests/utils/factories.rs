/// Test data factories using builder pattern
///
/// Provides convenient methods to create dataset rows with sensible defaults
use miru_recommender::modules::catalog::{AnimeRecord, RatingRecord};

pub struct AnimeRecordFactory {
    anime_id: i64,
    name: String,
    genres: Option<String>,
    average_rating: Option<f32>,
    image_url: Option<String>,
    rank: Option<f32>,
    popularity: Option<i64>,
    favorites: Option<i64>,
    members: Option<i64>,
}

impl Default for AnimeRecordFactory {
    fn default() -> Self {
        Self {
            anime_id: 1,
            name: "Test Anime".to_string(),
            genres: None,
            average_rating: None,
            image_url: None,
            rank: None,
            popularity: None,
            favorites: None,
            members: None,
        }
    }
}

impl AnimeRecordFactory {
    pub fn new(anime_id: i64, name: &str) -> Self {
        Self {
            anime_id,
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Every column filled, usable by the content model
    pub fn complete(anime_id: i64, name: &str, genres: &str) -> Self {
        Self::new(anime_id, name)
            .with_genres(genres)
            .with_rating(7.0 + (anime_id % 20) as f32 / 10.0)
            .with_image(&format!("https://example.com/{}.jpg", anime_id))
            .with_rank(anime_id as f32 * 10.0)
            .with_popularity(anime_id * 3)
            .with_favorites(10_000 / anime_id.max(1))
            .with_members(100_000 + anime_id * 1_000)
    }

    pub fn with_genres(mut self, genres: &str) -> Self {
        self.genres = Some(genres.to_string());
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.average_rating = Some(rating);
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    pub fn with_rank(mut self, rank: f32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_popularity(mut self, popularity: i64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_favorites(mut self, favorites: i64) -> Self {
        self.favorites = Some(favorites);
        self
    }

    pub fn with_members(mut self, members: i64) -> Self {
        self.members = Some(members);
        self
    }

    pub fn build(self) -> AnimeRecord {
        AnimeRecord {
            anime_id: self.anime_id,
            name: self.name,
            genres: self.genres,
            average_rating: self.average_rating,
            image_url: self.image_url,
            rank: self.rank,
            popularity: self.popularity,
            favorites: self.favorites,
            members: self.members,
        }
    }
}

/// Collects ratings user by user
#[derive(Default)]
pub struct RatingsBuilder {
    ratings: Vec<RatingRecord>,
}

impl RatingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: i64, scores: &[(i64, f32)]) -> Self {
        self.ratings.extend(
            scores
                .iter()
                .map(|&(anime_id, rating)| RatingRecord::new(user_id, anime_id, rating)),
        );
        self
    }

    /// A watched but unrated entry
    pub fn unrated(mut self, user_id: i64, anime_id: i64) -> Self {
        self.ratings.push(RatingRecord::new(user_id, anime_id, -1.0));
        self
    }

    pub fn build(self) -> Vec<RatingRecord> {
        self.ratings
    }
}

/// Two taste groups: shonen fans (ids 1..=4) and romance fans (ids 5..=8)
pub fn sample_anime() -> Vec<AnimeRecord> {
    vec![
        AnimeRecordFactory::complete(1, "One Piece", "Action, Adventure, Comedy, Fantasy").build(),
        AnimeRecordFactory::complete(2, "Naruto", "Action, Adventure, Fantasy").build(),
        AnimeRecordFactory::complete(3, "Bleach", "Action, Adventure, Supernatural").build(),
        AnimeRecordFactory::complete(4, "Hunter x Hunter", "Action, Adventure, Fantasy").build(),
        AnimeRecordFactory::complete(5, "Clannad", "Drama, Romance, Slice of Life").build(),
        AnimeRecordFactory::complete(6, "Toradora", "Comedy, Romance, Slice of Life").build(),
        AnimeRecordFactory::complete(7, "Kanon", "Drama, Romance, Slice of Life").build(),
        AnimeRecordFactory::complete(8, "Nisekoi", "Comedy, Romance, Slice of Life").build(),
        AnimeRecordFactory::new(9, "Unfinished Entry").build(),
    ]
}

pub fn sample_ratings() -> Vec<RatingRecord> {
    RatingsBuilder::new()
        .user(436, &[(1, 10.0), (2, 9.0), (3, 8.0)])
        .user(11, &[(1, 9.0), (2, 9.0), (3, 8.0), (4, 10.0)])
        .user(12, &[(1, 10.0), (3, 9.0), (4, 9.0), (5, 3.0)])
        .user(817, &[(5, 9.0), (6, 8.0)])
        .user(21, &[(5, 10.0), (6, 9.0), (7, 9.0), (8, 7.0)])
        .user(22, &[(5, 8.0), (7, 10.0), (8, 8.0), (1, 2.0)])
        .unrated(436, 5)
        .user(999, &[(42, 7.0)])
        .build()
}
