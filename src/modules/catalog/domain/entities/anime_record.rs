use serde::{Deserialize, Deserializer, Serialize};

/// Like `csv::invalid_option`, but `NaN` and infinite cells are missing too
pub(crate) fn finite_option<'de, D>(de: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f32> = csv::invalid_option(de)?;
    Ok(value.filter(|v| v.is_finite()))
}

/// One row of the anime metadata dataset
///
/// Numeric columns in the source data contain sentinels such as `UNKNOWN`
/// or `NaN`; anything that does not parse to a finite value is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub anime_id: i64,
    pub name: String,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub genres: Option<String>,

    #[serde(default, deserialize_with = "finite_option")]
    pub average_rating: Option<f32>,

    #[serde(rename = "image url", default, deserialize_with = "csv::invalid_option")]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "finite_option")]
    pub rank: Option<f32>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub popularity: Option<i64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub favorites: Option<i64>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub members: Option<i64>,
}

impl AnimeRecord {
    pub fn new(anime_id: i64, name: impl Into<String>) -> Self {
        Self {
            anime_id,
            name: name.into(),
            genres: None,
            average_rating: None,
            image_url: None,
            rank: None,
            popularity: None,
            favorites: None,
            members: None,
        }
    }

    /// A record is usable for content similarity only when every displayed
    /// column is present
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && self
                .genres
                .as_deref()
                .is_some_and(|g| !g.trim().is_empty())
            && self.image_url.is_some()
            && self.average_rating.is_some_and(f32::is_finite)
    }
}

/// Columns the anime CSV must provide
pub const ANIME_REQUIRED_COLUMNS: &[&str] = &["anime_id", "name"];

/// Number of columns an exported anime CSV carries
pub const ANIME_COLUMN_COUNT: usize = 9;
