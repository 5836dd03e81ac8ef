use serde::{Deserialize, Serialize};
use std::fmt;

use super::{anime_record::AnimeRecord, rating_record::MergedRating};

/// One row of a recommendation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecommendation {
    #[serde(rename = "Anime name")]
    pub name: String,

    #[serde(rename = "Image URL")]
    pub image_url: Option<String>,

    #[serde(rename = "Genres")]
    pub genres: Option<String>,

    #[serde(rename = "Rating")]
    pub rating: Option<f32>,
}

impl From<&AnimeRecord> for AnimeRecommendation {
    fn from(record: &AnimeRecord) -> Self {
        Self {
            name: record.name.clone(),
            image_url: record.image_url.clone(),
            genres: record.genres.clone(),
            rating: record.average_rating,
        }
    }
}

impl From<&MergedRating> for AnimeRecommendation {
    fn from(row: &MergedRating) -> Self {
        Self {
            name: row.name.clone(),
            image_url: row.image_url.clone(),
            genres: row.genres.clone(),
            rating: row.average_rating,
        }
    }
}

/// Ordered recommendation result
///
/// A projection of the anime dataset, not a domain object of its own; the
/// order of `rows` is the ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTable {
    pub rows: Vec<AnimeRecommendation>,
}

impl RecommendationTable {
    pub fn new(rows: Vec<AnimeRecommendation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}

impl FromIterator<AnimeRecommendation> for RecommendationTable {
    fn from_iter<I: IntoIterator<Item = AnimeRecommendation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

const MAX_CELL_WIDTH: usize = 48;

fn cell(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", truncated)
    }
}

impl fmt::Display for RecommendationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = ["#", "Anime name", "Genres", "Rating", "Image URL"];
        let body: Vec<[String; 5]> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                [
                    (i + 1).to_string(),
                    cell(&row.name),
                    cell(row.genres.as_deref().unwrap_or("-")),
                    row.rating
                        .map(|r| format!("{:.2}", r))
                        .unwrap_or_else(|| "-".to_string()),
                    row.image_url.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for line in &body {
            for (w, value) in widths.iter_mut().zip(line.iter()) {
                *w = (*w).max(value.chars().count());
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, values: &[&str]| -> fmt::Result {
            let padded: Vec<String> = values
                .iter()
                .zip(widths.iter())
                .map(|(v, w)| format!("{:<width$}", v, width = *w))
                .collect();
            writeln!(f, "{}", padded.join("  ").trim_end())
        };

        write_line(f, &header)?;
        for line in &body {
            let values: Vec<&str> = line.iter().map(String::as_str).collect();
            write_line(f, &values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, rating: Option<f32>) -> AnimeRecommendation {
        AnimeRecommendation {
            name: name.to_string(),
            image_url: None,
            genres: Some("Action".to_string()),
            rating,
        }
    }

    #[test]
    fn test_json_uses_display_column_names() {
        let table = RecommendationTable::new(vec![row("Naruto", Some(8.0))]);
        let json: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();

        assert_eq!(json[0]["Anime name"], "Naruto");
        assert_eq!(json[0]["Genres"], "Action");
        assert!(json[0]["Image URL"].is_null());
    }

    #[test]
    fn test_display_renders_header_and_rows_in_order() {
        let table: RecommendationTable =
            vec![row("Bleach", Some(7.9)), row("Naruto", None)].into_iter().collect();
        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#"));
        assert!(lines[1].contains("Bleach") && lines[1].contains("7.90"));
        assert!(lines[2].contains("Naruto") && lines[2].contains('-'));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let long_name = "x".repeat(100);
        let table = RecommendationTable::new(vec![row(&long_name, None)]);
        assert!(!table.to_string().contains(&long_name));
        assert_eq!(table.names(), vec![long_name.as_str()]);
    }
}
