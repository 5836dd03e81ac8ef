use std::collections::{HashMap, HashSet};

use crate::modules::catalog::{AnimeRecord, MergedRating, RatingRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub min_ratings_per_user: usize,
    pub min_ratings_per_anime: usize,
}

/// Row counts dropped at each step of a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub input_ratings: usize,
    pub unrated: usize,
    pub unmatched: usize,
    pub duplicates: usize,
    pub below_min_count: usize,
    pub output_rows: usize,
}

/// Inner join of ratings and anime metadata on `anime_id`
pub struct RatingMerger {
    options: MergeOptions,
}

impl RatingMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge in rating order
    ///
    /// Negative scores, ratings of unknown or unnamed anime, and repeated
    /// `(user, anime)` pairs after the first are dropped. The minimum-count
    /// filters are applied last, on counts taken after deduplication.
    pub fn merge(
        &self,
        anime: &[AnimeRecord],
        ratings: &[RatingRecord],
    ) -> (Vec<MergedRating>, MergeSummary) {
        let mut summary = MergeSummary {
            input_ratings: ratings.len(),
            ..Default::default()
        };

        let mut by_id: HashMap<i64, &AnimeRecord> = HashMap::with_capacity(anime.len());
        for record in anime {
            if !record.name.trim().is_empty() {
                by_id.entry(record.anime_id).or_insert(record);
            }
        }

        let mut seen: HashSet<(i64, i64)> = HashSet::with_capacity(ratings.len());
        let mut merged = Vec::with_capacity(ratings.len());
        for rating in ratings {
            if !rating.is_rated() {
                summary.unrated += 1;
                continue;
            }
            let Some(record) = by_id.get(&rating.anime_id) else {
                summary.unmatched += 1;
                continue;
            };
            if !seen.insert((rating.user_id, rating.anime_id)) {
                summary.duplicates += 1;
                continue;
            }
            merged.push(MergedRating::from_parts(rating, record));
        }

        let merged = self.apply_min_counts(merged, &mut summary);
        summary.output_rows = merged.len();
        (merged, summary)
    }

    fn apply_min_counts(
        &self,
        rows: Vec<MergedRating>,
        summary: &mut MergeSummary,
    ) -> Vec<MergedRating> {
        let MergeOptions {
            min_ratings_per_user,
            min_ratings_per_anime,
        } = self.options;
        if min_ratings_per_user <= 1 && min_ratings_per_anime <= 1 {
            return rows;
        }

        let mut per_user: HashMap<i64, usize> = HashMap::new();
        let mut per_anime: HashMap<i64, usize> = HashMap::new();
        for row in &rows {
            *per_user.entry(row.user_id).or_default() += 1;
            *per_anime.entry(row.anime_id).or_default() += 1;
        }

        let before = rows.len();
        let kept: Vec<MergedRating> = rows
            .into_iter()
            .filter(|row| {
                per_user[&row.user_id] >= min_ratings_per_user
                    && per_anime[&row.anime_id] >= min_ratings_per_anime
            })
            .collect();
        summary.below_min_count = before - kept.len();
        kept
    }
}
