use std::cmp::Ordering;
use std::collections::HashSet;

use crate::modules::catalog::{AnimeRecommendation, AnimeRecord, RecommendationTable};

use super::filter_type::FilterType;

/// Total order over the statistic columns
trait RankKey: Copy {
    fn key_cmp(&self, other: &Self) -> Ordering;

    /// `None` when the value cannot be ranked
    fn usable(self) -> Option<Self> {
        Some(self)
    }
}

impl RankKey for f32 {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn usable(self) -> Option<Self> {
        self.is_finite().then_some(self)
    }
}

impl RankKey for i64 {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// Order two optional values with missing ones always last
///
/// Non-finite floats count as missing.
fn missing_last<T: RankKey>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a.and_then(RankKey::usable), b.and_then(RankKey::usable)) {
        (Some(a), Some(b)) => {
            let ord = a.key_cmp(&b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rankings over precomputed anime statistics
///
/// Every sort is stable, so ties keep dataset order.
pub struct PopularityBasedFiltering {
    records: Vec<AnimeRecord>,
}

impl PopularityBasedFiltering {
    pub fn new(records: Vec<AnimeRecord>) -> Self {
        log::debug!("PopularityBasedFiltering over {} anime", records.len());
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn apply(&self, filter: FilterType, n: usize) -> RecommendationTable {
        match filter {
            FilterType::PopularAnimes => self.popular_animes(n),
            FilterType::TopRankedAnimes => self.top_ranked_animes(n),
            FilterType::OverallTopRatedAnimes => self.overall_top_rated_animes(n),
            FilterType::FavoriteAnimes => self.favorite_animes(n),
            FilterType::TopAnimesMembers => self.top_animes_members(n),
            FilterType::PopularAnimeAmongMembers => self.popular_anime_among_members(n),
            FilterType::TopAvgRated => self.top_avg_rated(n),
        }
    }

    fn sorted_by<F>(&self, compare: F) -> Vec<&AnimeRecord>
    where
        F: Fn(&AnimeRecord, &AnimeRecord) -> Ordering,
    {
        let mut rows: Vec<&AnimeRecord> = self.records.iter().collect();
        rows.sort_by(|a, b| compare(a, b));
        rows
    }

    fn table<'a>(rows: impl IntoIterator<Item = &'a AnimeRecord>, n: usize) -> RecommendationTable {
        rows.into_iter()
            .take(n)
            .map(AnimeRecommendation::from)
            .collect()
    }

    /// Lowest popularity number first (1 is the most popular)
    pub fn popular_animes(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} most popular animes", n);
        let rows = self.sorted_by(|a, b| missing_last(a.popularity, b.popularity, false));
        Self::table(rows, n)
    }

    /// Best rank first, keeping only rows with a rank above 1
    pub fn top_ranked_animes(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} ranked animes", n);
        let rows = self
            .sorted_by(|a, b| missing_last(a.rank, b.rank, false))
            .into_iter()
            .filter(|r| r.rank.is_some_and(|rank| rank.is_finite() && rank > 1.0));
        Self::table(rows, n)
    }

    pub fn overall_top_rated_animes(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} highest-rated animes", n);
        let rows =
            self.sorted_by(|a, b| missing_last(a.average_rating, b.average_rating, true));
        Self::table(rows, n)
    }

    pub fn favorite_animes(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} most favorited animes", n);
        let rows = self.sorted_by(|a, b| missing_last(a.favorites, b.favorites, true));
        Self::table(rows, n)
    }

    pub fn top_animes_members(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} animes by members", n);
        let rows = self.sorted_by(|a, b| missing_last(a.members, b.members, true));
        Self::table(rows, n)
    }

    /// Most members first, then highest rating, one row per name
    pub fn popular_anime_among_members(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} popular animes among members", n);
        let mut seen = HashSet::new();
        let rows = self
            .sorted_by(|a, b| {
                missing_last(a.members, b.members, true)
                    .then_with(|| missing_last(a.average_rating, b.average_rating, true))
            })
            .into_iter()
            .filter(|r| seen.insert(r.name.as_str()));
        Self::table(rows, n)
    }

    /// The n largest average ratings among the first row of each name
    pub fn top_avg_rated(&self, n: usize) -> RecommendationTable {
        log::info!("Fetching top {} animes by average rating", n);
        let mut seen = HashSet::new();
        let mut rows: Vec<&AnimeRecord> = self
            .records
            .iter()
            .filter(|r| seen.insert(r.name.as_str()))
            .filter(|r| r.average_rating.is_some_and(f32::is_finite))
            .collect();
        rows.sort_by(|a, b| missing_last(a.average_rating, b.average_rating, true));
        Self::table(rows, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anime(
        id: i64,
        name: &str,
        rating: Option<f32>,
        rank: Option<f32>,
        popularity: Option<i64>,
        favorites: Option<i64>,
        members: Option<i64>,
    ) -> AnimeRecord {
        AnimeRecord {
            average_rating: rating,
            rank,
            popularity,
            favorites,
            members,
            ..AnimeRecord::new(id, name)
        }
    }

    fn dataset() -> PopularityBasedFiltering {
        PopularityBasedFiltering::new(vec![
            anime(1, "Naruto", Some(7.9), Some(600.0), Some(8), Some(70), Some(2000)),
            anime(2, "Fullmetal", Some(9.1), Some(1.0), Some(3), Some(200), Some(3000)),
            anime(3, "Steins;Gate", Some(9.1), Some(2.0), Some(13), Some(180), Some(2500)),
            anime(4, "Obscure", None, None, None, None, None),
            anime(5, "Naruto", Some(8.5), Some(300.0), Some(100), Some(5), Some(3000)),
        ])
    }

    #[test]
    fn test_popular_animes_ascending_with_missing_last() {
        let table = dataset().popular_animes(10);
        assert_eq!(
            table.names(),
            vec!["Fullmetal", "Naruto", "Steins;Gate", "Naruto", "Obscure"]
        );
    }

    #[test]
    fn test_top_ranked_excludes_rank_one_and_missing() {
        let table = dataset().top_ranked_animes(10);
        assert_eq!(table.names(), vec!["Steins;Gate", "Naruto", "Naruto"]);
        assert_eq!(table.rows[1].rating, Some(8.5));
    }

    #[test]
    fn test_overall_top_rated_ties_keep_dataset_order() {
        let table = dataset().overall_top_rated_animes(3);
        assert_eq!(table.names(), vec!["Fullmetal", "Steins;Gate", "Naruto"]);
        assert_eq!(table.rows[2].rating, Some(8.5));
    }

    #[test]
    fn test_favorite_and_member_rankings() {
        let data = dataset();
        assert_eq!(data.favorite_animes(2).names(), vec!["Fullmetal", "Steins;Gate"]);
        assert_eq!(
            data.top_animes_members(3).names(),
            vec!["Fullmetal", "Naruto", "Steins;Gate"]
        );
    }

    #[test]
    fn test_popular_among_members_dedups_names() {
        let table = dataset().popular_anime_among_members(10);
        // Fullmetal and the second Naruto tie on members; the higher rating wins
        assert_eq!(
            table.names(),
            vec!["Fullmetal", "Naruto", "Steins;Gate", "Obscure"]
        );
        assert_eq!(table.rows[1].rating, Some(8.5));
    }

    #[test]
    fn test_top_avg_rated_keeps_first_row_per_name() {
        let table = dataset().top_avg_rated(10);
        assert_eq!(table.names(), vec!["Fullmetal", "Steins;Gate", "Naruto"]);
        assert_eq!(table.rows[2].rating, Some(7.9));
    }

    #[test]
    fn test_nan_statistics_sort_last_without_panicking() {
        let records: Vec<AnimeRecord> = (0..40)
            .map(|i| {
                let rating = if i % 3 == 0 { f32::NAN } else { i as f32 / 4.0 };
                let rank = if i % 5 == 0 { Some(f32::NAN) } else { Some(i as f32 + 2.0) };
                anime(i, &format!("Show {}", i), Some(rating), rank, Some(i), Some(i), Some(i))
            })
            .collect();
        let data = PopularityBasedFiltering::new(records);

        let top = data.overall_top_rated_animes(5);
        assert_eq!(top.names(), vec!["Show 38", "Show 37", "Show 35", "Show 34", "Show 32"]);

        let all = data.overall_top_rated_animes(40);
        assert!(all.rows[26..].iter().all(|row| row.rating.map_or(true, f32::is_nan)));

        assert!(data.top_ranked_animes(40).len() == 32);
        assert_eq!(data.top_avg_rated(40).len(), 26);
        for filter in FilterType::ALL {
            assert_eq!(data.apply(filter, 3).len(), 3);
        }
    }

    #[test]
    fn test_n_larger_than_dataset_and_zero() {
        let data = dataset();
        assert_eq!(data.popular_animes(100).len(), 5);
        assert!(data.popular_animes(0).is_empty());
        assert!(PopularityBasedFiltering::new(Vec::new()).favorite_animes(5).is_empty());
    }

    #[test]
    fn test_apply_dispatches_by_filter() {
        let data = dataset();
        for filter in FilterType::ALL {
            assert!(data.apply(filter, 2).len() <= 2);
        }
        assert_eq!(
            data.apply(FilterType::FavoriteAnimes, 1),
            data.favorite_animes(1)
        );
    }
}
