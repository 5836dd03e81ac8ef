use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use std::fmt;

use super::interaction_matrix::{IdIndex, InteractionMatrix};

/// Brute-force nearest neighbors under cosine distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnIndex {
    rows: CsMat<f32>,
    norms: Vec<f32>,
}

impl KnnIndex {
    pub fn fit(rows: CsMat<f32>) -> Self {
        let norms = rows
            .outer_iterator()
            .map(|row| row.iter().map(|(_, &v)| v * v).sum::<f32>().sqrt())
            .collect();
        Self { rows, norms }
    }

    pub fn len(&self) -> usize {
        self.rows.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.rows() == 0
    }

    pub fn rows(&self) -> &CsMat<f32> {
        &self.rows
    }

    /// One norm per row
    pub fn consistent(&self) -> bool {
        self.norms.len() == self.rows.rows()
    }

    /// The `k` rows closest to `row`, as `(row, 1 - cos)` pairs
    ///
    /// Sorted by ascending distance, ties by row index. The query row
    /// itself is included, normally at distance 0. Rows with no ratings
    /// sit at distance 1 from everything.
    pub fn kneighbors(&self, row: usize, k: usize) -> Vec<(usize, f32)> {
        let (Some(query), Some(&query_norm)) = (self.rows.outer_view(row), self.norms.get(row))
        else {
            return Vec::new();
        };

        let mut dense = vec![0.0f32; self.rows.cols()];
        for (col, &value) in query.iter() {
            dense[col] = value;
        }

        let mut distances: Vec<(usize, f32)> = (0..self.len())
            .into_par_iter()
            .map(|other| {
                let norm = self.norms.get(other).copied().unwrap_or(0.0);
                if query_norm == 0.0 || norm == 0.0 {
                    return (other, 1.0);
                }
                let dot: f32 = self
                    .rows
                    .outer_view(other)
                    .map(|vec| vec.iter().map(|(col, &v)| dense[col] * v).sum())
                    .unwrap_or_default();
                (other, (1.0 - dot / (query_norm * norm)).max(0.0))
            })
            .collect();

        distances.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        distances.truncate(k);
        distances
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnnOrientation {
    /// Rows are anime described by the users who rated them
    ItemBased,
    /// Rows are users described by the anime they rated
    UserBased,
}

impl fmt::Display for KnnOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnnOrientation::ItemBased => write!(f, "item-based"),
            KnnOrientation::UserBased => write!(f, "user-based"),
        }
    }
}

/// A fitted neighbor index together with the ids of its rows and columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnModel {
    orientation: KnnOrientation,
    index: KnnIndex,
    row_ids: IdIndex,
    col_ids: IdIndex,
}

impl KnnModel {
    pub fn item_based(matrix: &InteractionMatrix) -> Self {
        Self {
            orientation: KnnOrientation::ItemBased,
            index: KnnIndex::fit(matrix.item_user().clone()),
            row_ids: matrix.items().clone(),
            col_ids: matrix.users().clone(),
        }
    }

    pub fn user_based(matrix: &InteractionMatrix) -> Self {
        Self {
            orientation: KnnOrientation::UserBased,
            index: KnnIndex::fit(matrix.user_item().clone()),
            row_ids: matrix.users().clone(),
            col_ids: matrix.items().clone(),
        }
    }

    pub fn orientation(&self) -> KnnOrientation {
        self.orientation
    }

    pub fn index(&self) -> &KnnIndex {
        &self.index
    }

    pub fn knows(&self, id: i64) -> bool {
        self.row_ids.position(id).is_some()
    }

    /// The `k` nearest rows to `id` by external id, the query included
    pub fn neighbors(&self, id: i64, k: usize) -> Option<Vec<(i64, f32)>> {
        let row = self.row_ids.position(id)?;
        Some(
            self.index
                .kneighbors(row, k)
                .into_iter()
                .filter_map(|(other, distance)| Some((self.row_ids.id(other)?, distance)))
                .collect(),
        )
    }

    /// Non-zero entries of the row for `id`, as `(column id, rating)`
    pub fn row_entries(&self, id: i64) -> Vec<(i64, f32)> {
        let Some(row) = self.row_ids.position(id) else {
            return Vec::new();
        };
        self.index
            .rows()
            .outer_view(row)
            .map(|vec| {
                vec.iter()
                    .filter_map(|(col, &v)| Some((self.col_ids.id(col)?, v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn consistent(&self) -> bool {
        self.index.consistent()
            && self.index.rows().rows() == self.row_ids.len()
            && self.index.rows().cols() == self.col_ids.len()
    }
}
