use serde::{Deserialize, Serialize};
use sprs::{CsMat, TriMat};
use std::collections::HashMap;

use crate::modules::catalog::RatingRecord;
use crate::shared::errors::{AppError, AppResult};

/// Dense positions for external ids, assigned in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct IdIndex {
    ids: Vec<i64>,
    positions: HashMap<i64, usize>,
}

impl IdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `id`, assigning the next free one if it is new
    pub fn insert(&mut self, id: i64) -> usize {
        if let Some(&position) = self.positions.get(&id) {
            return position;
        }
        let position = self.ids.len();
        self.ids.push(id);
        self.positions.insert(id, position);
        position
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn id(&self, position: usize) -> Option<i64> {
        self.ids.get(position).copied()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<i64>> for IdIndex {
    fn from(ids: Vec<i64>) -> Self {
        let mut index = IdIndex::new();
        for id in ids {
            index.insert(id);
        }
        index
    }
}

impl From<IdIndex> for Vec<i64> {
    fn from(index: IdIndex) -> Self {
        index.ids
    }
}

/// Sparse user x anime rating matrix
///
/// Repeated `(user, anime)` ratings are averaged, the way a pivot table
/// aggregates them. Both orientations are kept in CSR form.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    users: IdIndex,
    items: IdIndex,
    user_item: CsMat<f32>,
    item_user: CsMat<f32>,
}

impl InteractionMatrix {
    pub fn build(ratings: &[RatingRecord]) -> AppResult<Self> {
        if ratings.is_empty() {
            return Err(AppError::ModelError(
                "Cannot build an interaction matrix from zero ratings".to_string(),
            ));
        }

        let mut users = IdIndex::new();
        let mut items = IdIndex::new();
        let mut cells: HashMap<(usize, usize), (f32, u32)> = HashMap::new();
        for rating in ratings {
            let row = users.insert(rating.user_id);
            let col = items.insert(rating.anime_id);
            let cell = cells.entry((row, col)).or_insert((0.0, 0));
            cell.0 += rating.rating;
            cell.1 += 1;
        }

        let mut triplets = TriMat::with_capacity((users.len(), items.len()), cells.len());
        for ((row, col), (sum, count)) in cells {
            triplets.add_triplet(row, col, sum / count as f32);
        }
        let user_item: CsMat<f32> = triplets.to_csr();
        let item_user: CsMat<f32> = user_item.transpose_view().to_csr();

        log::debug!(
            "Interaction matrix: {} users x {} anime, {} ratings",
            users.len(),
            items.len(),
            user_item.nnz()
        );

        Ok(Self {
            users,
            items,
            user_item,
            item_user,
        })
    }

    pub fn users(&self) -> &IdIndex {
        &self.users
    }

    pub fn items(&self) -> &IdIndex {
        &self.items
    }

    /// Rows are users, columns anime
    pub fn user_item(&self) -> &CsMat<f32> {
        &self.user_item
    }

    /// Rows are anime, columns users
    pub fn item_user(&self) -> &CsMat<f32> {
        &self.item_user
    }

    pub fn nnz(&self) -> usize {
        self.user_item.nnz()
    }

    /// `(user_row, item_col, rating)` in row-major order
    pub fn triplets(&self) -> Vec<(usize, usize, f32)> {
        self.user_item
            .outer_iterator()
            .enumerate()
            .flat_map(|(row, vec)| {
                vec.iter()
                    .map(move |(col, &rating)| (row, col, rating))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn global_mean(&self) -> f32 {
        let data = self.user_item.data();
        if data.is_empty() {
            0.0
        } else {
            data.iter().sum::<f32>() / data.len() as f32
        }
    }

    pub fn rating(&self, user_id: i64, anime_id: i64) -> Option<f32> {
        let row = self.users.position(user_id)?;
        let col = self.items.position(anime_id)?;
        self.user_item.get(row, col).copied()
    }
}
