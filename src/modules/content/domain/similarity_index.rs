use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sprs::CsMat;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub score: f32,
}

/// Cosine-similarity neighbors of every row of an L2-normalized matrix
///
/// Each list is sorted by descending similarity with ties broken by row
/// order, never contains the row itself, and holds at most
/// `max_neighbors` entries. Rows sharing no term with the query follow the
/// scored rows with similarity zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityIndex {
    max_neighbors: usize,
    neighbors: Vec<Vec<Neighbor>>,
}

impl SimilarityIndex {
    pub fn build(rows: &CsMat<f32>, max_neighbors: usize) -> Self {
        let n_rows = rows.rows();
        let by_term = rows.to_csc();

        let neighbors = (0..n_rows)
            .into_par_iter()
            .map(|row| Self::neighbors_of(rows, &by_term, row, max_neighbors))
            .collect();

        Self {
            max_neighbors,
            neighbors,
        }
    }

    fn neighbors_of(
        rows: &CsMat<f32>,
        by_term: &CsMat<f32>,
        row: usize,
        max_neighbors: usize,
    ) -> Vec<Neighbor> {
        let n_rows = rows.rows();
        let mut scores = vec![0.0f32; n_rows];
        let mut touched = vec![false; n_rows];
        let mut candidates = Vec::new();

        if let Some(query) = rows.outer_view(row) {
            for (term, &weight) in query.iter() {
                let Some(column) = by_term.outer_view(term) else {
                    continue;
                };
                for (other, &other_weight) in column.iter() {
                    if other == row {
                        continue;
                    }
                    if !touched[other] {
                        touched[other] = true;
                        candidates.push(other);
                    }
                    scores[other] += weight * other_weight;
                }
            }
        }

        let mut ranked: Vec<Neighbor> = candidates
            .into_iter()
            .map(|index| Neighbor {
                index,
                score: scores[index],
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
        ranked.truncate(max_neighbors);

        if ranked.len() < max_neighbors {
            let missing = max_neighbors - ranked.len();
            ranked.extend(
                (0..n_rows)
                    .filter(|&other| other != row && !touched[other])
                    .take(missing)
                    .map(|index| Neighbor { index, score: 0.0 }),
            );
        }
        ranked
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }

    /// Up to `n` most similar rows to `row`
    pub fn top_n(&self, row: usize, n: usize) -> &[Neighbor] {
        match self.neighbors.get(row) {
            Some(list) => &list[..n.min(list.len())],
            None => &[],
        }
    }
}
