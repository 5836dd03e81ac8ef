use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::modules::catalog::RatingRecord;
use crate::shared::{
    config::SvdConfig,
    errors::{AppError, AppResult},
    utils::Validator,
};

use super::interaction_matrix::{IdIndex, InteractionMatrix};

/// Biased matrix factorization trained with stochastic gradient descent
///
/// The estimate for user `u` and anime `i` is
/// `mu + bu[u] + bi[i] + dot(qi[i], pu[u])`, clipped to the rating scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvdModel {
    config: SvdConfig,
    global_mean: f32,
    bu: Array1<f32>,
    bi: Array1<f32>,
    pu: Array2<f32>,
    qi: Array2<f32>,
    users: IdIndex,
    items: IdIndex,
}

/// Held-out error of an SVD configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvdEvaluation {
    pub rmse: f32,
    pub mae: f32,
    pub train_size: usize,
    pub test_size: usize,
}

impl SvdModel {
    pub fn fit(matrix: &InteractionMatrix, config: &SvdConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::ValidationError)?;
        if matrix.nnz() == 0 {
            return Err(AppError::ModelError(
                "Cannot fit SVD on an empty matrix".to_string(),
            ));
        }

        let n_users = matrix.users().len();
        let n_items = matrix.items().len();
        let k = config.n_factors;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let normal = Normal::new(config.init_mean, config.init_std)
            .map_err(|e| AppError::ModelError(format!("Invalid factor initialization: {}", e)))?;
        let mut pu = Array2::from_shape_fn((n_users, k), |_| normal.sample(&mut rng));
        let mut qi = Array2::from_shape_fn((n_items, k), |_| normal.sample(&mut rng));
        let mut bu = Array1::<f32>::zeros(n_users);
        let mut bi = Array1::<f32>::zeros(n_items);

        let global_mean = matrix.global_mean();
        let ratings = matrix.triplets();
        let lr = config.lr_all;
        let reg = config.reg_all;

        for epoch in 0..config.n_epochs {
            let mut squared_error = 0.0f32;
            for &(u, i, r) in &ratings {
                let dot = pu.row(u).dot(&qi.row(i));
                let err = r - (global_mean + bu[u] + bi[i] + dot);
                squared_error += err * err;

                let (bu_u, bi_i) = (bu[u], bi[i]);
                bu[u] = bu_u + lr * (err - reg * bu_u);
                bi[i] = bi_i + lr * (err - reg * bi_i);

                for f in 0..k {
                    let puf = pu[[u, f]];
                    let qif = qi[[i, f]];
                    pu[[u, f]] += lr * (err * qif - reg * puf);
                    qi[[i, f]] += lr * (err * puf - reg * qif);
                }
            }
            log::debug!(
                "SVD epoch {}/{}: train rmse {:.4}",
                epoch + 1,
                config.n_epochs,
                (squared_error / ratings.len() as f32).sqrt()
            );
        }

        Ok(Self {
            config: config.clone(),
            global_mean,
            bu,
            bi,
            pu,
            qi,
            users: matrix.users().clone(),
            items: matrix.items().clone(),
        })
    }

    pub fn config(&self) -> &SvdConfig {
        &self.config
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn knows_user(&self, user_id: i64) -> bool {
        self.users.position(user_id).is_some()
    }

    pub fn knows_item(&self, anime_id: i64) -> bool {
        self.items.position(anime_id).is_some()
    }

    /// Estimated rating, falling back to the bias terms for unknown ids
    pub fn predict(&self, user_id: i64, anime_id: i64) -> f32 {
        let user = self.users.position(user_id);
        let item = self.items.position(anime_id);

        let mut estimate = self.global_mean;
        if let Some(u) = user {
            estimate += self.bu[u];
        }
        if let Some(i) = item {
            estimate += self.bi[i];
        }
        if let (Some(u), Some(i)) = (user, item) {
            estimate += self.pu.row(u).dot(&self.qi.row(i));
        }

        let (low, high) = self.config.rating_scale;
        estimate.clamp(low, high)
    }

    /// Fit on a seeded random split and report error on the held-out part
    pub fn evaluate(
        ratings: &[RatingRecord],
        config: &SvdConfig,
        holdout_fraction: f64,
    ) -> AppResult<SvdEvaluation> {
        Validator::validate_fraction("holdout_fraction", holdout_fraction)?;

        let mut shuffled = ratings.to_vec();
        shuffled.shuffle(&mut StdRng::seed_from_u64(config.seed));
        let test_size = (shuffled.len() as f64 * holdout_fraction).round() as usize;
        if test_size == 0 || test_size >= shuffled.len() {
            return Err(AppError::ValidationError(format!(
                "Cannot hold out {} of {} ratings",
                test_size,
                shuffled.len()
            )));
        }
        let (test, train) = shuffled.split_at(test_size);

        let model = Self::fit(&InteractionMatrix::build(train)?, config)?;
        let (mut squared, mut absolute) = (0.0f32, 0.0f32);
        for rating in test {
            let err = rating.rating - model.predict(rating.user_id, rating.anime_id);
            squared += err * err;
            absolute += err.abs();
        }

        let n = test.len() as f32;
        Ok(SvdEvaluation {
            rmse: (squared / n).sqrt(),
            mae: absolute / n,
            train_size: train.len(),
            test_size: test.len(),
        })
    }
}
