//! Rankings over precomputed anime statistics.
pub mod application;
pub mod domain;

pub use application::PopularityBasedRecommender;
pub use domain::{FilterType, PopularityBasedFiltering};
