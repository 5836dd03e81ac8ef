//! Joins ratings with anime metadata into the collaborative training set.
pub mod application;
pub mod domain;

pub use application::DataTransformation;
pub use domain::{MergeOptions, RatingMerger};
