pub mod rating_merger;

pub use rating_merger::{MergeOptions, MergeSummary, RatingMerger};
