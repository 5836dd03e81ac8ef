pub mod filter_type;
pub mod popularity_filtering;

pub use filter_type::FilterType;
pub use popularity_filtering::PopularityBasedFiltering;
