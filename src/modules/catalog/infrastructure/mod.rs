pub mod csv_dataset;

pub use csv_dataset::{export_csv, load_anime_csv, load_merged_csv, load_ratings_csv};
