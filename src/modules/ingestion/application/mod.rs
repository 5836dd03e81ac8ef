pub mod data_ingestion;

pub use data_ingestion::DataIngestion;
