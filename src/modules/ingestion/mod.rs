//! Copies the raw anime and rating datasets into the run's feature store.
pub mod application;

pub use application::DataIngestion;
