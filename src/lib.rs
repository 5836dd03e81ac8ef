//! Batch anime recommendation pipeline.
//!
//! Training ingests the anime and rating datasets, builds popularity
//! rankings, a genre similarity model and collaborative models (SVD and
//! cosine KNN), then publishes them to a model directory that the
//! recommendation queries read from.
pub mod commands;
pub mod modules;
pub mod shared;
