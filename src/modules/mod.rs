pub mod catalog;
pub mod collaborative;
pub mod content;
pub mod ingestion;
pub mod pipeline;
pub mod popularity;
pub mod transformation;
