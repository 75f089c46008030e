//! Infrastructure layer
//!
//! File-backed implementations of the domain repository traits and the
//! destination list loader.

pub mod destinations_csv;
pub mod persistence;

pub use destinations_csv::load_destinations_from_csv;
pub use persistence::{FileDirectoryRepository, FileFreightRepository};
