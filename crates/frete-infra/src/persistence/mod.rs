//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_directory_repo;
mod file_freight_repo;

pub use file_directory_repo::FileDirectoryRepository;
pub use file_freight_repo::FileFreightRepository;
