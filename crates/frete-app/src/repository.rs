//! Repository adapters for persistence layer

use std::path::PathBuf;

use frete_infra::persistence::{FileDirectoryRepository, FileFreightRepository};
use frete_types::Result;

use crate::config::Config;

/// Open file-based freight repository
pub fn open_freight_repo(config: &Config) -> Result<FileFreightRepository> {
    let store_dir = config.store_dir()?;
    FileFreightRepository::open(store_dir)
}

/// Open file-based freight repository at a custom directory
pub fn open_freight_repo_at(store_dir: PathBuf) -> Result<FileFreightRepository> {
    FileFreightRepository::open(store_dir)
}

/// Open collaborator and company tables
pub fn open_directory_repo(config: &Config) -> Result<FileDirectoryRepository> {
    let store_dir = config.store_dir()?;
    FileDirectoryRepository::open(&store_dir)
}

/// Open collaborator and company tables at a custom directory
pub fn open_directory_repo_at(store_dir: PathBuf) -> Result<FileDirectoryRepository> {
    FileDirectoryRepository::open(&store_dir)
}
