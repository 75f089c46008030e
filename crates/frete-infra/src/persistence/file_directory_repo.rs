//! File-based implementation of DirectoryRepository

use std::path::Path;

use frete_domain::model::{Collaborator, Company};
use frete_domain::repository::DirectoryRepository;
use frete_store::directory::Directory;
use frete_types::Error;

/// Collaborator and company tables loaded once from the store directory
pub struct FileDirectoryRepository {
    directory: Directory,
}

impl FileDirectoryRepository {
    pub fn open(store_dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            directory: Directory::open(store_dir)?,
        })
    }

    pub fn from_directory(directory: Directory) -> Self {
        Self { directory }
    }
}

impl DirectoryRepository for FileDirectoryRepository {
    fn find_company(&self, id: &str) -> Result<Option<Company>, Error> {
        Ok(self.directory.company(id).cloned())
    }

    fn find_collaborators(&self, ids: &[String]) -> Result<Vec<Collaborator>, Error> {
        Ok(self.directory.collaborators(ids))
    }
}
