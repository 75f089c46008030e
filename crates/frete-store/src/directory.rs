//! Read-only collaborator and company tables joined into freight views

use crate::read_json_or_default;
use frete_types::{Collaborator, Company, Result};
use std::path::Path;

const COLLABORATORS_FILE: &str = "collaborators.json";
const COMPANIES_FILE: &str = "companies.json";

/// Collaborators and companies maintained outside this engine
#[derive(Debug, Default)]
pub struct Directory {
    collaborators: Vec<Collaborator>,
    companies: Vec<Company>,
}

impl Directory {
    /// Load both tables; missing files yield empty tables
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            collaborators: read_json_or_default(&store_dir.join(COLLABORATORS_FILE))?,
            companies: read_json_or_default(&store_dir.join(COMPANIES_FILE))?,
        })
    }

    pub fn from_parts(collaborators: Vec<Collaborator>, companies: Vec<Company>) -> Self {
        Self {
            collaborators,
            companies,
        }
    }

    pub fn collaborator(&self, id: &str) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.id == id)
    }

    /// Resolve a list of ids, skipping unknown ones
    pub fn collaborators(&self, ids: &[String]) -> Vec<Collaborator> {
        ids.iter()
            .filter_map(|id| self.collaborator(id))
            .cloned()
            .collect()
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }
}
