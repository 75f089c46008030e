//! Repository trait definitions for data persistence

use frete_types::Error;

use crate::model::{
    Collaborator, Company, FreightPayload, FreightRecord, FreightStatus, PriceRowDraft,
    PriceTableRow,
};

/// Record store addressed by the fan-out writer and the readers
pub trait FreightRepository {
    /// Insert one freight row; the store assigns id and code
    fn insert_freight(&self, payload: &FreightPayload) -> Result<FreightRecord, Error>;

    /// Insert price-table rows, all or nothing
    fn insert_price_rows(&self, rows: &[PriceRowDraft]) -> Result<Vec<PriceTableRow>, Error>;

    /// Find a freight by id
    fn find_by_id(&self, id: &str) -> Result<Option<FreightRecord>, Error>;

    /// Find a freight by human-readable code
    fn find_by_code(&self, code: &str) -> Result<Option<FreightRecord>, Error>;

    /// Find all freights
    fn find_all(&self) -> Result<Vec<FreightRecord>, Error>;

    /// Price rows of one freight
    fn price_rows_for(&self, freight_id: &str) -> Result<Vec<PriceTableRow>, Error>;

    /// Overwrite the status (last write wins)
    fn update_status(&self, id: &str, status: FreightStatus) -> Result<FreightRecord, Error>;

    /// Hard-delete a freight row; returns whether it existed
    fn delete_freight(&self, id: &str) -> Result<bool, Error>;

    /// Delete the price rows of one freight; returns how many were removed
    fn delete_price_rows(&self, freight_id: &str) -> Result<usize, Error>;
}

/// Read-only collaborator and company records joined for display
pub trait DirectoryRepository {
    fn find_company(&self, id: &str) -> Result<Option<Company>, Error>;

    fn find_collaborators(&self, ids: &[String]) -> Result<Vec<Collaborator>, Error>;
}
