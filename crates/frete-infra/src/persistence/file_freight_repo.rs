//! File-based implementation of FreightRepository

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use frete_domain::model::{
    FreightPayload, FreightRecord, FreightStatus, PriceRowDraft, PriceTableRow,
};
use frete_domain::repository::FreightRepository;
use frete_store::FreightStore;
use frete_types::Error;

/// Freight and price-table rows kept in JSON files under one directory
///
/// Every write is persisted before the call returns, so a failure midway
/// through a fan-out leaves the earlier rows on disk.
pub struct FileFreightRepository {
    store: RefCell<FreightStore>,
}

impl FileFreightRepository {
    /// Create or load the store under `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self, Error> {
        Ok(Self {
            store: RefCell::new(FreightStore::open(store_dir)?),
        })
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store.borrow().store_dir().to_path_buf()
    }

    pub fn freight_count(&self) -> usize {
        self.store.borrow().freight_count()
    }

    pub fn price_row_count(&self) -> usize {
        self.store.borrow().price_row_count()
    }

    /// Reload from disk, dropping any in-memory state
    pub fn reload(&self) -> Result<(), Error> {
        let dir = self.store_dir();
        *self.store.borrow_mut() = FreightStore::open(dir)?;
        Ok(())
    }

    pub fn exists(store_dir: &Path) -> bool {
        store_dir.join(frete_store::FREIGHTS_FILE).exists()
    }
}

impl FreightRepository for FileFreightRepository {
    fn insert_freight(&self, payload: &FreightPayload) -> Result<FreightRecord, Error> {
        self.store.borrow_mut().insert_freight(payload.clone())
    }

    fn insert_price_rows(&self, rows: &[PriceRowDraft]) -> Result<Vec<PriceTableRow>, Error> {
        self.store.borrow_mut().insert_price_rows(rows.to_vec())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<FreightRecord>, Error> {
        Ok(self.store.borrow().get_freight(id).cloned())
    }

    fn find_by_code(&self, code: &str) -> Result<Option<FreightRecord>, Error> {
        Ok(self.store.borrow().get_by_code(code).cloned())
    }

    fn find_all(&self) -> Result<Vec<FreightRecord>, Error> {
        Ok(self
            .store
            .borrow()
            .all_freights()
            .into_iter()
            .cloned()
            .collect())
    }

    fn price_rows_for(&self, freight_id: &str) -> Result<Vec<PriceTableRow>, Error> {
        Ok(self
            .store
            .borrow()
            .price_rows_for(freight_id)
            .into_iter()
            .cloned()
            .collect())
    }

    fn update_status(&self, id: &str, status: FreightStatus) -> Result<FreightRecord, Error> {
        self.store.borrow_mut().update_status(id, status)
    }

    fn delete_freight(&self, id: &str) -> Result<bool, Error> {
        self.store.borrow_mut().delete_freight(id)
    }

    fn delete_price_rows(&self, freight_id: &str) -> Result<usize, Error> {
        self.store.borrow_mut().delete_price_rows(freight_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frete_domain::model::{FreightSubmission, PlaceInput, PriceRange, VehiclePriceTable};
    use frete_domain::{create_freights, FailurePolicy, FanOutWriter};
    use tempfile::tempdir;

    fn submission() -> FreightSubmission {
        FreightSubmission {
            origin: PlaceInput::new("Campinas", "SP"),
            destinations: vec![
                PlaceInput::new("Curitiba", "PR"),
                PlaceInput::new("Joinville", "SC"),
            ],
            price_tables: vec![VehiclePriceTable {
                vehicle_type: "Truck".to_string(),
                ranges: vec![PriceRange {
                    km_start: 0.0,
                    km_end: 400.0,
                    price: 1200.0,
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_fan_out_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let repo = FileFreightRepository::open(dir.path().to_path_buf()).unwrap();
        let created = create_freights(&repo, &submission()).unwrap();
        assert_eq!(created.len(), 2);

        let reopened = FileFreightRepository::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.freight_count(), 2);
        assert_eq!(reopened.price_row_count(), 2);
        let second = reopened.find_by_code(&created[1].code).unwrap().unwrap();
        assert_eq!(second.payload.destinations[0]["cidade"], "Joinville");
        assert_eq!(reopened.price_rows_for(&second.id).unwrap().len(), 1);
        assert!(FileFreightRepository::exists(dir.path()));
    }

    #[test]
    fn test_invalid_submission_writes_nothing() {
        let dir = tempdir().unwrap();
        let repo = FileFreightRepository::open(dir.path().to_path_buf()).unwrap();
        let mut bad = submission();
        bad.destinations.push(PlaceInput::new("", "RS"));
        // validation rejects before any write
        let err = FanOutWriter::new(&repo)
            .with_policy(FailurePolicy::Compensate)
            .create_freights(&bad)
            .unwrap_err();
        assert!(err.committed.is_empty());
        repo.reload().unwrap();
        assert_eq!(repo.freight_count(), 0);
    }

    #[test]
    fn test_orphan_price_rows_rejected() {
        let dir = tempdir().unwrap();
        let repo = FileFreightRepository::open(dir.path().to_path_buf()).unwrap();
        let err = repo
            .insert_price_rows(&[PriceRowDraft {
                freight_id: "nope".to_string(),
                vehicle_type: "Van".to_string(),
                km_start: 0.0,
                km_end: 10.0,
                price: 50.0,
            }])
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert_eq!(repo.price_row_count(), 0);
    }
}
