//! In-memory repository with injectable store failures

use std::cell::{Cell, RefCell};

use chrono::Utc;

use crate::model::{
    FreightPayload, FreightRecord, FreightStatus, PriceRowDraft, PriceTableRow,
};
use crate::repository::FreightRepository;
use frete_types::{Error, StoreError};

#[derive(Default)]
pub(crate) struct MemoryRepository {
    freights: RefCell<Vec<FreightRecord>>,
    price_rows: RefCell<Vec<PriceTableRow>>,
    next_id: Cell<u64>,
    freight_calls: Cell<usize>,
    price_calls: Cell<usize>,
    fail_freight_on: Option<usize>,
    fail_price_on: Option<usize>,
}

impl MemoryRepository {
    /// Fail the n-th (1-based) freight insert
    pub fn fail_freight_insert_on(mut self, call: usize) -> Self {
        self.fail_freight_on = Some(call);
        self
    }

    /// Fail the n-th (1-based) price-row insert
    pub fn fail_price_insert_on(mut self, call: usize) -> Self {
        self.fail_price_on = Some(call);
        self
    }

    pub fn freights(&self) -> Vec<FreightRecord> {
        self.freights.borrow().clone()
    }

    pub fn price_rows(&self) -> Vec<PriceTableRow> {
        self.price_rows.borrow().clone()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl FreightRepository for MemoryRepository {
    fn insert_freight(&self, payload: &FreightPayload) -> Result<FreightRecord, Error> {
        let call = self.freight_calls.get() + 1;
        self.freight_calls.set(call);
        if self.fail_freight_on == Some(call) {
            return Err(StoreError::Rejected("injected freight failure".to_string()).into());
        }
        let n = self.next_id();
        let now = Utc::now();
        let record = FreightRecord {
            id: format!("freight-{}", n),
            code: format!("FRT-{:06}", n),
            payload: payload.clone(),
            created_at: now,
            updated_at: now,
        };
        self.freights.borrow_mut().push(record.clone());
        Ok(record)
    }

    fn insert_price_rows(&self, rows: &[PriceRowDraft]) -> Result<Vec<PriceTableRow>, Error> {
        let call = self.price_calls.get() + 1;
        self.price_calls.set(call);
        if self.fail_price_on == Some(call) {
            return Err(StoreError::Rejected("injected price failure".to_string()).into());
        }
        let inserted: Vec<PriceTableRow> = rows
            .iter()
            .map(|draft| PriceTableRow::from_draft(format!("price-{}", self.next_id()), draft.clone()))
            .collect();
        self.price_rows.borrow_mut().extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<FreightRecord>, Error> {
        Ok(self.freights.borrow().iter().find(|f| f.id == id).cloned())
    }

    fn find_by_code(&self, code: &str) -> Result<Option<FreightRecord>, Error> {
        Ok(self
            .freights
            .borrow()
            .iter()
            .find(|f| f.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    fn find_all(&self) -> Result<Vec<FreightRecord>, Error> {
        Ok(self.freights())
    }

    fn price_rows_for(&self, freight_id: &str) -> Result<Vec<PriceTableRow>, Error> {
        Ok(self
            .price_rows
            .borrow()
            .iter()
            .filter(|r| r.freight_id == freight_id)
            .cloned()
            .collect())
    }

    fn update_status(&self, id: &str, status: FreightStatus) -> Result<FreightRecord, Error> {
        let mut freights = self.freights.borrow_mut();
        let record = freights
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::FreightNotFound(id.to_string()))?;
        record.payload.status = status;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn delete_freight(&self, id: &str) -> Result<bool, Error> {
        let mut freights = self.freights.borrow_mut();
        let before = freights.len();
        freights.retain(|f| f.id != id);
        Ok(freights.len() != before)
    }

    fn delete_price_rows(&self, freight_id: &str) -> Result<usize, Error> {
        let mut rows = self.price_rows.borrow_mut();
        let before = rows.len();
        rows.retain(|r| r.freight_id != freight_id);
        Ok(before - rows.len())
    }
}
