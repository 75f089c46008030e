//! Persistent store for freight records and their price-table rows

pub mod directory;

pub use directory::Directory;

use chrono::Utc;
use frete_types::{
    FreightPayload, FreightRecord, FreightStatus, PriceRowDraft, PriceTableRow, Result,
    StoreError,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FREIGHTS_FILE: &str = "freights.json";
const PRICE_TABLES_FILE: &str = "price_tables.json";
const SEQUENCE_FILE: &str = "sequence.json";

/// Prefix of the human-readable freight code
pub const CODE_PREFIX: &str = "FRT";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sequence {
    next: u64,
}

/// Format a sequence number as a freight code
pub fn format_code(n: u64) -> String {
    format!("{}-{:06}", CODE_PREFIX, n)
}

/// Read a JSON file, or fall back to the default when it does not exist yet
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        StoreError::Corrupted {
            file: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Write to a sibling temp file, then rename over `path`.
///
/// A failed write leaves the previous file intact.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let written = write_then_rename(&tmp, path, value);
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_then_rename<T: Serialize>(tmp: &Path, path: &Path, value: &T) -> Result<()> {
    {
        let file = File::create(tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

/// Sequence number embedded in a code such as `FRT-000042`
fn code_number(code: &str) -> Option<u64> {
    code.strip_prefix(CODE_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Persistent store for freight rows and the price-table rows keyed by them
pub struct FreightStore {
    store_dir: PathBuf,
    freights: HashMap<String, FreightRecord>,
    price_rows: Vec<PriceTableRow>,
    sequence: Sequence,
}

impl FreightStore {
    /// Create or load a store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;

        let freights: HashMap<String, FreightRecord> =
            read_json_or_default(&store_dir.join(FREIGHTS_FILE))?;
        let price_rows = read_json_or_default(&store_dir.join(PRICE_TABLES_FILE))?;
        let mut sequence: Sequence = read_json_or_default(&store_dir.join(SEQUENCE_FILE))?;

        // The counter file may be missing or behind the freight table
        let highest = freights
            .values()
            .filter_map(|record| code_number(&record.code))
            .max()
            .unwrap_or(0);
        if sequence.next <= highest {
            tracing::warn!(
                stored = sequence.next,
                highest,
                "code sequence behind freight table, advancing"
            );
        }
        sequence.next = sequence.next.max(highest + 1).max(1);

        Ok(Self {
            store_dir,
            freights,
            price_rows,
            sequence,
        })
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    fn save_freights(&self) -> Result<()> {
        write_json(&self.store_dir.join(FREIGHTS_FILE), &self.freights)?;
        tracing::debug!(count = self.freights.len(), "freight table persisted");
        Ok(())
    }

    fn save_sequence(&self) -> Result<()> {
        write_json(&self.store_dir.join(SEQUENCE_FILE), &self.sequence)
    }

    fn save_price_rows(&self) -> Result<()> {
        write_json(&self.store_dir.join(PRICE_TABLES_FILE), &self.price_rows)?;
        tracing::debug!(count = self.price_rows.len(), "price table persisted");
        Ok(())
    }

    /// Insert a freight row, assigning id, code and timestamps
    ///
    /// The code counter is persisted before the row, so a failed insert
    /// may skip a code but never hands one out twice. On error nothing of
    /// the row remains in memory or on disk.
    pub fn insert_freight(&mut self, payload: FreightPayload) -> Result<FreightRecord> {
        let number = self.sequence.next;
        self.sequence.next += 1;
        if let Err(err) = self.save_sequence() {
            self.sequence.next = number;
            return Err(err);
        }

        let now = Utc::now();
        let record = FreightRecord {
            id: uuid::Uuid::new_v4().to_string(),
            code: format_code(number),
            payload,
            created_at: now,
            updated_at: now,
        };
        self.freights.insert(record.id.clone(), record.clone());
        if let Err(err) = self.save_freights() {
            self.freights.remove(&record.id);
            return Err(err);
        }
        Ok(record)
    }

    /// Insert price rows; all rows must reference an existing freight
    pub fn insert_price_rows(&mut self, rows: Vec<PriceRowDraft>) -> Result<Vec<PriceTableRow>> {
        if let Some(orphan) = rows
            .iter()
            .find(|row| !self.freights.contains_key(&row.freight_id))
        {
            return Err(StoreError::FreightNotFound(orphan.freight_id.clone()).into());
        }

        let inserted: Vec<PriceTableRow> = rows
            .into_iter()
            .map(|draft| PriceTableRow::from_draft(uuid::Uuid::new_v4().to_string(), draft))
            .collect();
        let before = self.price_rows.len();
        self.price_rows.extend(inserted.iter().cloned());
        if let Err(err) = self.save_price_rows() {
            self.price_rows.truncate(before);
            return Err(err);
        }
        Ok(inserted)
    }

    /// Get a freight by id
    pub fn get_freight(&self, id: &str) -> Option<&FreightRecord> {
        self.freights.get(id)
    }

    /// Find a freight by its human-readable code
    pub fn get_by_code(&self, code: &str) -> Option<&FreightRecord> {
        self.freights
            .values()
            .find(|record| record.code.eq_ignore_ascii_case(code))
    }

    /// Get all freights ordered by code
    pub fn all_freights(&self) -> Vec<&FreightRecord> {
        let mut freights: Vec<_> = self.freights.values().collect();
        freights.sort_by(|a, b| a.code.cmp(&b.code));
        freights
    }

    /// Price rows belonging to one freight, in insertion order
    pub fn price_rows_for(&self, freight_id: &str) -> Vec<&PriceTableRow> {
        self.price_rows
            .iter()
            .filter(|row| row.freight_id == freight_id)
            .collect()
    }

    pub fn freight_count(&self) -> usize {
        self.freights.len()
    }

    pub fn price_row_count(&self) -> usize {
        self.price_rows.len()
    }

    /// Overwrite the status of a freight (last write wins)
    pub fn update_status(&mut self, id: &str, status: FreightStatus) -> Result<FreightRecord> {
        let record = self
            .freights
            .get_mut(id)
            .ok_or_else(|| StoreError::FreightNotFound(id.to_string()))?;
        let previous = record.clone();
        record.payload.status = status;
        record.updated_at = Utc::now();
        let updated = record.clone();
        if let Err(err) = self.save_freights() {
            self.freights.insert(previous.id.clone(), previous);
            return Err(err);
        }
        Ok(updated)
    }

    /// Hard-delete a freight row. Price rows are left untouched.
    pub fn delete_freight(&mut self, id: &str) -> Result<bool> {
        let Some(removed) = self.freights.remove(id) else {
            return Ok(false);
        };
        if let Err(err) = self.save_freights() {
            self.freights.insert(removed.id.clone(), removed);
            return Err(err);
        }
        Ok(true)
    }

    /// Delete every price row of a freight, returning how many were removed
    pub fn delete_price_rows(&mut self, freight_id: &str) -> Result<usize> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.price_rows)
            .into_iter()
            .partition(|row| row.freight_id == freight_id);
        self.price_rows = kept;
        if removed.is_empty() {
            return Ok(0);
        }
        if let Err(err) = self.save_price_rows() {
            self.price_rows.extend(removed);
            return Err(err);
        }
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn payload(city: &str) -> FreightPayload {
        FreightPayload {
            origin_city: "Campinas".to_string(),
            origin_state: "SP".to_string(),
            destinations: json!([{ "cidade": city, "estado": "PR" }]),
            ..Default::default()
        }
    }

    fn price_row(freight_id: &str, km_end: f64) -> PriceRowDraft {
        PriceRowDraft {
            freight_id: freight_id.to_string(),
            vehicle_type: "Truck".to_string(),
            km_start: 0.0,
            km_end,
            price: 350.0,
        }
    }

    #[test]
    fn test_insert_assigns_sequential_codes() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let first = store.insert_freight(payload("Curitiba")).unwrap();
        let second = store.insert_freight(payload("Londrina")).unwrap();
        assert_eq!(first.code, "FRT-000001");
        assert_eq!(second.code, "FRT-000002");
        assert_ne!(first.id, second.id);
        assert_eq!(first.payload.status, FreightStatus::Pendente);
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let id = {
            let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
            let record = store.insert_freight(payload("Curitiba")).unwrap();
            store
                .insert_price_rows(vec![price_row(&record.id, 100.0), price_row(&record.id, 200.0)])
                .unwrap();
            record.id
        };

        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.freight_count(), 1);
        assert_eq!(store.price_rows_for(&id).len(), 2);
        assert_eq!(store.get_by_code("frt-000001").map(|r| r.id.as_str()), Some(id.as_str()));

        // Codes are never reused after a reopen
        let next = store.insert_freight(payload("Maringá")).unwrap();
        assert_eq!(next.code, "FRT-000002");
    }

    #[test]
    fn test_price_rows_require_existing_freight() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let err = store
            .insert_price_rows(vec![price_row("missing", 100.0)])
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert_eq!(store.price_row_count(), 0);
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let record = store.insert_freight(payload("Curitiba")).unwrap();
        store.insert_price_rows(vec![price_row(&record.id, 100.0)]).unwrap();

        assert!(store.delete_freight(&record.id).unwrap());
        assert!(!store.delete_freight(&record.id).unwrap());
        assert_eq!(store.price_row_count(), 1);
        assert_eq!(store.delete_price_rows(&record.id).unwrap(), 1);
        assert_eq!(store.price_row_count(), 0);
    }

    #[test]
    fn test_update_status_touches_timestamp() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let record = store.insert_freight(payload("Curitiba")).unwrap();
        let updated = store.update_status(&record.id, FreightStatus::Ativo).unwrap();
        assert_eq!(updated.payload.status, FreightStatus::Ativo);
        assert!(updated.updated_at >= record.updated_at);
        assert!(store.update_status("nope", FreightStatus::Ativo).is_err());
    }

    #[test]
    fn test_missing_sequence_file_does_not_reuse_codes() {
        let dir = tempdir().unwrap();
        let first = {
            let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
            store.insert_freight(payload("Curitiba")).unwrap()
        };
        fs::remove_file(dir.path().join(SEQUENCE_FILE)).unwrap();

        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let second = store.insert_freight(payload("Londrina")).unwrap();
        assert_eq!(first.code, "FRT-000001");
        assert_eq!(second.code, "FRT-000002");
    }

    #[test]
    fn test_imported_table_advances_sequence() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(FREIGHTS_FILE),
            r#"{"legacy": {"id": "legacy", "codigo": "FRT-000041",
                "created_at": "2023-01-10T12:00:00Z", "updated_at": "2023-01-10T12:00:00Z"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join(SEQUENCE_FILE), r#"{"next": 3}"#).unwrap();

        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let record = store.insert_freight(payload("Curitiba")).unwrap();
        assert_eq!(record.code, "FRT-000042");
    }

    #[test]
    fn test_failed_freight_write_leaves_no_row() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let kept = store.insert_freight(payload("Curitiba")).unwrap();

        // a directory in place of the table makes the final rename fail
        fs::remove_file(dir.path().join(FREIGHTS_FILE)).unwrap();
        fs::create_dir(dir.path().join(FREIGHTS_FILE)).unwrap();
        assert!(store.insert_freight(payload("Londrina")).is_err());
        assert_eq!(store.freight_count(), 1);
        assert!(store.update_status(&kept.id, FreightStatus::Ativo).is_err());
        assert_eq!(store.get_freight(&kept.id).unwrap().payload.status, FreightStatus::Pendente);
        assert!(store.delete_freight(&kept.id).is_err());
        assert!(store.get_freight(&kept.id).is_some());
        assert!(!dir.path().join("freights.json.tmp").exists());

        fs::remove_dir(dir.path().join(FREIGHTS_FILE)).unwrap();
        let retry = store.insert_freight(payload("Londrina")).unwrap();
        assert_eq!(retry.code, "FRT-000003");
        assert_eq!(store.freight_count(), 2);
    }

    #[test]
    fn test_failed_sequence_write_leaves_no_row() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        fs::create_dir(dir.path().join(SEQUENCE_FILE)).unwrap();
        assert!(store.insert_freight(payload("Curitiba")).is_err());
        assert_eq!(store.freight_count(), 0);
        assert!(!dir.path().join(FREIGHTS_FILE).exists());
    }

    #[test]
    fn test_failed_price_write_rolls_back() {
        let dir = tempdir().unwrap();
        let mut store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let record = store.insert_freight(payload("Curitiba")).unwrap();
        store.insert_price_rows(vec![price_row(&record.id, 100.0)]).unwrap();

        fs::remove_file(dir.path().join(PRICE_TABLES_FILE)).unwrap();
        fs::create_dir(dir.path().join(PRICE_TABLES_FILE)).unwrap();
        assert!(store.insert_price_rows(vec![price_row(&record.id, 200.0)]).is_err());
        assert_eq!(store.price_row_count(), 1);
        assert!(store.delete_price_rows(&record.id).is_err());
        assert_eq!(store.price_row_count(), 1);
    }

    #[test]
    fn test_null_columns_load_as_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(FREIGHTS_FILE),
            r#"{"f1": {
                "id": "f1",
                "codigo": "FRT-000001",
                "origem_cidade": "Campinas",
                "origem_estado": "SP",
                "precisa_ajudante": null,
                "precisa_seguro": null,
                "pedagio": null,
                "colaboradores": null,
                "created_at": "2024-01-10T12:00:00Z",
                "updated_at": "2024-01-10T12:00:00Z"
            }}"#,
        )
        .unwrap();

        let store = FreightStore::open(dir.path().to_path_buf()).unwrap();
        let record = store.get_by_code("FRT-000001").unwrap();
        assert!(!record.payload.needs_helper);
        assert!(record.payload.collaborator_ids.is_empty());
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(FREIGHTS_FILE), "{ not json").unwrap();
        let err = FreightStore::open(dir.path().to_path_buf()).err().unwrap();
        assert!(err.to_string().contains("corrupted"));
    }
}
