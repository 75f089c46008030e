//! End-to-end fan-out against the file-backed store

use std::cell::Cell;

use frete_app::app::freight_service::load_submission;
use frete_app::repository::{open_directory_repo_at, open_freight_repo_at};
use frete_app::FreightService;
use frete_domain::model::{
    FreightPayload, FreightRecord, FreightStatus, PriceRowDraft, PriceTableRow,
};
use frete_domain::repository::FreightRepository;
use frete_domain::service::FanOutStage;
use frete_domain::FailurePolicy;
use frete_infra::FileFreightRepository;
use frete_types::{Error, StoreError};
use tempfile::tempdir;

const SUBMISSION: &str = r#"{
    "freight_type": "frete_completo",
    "origin": {"city": "Campinas", "state": "SP"},
    "destinations": [
        {"city": "Curitiba", "state": "PR", "cep": "80010-000"},
        {"city": "Londrina", "state": "PR"},
        {"city": "Maringá", "state": "PR"}
    ],
    "vehicle_types": [{"type": "Truck"}, {"type": "Carreta", "category": "Pesado"}],
    "price_tables": [
        {"vehicleType": "Truck", "ranges": [
            {"kmStart": 0, "kmEnd": 200, "price": 800},
            {"kmStart": 200, "kmEnd": 500, "price": 1500}
        ]},
        {"vehicleType": "Carreta", "ranges": [
            {"kmStart": 0, "kmEnd": 500, "price": 2400}
        ]}
    ],
    "benefits": ["Vale pedágio"],
    "needs_insurance": true
}"#;

/// File repository whose n-th freight insert is rejected
struct FlakyRepository {
    inner: FileFreightRepository,
    calls: Cell<usize>,
    fail_on: usize,
}

impl FreightRepository for FlakyRepository {
    fn insert_freight(&self, payload: &FreightPayload) -> Result<FreightRecord, Error> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on {
            return Err(StoreError::Rejected("disk quota exceeded".to_string()).into());
        }
        self.inner.insert_freight(payload)
    }

    fn insert_price_rows(&self, rows: &[PriceRowDraft]) -> Result<Vec<PriceTableRow>, Error> {
        self.inner.insert_price_rows(rows)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<FreightRecord>, Error> {
        self.inner.find_by_id(id)
    }

    fn find_by_code(&self, code: &str) -> Result<Option<FreightRecord>, Error> {
        self.inner.find_by_code(code)
    }

    fn find_all(&self) -> Result<Vec<FreightRecord>, Error> {
        self.inner.find_all()
    }

    fn price_rows_for(&self, freight_id: &str) -> Result<Vec<PriceTableRow>, Error> {
        self.inner.price_rows_for(freight_id)
    }

    fn update_status(&self, id: &str, status: FreightStatus) -> Result<FreightRecord, Error> {
        self.inner.update_status(id, status)
    }

    fn delete_freight(&self, id: &str) -> Result<bool, Error> {
        self.inner.delete_freight(id)
    }

    fn delete_price_rows(&self, freight_id: &str) -> Result<usize, Error> {
        self.inner.delete_price_rows(freight_id)
    }
}

#[test]
fn test_submission_file_fans_out_to_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("submission.json");
    std::fs::write(&path, SUBMISSION).unwrap();
    let store_dir = dir.path().join("store");

    let submission = load_submission(&path, None).unwrap();
    let freights = open_freight_repo_at(store_dir.clone()).unwrap();
    let directory = open_directory_repo_at(store_dir.clone()).unwrap();
    let service = FreightService::new(&freights, &directory);
    let created = service.create(&submission).unwrap();

    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|c| c.price_rows == 3));

    let reopened = open_freight_repo_at(store_dir).unwrap();
    assert_eq!(reopened.freight_count(), 3);
    assert_eq!(reopened.price_row_count(), 9);

    let service = FreightService::new(&reopened, &directory);
    let view = service.show(&created[2].code).unwrap();
    assert_eq!(view.destinations.len(), 1);
    assert_eq!(view.destinations[0].city, "Maringá");
    assert_eq!(view.price_rows.len(), 3);
    assert_eq!(view.vehicles.len(), 2);
    assert_eq!(view.requirements, vec!["Seguro"]);
    assert_eq!(view.freight_type, "Frete completo");
}

#[test]
fn test_second_insert_failure_leaves_first_freight_only() {
    let dir = tempdir().unwrap();
    let submission: frete_domain::model::FreightSubmission =
        serde_json::from_str(SUBMISSION).unwrap();
    let repo = FlakyRepository {
        inner: FileFreightRepository::open(dir.path().to_path_buf()).unwrap(),
        calls: Cell::new(0),
        fail_on: 2,
    };

    let err = frete_domain::create_freights(&repo, &submission).unwrap_err();
    assert_eq!(err.stage, FanOutStage::FreightInsert);
    assert_eq!(err.committed.len(), 1);
    assert_eq!(err.committed[0].destination.city, "Curitiba");

    let reopened = FileFreightRepository::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(reopened.freight_count(), 1);
    assert_eq!(reopened.price_row_count(), 3);
}

#[test]
fn test_compensate_policy_cleans_disk() {
    let dir = tempdir().unwrap();
    let submission: frete_domain::model::FreightSubmission =
        serde_json::from_str(SUBMISSION).unwrap();
    let repo = FlakyRepository {
        inner: FileFreightRepository::open(dir.path().to_path_buf()).unwrap(),
        calls: Cell::new(0),
        fail_on: 3,
    };

    let err = frete_domain::FanOutWriter::new(&repo)
        .with_policy(FailurePolicy::Compensate)
        .create_freights(&submission)
        .unwrap_err();
    assert!(err.compensated);

    let reopened = FileFreightRepository::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(reopened.freight_count(), 0);
    assert_eq!(reopened.price_row_count(), 0);
}
