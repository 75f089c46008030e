//! Freight lifecycle operations

use frete_types::{Error, StoreError};

use crate::model::{FreightRecord, FreightStatus};
use crate::repository::FreightRepository;

/// Move a freight to `next`, enforcing the status flow
pub fn transition_status<R: FreightRepository + ?Sized>(
    repo: &R,
    id: &str,
    next: FreightStatus,
) -> Result<FreightRecord, Error> {
    let current = repo
        .find_by_id(id)?
        .ok_or_else(|| Error::NotFound(format!("freight {}", id)))?;

    let status = current.payload.status.transition(next)?;
    let updated = repo.update_status(id, status)?;
    tracing::info!(
        code = %updated.code,
        from = %current.payload.status,
        to = %status,
        "freight status changed"
    );
    Ok(updated)
}

/// Hard-delete a freight row. Its price rows are not touched.
pub fn delete_freight<R: FreightRepository + ?Sized>(repo: &R, id: &str) -> Result<FreightRecord, Error> {
    let record = repo
        .find_by_id(id)?
        .ok_or_else(|| Error::NotFound(format!("freight {}", id)))?;
    if !repo.delete_freight(id)? {
        return Err(StoreError::FreightNotFound(id.to_string()).into());
    }
    tracing::info!(code = %record.code, "freight deleted");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FreightPayload, PriceRowDraft};
    use crate::service::testing::MemoryRepository;

    fn seeded() -> (MemoryRepository, String) {
        let repo = MemoryRepository::default();
        let record = repo.insert_freight(&FreightPayload::default()).unwrap();
        repo.insert_price_rows(&[PriceRowDraft {
            freight_id: record.id.clone(),
            vehicle_type: "Truck".to_string(),
            km_start: 0.0,
            km_end: 100.0,
            price: 250.0,
        }])
        .unwrap();
        (repo, record.id)
    }

    #[test]
    fn test_transition_follows_flow() {
        let (repo, id) = seeded();
        let updated = transition_status(&repo, &id, FreightStatus::Ativo).unwrap();
        assert_eq!(updated.payload.status, FreightStatus::Ativo);
        assert_eq!(repo.freights()[0].payload.status, FreightStatus::Ativo);
    }

    #[test]
    fn test_transition_rejects_skips() {
        let (repo, id) = seeded();
        let err = transition_status(&repo, &id, FreightStatus::Concluido).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
        assert_eq!(repo.freights()[0].payload.status, FreightStatus::Pendente);
    }

    #[test]
    fn test_transition_unknown_id() {
        let repo = MemoryRepository::default();
        let err = transition_status(&repo, "missing", FreightStatus::Ativo).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_leaves_price_rows() {
        let (repo, id) = seeded();
        assert_eq!(delete_freight(&repo, &id).unwrap().id, id);
        assert!(repo.freights().is_empty());
        assert_eq!(repo.price_rows().len(), 1);
        assert!(matches!(delete_freight(&repo, &id), Err(Error::NotFound(_))));
    }
}
