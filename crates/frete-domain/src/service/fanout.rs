//! Multi-destination fan-out writer
//!
//! One submission with N destinations becomes N freight rows sharing the
//! submission's attributes, each followed by its price-table rows. Writes
//! happen one destination at a time, in submission order, and stop at the
//! first store error.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CreatedFreight, FreightSubmission};
use crate::repository::FreightRepository;
use frete_types::Error;

/// What happens to rows already written when a later write fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Leave every committed row in place and report them to the caller
    #[default]
    KeepPartial,
    /// Delete the rows written by this submission before reporting
    Compensate,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::KeepPartial => write!(f, "keep-partial"),
            FailurePolicy::Compensate => write!(f, "compensate"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep-partial" | "keep_partial" | "partial" => Ok(FailurePolicy::KeepPartial),
            "compensate" | "rollback" => Ok(FailurePolicy::Compensate),
            other => Err(Error::Config(frete_types::ConfigError::ParseError(format!(
                "unknown failure policy: {}",
                other
            )))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutStage {
    Validation,
    FreightInsert,
    PriceRowInsert,
}

impl fmt::Display for FanOutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanOutStage::Validation => write!(f, "validation"),
            FanOutStage::FreightInsert => write!(f, "freight insert"),
            FanOutStage::PriceRowInsert => write!(f, "price-table insert"),
        }
    }
}

/// First store error of a submission, with the rows it left behind
#[derive(Debug, Error)]
#[error("{stage} failed at destination {position}: {source}", position = .destination_index + 1)]
pub struct FanOutError {
    pub stage: FanOutStage,
    /// Zero-based index of the destination being written
    pub destination_index: usize,
    /// Freights still persisted after the failure, in submission order.
    /// A freight whose price rows failed is listed with `price_rows == 0`.
    pub committed: Vec<CreatedFreight>,
    /// Whether compensating deletes ran and removed everything
    pub compensated: bool,
    pub source: Error,
}

pub struct FanOutWriter<'a, R: FreightRepository + ?Sized> {
    repo: &'a R,
    policy: FailurePolicy,
}

impl<'a, R: FreightRepository + ?Sized> FanOutWriter<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Write one freight per destination, then its price rows.
    ///
    /// Returns the created freights in submission order.
    pub fn create_freights(
        &self,
        submission: &FreightSubmission,
    ) -> Result<Vec<CreatedFreight>, FanOutError> {
        submission
            .validate()
            .map_err(|source| self.fail(FanOutStage::Validation, 0, Vec::new(), source))?;

        let base = submission.base_payload();
        let mut created: Vec<CreatedFreight> = Vec::with_capacity(submission.destinations.len());

        for (index, destination) in submission.destinations.iter().enumerate() {
            let payload = submission.payload_for(&base, destination);
            let record = match self.repo.insert_freight(&payload) {
                Ok(record) => record,
                Err(source) => {
                    tracing::error!(
                        destination = index + 1,
                        city = %destination.city,
                        error = %source,
                        "freight insert failed, aborting submission"
                    );
                    return Err(self.fail(FanOutStage::FreightInsert, index, created, source));
                }
            };

            let mut summary = CreatedFreight {
                id: record.id.clone(),
                code: record.code.clone(),
                destination: destination.clone(),
                price_rows: 0,
            };

            let rows = submission.price_rows_for(&record.id);
            if !rows.is_empty() {
                match self.repo.insert_price_rows(&rows) {
                    Ok(inserted) => summary.price_rows = inserted.len(),
                    Err(source) => {
                        tracing::error!(
                            code = %record.code,
                            rows = rows.len(),
                            error = %source,
                            "price-table insert failed, freight kept without price rows"
                        );
                        created.push(summary);
                        return Err(self.fail(FanOutStage::PriceRowInsert, index, created, source));
                    }
                }
            }

            tracing::info!(
                code = %summary.code,
                city = %destination.city,
                price_rows = summary.price_rows,
                "freight created"
            );
            created.push(summary);
        }

        Ok(created)
    }

    fn fail(
        &self,
        stage: FanOutStage,
        destination_index: usize,
        committed: Vec<CreatedFreight>,
        source: Error,
    ) -> FanOutError {
        let (committed, compensated) = match self.policy {
            FailurePolicy::KeepPartial => (committed, false),
            FailurePolicy::Compensate if committed.is_empty() => (committed, false),
            FailurePolicy::Compensate => {
                let remaining = self.compensate(committed);
                let compensated = remaining.is_empty();
                (remaining, compensated)
            }
        };
        FanOutError {
            stage,
            destination_index,
            committed,
            compensated,
            source,
        }
    }

    /// Delete committed rows newest first; returns the freights that could not be removed
    fn compensate(&self, committed: Vec<CreatedFreight>) -> Vec<CreatedFreight> {
        let mut remaining = Vec::new();
        for freight in committed.into_iter().rev() {
            let result = self
                .repo
                .delete_price_rows(&freight.id)
                .and_then(|_| self.repo.delete_freight(&freight.id));
            match result {
                Ok(_) => tracing::warn!(code = %freight.code, "compensated: freight removed"),
                Err(err) => {
                    tracing::error!(code = %freight.code, error = %err, "compensating delete failed");
                    remaining.push(freight);
                }
            }
        }
        remaining.reverse();
        remaining
    }
}

/// Fan out with the default [`FailurePolicy::KeepPartial`]
pub fn create_freights<R: FreightRepository + ?Sized>(
    repo: &R,
    submission: &FreightSubmission,
) -> Result<Vec<CreatedFreight>, FanOutError> {
    FanOutWriter::new(repo).create_freights(submission)
}
