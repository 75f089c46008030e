//! Domain model types

pub mod entry;
pub mod submission;

pub use entry::Entry;
pub use submission::{
    CreatedFreight, FreightSubmission, PlaceInput, PriceRange, SelectionInput, VehiclePriceTable,
};

pub use frete_types::{
    Collaborator, Company, FreightPayload, FreightRecord, FreightStatus, FreightType,
    PriceRowDraft, PriceTableRow, TollPolicy,
};
