//! Write-side services over the repository traits

pub mod fanout;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use fanout::{create_freights, FailurePolicy, FanOutError, FanOutStage, FanOutWriter};
pub use status::{delete_freight, transition_status};
