//! Freight domain layer
//!
//! Persisted freight fields have drifted in shape across schema versions.
//! This crate reduces them to flat entries ([`normalize`]), labels each
//! entry ([`display_text`], [`subtitle`]), assembles display structures
//! ([`render`]) and writes multi-destination submissions
//! ([`create_freights`]).

pub mod extract;
pub mod model;
pub mod normalize;
pub mod render;
pub mod repository;
pub mod service;

pub use extract::{display_text, selection_text, subtitle};
pub use model::Entry;
pub use normalize::normalize;
pub use service::{create_freights, FailurePolicy, FanOutError, FanOutWriter};
