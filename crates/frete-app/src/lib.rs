//! Application service layer - use cases, config, repository wiring

pub mod app;
pub mod config;
pub mod repository;

pub use app::freight_service::FreightService;
pub use config::Config;
