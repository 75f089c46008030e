//! Use cases

pub mod freight_service;
