//! services/dashboard/src/lib.rs
//!
//! Library half of the `dashboard` service: configuration, backend adapters and
//! the services the schedule screens drive.

pub mod adapters;
pub mod config;
pub mod error;
pub mod service;
