#![forbid(unsafe_code)]

//! Core domain model and business logic for the clinic scheduling system.
//!
//! This crate provides:
//! - Domain types (patients, doctors, appointments)
//! - Record store (flat-file persistence)
//! - Identity allocation
//! - Availability index and booking engine
//! - Audit logging

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod ids;
pub mod availability;
pub mod engine;
pub mod audit;

// Re-export commonly used types
pub use audit::{EventSink, FileAuditLog};
pub use availability::{is_slot_available, open_slots};
pub use config::Config;
pub use engine::{book, cancel, reschedule};
pub use error::{Error, Result};
pub use ids::{next_doctor_id, next_patient_id};
pub use store::RecordStore;
pub use types::*;
