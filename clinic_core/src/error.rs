//! Error types for the clinic_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for clinic_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted record could not be parsed
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// No appointment matches the requested tuple
    #[error("No appointment found for patient {patient_id} with doctor {doctor_id} on {date} at {slot}")]
    NotFound {
        patient_id: String,
        doctor_id: String,
        date: String,
        slot: String,
    },

    /// The requested slot is already held by an active appointment
    #[error("Slot {slot} on {date} is already booked for doctor {doctor_id}")]
    SlotConflict {
        doctor_id: String,
        date: String,
        slot: String,
    },
}
