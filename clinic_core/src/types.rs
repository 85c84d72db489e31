//! Core domain types for the clinic scheduling system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Patients and doctors
//! - Appointments and their status lifecycle
//!
//! Entities carry string identifiers (`P<n>` for patients, `D<n>` for
//! doctors). Appointments have no identifier of their own; they are
//! addressed by the (patient, doctor, date, slot) tuple.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered patient
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
}

/// A doctor with a default list of bookable time slots
///
/// Slots are free-form labels (e.g. `"10:00-11:00"`) in a flat ordered
/// sequence, not tied to any particular date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub default_slots: Vec<String>,
}

/// Lifecycle status of an appointment
///
/// Cancelled records are retained, never deleted, so the status field is
/// the single source of truth for whether a slot is occupied.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Active,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Active => write!(f, "active"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A booked appointment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub slot: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Create a new active appointment for the given tuple
    pub fn new(
        patient_id: impl Into<String>,
        doctor_id: impl Into<String>,
        date: impl Into<String>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            doctor_id: doctor_id.into(),
            date: date.into(),
            slot: slot.into(),
            status: AppointmentStatus::Active,
        }
    }

    /// Exact match on the identifying 4-tuple (case-sensitive)
    pub fn matches(&self, patient_id: &str, doctor_id: &str, date: &str, slot: &str) -> bool {
        self.patient_id == patient_id
            && self.doctor_id == doctor_id
            && self.date == date
            && self.slot == slot
    }

    pub fn is_active(&self) -> bool {
        self.status == AppointmentStatus::Active
    }
}
