//! Availability index over the appointment collection.
//!
//! Availability is a derived view, never cached: the predicate scans the
//! in-memory collection at the moment of each booking or reschedule.
//! Matching is exact, case-sensitive string equality with no
//! normalization of date or slot formats.

use crate::{Appointment, Doctor};

/// Is (doctor, date, slot) free of any active appointment?
pub fn is_slot_available(
    appointments: &[Appointment],
    doctor_id: &str,
    date: &str,
    slot: &str,
) -> bool {
    !appointments.iter().any(|a| {
        a.is_active() && a.doctor_id == doctor_id && a.date == date && a.slot == slot
    })
}

/// The doctor's default slots still free on the given date
///
/// Order follows the doctor's configured slot sequence.
pub fn open_slots<'a>(
    doctor: &'a Doctor,
    date: &str,
    appointments: &[Appointment],
) -> Vec<&'a str> {
    doctor
        .default_slots
        .iter()
        .filter(|slot| is_slot_available(appointments, &doctor.id, date, slot))
        .map(String::as_str)
        .collect()
}
