//! Booking engine: create, cancel, and reschedule appointments.
//!
//! Each operation is a pure function over the in-memory appointment
//! collection; persisting the collection and appending the audit event
//! are the caller's follow-up. The availability check happens inside the
//! operation, so check and act are a single call and a rejected
//! operation never mutates the collection.
//!
//! State machine per appointment: `active ⇄ cancelled` via cancel, and
//! `{active, cancelled} → active` with a new date/slot via reschedule.
//! There is no terminal state; records persist in whichever status they
//! last held.

use crate::availability::is_slot_available;
use crate::{Appointment, AppointmentStatus, Error, Result};

/// Book a new active appointment for the given tuple
///
/// Fails with [`Error::SlotConflict`] if the doctor already holds an
/// active appointment on that date and slot.
pub fn book(
    appointments: &mut Vec<Appointment>,
    patient_id: &str,
    doctor_id: &str,
    date: &str,
    slot: &str,
) -> Result<()> {
    if !is_slot_available(appointments, doctor_id, date, slot) {
        return Err(Error::SlotConflict {
            doctor_id: doctor_id.into(),
            date: date.into(),
            slot: slot.into(),
        });
    }

    appointments.push(Appointment::new(patient_id, doctor_id, date, slot));
    tracing::info!(
        "Booked appointment: patient {} with doctor {} on {} at {}",
        patient_id,
        doctor_id,
        date,
        slot
    );
    Ok(())
}

/// Cancel the first active appointment matching the exact 4-tuple
///
/// The record is retained with status cancelled. Only the first match is
/// affected; duplicates cannot occur while the availability invariant
/// holds at booking time.
pub fn cancel(
    appointments: &mut [Appointment],
    patient_id: &str,
    doctor_id: &str,
    date: &str,
    slot: &str,
) -> Result<()> {
    let appt = appointments
        .iter_mut()
        .find(|a| a.is_active() && a.matches(patient_id, doctor_id, date, slot))
        .ok_or_else(|| Error::NotFound {
            patient_id: patient_id.into(),
            doctor_id: doctor_id.into(),
            date: date.into(),
            slot: slot.into(),
        })?;

    appt.status = AppointmentStatus::Cancelled;
    tracing::info!(
        "Cancelled appointment: patient {} with doctor {} on {} at {}",
        patient_id,
        doctor_id,
        date,
        slot
    );
    Ok(())
}

/// Move an appointment to a new date and slot
///
/// Matches the first record for patient+doctor whose trimmed date and
/// slot equal the trimmed old values, in either status: rescheduling a
/// cancelled appointment resurrects it. The new slot is checked against
/// the whole collection before anything is mutated; on success the
/// record's date and slot are updated and its status forced back to
/// active.
pub fn reschedule(
    appointments: &mut [Appointment],
    patient_id: &str,
    doctor_id: &str,
    old_date: &str,
    old_slot: &str,
    new_date: &str,
    new_slot: &str,
) -> Result<()> {
    let idx = appointments
        .iter()
        .position(|a| {
            a.patient_id == patient_id
                && a.doctor_id == doctor_id
                && a.date.trim() == old_date.trim()
                && a.slot.trim() == old_slot.trim()
        })
        .ok_or_else(|| Error::NotFound {
            patient_id: patient_id.into(),
            doctor_id: doctor_id.into(),
            date: old_date.into(),
            slot: old_slot.into(),
        })?;

    if !is_slot_available(appointments, doctor_id, new_date, new_slot) {
        return Err(Error::SlotConflict {
            doctor_id: doctor_id.into(),
            date: new_date.into(),
            slot: new_slot.into(),
        });
    }

    let appt = &mut appointments[idx];
    appt.date = new_date.into();
    appt.slot = new_slot.into();
    appt.status = AppointmentStatus::Active;
    tracing::info!(
        "Rescheduled appointment: patient {} from {} {} to {} {}",
        patient_id,
        old_date,
        old_slot,
        new_date,
        new_slot
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(appts: &[Appointment], doctor_id: &str, date: &str, slot: &str) -> usize {
        appts
            .iter()
            .filter(|a| {
                a.is_active() && a.doctor_id == doctor_id && a.date == date && a.slot == slot
            })
            .count()
    }

    #[test]
    fn test_book_then_slot_is_unavailable() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();
        assert!(!is_slot_available(&appts, "D1", "2024-01-01", "10:00-11:00"));
    }

    #[test]
    fn test_double_booking_is_rejected() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();

        let err = book(&mut appts, "P2", "D1", "2024-01-01", "10:00-11:00").unwrap_err();
        assert!(matches!(err, Error::SlotConflict { .. }));
        assert_eq!(appts.len(), 1);
        assert_eq!(active_count(&appts, "D1", "2024-01-01", "10:00-11:00"), 1);
    }

    #[test]
    fn test_cancel_frees_slot_for_rebooking() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();
        cancel(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();

        // Record retained, not deleted
        assert_eq!(appts.len(), 1);
        assert_eq!(appts[0].status, AppointmentStatus::Cancelled);

        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();
        assert_eq!(appts.len(), 2);
        assert_eq!(active_count(&appts, "D1", "2024-01-01", "10:00-11:00"), 1);
    }

    #[test]
    fn test_cancel_without_match_is_not_found() {
        let mut appts = vec![Appointment::new("P1", "D1", "2024-01-01", "10:00-11:00")];
        let err = cancel(&mut appts, "P2", "D1", "2024-01-01", "10:00-11:00").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(appts[0].is_active());
    }

    #[test]
    fn test_cancel_already_cancelled_is_not_found() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();
        cancel(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();

        let err = cancel(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_reschedule_moves_to_new_slot() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();

        reschedule(
            &mut appts,
            "P1",
            "D1",
            "2024-01-01",
            "10:00-11:00",
            "2024-01-02",
            "11:00-12:00",
        )
        .unwrap();

        assert_eq!(appts.len(), 1);
        assert_eq!(appts[0].date, "2024-01-02");
        assert_eq!(appts[0].slot, "11:00-12:00");
        assert!(appts[0].is_active());
        assert!(is_slot_available(&appts, "D1", "2024-01-01", "10:00-11:00"));
    }

    #[test]
    fn test_reschedule_resurrects_cancelled_appointment() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();
        cancel(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();

        reschedule(
            &mut appts,
            "P1",
            "D1",
            "2024-01-01",
            "10:00-11:00",
            "2024-01-05",
            "12:00-13:00",
        )
        .unwrap();

        assert!(appts[0].is_active());
        assert_eq!(appts[0].date, "2024-01-05");
    }

    #[test]
    fn test_reschedule_conflict_leaves_record_unchanged() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();
        book(&mut appts, "P2", "D1", "2024-01-02", "11:00-12:00").unwrap();

        let err = reschedule(
            &mut appts,
            "P1",
            "D1",
            "2024-01-01",
            "10:00-11:00",
            "2024-01-02",
            "11:00-12:00",
        )
        .unwrap_err();

        assert!(matches!(err, Error::SlotConflict { .. }));
        assert_eq!(appts[0].date, "2024-01-01");
        assert_eq!(appts[0].slot, "10:00-11:00");
        assert!(appts[0].is_active());
    }

    #[test]
    fn test_reschedule_without_match_is_not_found() {
        let mut appts = Vec::new();
        let err = reschedule(
            &mut appts,
            "P1",
            "D1",
            "2024-01-01",
            "10:00-11:00",
            "2024-01-02",
            "11:00-12:00",
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_reschedule_matches_on_trimmed_old_values() {
        let mut appts = Vec::new();
        book(&mut appts, "P1", "D1", "2024-01-01", "10:00-11:00").unwrap();

        reschedule(
            &mut appts,
            "P1",
            "D1",
            " 2024-01-01 ",
            "10:00-11:00 ",
            "2024-01-03",
            "12:00-13:00",
        )
        .unwrap();
        assert_eq!(appts[0].date, "2024-01-03");
    }

    #[test]
    fn test_at_most_one_active_per_tuple_across_sequences() {
        let mut appts = Vec::new();
        let tuple = ("D1", "2024-01-01", "10:00-11:00");

        book(&mut appts, "P1", tuple.0, tuple.1, tuple.2).unwrap();
        let _ = book(&mut appts, "P2", tuple.0, tuple.1, tuple.2);
        cancel(&mut appts, "P1", tuple.0, tuple.1, tuple.2).unwrap();
        book(&mut appts, "P3", tuple.0, tuple.1, tuple.2).unwrap();
        let _ = reschedule(
            &mut appts,
            "P1",
            tuple.0,
            tuple.1,
            tuple.2,
            tuple.1,
            tuple.2,
        );

        assert!(active_count(&appts, tuple.0, tuple.1, tuple.2) <= 1);
    }
}
