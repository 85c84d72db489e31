//! Sequential identifier allocation for patients and doctors.
//!
//! Identifiers are a letter prefix plus a numeric suffix (`P7`, `D2`).
//! The next id is max-based, derived by scanning existing records, so
//! gaps left by earlier data are never reused out of order. Allocation
//! and the corresponding save must be treated as one logical unit by the
//! caller.

use crate::{Doctor, Error, Patient, Result};

/// Allocate the next patient id (`P<max + 1>`)
pub fn next_patient_id(patients: &[Patient]) -> Result<String> {
    let next = next_numeric_suffix('P', patients.iter().map(|p| p.id.as_str()))?;
    Ok(format!("P{}", next))
}

/// Allocate the next doctor id (`D<max + 1>`)
pub fn next_doctor_id(doctors: &[Doctor]) -> Result<String> {
    let next = next_numeric_suffix('D', doctors.iter().map(|d| d.id.as_str()))?;
    Ok(format!("D{}", next))
}

/// Max numeric suffix among ids with the given prefix, plus one
///
/// Ids with a different prefix are ignored; a matching id with a
/// non-numeric suffix is a malformed record, not a panic.
fn next_numeric_suffix<'a>(prefix: char, ids: impl Iterator<Item = &'a str>) -> Result<u32> {
    let mut max_id = 0u32;
    for id in ids {
        let Some(suffix) = id.strip_prefix(prefix) else {
            continue;
        };
        let num: u32 = suffix.parse().map_err(|_| {
            Error::MalformedRecord(format!("id {:?} has a non-numeric suffix", id))
        })?;
        max_id = max_id.max(num);
    }
    Ok(max_id + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: &str) -> Patient {
        Patient {
            id: id.into(),
            name: "Test".into(),
            age: 1,
            gender: "NA".into(),
            phone: "NA".into(),
        }
    }

    #[test]
    fn test_first_id_on_empty_store() {
        assert_eq!(next_patient_id(&[]).unwrap(), "P1");
        assert_eq!(next_doctor_id(&[]).unwrap(), "D1");
    }

    #[test]
    fn test_allocation_is_max_based_not_count_based() {
        let patients = vec![patient("P1"), patient("P3")];
        assert_eq!(next_patient_id(&patients).unwrap(), "P4");
    }

    #[test]
    fn test_foreign_prefixes_are_ignored() {
        let patients = vec![patient("P2"), patient("X9")];
        assert_eq!(next_patient_id(&patients).unwrap(), "P3");
    }

    #[test]
    fn test_non_numeric_suffix_is_malformed_record() {
        let patients = vec![patient("Pabc")];
        let err = next_patient_id(&patients).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(_)));
    }

    #[test]
    fn test_doctor_allocation() {
        let doctors = vec![
            Doctor {
                id: "D1".into(),
                name: "Dr. A".into(),
                default_slots: vec![],
            },
            Doctor {
                id: "D2".into(),
                name: "Dr. B".into(),
                default_slots: vec![],
            },
        ];
        assert_eq!(next_doctor_id(&doctors).unwrap(), "D3");
    }
}
