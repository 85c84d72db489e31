//! Flat-file record store for patients, doctors, and appointments.
//!
//! Each entity type persists to its own line-delimited, comma-separated
//! file under the data directory. Reads take a shared lock and tolerate
//! trailing whitespace, carriage returns, and blank lines; a row with
//! missing fields or an unparseable value is an explicit
//! [`Error::MalformedRecord`] naming the file and line. Every mutation
//! rewrites the whole file through a locked temp file and atomic rename.

use crate::{Appointment, AppointmentStatus, Doctor, Error, Patient, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PATIENTS_FILE: &str = "patients.txt";
const DOCTORS_FILE: &str = "doctors.txt";
const APPOINTMENTS_FILE: &str = "appointments.txt";

/// The in-memory working set backed by the flat record files
///
/// The entire working set is loaded at [`RecordStore::open`] and is the
/// single source of truth for the rest of the process lifetime; callers
/// mutate the collections and then invoke the matching `save_*` method.
#[derive(Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub appointments: Vec<Appointment>,
}

impl RecordStore {
    /// Open the store rooted at `data_dir`, loading all record files
    ///
    /// Missing files yield empty collections, except doctors: a first run
    /// seeds two default doctors and persists them.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let mut store = Self {
            data_dir,
            patients: Vec::new(),
            doctors: Vec::new(),
            appointments: Vec::new(),
        };
        store.patients = store.load_patients()?;
        store.doctors = store.load_doctors()?;
        store.appointments = store.load_appointments()?;

        tracing::debug!(
            "Opened store: {} patients, {} doctors, {} appointments",
            store.patients.len(),
            store.doctors.len(),
            store.appointments.len()
        );
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    fn load_patients(&self) -> Result<Vec<Patient>> {
        let path = self.file_path(PATIENTS_FILE);
        let contents = match read_locked(&path)? {
            Some(c) => c,
            None => return Ok(Vec::new()),
        };
        let rows: Vec<PatientRow> = parse_rows(PATIENTS_FILE, &contents)?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    fn load_doctors(&mut self) -> Result<Vec<Doctor>> {
        let path = self.file_path(DOCTORS_FILE);
        let contents = match read_locked(&path)? {
            Some(c) => c,
            None => {
                tracing::info!("No doctors file found, seeding default doctors");
                let doctors = default_doctors();
                self.doctors = doctors.clone();
                self.save_doctors()?;
                return Ok(doctors);
            }
        };
        let rows: Vec<DoctorRow> = parse_rows(DOCTORS_FILE, &contents)?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    fn load_appointments(&self) -> Result<Vec<Appointment>> {
        let path = self.file_path(APPOINTMENTS_FILE);
        let contents = match read_locked(&path)? {
            Some(c) => c,
            None => return Ok(Vec::new()),
        };
        let rows: Vec<AppointmentRow> = parse_rows(APPOINTMENTS_FILE, &contents)?;
        let mut appointments = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let appt = Appointment::try_from(row).map_err(|reason| {
                Error::MalformedRecord(format!(
                    "{} line {}: {}",
                    APPOINTMENTS_FILE,
                    idx + 1,
                    reason
                ))
            })?;
            appointments.push(appt);
        }
        Ok(appointments)
    }

    /// Rewrite the patients file from the in-memory collection
    pub fn save_patients(&self) -> Result<()> {
        let rows: Vec<PatientRow> = self.patients.iter().map(PatientRow::from).collect();
        write_atomic(&self.file_path(PATIENTS_FILE), &render_rows(&rows)?)
    }

    /// Rewrite the doctors file from the in-memory collection
    pub fn save_doctors(&self) -> Result<()> {
        let rows: Vec<DoctorRow> = self.doctors.iter().map(DoctorRow::from).collect();
        write_atomic(&self.file_path(DOCTORS_FILE), &render_rows(&rows)?)
    }

    /// Rewrite the appointments file from the in-memory collection
    pub fn save_appointments(&self) -> Result<()> {
        let rows: Vec<AppointmentRow> = self.appointments.iter().map(AppointmentRow::from).collect();
        write_atomic(&self.file_path(APPOINTMENTS_FILE), &render_rows(&rows)?)
    }
}

/// Doctors seeded on first run when no doctors file exists
fn default_doctors() -> Vec<Doctor> {
    vec![
        Doctor {
            id: "D1".into(),
            name: "Dr. Mehta".into(),
            default_slots: vec![
                "10:00-11:00".into(),
                "11:00-12:00".into(),
                "12:00-13:00".into(),
            ],
        },
        Doctor {
            id: "D2".into(),
            name: "Dr. Sharma".into(),
            default_slots: vec![
                "09:00-10:00".into(),
                "10:00-11:00".into(),
                "11:00-12:00".into(),
            ],
        },
    ]
}

// ============================================================================
// Row formats (persisted field order is part of the on-disk contract)
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct PatientRow {
    id: String,
    name: String,
    age: u32,
    gender: String,
    phone: String,
}

impl From<&Patient> for PatientRow {
    fn from(p: &Patient) -> Self {
        PatientRow {
            id: p.id.clone(),
            name: p.name.clone(),
            age: p.age,
            gender: p.gender.clone(),
            phone: p.phone.clone(),
        }
    }
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: row.id,
            name: row.name,
            age: row.age,
            gender: row.gender,
            phone: row.phone,
        }
    }
}

/// Doctor slots are space-joined inside the third field
#[derive(Debug, Serialize, Deserialize)]
struct DoctorRow {
    id: String,
    name: String,
    slots: String,
}

impl From<&Doctor> for DoctorRow {
    fn from(d: &Doctor) -> Self {
        DoctorRow {
            id: d.id.clone(),
            name: d.name.clone(),
            slots: d.default_slots.join(" "),
        }
    }
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: row.id,
            name: row.name,
            default_slots: row.slots.split_whitespace().map(String::from).collect(),
        }
    }
}

/// A missing or empty status field on load means active (legacy rows)
#[derive(Debug, Serialize, Deserialize)]
struct AppointmentRow {
    patient_id: String,
    doctor_id: String,
    date: String,
    slot: String,
    #[serde(default)]
    status: Option<String>,
}

impl From<&Appointment> for AppointmentRow {
    fn from(a: &Appointment) -> Self {
        AppointmentRow {
            patient_id: a.patient_id.clone(),
            doctor_id: a.doctor_id.clone(),
            date: a.date.clone(),
            slot: a.slot.clone(),
            status: Some(a.status.to_string()),
        }
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = String;

    fn try_from(row: AppointmentRow) -> std::result::Result<Self, String> {
        let status = match row.status.as_deref().map(str::trim) {
            None | Some("") | Some("active") => AppointmentStatus::Active,
            Some("cancelled") => AppointmentStatus::Cancelled,
            Some(other) => return Err(format!("unknown status {:?}", other)),
        };
        Ok(Appointment {
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            date: row.date,
            slot: row.slot,
            status,
        })
    }
}

// ============================================================================
// File I/O helpers
// ============================================================================

/// Read a record file under a shared lock
///
/// Returns `None` if the file does not exist. Trailing whitespace and
/// carriage returns are stripped per line; blank lines are dropped.
fn read_locked(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read_result = reader.read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    let cleaned: Vec<&str> = contents
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    Ok(Some(cleaned.join("\n")))
}

/// Parse cleaned file contents into typed rows, one error per bad line
fn parse_rows<R: DeserializeOwned>(file_name: &str, contents: &str) -> Result<Vec<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::MalformedRecord(format!("{} line {}: {}", file_name, idx + 1, e))
        })?;
        let row: R = record.deserialize(None).map_err(|e| {
            Error::MalformedRecord(format!("{} line {}: {}", file_name, idx + 1, e))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Serialize rows to the comma-delimited line format
fn render_rows<R: Serialize>(rows: &[R]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    let buf = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    String::from_utf8(buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Atomically replace `path` with `contents`
///
/// Writes to a locked temp file in the same directory, syncs, then
/// renames over the original.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "record path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved records to {:?}", path);
    Ok(())
}
