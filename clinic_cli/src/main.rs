use clap::{Parser, Subcommand};
use clinic_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic appointment scheduling system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new patient and print the allocated id
    AddPatient {
        name: String,
        age: u32,
        gender: Option<String>,
        phone: Option<String>,
    },

    /// Register a new doctor with a default slot list
    AddDoctor {
        name: String,
        /// Space-separated slot labels, e.g. "10:00-11:00 11:00-12:00"
        slots: String,
    },

    /// Book an appointment if the slot is free
    BookAppointment {
        patient_id: String,
        doctor_id: String,
        date: String,
        slot: String,
    },

    /// Cancel a matching active appointment
    CancelAppointment {
        patient_id: String,
        doctor_id: String,
        date: String,
        slot: String,
    },

    /// Move an appointment to a new date and slot
    RescheduleAppointment {
        patient_id: String,
        doctor_id: String,
        old_date: String,
        old_slot: String,
        new_date: String,
        new_slot: String,
    },

    /// List all registered patients
    ListPatients,

    /// List all registered doctors and their default slots
    ListDoctors,

    /// List all appointments with their status
    ListAppointments,

    /// Show a doctor's free default slots for a date
    OpenSlots { doctor_id: String, date: String },
}

fn main() -> Result<()> {
    clinic_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let mut store = RecordStore::open(&data_dir)?;
    let mut audit = FileAuditLog::new(data_dir.join("logs.txt"));

    match cli.command {
        Commands::AddPatient {
            name,
            age,
            gender,
            phone,
        } => cmd_add_patient(&mut store, &mut audit, name, age, gender, phone),
        Commands::AddDoctor { name, slots } => cmd_add_doctor(&mut store, &mut audit, name, slots),
        Commands::BookAppointment {
            patient_id,
            doctor_id,
            date,
            slot,
        } => cmd_book(&mut store, &mut audit, patient_id, doctor_id, date, slot),
        Commands::CancelAppointment {
            patient_id,
            doctor_id,
            date,
            slot,
        } => cmd_cancel(&mut store, &mut audit, patient_id, doctor_id, date, slot),
        Commands::RescheduleAppointment {
            patient_id,
            doctor_id,
            old_date,
            old_slot,
            new_date,
            new_slot,
        } => cmd_reschedule(
            &mut store, &mut audit, patient_id, doctor_id, old_date, old_slot, new_date, new_slot,
        ),
        Commands::ListPatients => cmd_list_patients(&store),
        Commands::ListDoctors => cmd_list_doctors(&store),
        Commands::ListAppointments => cmd_list_appointments(&store),
        Commands::OpenSlots { doctor_id, date } => cmd_open_slots(&store, doctor_id, date),
    }
}

/// Optional CLI fields collapse to "NA" (legacy frontends pass literal
/// "undefined"/"null" for blanks)
fn normalize_optional(value: Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some("undefined") | Some("null") | Some("NA") => "NA".into(),
        Some(v) => v.into(),
    }
}

fn cmd_add_patient(
    store: &mut RecordStore,
    audit: &mut FileAuditLog,
    name: String,
    age: u32,
    gender: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let gender = normalize_optional(gender);
    let phone = normalize_optional(phone);

    let id = next_patient_id(&store.patients)?;
    store.patients.push(Patient {
        id: id.clone(),
        name: name.clone(),
        age,
        gender: gender.clone(),
        phone,
    });
    store.save_patients()?;
    audit.append(&format!(
        "Added patient: {} - {} (Age {}, Gender {})",
        id, name, age, gender
    ))?;

    println!("NEW_ID:{}", id);
    println!("Patient added successfully!");
    Ok(())
}

fn cmd_add_doctor(
    store: &mut RecordStore,
    audit: &mut FileAuditLog,
    name: String,
    slots: String,
) -> Result<()> {
    let mut slot_list: Vec<String> = slots.split_whitespace().map(String::from).collect();
    if slot_list.is_empty() {
        slot_list.push("09:00-10:00".into());
    }

    let id = next_doctor_id(&store.doctors)?;
    store.doctors.push(Doctor {
        id: id.clone(),
        name: name.clone(),
        default_slots: slot_list,
    });
    store.save_doctors()?;
    audit.append(&format!("Added doctor: {} - {}", id, name))?;

    println!("NEW_ID:{}", id);
    println!("Doctor added successfully!");
    Ok(())
}

fn cmd_book(
    store: &mut RecordStore,
    audit: &mut FileAuditLog,
    patient_id: String,
    doctor_id: String,
    date: String,
    slot: String,
) -> Result<()> {
    match book(&mut store.appointments, &patient_id, &doctor_id, &date, &slot) {
        Ok(()) => {
            store.save_appointments()?;
            audit.append(&format!(
                "Booked appointment: Patient {} with Doctor {} on {} at {}",
                patient_id, doctor_id, date, slot
            ))?;
            println!("Appointment booked successfully!");
        }
        Err(Error::SlotConflict { .. }) => println!("Slot not available!"),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn cmd_cancel(
    store: &mut RecordStore,
    audit: &mut FileAuditLog,
    patient_id: String,
    doctor_id: String,
    date: String,
    slot: String,
) -> Result<()> {
    match cancel(&mut store.appointments, &patient_id, &doctor_id, &date, &slot) {
        Ok(()) => {
            store.save_appointments()?;
            audit.append(&format!(
                "Cancelled appointment: Patient {} with Doctor {} on {} at {}",
                patient_id, doctor_id, date, slot
            ))?;
            println!("Appointment cancelled successfully!");
        }
        Err(Error::NotFound { .. }) => println!("Appointment not found."),
        Err(e) => return Err(e),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_reschedule(
    store: &mut RecordStore,
    audit: &mut FileAuditLog,
    patient_id: String,
    doctor_id: String,
    old_date: String,
    old_slot: String,
    new_date: String,
    new_slot: String,
) -> Result<()> {
    match reschedule(
        &mut store.appointments,
        &patient_id,
        &doctor_id,
        &old_date,
        &old_slot,
        &new_date,
        &new_slot,
    ) {
        Ok(()) => {
            store.save_appointments()?;
            audit.append(&format!(
                "Rescheduled appointment: Patient {} from {} {} to {} {}",
                patient_id, old_date, old_slot, new_date, new_slot
            ))?;
            println!("Appointment rescheduled successfully!");
        }
        Err(Error::NotFound { .. }) => println!("Appointment not found."),
        Err(Error::SlotConflict { .. }) => println!("New slot not available!"),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn cmd_list_patients(store: &RecordStore) -> Result<()> {
    for p in &store.patients {
        println!(
            "{}: {} (Age {}, Gender {}, Phone {})",
            p.id, p.name, p.age, p.gender, p.phone
        );
    }
    Ok(())
}

fn cmd_list_doctors(store: &RecordStore) -> Result<()> {
    for d in &store.doctors {
        println!("{}: {} [{}]", d.id, d.name, d.default_slots.join(" "));
    }
    Ok(())
}

fn cmd_list_appointments(store: &RecordStore) -> Result<()> {
    for a in &store.appointments {
        println!(
            "Patient {} with Doctor {} on {} at {} [{}]",
            a.patient_id, a.doctor_id, a.date, a.slot, a.status
        );
    }
    Ok(())
}

fn cmd_open_slots(store: &RecordStore, doctor_id: String, date: String) -> Result<()> {
    let Some(doctor) = store.doctors.iter().find(|d| d.id == doctor_id) else {
        println!("Doctor not found.");
        return Ok(());
    };

    for slot in open_slots(doctor, &date, &store.appointments) {
        println!("{}", slot);
    }
    Ok(())
}
