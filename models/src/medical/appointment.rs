// models/src/medical/appointment.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ValidationError, ValidationResult};
use crate::record::uuid_record;

string_enum! {
    /// Appointment status. Any status may be set to any other; there is no
    /// enforced workflow for appointments.
    AppointmentStatus, "appointment status" {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
        NoShow => "no_show",
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    /// Wall-clock slot, `HH:MM`.
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub appointment_type: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Appointment, "appointments", "appointment");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Normalizes `H:MM`, `HH:MM` or `HH:MM:SS` into `HH:MM`.
pub fn normalize_time(raw: &str) -> ValidationResult<String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| ValidationError::InvalidDateFormat(raw.to_string()))
}

impl Appointment {
    pub fn from_new(new: NewAppointment) -> ValidationResult<Self> {
        let now = Utc::now();
        Ok(Appointment {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            appointment_date: new.appointment_date,
            appointment_time: normalize_time(&new.appointment_time)?,
            status: new.status.unwrap_or_default(),
            appointment_type: new.appointment_type,
            reason: new.reason,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn apply(&mut self, update: AppointmentUpdate) -> ValidationResult<()> {
        if let Some(date) = update.appointment_date {
            self.appointment_date = date;
        }
        if let Some(time) = update.appointment_time {
            self.appointment_time = normalize_time(&time)?;
        }
        if let Some(doctor_id) = update.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.appointment_type.is_some() {
            self.appointment_type = update.appointment_type;
        }
        if update.reason.is_some() {
            self.reason = update.reason;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentUpdate {
    pub doctor_id: Option<Uuid>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub appointment_type: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}
