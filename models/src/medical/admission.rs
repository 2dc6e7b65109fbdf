// models/src/medical/admission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::uuid_record;

string_enum! {
    AdmissionStatus, "admission status" {
        Admitted => "admitted",
        Discharged => "discharged",
    }
}

/// A patient occupying a bed between admission and an optional discharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub bed_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub admission_date: DateTime<Utc>,
    pub discharge_date: Option<DateTime<Utc>>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub status: AdmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Admission, "admissions", "admission");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAdmission {
    pub patient_id: Uuid,
    pub bed_id: Uuid,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub bed_id: Uuid,
}

impl Admission {
    /// A fresh admission, dated now.
    pub fn admit(new: NewAdmission) -> Self {
        let now = Utc::now();
        Admission {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            bed_id: new.bed_id,
            doctor_id: new.doctor_id,
            admission_date: now,
            discharge_date: None,
            diagnosis: new.diagnosis,
            notes: new.notes,
            status: AdmissionStatus::Admitted,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AdmissionStatus::Admitted
    }

    pub fn discharge(&mut self) {
        let now = Utc::now();
        self.status = AdmissionStatus::Discharged;
        self.discharge_date = Some(now);
        self.updated_at = now;
    }
}
