// models/src/medical/patient.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require_text, ValidationResult};
use crate::record::uuid_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    /// Generated `PAT-XXXXX` code, unique per patient.
    pub patient_code: String,
    pub user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Patient, "patients", "patient");

/// Registration payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
}

impl NewPatient {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)
    }
}

impl Patient {
    /// Builds a patient record; `patient_code` comes from the store sequence.
    pub fn from_new(new: NewPatient, patient_code: String) -> Self {
        let now = Utc::now();
        Patient {
            id: Uuid::new_v4(),
            patient_code,
            user_id: new.user_id,
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            phone: new.phone,
            email: new.email,
            address: new.address,
            blood_group: new.blood_group,
            emergency_contact_name: new.emergency_contact_name,
            emergency_contact_phone: new.emergency_contact_phone,
            medical_history: new.medical_history,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match against name, code and phone.
    /// A blank needle matches every patient.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.patient_code.as_str()),
            self.phone.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
            || self.full_name().to_lowercase().contains(&needle)
    }

    pub fn apply(&mut self, update: PatientUpdate) -> ValidationResult<()> {
        if let Some(first_name) = update.first_name {
            require_text("first_name", &first_name)?;
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            require_text("last_name", &last_name)?;
            self.last_name = last_name.trim().to_string();
        }
        if update.date_of_birth.is_some() {
            self.date_of_birth = update.date_of_birth;
        }
        if update.gender.is_some() {
            self.gender = update.gender;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.address.is_some() {
            self.address = update.address;
        }
        if update.blood_group.is_some() {
            self.blood_group = update.blood_group;
        }
        if update.emergency_contact_name.is_some() {
            self.emergency_contact_name = update.emergency_contact_name;
        }
        if update.emergency_contact_phone.is_some() {
            self.emergency_contact_phone = update.emergency_contact_phone;
        }
        if update.medical_history.is_some() {
            self.medical_history = update.medical_history;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial update; absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_history: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(first: &str, last: &str, code: &str) -> Patient {
        Patient::from_new(
            NewPatient {
                first_name: first.to_string(),
                last_name: last.to_string(),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
            code.to_string(),
        )
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let john = patient("John", "Smith", "PAT-00001");
        let jane = patient("Jane", "Doe", "PAT-00002");
        assert!(!john.matches_search("jan"));
        assert!(jane.matches_search("jan"));
        assert!(jane.matches_search("JANE DOE"));
        assert!(john.matches_search("pat-00001"));
        assert!(john.matches_search("0100"));
    }

    #[test]
    fn blank_search_matches_everyone() {
        assert!(patient("John", "Smith", "PAT-00001").matches_search("  "));
    }

    #[test]
    fn update_rejects_blank_names() {
        let mut p = patient("John", "Smith", "PAT-00001");
        let err = p
            .apply(PatientUpdate {
                first_name: Some(" ".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, crate::errors::ValidationError::EmptyField("first_name"));
        assert_eq!(p.first_name, "John");
    }
}
