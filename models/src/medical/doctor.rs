// models/src/medical/doctor.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require_text, ValidationError, ValidationResult};
use crate::record::uuid_record;

/// A doctor profile, linked one-to-one with a `User` whose role is `doctor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: String,
    pub specialization: String,
    pub qualification: Option<String>,
    pub department_id: Option<Uuid>,
    pub consultation_fee: Decimal,
    pub is_available: bool,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Doctor, "doctors", "doctor");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub user_id: String,
    pub specialization: String,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub consultation_fee: Decimal,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub phone: Option<String>,
}

fn default_available() -> bool {
    true
}

fn check_fee(fee: Decimal) -> ValidationResult<()> {
    if fee.is_sign_negative() {
        return Err(ValidationError::invalid(
            "consultation_fee",
            "must not be negative",
        ));
    }
    Ok(())
}

impl NewDoctor {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("user_id", &self.user_id)?;
        require_text("specialization", &self.specialization)?;
        check_fee(self.consultation_fee)
    }
}

impl Doctor {
    pub fn from_new(new: NewDoctor) -> Self {
        let now = Utc::now();
        Doctor {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            specialization: new.specialization,
            qualification: new.qualification,
            department_id: new.department_id,
            consultation_fee: new.consultation_fee,
            is_available: new.is_available,
            phone: new.phone,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: DoctorUpdate) -> ValidationResult<()> {
        if let Some(specialization) = update.specialization {
            require_text("specialization", &specialization)?;
            self.specialization = specialization;
        }
        if update.qualification.is_some() {
            self.qualification = update.qualification;
        }
        if update.department_id.is_some() {
            self.department_id = update.department_id;
        }
        if let Some(fee) = update.consultation_fee {
            check_fee(fee)?;
            self.consultation_fee = fee;
        }
        if let Some(available) = update.is_available {
            self.is_available = available;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorUpdate {
    pub specialization: Option<String>,
    pub qualification: Option<String>,
    pub department_id: Option<Uuid>,
    pub consultation_fee: Option<Decimal>,
    pub is_available: Option<bool>,
    pub phone: Option<String>,
}
