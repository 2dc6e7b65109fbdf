// models/src/medical/department.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require_text, ValidationResult};
use crate::record::uuid_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub head_doctor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Department, "departments", "department");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub head_doctor_id: Option<Uuid>,
}

impl NewDepartment {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("name", &self.name)
    }
}

impl Department {
    pub fn from_new(new: NewDepartment) -> Self {
        let now = Utc::now();
        Department {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            description: new.description,
            head_doctor_id: new.head_doctor_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: DepartmentUpdate) -> ValidationResult<()> {
        if let Some(name) = update.name {
            require_text("name", &name)?;
            self.name = name.trim().to_string();
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.head_doctor_id.is_some() {
            self.head_doctor_id = update.head_doctor_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub head_doctor_id: Option<Uuid>,
}
