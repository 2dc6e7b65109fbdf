// models/src/medical/bed.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require_text, ValidationResult};
use crate::record::uuid_record;

string_enum! {
    BedStatus, "bed status" {
        Available => "available",
        Occupied => "occupied",
        Maintenance => "maintenance",
        Reserved => "reserved",
    }
}

impl Default for BedStatus {
    fn default() -> Self {
        BedStatus::Available
    }
}

/// A bed in exactly one ward. `status` is `Occupied` exactly while an
/// admitted admission references the bed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bed {
    pub id: Uuid,
    pub ward_id: Uuid,
    pub bed_number: String,
    pub status: BedStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Bed, "beds", "bed");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBed {
    pub ward_id: Uuid,
    pub bed_number: String,
    #[serde(default)]
    pub status: Option<BedStatus>,
}

impl NewBed {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("bed_number", &self.bed_number)
    }
}

impl Bed {
    pub fn from_new(new: NewBed) -> Self {
        let now = Utc::now();
        Bed {
            id: Uuid::new_v4(),
            ward_id: new.ward_id,
            bed_number: new.bed_number.trim().to_string(),
            status: new.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == BedStatus::Available
    }

    pub fn set_status(&mut self, status: BedStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedUpdate {
    pub bed_number: Option<String>,
    pub status: Option<BedStatus>,
}
