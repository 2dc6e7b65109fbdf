// models/src/medical/ward.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require_text, ValidationError, ValidationResult};
use crate::record::uuid_record;

string_enum! {
    WardType, "ward type" {
        General => "general",
        Icu => "icu",
        Private => "private",
        SemiPrivate => "semi_private",
    }
}

/// A named group of beds sharing a type and a per-day charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ward {
    pub id: Uuid,
    pub name: String,
    pub ward_type: WardType,
    pub capacity: u32,
    pub charge_per_day: Decimal,
    pub floor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Ward, "wards", "ward");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWard {
    pub name: String,
    pub ward_type: WardType,
    pub capacity: u32,
    #[serde(default)]
    pub charge_per_day: Decimal,
    #[serde(default)]
    pub floor: Option<String>,
}

fn check_charge(charge: Decimal) -> ValidationResult<()> {
    if charge.is_sign_negative() {
        return Err(ValidationError::invalid("charge_per_day", "must not be negative"));
    }
    Ok(())
}

impl NewWard {
    pub fn validate(&self) -> ValidationResult<()> {
        require_text("name", &self.name)?;
        if self.capacity == 0 {
            return Err(ValidationError::invalid("capacity", "must be at least 1"));
        }
        check_charge(self.charge_per_day)
    }
}

impl Ward {
    pub fn from_new(new: NewWard) -> Self {
        let now = Utc::now();
        Ward {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            ward_type: new.ward_type,
            capacity: new.capacity,
            charge_per_day: new.charge_per_day,
            floor: new.floor,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch. `bed_count` is the number of beds currently in the
    /// ward; capacity may not drop below it.
    pub fn apply(&mut self, update: WardUpdate, bed_count: usize) -> ValidationResult<()> {
        if let Some(name) = update.name {
            require_text("name", &name)?;
            self.name = name.trim().to_string();
        }
        if let Some(ward_type) = update.ward_type {
            self.ward_type = ward_type;
        }
        if let Some(capacity) = update.capacity {
            if capacity == 0 || (capacity as usize) < bed_count {
                return Err(ValidationError::invalid(
                    "capacity",
                    format!("must be at least {} (beds already in ward)", bed_count.max(1)),
                ));
            }
            self.capacity = capacity;
        }
        if let Some(charge) = update.charge_per_day {
            check_charge(charge)?;
            self.charge_per_day = charge;
        }
        if update.floor.is_some() {
            self.floor = update.floor;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardUpdate {
    pub name: Option<String>,
    pub ward_type: Option<WardType>,
    pub capacity: Option<u32>,
    pub charge_per_day: Option<Decimal>,
    pub floor: Option<String>,
}

/// Bed counts for one ward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardOccupancy {
    pub ward_id: Uuid,
    pub capacity: u32,
    pub total_beds: usize,
    pub available: usize,
    pub occupied: usize,
    pub maintenance: usize,
    pub reserved: usize,
}
