// lib/src/services/wards.rs

use log::{info, warn};
use uuid::Uuid;

use models::medical::{
    Bed, BedStatus, BedUpdate, NewBed, NewWard, Ward, WardOccupancy, WardUpdate,
};
use models::ValidationError;

use crate::database::{Database, UnitOfWork};
use crate::errors::{HospitalError, Result};
use crate::services::query::Page;

/// Bed numbers are unique within their ward.
const BED_NUMBER_SCOPE: &str = "bed_number";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BedFilter {
    pub ward_id: Option<Uuid>,
    pub status: Option<BedStatus>,
}

/// Wards, their beds, and the guards that keep bed status consistent with
/// admissions.
#[derive(Debug, Clone)]
pub struct WardService {
    db: Database,
}

/// Tally of the beds in a ward, kept in step with bed creation and removal
/// so capacity checks read it inside the unit of work.
fn ward_beds_counter(ward_id: Uuid) -> String {
    format!("ward_beds/{}", ward_id)
}

fn bed_number_value(bed: &Bed) -> String {
    format!("{}/{}", bed.ward_id, bed.bed_number.to_lowercase())
}

fn claim_bed_number(uow: &mut UnitOfWork<'_>, bed: &Bed) -> Result<()> {
    if uow.claim_unique(BED_NUMBER_SCOPE, &bed_number_value(bed), &bed.id.to_string())? {
        Ok(())
    } else {
        Err(HospitalError::conflict(format!(
            "bed {} already exists in ward {}",
            bed.bed_number, bed.ward_id
        )))
    }
}

fn occupied_guard(bed: &Bed, requested: Option<BedStatus>) -> Result<()> {
    match requested {
        Some(BedStatus::Occupied) if bed.status != BedStatus::Occupied => Err(HospitalError::conflict(
            format!("bed {} can only become occupied through an admission", bed.bed_number),
        )),
        Some(status) if bed.status == BedStatus::Occupied && status != BedStatus::Occupied => {
            Err(HospitalError::conflict(format!(
                "bed {} is occupied; discharge or transfer the patient first",
                bed.bed_number
            )))
        }
        _ => Ok(()),
    }
}

impl WardService {
    pub fn new(db: Database) -> Self {
        WardService { db }
    }

    pub fn create_ward(&self, new: NewWard) -> Result<Ward> {
        new.validate()?;
        let ward = Ward::from_new(new);
        self.db.put(&ward)?;
        info!("Created ward {} with capacity {}", ward.name, ward.capacity);
        Ok(ward)
    }

    pub fn get_ward(&self, id: Uuid) -> Result<Ward> {
        self.db.fetch::<Ward>(id)
    }

    pub fn list_wards(&self, page: Page) -> Result<Vec<Ward>> {
        Ok(page.apply(self.db.list::<Ward>()?))
    }

    fn beds_in(&self, ward_id: Uuid) -> Result<Vec<Bed>> {
        Ok(self
            .db
            .list::<Bed>()?
            .into_iter()
            .filter(|bed| bed.ward_id == ward_id)
            .collect())
    }

    /// Capacity may not drop below the number of beds already in the ward.
    pub fn update_ward(&self, id: Uuid, update: WardUpdate) -> Result<Ward> {
        self.db.transaction(|uow| {
            let mut ward = uow.fetch::<Ward>(id)?;
            let bed_count = uow.counter(&ward_beds_counter(id))? as usize;
            ward.apply(update.clone(), bed_count)?;
            uow.put(&ward)?;
            Ok(ward)
        })
    }

    /// A ward can only be removed once it has no beds.
    pub fn delete_ward(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            uow.fetch::<Ward>(id)?;
            let counter = ward_beds_counter(id);
            let beds = uow.counter(&counter)?;
            if beds > 0 {
                return Err(HospitalError::conflict(format!(
                    "ward {} still has {} bed(s)",
                    id, beds
                )));
            }
            uow.clear_counter(&counter)?;
            uow.delete::<Ward>(id)
        })?;
        info!("Deleted ward {}", id);
        Ok(())
    }

    pub fn occupancy(&self, ward_id: Uuid) -> Result<WardOccupancy> {
        let ward = self.db.fetch::<Ward>(ward_id)?;
        let beds = self.beds_in(ward_id)?;
        let count = |status: BedStatus| beds.iter().filter(|bed| bed.status == status).count();
        Ok(WardOccupancy {
            ward_id,
            capacity: ward.capacity,
            total_beds: beds.len(),
            available: count(BedStatus::Available),
            occupied: count(BedStatus::Occupied),
            maintenance: count(BedStatus::Maintenance),
            reserved: count(BedStatus::Reserved),
        })
    }

    /// Adds a bed to a ward that still has room. New beds cannot start out
    /// occupied.
    pub fn create_bed(&self, new: NewBed) -> Result<Bed> {
        new.validate()?;
        if new.status == Some(BedStatus::Occupied) {
            return Err(ValidationError::invalid(
                "status",
                "a new bed cannot be occupied; admit a patient instead",
            )
            .into());
        }
        let bed = self.db.transaction(|uow| {
            let ward = uow.fetch::<Ward>(new.ward_id)?;
            let counter = ward_beds_counter(ward.id);
            if uow.counter(&counter)? >= u64::from(ward.capacity) {
                return Err(HospitalError::conflict(format!(
                    "ward {} is at capacity ({} beds)",
                    ward.name, ward.capacity
                )));
            }
            let bed = Bed::from_new(new.clone());
            claim_bed_number(uow, &bed)?;
            uow.adjust_counter(&counter, 1)?;
            uow.put(&bed)?;
            Ok(bed)
        })?;
        info!("Added bed {} to ward {}", bed.bed_number, bed.ward_id);
        Ok(bed)
    }

    pub fn get_bed(&self, id: Uuid) -> Result<Bed> {
        self.db.fetch::<Bed>(id)
    }

    pub fn list_beds(&self, filter: &BedFilter, page: Page) -> Result<Vec<Bed>> {
        let beds = self
            .db
            .list::<Bed>()?
            .into_iter()
            .filter(|bed| filter.ward_id.map_or(true, |id| bed.ward_id == id))
            .filter(|bed| filter.status.map_or(true, |s| bed.status == s))
            .collect();
        Ok(page.apply(beds))
    }

    /// Renames a bed or changes its status. Occupancy is owned by the
    /// admission workflow: an occupied bed keeps its status and no bed can
    /// be marked occupied here.
    pub fn update_bed(&self, id: Uuid, update: BedUpdate) -> Result<Bed> {
        self.db.transaction(|uow| {
            let mut bed = uow.fetch::<Bed>(id)?;
            occupied_guard(&bed, update.status)?;
            if let Some(number) = &update.bed_number {
                if number.trim().is_empty() {
                    return Err(ValidationError::EmptyField("bed_number").into());
                }
                let old_value = bed_number_value(&bed);
                bed.bed_number = number.trim().to_string();
                if bed_number_value(&bed) != old_value {
                    claim_bed_number(uow, &bed)?;
                    uow.release_unique(BED_NUMBER_SCOPE, &old_value)?;
                }
            }
            if let Some(status) = update.status {
                bed.status = status;
            }
            bed.updated_at = chrono::Utc::now();
            uow.put(&bed)?;
            Ok(bed)
        })
    }

    pub fn delete_bed(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let bed = uow.fetch::<Bed>(id)?;
            if bed.status == BedStatus::Occupied {
                warn!("Refusing to delete occupied bed {}", bed.id);
                return Err(HospitalError::conflict(format!(
                    "bed {} is occupied",
                    bed.bed_number
                )));
            }
            uow.release_unique(BED_NUMBER_SCOPE, &bed_number_value(&bed))?;
            uow.adjust_counter(&ward_beds_counter(bed.ward_id), -1)?;
            uow.delete::<Bed>(id)
        })
    }
}
