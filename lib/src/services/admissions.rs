// lib/src/services/admissions.rs

use chrono::Utc;
use log::info;
use uuid::Uuid;

use models::medical::{
    Admission, AdmissionStatus, Bed, BedStatus, Doctor, NewAdmission, Patient, TransferRequest,
};

use crate::database::Database;
use crate::errors::{HospitalError, Result};
use crate::services::query::Page;
use crate::services::{patient_records_counter, ACTIVE_ADMISSION_SCOPE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmissionFilter {
    pub status: Option<AdmissionStatus>,
    pub patient_id: Option<Uuid>,
}

/// Admission, transfer and discharge. Every operation changes the
/// admission and the bed(s) it touches in one transaction, so a bed is
/// `occupied` exactly while an admitted admission points at it.
#[derive(Debug, Clone)]
pub struct AdmissionCoordinator {
    db: Database,
}

fn unavailable(bed: &Bed) -> HospitalError {
    HospitalError::conflict(format!("bed {} is {}", bed.bed_number, bed.status))
}

impl AdmissionCoordinator {
    pub fn new(db: Database) -> Self {
        AdmissionCoordinator { db }
    }

    /// Admits a patient into an available bed and marks the bed occupied.
    ///
    /// # Errors
    /// `NotFound` for an unknown patient, bed or doctor; `Conflict` when the
    /// bed is not available or the patient is already admitted.
    pub fn admit_patient(&self, new: NewAdmission) -> Result<Admission> {
        let admission = self.db.transaction(|uow| {
            uow.fetch::<Patient>(new.patient_id)?;
            let mut bed = uow.fetch::<Bed>(new.bed_id)?;
            if let Some(doctor_id) = new.doctor_id {
                uow.fetch::<Doctor>(doctor_id)?;
            }
            if !bed.is_available() {
                return Err(unavailable(&bed));
            }
            let admission = Admission::admit(new.clone());
            let patient_key = new.patient_id.to_string();
            if !uow.claim_unique(ACTIVE_ADMISSION_SCOPE, &patient_key, &admission.id.to_string())? {
                return Err(HospitalError::conflict(format!(
                    "patient {} is already admitted",
                    new.patient_id
                )));
            }
            bed.set_status(BedStatus::Occupied);
            uow.adjust_counter(&patient_records_counter(admission.patient_id), 1)?;
            uow.put(&bed)?;
            uow.put(&admission)?;
            Ok(admission)
        })?;
        info!(
            "Admitted patient {} to bed {} (admission {})",
            admission.patient_id, admission.bed_id, admission.id
        );
        Ok(admission)
    }

    /// Discharges an admission and frees its bed. Returns `None` when no
    /// such admission exists.
    pub fn discharge_patient(&self, admission_id: Uuid) -> Result<Option<Admission>> {
        let discharged = self.db.transaction(|uow| {
            let mut admission = match uow.get::<Admission>(admission_id)? {
                Some(admission) => admission,
                None => return Ok(None),
            };
            if !admission.is_active() {
                return Err(HospitalError::conflict(format!(
                    "admission {} is already discharged",
                    admission_id
                )));
            }
            admission.discharge();
            uow.release_unique(ACTIVE_ADMISSION_SCOPE, &admission.patient_id.to_string())?;
            if let Some(mut bed) = uow.get::<Bed>(admission.bed_id)? {
                bed.set_status(BedStatus::Available);
                uow.put(&bed)?;
            }
            uow.put(&admission)?;
            Ok(Some(admission))
        })?;
        if let Some(admission) = &discharged {
            info!("Discharged admission {}, bed {} is free", admission.id, admission.bed_id);
        }
        Ok(discharged)
    }

    /// Moves an admitted patient to another available bed.
    pub fn transfer_patient(&self, admission_id: Uuid, request: TransferRequest) -> Result<Admission> {
        let admission = self.db.transaction(|uow| {
            let mut admission = uow.fetch::<Admission>(admission_id)?;
            if !admission.is_active() {
                return Err(HospitalError::conflict(format!(
                    "admission {} is discharged",
                    admission_id
                )));
            }
            if admission.bed_id == request.bed_id {
                return Err(HospitalError::conflict("patient is already in that bed"));
            }
            let mut new_bed = uow.fetch::<Bed>(request.bed_id)?;
            if !new_bed.is_available() {
                return Err(unavailable(&new_bed));
            }
            if let Some(mut old_bed) = uow.get::<Bed>(admission.bed_id)? {
                old_bed.set_status(BedStatus::Available);
                uow.put(&old_bed)?;
            }
            new_bed.set_status(BedStatus::Occupied);
            uow.put(&new_bed)?;
            admission.bed_id = new_bed.id;
            admission.updated_at = Utc::now();
            uow.put(&admission)?;
            Ok(admission)
        })?;
        info!("Transferred admission {} to bed {}", admission.id, admission.bed_id);
        Ok(admission)
    }

    pub fn get(&self, id: Uuid) -> Result<Admission> {
        self.db.fetch::<Admission>(id)
    }

    pub fn list(&self, filter: &AdmissionFilter, page: Page) -> Result<Vec<Admission>> {
        let admissions = self
            .db
            .list::<Admission>()?
            .into_iter()
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .filter(|a| filter.patient_id.map_or(true, |id| a.patient_id == id))
            .collect();
        Ok(page.apply(admissions))
    }
}
