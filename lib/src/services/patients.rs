// lib/src/services/patients.rs

use log::info;
use uuid::Uuid;

use models::medical::{NewPatient, Patient, PatientUpdate, User};
use models::PATIENT_CODE;

use crate::database::Database;
use crate::errors::{HospitalError, Result};
use crate::services::query::Page;
use crate::services::{patient_records_counter, ACTIVE_ADMISSION_SCOPE};

#[derive(Debug, Clone)]
pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(db: Database) -> Self {
        PatientService { db }
    }

    /// Registers a patient. The `PAT-XXXXX` code is drawn from the patient
    /// sequence in the same transaction as the insert.
    pub fn create(&self, new: NewPatient) -> Result<Patient> {
        new.validate()?;
        let patient = self.db.transaction(|uow| {
            if let Some(user_id) = &new.user_id {
                uow.fetch::<User>(user_id)?;
            }
            let number = uow.next_sequence(PATIENT_CODE.sequence)?;
            let patient = Patient::from_new(new.clone(), PATIENT_CODE.format(number));
            uow.put(&patient)?;
            Ok(patient)
        })?;
        info!("Registered patient {} ({})", patient.patient_code, patient.id);
        Ok(patient)
    }

    pub fn get(&self, id: Uuid) -> Result<Patient> {
        self.db.fetch::<Patient>(id)
    }

    /// Patients matching `search` (see `Patient::matches_search`), newest first.
    pub fn list(&self, search: Option<&str>, page: Page) -> Result<Vec<Patient>> {
        let patients = self
            .db
            .list::<Patient>()?
            .into_iter()
            .filter(|patient| search.map_or(true, |needle| patient.matches_search(needle)))
            .collect();
        Ok(page.apply(patients))
    }

    pub fn update(&self, id: Uuid, update: PatientUpdate) -> Result<Patient> {
        self.db.transaction(|uow| {
            let mut patient = uow.fetch::<Patient>(id)?;
            patient.apply(update.clone())?;
            uow.put(&patient)?;
            Ok(patient)
        })
    }

    /// Removes a patient. A patient who is currently admitted, or who still
    /// has appointments, lab tests, admissions or bills on record, cannot be
    /// removed.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            uow.fetch::<Patient>(id)?;
            if uow.unique_owner(ACTIVE_ADMISSION_SCOPE, &id.to_string())?.is_some() {
                return Err(HospitalError::conflict(format!(
                    "patient {} is currently admitted",
                    id
                )));
            }
            let counter = patient_records_counter(id);
            let records = uow.counter(&counter)?;
            if records > 0 {
                return Err(HospitalError::conflict(format!(
                    "patient {} still has {} linked record(s)",
                    id, records
                )));
            }
            uow.clear_counter(&counter)?;
            uow.delete::<Patient>(id)
        })?;
        info!("Deleted patient {}", id);
        Ok(())
    }
}
