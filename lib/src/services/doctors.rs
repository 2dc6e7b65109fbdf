// lib/src/services/doctors.rs

use log::info;
use uuid::Uuid;

use models::medical::{Department, Doctor, DoctorUpdate, NewDoctor, Role, User};

use crate::database::{Database, UnitOfWork};
use crate::errors::{HospitalError, Result};
use crate::services::department_heads_counter;
use crate::services::query::Page;

/// One doctor profile per user.
const DOCTOR_USER_SCOPE: &str = "doctor_user";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub department_id: Option<Uuid>,
    pub available: Option<bool>,
    /// Matched against specialization, qualification and the linked user's name.
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DoctorService {
    db: Database,
}

fn check_department(uow: &mut UnitOfWork<'_>, department_id: Option<Uuid>) -> Result<()> {
    if let Some(department_id) = department_id {
        uow.fetch::<Department>(department_id)?;
    }
    Ok(())
}

impl DoctorService {
    pub fn new(db: Database) -> Self {
        DoctorService { db }
    }

    /// Creates a doctor profile for an existing user and switches the
    /// user's role to `doctor`, atomically.
    pub fn create(&self, new: NewDoctor) -> Result<Doctor> {
        new.validate()?;
        let doctor = self.db.transaction(|uow| {
            let mut user = uow.fetch::<User>(&new.user_id)?;
            check_department(uow, new.department_id)?;
            let doctor = Doctor::from_new(new.clone());
            if !uow.claim_unique(DOCTOR_USER_SCOPE, &user.id, &doctor.id.to_string())? {
                return Err(HospitalError::conflict(format!(
                    "user {} already has a doctor profile",
                    user.id
                )));
            }
            user.role = Role::Doctor;
            user.updated_at = doctor.created_at;
            uow.put(&user)?;
            uow.put(&doctor)?;
            Ok(doctor)
        })?;
        info!("Created doctor {} for user {}", doctor.id, doctor.user_id);
        Ok(doctor)
    }

    pub fn get(&self, id: Uuid) -> Result<Doctor> {
        self.db.fetch::<Doctor>(id)
    }

    pub fn list(&self, filter: &DoctorFilter, page: Page) -> Result<Vec<Doctor>> {
        let needle = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut doctors = Vec::new();
        for doctor in self.db.list::<Doctor>()? {
            if filter.department_id.is_some() && doctor.department_id != filter.department_id {
                continue;
            }
            if filter.available.is_some_and(|available| doctor.is_available != available) {
                continue;
            }
            if let Some(needle) = &needle {
                if !self.matches_search(&doctor, needle)? {
                    continue;
                }
            }
            doctors.push(doctor);
        }
        Ok(page.apply(doctors))
    }

    fn matches_search(&self, doctor: &Doctor, needle: &str) -> Result<bool> {
        let contains = |text: &str| text.to_lowercase().contains(needle);
        if contains(&doctor.specialization) || doctor.qualification.as_deref().is_some_and(contains) {
            return Ok(true);
        }
        Ok(self
            .db
            .get::<User>(&doctor.user_id)?
            .is_some_and(|user| contains(&user.display_name())))
    }

    pub fn update(&self, id: Uuid, update: DoctorUpdate) -> Result<Doctor> {
        self.db.transaction(|uow| {
            let mut doctor = uow.fetch::<Doctor>(id)?;
            check_department(uow, update.department_id)?;
            doctor.apply(update.clone())?;
            uow.put(&doctor)?;
            Ok(doctor)
        })
    }

    /// Removes a doctor profile and returns the linked user to the
    /// `patient` role. A doctor who heads a department cannot be removed
    /// until the department has a new head.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let doctor = uow.fetch::<Doctor>(id)?;
            let counter = department_heads_counter(id);
            let headed = uow.counter(&counter)?;
            if headed > 0 {
                return Err(HospitalError::conflict(format!(
                    "doctor {} heads {} department(s)",
                    id, headed
                )));
            }
            if let Some(mut user) = uow.get::<User>(&doctor.user_id)? {
                if user.role == Role::Doctor {
                    user.role = Role::default();
                    user.updated_at = chrono::Utc::now();
                    uow.put(&user)?;
                }
            }
            uow.clear_counter(&counter)?;
            uow.release_unique(DOCTOR_USER_SCOPE, &doctor.user_id)?;
            uow.delete::<Doctor>(id)
        })?;
        info!("Deleted doctor {}", id);
        Ok(())
    }
}
