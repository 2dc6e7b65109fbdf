// lib/src/services/lab.rs

use log::info;
use uuid::Uuid;

use models::errors::ValidationError;
use models::medical::{
    Doctor, LabTest, LabTestCatalog, LabTestCatalogUpdate, LabTestStatus, LabTestStatusUpdate,
    NewLabTest, NewLabTestCatalog, Patient,
};

use crate::database::{Database, UnitOfWork};
use crate::errors::{HospitalError, Result};
use crate::services::patient_records_counter;
use crate::services::query::Page;

/// Catalog codes are unique, compared upper-case.
const LAB_CODE_SCOPE: &str = "lab_code";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabTestFilter {
    pub status: Option<LabTestStatus>,
    pub patient_id: Option<Uuid>,
}

/// The test catalog and the lab-test orders placed against it.
#[derive(Debug, Clone)]
pub struct LabService {
    db: Database,
}

fn claim_code(uow: &mut UnitOfWork<'_>, entry: &LabTestCatalog) -> Result<()> {
    if uow.claim_unique(LAB_CODE_SCOPE, &entry.code, &entry.id.to_string())? {
        Ok(())
    } else {
        Err(HospitalError::conflict(format!(
            "lab test code {} is already in use",
            entry.code
        )))
    }
}

impl LabService {
    pub fn new(db: Database) -> Self {
        LabService { db }
    }

    pub fn create_catalog_entry(&self, new: NewLabTestCatalog) -> Result<LabTestCatalog> {
        new.validate()?;
        let entry = self.db.transaction(|uow| {
            let entry = LabTestCatalog::from_new(new.clone());
            claim_code(uow, &entry)?;
            uow.put(&entry)?;
            Ok(entry)
        })?;
        info!("Added lab test {} ({}) to the catalog", entry.code, entry.id);
        Ok(entry)
    }

    pub fn get_catalog_entry(&self, id: Uuid) -> Result<LabTestCatalog> {
        self.db.fetch::<LabTestCatalog>(id)
    }

    pub fn list_catalog(&self, page: Page) -> Result<Vec<LabTestCatalog>> {
        Ok(page.apply(self.db.list::<LabTestCatalog>()?))
    }

    pub fn update_catalog_entry(
        &self,
        id: Uuid,
        update: LabTestCatalogUpdate,
    ) -> Result<LabTestCatalog> {
        self.db.transaction(|uow| {
            let mut entry = uow.fetch::<LabTestCatalog>(id)?;
            let old_code = entry.code.clone();
            entry.apply(update.clone())?;
            if entry.code != old_code {
                claim_code(uow, &entry)?;
                uow.release_unique(LAB_CODE_SCOPE, &old_code)?;
            }
            uow.put(&entry)?;
            Ok(entry)
        })
    }

    pub fn delete_catalog_entry(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let entry = uow.fetch::<LabTestCatalog>(id)?;
            uow.release_unique(LAB_CODE_SCOPE, &entry.code)?;
            uow.delete::<LabTestCatalog>(id)
        })
    }

    /// Orders a test. The catalog entry must exist and be active.
    pub fn order_test(&self, new: NewLabTest) -> Result<LabTest> {
        let test = self.db.transaction(|uow| {
            uow.fetch::<Patient>(new.patient_id)?;
            if let Some(doctor_id) = new.doctor_id {
                uow.fetch::<Doctor>(doctor_id)?;
            }
            let entry = uow.fetch::<LabTestCatalog>(new.catalog_id)?;
            if !entry.is_active {
                return Err(ValidationError::invalid(
                    "catalog_id",
                    format!("lab test {} is not currently offered", entry.code),
                )
                .into());
            }
            let test = LabTest::order(new.clone());
            uow.adjust_counter(&patient_records_counter(test.patient_id), 1)?;
            uow.put(&test)?;
            Ok(test)
        })?;
        info!("Ordered lab test {} for patient {}", test.id, test.patient_id);
        Ok(test)
    }

    pub fn get_test(&self, id: Uuid) -> Result<LabTest> {
        self.db.fetch::<LabTest>(id)
    }

    pub fn list_tests(&self, filter: &LabTestFilter, page: Page) -> Result<Vec<LabTest>> {
        let tests = self
            .db
            .list::<LabTest>()?
            .into_iter()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.patient_id.map_or(true, |id| t.patient_id == id))
            .collect();
        Ok(page.apply(tests))
    }

    /// Moves an order along its workflow; see `LabTestStatus::can_transition_to`.
    pub fn update_test_status(&self, id: Uuid, update: LabTestStatusUpdate) -> Result<LabTest> {
        let test = self.db.transaction(|uow| {
            let mut test = uow.fetch::<LabTest>(id)?;
            test.advance(update.clone())?;
            uow.put(&test)?;
            Ok(test)
        })?;
        info!("Lab test {} is now {}", id, test.status);
        Ok(test)
    }

    pub fn delete_test(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let test = uow.fetch::<LabTest>(id)?;
            uow.adjust_counter(&patient_records_counter(test.patient_id), -1)?;
            uow.delete::<LabTest>(id)
        })
    }
}
