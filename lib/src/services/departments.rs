// lib/src/services/departments.rs

use log::info;
use uuid::Uuid;

use models::medical::{Department, DepartmentUpdate, Doctor, NewDepartment};

use crate::database::{Database, UnitOfWork};
use crate::errors::Result;
use crate::services::department_heads_counter;
use crate::services::query::Page;

#[derive(Debug, Clone)]
pub struct DepartmentService {
    db: Database,
}

/// Points the tallies at a new head. The new head must be an existing doctor.
fn change_head(uow: &mut UnitOfWork<'_>, old: Option<Uuid>, new: Option<Uuid>) -> Result<()> {
    if old == new {
        return Ok(());
    }
    if let Some(head) = new {
        uow.fetch::<Doctor>(head)?;
        uow.adjust_counter(&department_heads_counter(head), 1)?;
    }
    if let Some(head) = old {
        uow.adjust_counter(&department_heads_counter(head), -1)?;
    }
    Ok(())
}

impl DepartmentService {
    pub fn new(db: Database) -> Self {
        DepartmentService { db }
    }

    pub fn create(&self, new: NewDepartment) -> Result<Department> {
        new.validate()?;
        let department = self.db.transaction(|uow| {
            change_head(uow, None, new.head_doctor_id)?;
            let department = Department::from_new(new.clone());
            uow.put(&department)?;
            Ok(department)
        })?;
        info!("Created department {} ({})", department.name, department.id);
        Ok(department)
    }

    pub fn get(&self, id: Uuid) -> Result<Department> {
        self.db.fetch::<Department>(id)
    }

    pub fn list(&self, page: Page) -> Result<Vec<Department>> {
        Ok(page.apply(self.db.list::<Department>()?))
    }

    pub fn update(&self, id: Uuid, update: DepartmentUpdate) -> Result<Department> {
        self.db.transaction(|uow| {
            let mut department = uow.fetch::<Department>(id)?;
            let old_head = department.head_doctor_id;
            department.apply(update.clone())?;
            change_head(uow, old_head, department.head_doctor_id)?;
            uow.put(&department)?;
            Ok(department)
        })
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let department = uow.fetch::<Department>(id)?;
            change_head(uow, department.head_doctor_id, None)?;
            uow.delete::<Department>(id)
        })?;
        info!("Deleted department {}", id);
        Ok(())
    }
}
