// lib/src/services/mod.rs

//! Domain services over the entity store. Each service owns a cheap clone
//! of the `Database` handle; `Services` bundles them for the HTTP layer.

pub mod admissions;
pub mod appointments;
pub mod billing;
pub mod departments;
pub mod doctors;
pub mod lab;
pub mod patients;
pub mod query;
pub mod stats;
pub mod users;
pub mod wards;

pub use admissions::{AdmissionCoordinator, AdmissionFilter};
pub use appointments::{AppointmentFilter, AppointmentService};
pub use billing::{BillFilter, BillingLedger};
pub use departments::DepartmentService;
pub use doctors::{DoctorFilter, DoctorService};
pub use lab::{LabService, LabTestFilter};
pub use patients::PatientService;
pub use query::{parse_status_filter, Page};
pub use stats::{BedCounts, DashboardStats, StatsService};
pub use users::UserService;
pub use wards::{BedFilter, WardService};

use uuid::Uuid;

use crate::database::Database;

/// Marks a patient as currently admitted; owned by the admission id.
pub(crate) const ACTIVE_ADMISSION_SCOPE: &str = "active_admission";

/// Tally of the appointments, lab tests, admissions and bills that point at
/// a patient. A patient with a non-zero tally cannot be deleted.
pub(crate) fn patient_records_counter(patient_id: Uuid) -> String {
    format!("patient_records/{}", patient_id)
}

/// Tally of the departments a doctor heads.
pub(crate) fn department_heads_counter(doctor_id: Uuid) -> String {
    format!("department_heads/{}", doctor_id)
}

#[derive(Debug, Clone)]
pub struct Services {
    pub users: UserService,
    pub patients: PatientService,
    pub doctors: DoctorService,
    pub departments: DepartmentService,
    pub appointments: AppointmentService,
    pub lab: LabService,
    pub wards: WardService,
    pub admissions: AdmissionCoordinator,
    pub billing: BillingLedger,
    pub stats: StatsService,
}

impl Services {
    pub fn new(db: Database) -> Self {
        Services {
            users: UserService::new(db.clone()),
            patients: PatientService::new(db.clone()),
            doctors: DoctorService::new(db.clone()),
            departments: DepartmentService::new(db.clone()),
            appointments: AppointmentService::new(db.clone()),
            lab: LabService::new(db.clone()),
            wards: WardService::new(db.clone()),
            admissions: AdmissionCoordinator::new(db.clone()),
            billing: BillingLedger::new(db.clone()),
            stats: StatsService::new(db),
        }
    }
}
