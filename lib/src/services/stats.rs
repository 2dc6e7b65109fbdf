// lib/src/services/stats.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use models::medical::{Admission, Appointment, Bed, BedStatus, Bill, Doctor, LabTest, Patient};

use crate::database::Database;
use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedCounts {
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub maintenance: usize,
    pub reserved: usize,
}

/// Plain counts for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_patients: usize,
    pub total_doctors: usize,
    pub available_doctors: usize,
    pub todays_appointments: usize,
    pub active_admissions: usize,
    /// Lab tests not yet completed or cancelled.
    pub pending_lab_tests: usize,
    pub beds: BedCounts,
    /// Sum of outstanding balances over bills that are not cancelled.
    pub unpaid_total: Decimal,
}

#[derive(Debug, Clone)]
pub struct StatsService {
    db: Database,
}

impl StatsService {
    pub fn new(db: Database) -> Self {
        StatsService { db }
    }

    pub fn dashboard(&self) -> Result<DashboardStats> {
        self.dashboard_on(Utc::now().date_naive())
    }

    pub fn dashboard_on(&self, today: NaiveDate) -> Result<DashboardStats> {
        let doctors = self.db.list::<Doctor>()?;
        let beds = self.db.list::<Bed>()?;
        let count = |status: BedStatus| beds.iter().filter(|bed| bed.status == status).count();

        Ok(DashboardStats {
            total_patients: self.db.list::<Patient>()?.len(),
            total_doctors: doctors.len(),
            available_doctors: doctors.iter().filter(|d| d.is_available).count(),
            todays_appointments: self
                .db
                .list::<Appointment>()?
                .iter()
                .filter(|a| a.appointment_date == today)
                .count(),
            active_admissions: self
                .db
                .list::<Admission>()?
                .iter()
                .filter(|a| a.is_active())
                .count(),
            pending_lab_tests: self
                .db
                .list::<LabTest>()?
                .iter()
                .filter(|t| !t.status.is_terminal())
                .count(),
            beds: BedCounts {
                total: beds.len(),
                available: count(BedStatus::Available),
                occupied: count(BedStatus::Occupied),
                maintenance: count(BedStatus::Maintenance),
                reserved: count(BedStatus::Reserved),
            },
            unpaid_total: self
                .db
                .list::<Bill>()?
                .iter()
                .filter(|b| !b.is_cancelled())
                .map(Bill::balance_due)
                .sum(),
        })
    }
}
