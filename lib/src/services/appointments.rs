// lib/src/services/appointments.rs

use chrono::NaiveDate;
use log::info;
use uuid::Uuid;

use models::medical::{
    Appointment, AppointmentStatus, AppointmentUpdate, Doctor, NewAppointment, Patient,
};

use crate::database::Database;
use crate::errors::Result;
use crate::services::patient_records_counter;
use crate::services::query::Page;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

impl AppointmentFilter {
    fn matches(&self, appointment: &Appointment) -> bool {
        self.status.map_or(true, |s| appointment.status == s)
            && self.patient_id.map_or(true, |id| appointment.patient_id == id)
            && self.doctor_id.map_or(true, |id| appointment.doctor_id == id)
            && self.date.map_or(true, |d| appointment.appointment_date == d)
    }
}

#[derive(Debug, Clone)]
pub struct AppointmentService {
    db: Database,
}

impl AppointmentService {
    pub fn new(db: Database) -> Self {
        AppointmentService { db }
    }

    pub fn create(&self, new: NewAppointment) -> Result<Appointment> {
        let appointment = self.db.transaction(|uow| {
            uow.fetch::<Patient>(new.patient_id)?;
            uow.fetch::<Doctor>(new.doctor_id)?;
            let appointment = Appointment::from_new(new.clone())?;
            uow.adjust_counter(&patient_records_counter(appointment.patient_id), 1)?;
            uow.put(&appointment)?;
            Ok(appointment)
        })?;
        info!(
            "Booked appointment {} on {} {}",
            appointment.id, appointment.appointment_date, appointment.appointment_time
        );
        Ok(appointment)
    }

    pub fn get(&self, id: Uuid) -> Result<Appointment> {
        self.db.fetch::<Appointment>(id)
    }

    pub fn list(&self, filter: &AppointmentFilter, page: Page) -> Result<Vec<Appointment>> {
        let appointments = self
            .db
            .list::<Appointment>()?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        Ok(page.apply(appointments))
    }

    pub fn update(&self, id: Uuid, update: AppointmentUpdate) -> Result<Appointment> {
        self.db.transaction(|uow| {
            let mut appointment = uow.fetch::<Appointment>(id)?;
            if let Some(doctor_id) = update.doctor_id {
                uow.fetch::<Doctor>(doctor_id)?;
            }
            appointment.apply(update.clone())?;
            uow.put(&appointment)?;
            Ok(appointment)
        })
    }

    /// Sets any status; appointments have no enforced workflow.
    pub fn update_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        let appointment = self.db.transaction(|uow| {
            let mut appointment = uow.fetch::<Appointment>(id)?;
            appointment.set_status(status);
            uow.put(&appointment)?;
            Ok(appointment)
        })?;
        info!("Appointment {} is now {}", id, status);
        Ok(appointment)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let appointment = uow.fetch::<Appointment>(id)?;
            uow.adjust_counter(&patient_records_counter(appointment.patient_id), -1)?;
            uow.delete::<Appointment>(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HospitalError;
    use models::medical::{Doctor, NewDoctor, NewPatient};
    use rust_decimal::Decimal;

    struct Fixture {
        db: Database,
        patient: Patient,
        doctor: Doctor,
    }

    fn fixture() -> Fixture {
        let db = Database::in_memory();
        let patient = Patient::from_new(
            NewPatient {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..Default::default()
            },
            "PAT-00001".to_string(),
        );
        let doctor = Doctor::from_new(NewDoctor {
            user_id: "doc".to_string(),
            specialization: "GP".to_string(),
            qualification: None,
            department_id: None,
            consultation_fee: Decimal::ZERO,
            is_available: true,
            phone: None,
        });
        db.put(&patient).unwrap();
        db.put(&doctor).unwrap();
        Fixture { db, patient, doctor }
    }

    fn booking(f: &Fixture, day: u32) -> NewAppointment {
        NewAppointment {
            patient_id: f.patient.id,
            doctor_id: f.doctor.id,
            appointment_date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            appointment_time: "9:30".to_string(),
            status: None,
            appointment_type: None,
            reason: None,
            notes: None,
        }
    }

    #[test]
    fn status_filter_returns_only_matching() {
        let f = fixture();
        let appointments = AppointmentService::new(f.db.clone());
        let a = appointments.create(booking(&f, 1)).unwrap();
        appointments.create(booking(&f, 2)).unwrap();
        appointments.update_status(a.id, AppointmentStatus::Cancelled).unwrap();

        let cancelled = AppointmentFilter {
            status: Some(AppointmentStatus::Cancelled),
            ..Default::default()
        };
        let rows = appointments.list(&cancelled, Page::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, a.id);
        assert_eq!(
            appointments.list(&AppointmentFilter::default(), Page::default()).unwrap().len(),
            2
        );
    }

    #[test]
    fn date_filter_and_time_normalization() {
        let f = fixture();
        let appointments = AppointmentService::new(f.db.clone());
        let a = appointments.create(booking(&f, 3)).unwrap();
        assert_eq!(a.appointment_time, "09:30");
        let on_day = AppointmentFilter {
            date: NaiveDate::from_ymd_opt(2026, 5, 3),
            ..Default::default()
        };
        assert_eq!(appointments.list(&on_day, Page::default()).unwrap().len(), 1);
    }

    #[test]
    fn unknown_patient_is_rejected() {
        let f = fixture();
        let appointments = AppointmentService::new(f.db.clone());
        let mut new = booking(&f, 4);
        new.patient_id = Uuid::new_v4();
        assert!(matches!(
            appointments.create(new),
            Err(HospitalError::NotFound { kind: "patient", .. })
        ));
    }
}
