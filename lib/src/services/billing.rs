// lib/src/services/billing.rs

use log::info;
use rust_decimal::Decimal;
use uuid::Uuid;

use models::medical::{
    Admission, Appointment, Bill, NewBill, Patient, PaymentRequest, PaymentStatus,
};
use models::INVOICE_NUMBER;

use crate::database::Database;
use crate::errors::{HospitalError, Result};
use crate::services::patient_records_counter;
use crate::services::query::Page;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub status: Option<PaymentStatus>,
    pub patient_id: Option<Uuid>,
}

/// Invoices and the payments recorded against them. Each payment is a
/// single read-modify-write of the bill inside a transaction.
#[derive(Debug, Clone)]
pub struct BillingLedger {
    db: Database,
}

impl BillingLedger {
    pub fn new(db: Database) -> Self {
        BillingLedger { db }
    }

    /// Prices and stores a bill. The `INV-XXXXXX` number is drawn from the
    /// invoice sequence in the same transaction.
    pub fn create_bill(&self, new: NewBill) -> Result<Bill> {
        let bill = self.db.transaction(|uow| {
            uow.fetch::<Patient>(new.patient_id)?;
            if let Some(appointment_id) = new.appointment_id {
                uow.fetch::<Appointment>(appointment_id)?;
            }
            if let Some(admission_id) = new.admission_id {
                uow.fetch::<Admission>(admission_id)?;
            }
            let number = uow.next_sequence(INVOICE_NUMBER.sequence)?;
            let bill = Bill::from_new(new.clone(), INVOICE_NUMBER.format(number))?;
            uow.adjust_counter(&patient_records_counter(bill.patient_id), 1)?;
            uow.put(&bill)?;
            Ok(bill)
        })?;
        info!(
            "Issued bill {} for patient {}, total {}",
            bill.bill_number, bill.patient_id, bill.total
        );
        Ok(bill)
    }

    pub fn get(&self, id: Uuid) -> Result<Bill> {
        self.db.fetch::<Bill>(id)
    }

    pub fn list(&self, filter: &BillFilter, page: Page) -> Result<Vec<Bill>> {
        let bills = self
            .db
            .list::<Bill>()?
            .into_iter()
            .filter(|b| filter.status.map_or(true, |s| b.payment_status == s))
            .filter(|b| filter.patient_id.map_or(true, |id| b.patient_id == id))
            .collect();
        Ok(page.apply(bills))
    }

    /// Adds a payment to the bill.
    ///
    /// # Errors
    /// `Conflict` for a cancelled bill; `Validation` for a non-positive
    /// amount or one larger than the outstanding balance.
    pub fn record_payment(&self, bill_id: Uuid, payment: PaymentRequest) -> Result<Bill> {
        let bill = self.db.transaction(|uow| {
            let mut bill = uow.fetch::<Bill>(bill_id)?;
            if bill.is_cancelled() {
                return Err(HospitalError::conflict(format!(
                    "bill {} is cancelled",
                    bill.bill_number
                )));
            }
            bill.apply_payment(payment.amount, payment.payment_method)?;
            uow.put(&bill)?;
            Ok(bill)
        })?;
        info!(
            "Recorded {} payment of {} on bill {} ({})",
            payment.payment_method, payment.amount, bill.bill_number, bill.payment_status
        );
        Ok(bill)
    }

    /// Cancels an unpaid bill.
    pub fn cancel_bill(&self, bill_id: Uuid) -> Result<Bill> {
        self.db.transaction(|uow| {
            let mut bill = uow.fetch::<Bill>(bill_id)?;
            if bill.paid_amount > Decimal::ZERO {
                return Err(HospitalError::conflict(format!(
                    "bill {} already has payments recorded",
                    bill.bill_number
                )));
            }
            bill.cancel();
            uow.put(&bill)?;
            Ok(bill)
        })
    }

    /// Removes a bill that has no payments recorded against it.
    pub fn delete(&self, bill_id: Uuid) -> Result<()> {
        self.db.transaction(|uow| {
            let bill = uow.fetch::<Bill>(bill_id)?;
            if bill.paid_amount > Decimal::ZERO {
                return Err(HospitalError::conflict(format!(
                    "bill {} already has payments recorded",
                    bill.bill_number
                )));
            }
            uow.adjust_counter(&patient_records_counter(bill.patient_id), -1)?;
            uow.delete::<Bill>(bill_id)
        })?;
        info!("Deleted bill {}", bill_id);
        Ok(())
    }
}
