// models/src/medical/bill.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{require_text, ValidationError, ValidationResult};
use crate::record::uuid_record;

string_enum! {
    PaymentStatus, "payment status" {
        Paid => "paid",
        Partial => "partial",
        Pending => "pending",
        Cancelled => "cancelled",
    }
}

string_enum! {
    PaymentMethod, "payment method" {
        Cash => "cash",
        Card => "card",
        Upi => "upi",
        Insurance => "insurance",
        BankTransfer => "bank_transfer",
    }
}

/// Status implied by the amount paid so far: `paid` once the total is
/// covered, `partial` for any positive amount short of it, else `pending`.
pub fn derive_payment_status(paid_amount: Decimal, total: Decimal) -> PaymentStatus {
    if paid_amount >= total {
        PaymentStatus::Paid
    } else if paid_amount > Decimal::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub description: String,
    pub quantity: u32,
    pub rate: Decimal,
    /// Always `quantity * rate`.
    pub amount: Decimal,
}

/// A line item as submitted. Any client-computed `amount` is ignored and
/// recomputed from `quantity` and `rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBillItem {
    pub description: String,
    pub quantity: u32,
    pub rate: Decimal,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl NewBillItem {
    fn into_item(self) -> ValidationResult<BillItem> {
        require_text("description", &self.description)?;
        if self.quantity == 0 {
            return Err(ValidationError::invalid("quantity", "must be at least 1"));
        }
        if self.rate.is_sign_negative() {
            return Err(ValidationError::invalid("rate", "must not be negative"));
        }
        Ok(BillItem {
            amount: self.rate * Decimal::from(self.quantity),
            description: self.description.trim().to_string(),
            quantity: self.quantity,
            rate: self.rate,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBill {
    pub patient_id: Uuid,
    #[serde(default)]
    pub appointment_id: Option<Uuid>,
    #[serde(default)]
    pub admission_id: Option<Uuid>,
    pub items: Vec<NewBillItem>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    /// Generated `INV-XXXXXX` number.
    pub bill_number: String,
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub admission_id: Option<Uuid>,
    pub items: Vec<BillItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

uuid_record!(Bill, "bills", "bill");

impl Bill {
    /// Prices a new bill: `subtotal` is the sum of recomputed line amounts
    /// and `total = subtotal - discount + tax`.
    pub fn from_new(new: NewBill, bill_number: String) -> ValidationResult<Self> {
        if new.items.is_empty() {
            return Err(ValidationError::NoLineItems);
        }
        let items = new
            .items
            .into_iter()
            .map(NewBillItem::into_item)
            .collect::<ValidationResult<Vec<_>>>()?;
        let subtotal: Decimal = items.iter().map(|item| item.amount).sum();

        let discount = new.discount.unwrap_or(Decimal::ZERO);
        let tax = new.tax.unwrap_or(Decimal::ZERO);
        if discount.is_sign_negative() || discount > subtotal {
            return Err(ValidationError::invalid(
                "discount",
                "must be between zero and the subtotal",
            ));
        }
        if tax.is_sign_negative() {
            return Err(ValidationError::invalid("tax", "must not be negative"));
        }
        let total = subtotal - discount + tax;

        let now = Utc::now();
        Ok(Bill {
            id: Uuid::new_v4(),
            bill_number,
            patient_id: new.patient_id,
            appointment_id: new.appointment_id,
            admission_id: new.admission_id,
            items,
            subtotal,
            discount,
            tax,
            total,
            paid_amount: Decimal::ZERO,
            payment_status: derive_payment_status(Decimal::ZERO, total),
            payment_method: None,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn balance_due(&self) -> Decimal {
        (self.total - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn is_cancelled(&self) -> bool {
        self.payment_status == PaymentStatus::Cancelled
    }

    /// Adds a payment and re-derives the status.
    ///
    /// # Errors
    /// Rejects non-positive amounts and amounts above the outstanding
    /// balance; the bill is left unchanged in that case.
    pub fn apply_payment(&mut self, amount: Decimal, method: PaymentMethod) -> ValidationResult<()> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePayment);
        }
        let balance = self.balance_due();
        if amount > balance {
            return Err(ValidationError::Overpayment {
                amount: amount.to_string(),
                balance: balance.to_string(),
            });
        }
        self.paid_amount += amount;
        self.payment_status = derive_payment_status(self.paid_amount, self.total);
        self.payment_method = Some(method);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.payment_status = PaymentStatus::Cancelled;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, quantity: u32, rate: i64) -> NewBillItem {
        NewBillItem {
            description: description.to_string(),
            quantity,
            rate: Decimal::from(rate),
            amount: None,
        }
    }

    fn bill_of(total: i64) -> Bill {
        Bill::from_new(
            NewBill {
                patient_id: Uuid::new_v4(),
                appointment_id: None,
                admission_id: None,
                items: vec![item("Consultation", 1, total)],
                discount: None,
                tax: None,
                notes: None,
            },
            "INV-000001".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn amounts_are_recomputed_from_quantity_and_rate() {
        let mut lying = item("X-ray", 3, 250);
        lying.amount = Some(Decimal::from(1));
        let bill = Bill::from_new(
            NewBill {
                patient_id: Uuid::new_v4(),
                appointment_id: None,
                admission_id: None,
                items: vec![lying, item("Dressing", 2, 50)],
                discount: Some(Decimal::from(100)),
                tax: Some(Decimal::from(18)),
                notes: None,
            },
            "INV-000002".to_string(),
        )
        .unwrap();
        assert_eq!(bill.items[0].amount, Decimal::from(750));
        assert_eq!(bill.subtotal, Decimal::from(850));
        assert_eq!(bill.total, Decimal::from(768));
        assert_eq!(bill.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn payments_accumulate_to_paid() {
        let mut bill = bill_of(1000);
        bill.apply_payment(Decimal::from(400), PaymentMethod::Cash).unwrap();
        assert_eq!(bill.paid_amount, Decimal::from(400));
        assert_eq!(bill.payment_status, PaymentStatus::Partial);
        bill.apply_payment(Decimal::from(600), PaymentMethod::Card).unwrap();
        assert_eq!(bill.paid_amount, Decimal::from(1000));
        assert_eq!(bill.payment_status, PaymentStatus::Paid);
        assert_eq!(bill.payment_method, Some(PaymentMethod::Card));
        assert_eq!(bill.balance_due(), Decimal::ZERO);
    }

    #[test]
    fn overpayment_is_rejected_without_side_effects() {
        let mut bill = bill_of(1000);
        let err = bill
            .apply_payment(Decimal::from(1200), PaymentMethod::Cash)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Overpayment { .. }));
        assert_eq!(bill.paid_amount, Decimal::ZERO);
        assert_eq!(bill.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn non_positive_payments_are_rejected() {
        let mut bill = bill_of(10);
        assert_eq!(
            bill.apply_payment(Decimal::ZERO, PaymentMethod::Cash),
            Err(ValidationError::NonPositivePayment)
        );
        assert_eq!(
            bill.apply_payment(Decimal::from(-5), PaymentMethod::Cash),
            Err(ValidationError::NonPositivePayment)
        );
    }

    #[test]
    fn empty_or_invalid_items_are_rejected() {
        let mut new = NewBill {
            patient_id: Uuid::new_v4(),
            appointment_id: None,
            admission_id: None,
            items: vec![],
            discount: None,
            tax: None,
            notes: None,
        };
        assert_eq!(
            Bill::from_new(new.clone(), "INV-000003".to_string()),
            Err(ValidationError::NoLineItems)
        );
        new.items.push(item("Bandage", 0, 5));
        assert!(Bill::from_new(new, "INV-000003".to_string()).is_err());
    }

    #[test]
    fn status_is_derived_from_paid_amount() {
        let total = Decimal::from(100);
        assert_eq!(derive_payment_status(Decimal::ZERO, total), PaymentStatus::Pending);
        assert_eq!(derive_payment_status(Decimal::from(1), total), PaymentStatus::Partial);
        assert_eq!(derive_payment_status(Decimal::from(100), total), PaymentStatus::Paid);
        assert_eq!(derive_payment_status(Decimal::from(150), total), PaymentStatus::Paid);
    }
}
