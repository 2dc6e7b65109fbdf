// models/src/medical/mod.rs

/// Declares a closed, string-backed status enumeration.
///
/// The generated type serializes as its snake_case name, parses from the
/// same name (case-insensitively) and lists every variant in `ALL`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::errors::ValidationError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod admission;
pub mod appointment;
pub mod bed;
pub mod bill;
pub mod department;
pub mod doctor;
pub mod patient;
pub mod user;
pub mod ward;

pub use admission::{Admission, AdmissionStatus, NewAdmission, TransferRequest};
pub use appointment::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment};
pub use bed::{Bed, BedStatus, BedUpdate, NewBed};
pub use bill::{Bill, BillItem, NewBill, NewBillItem, PaymentMethod, PaymentRequest, PaymentStatus};
pub use department::{Department, DepartmentUpdate, NewDepartment};
pub use doctor::{Doctor, DoctorUpdate, NewDoctor};
pub use lab_test::{
    LabTest, LabTestCatalog, LabTestCatalogUpdate, LabTestStatus, LabTestStatusUpdate,
    NewLabTest, NewLabTestCatalog,
};
pub use patient::{NewPatient, Patient, PatientUpdate};
pub use user::{IdentityProfile, Role, User};
pub use ward::{NewWard, Ward, WardOccupancy, WardType, WardUpdate};
