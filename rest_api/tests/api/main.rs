mod admissions;
mod appointments;
mod auth;
mod bills;
mod patients;
mod utils;
