// rest_api/src/routes/mod.rs

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::Json;

use crate::RestApiError;

pub mod admissions;
pub mod appointments;
pub mod auth;
pub mod bills;
pub mod departments;
pub mod doctors;
pub mod lab;
pub mod patients;
pub mod stats;
pub mod users;
pub mod wards;

pub type ApiResult<T> = Result<T, RestApiError>;

/// `Json` whose rejections come back as `400 {"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RestApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejections (a malformed id, mostly) come back as 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(RestApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(RestApiError))]
pub struct ApiQuery<T>(pub T);

pub fn created<T>(value: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(value))
}
