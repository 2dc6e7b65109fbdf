// rest_api/src/routes/appointments.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::{parse_status_filter, AppointmentFilter, Page};
use models::medical::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    /// A status name, or `all`.
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AppointmentQuery>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let filter = AppointmentFilter {
        status: parse_status_filter(query.status.as_deref())?,
        patient_id: query.patient_id,
        doctor_id: query.doctor_id,
        date: query.date,
    };
    let appointments = state
        .services
        .appointments
        .list(&filter, Page::new(query.limit, query.offset))?;
    Ok(Json(appointments))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewAppointment>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    Ok(created(state.services.appointments.create(new)?))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Appointment>> {
    Ok(Json(state.services.appointments.get(id)?))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<AppointmentUpdate>,
) -> ApiResult<Json<Appointment>> {
    Ok(Json(state.services.appointments.update(id, update)?))
}

pub async fn update_appointment_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(change): ApiJson<StatusChange>,
) -> ApiResult<Json<Appointment>> {
    Ok(Json(
        state.services.appointments.update_status(id, change.status)?,
    ))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.appointments.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
