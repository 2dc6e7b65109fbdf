// rest_api/src/routes/doctors.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::{DoctorFilter, Page};
use models::medical::{Doctor, DoctorUpdate, NewDoctor};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DoctorQuery {
    pub department_id: Option<Uuid>,
    pub available: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_doctors(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DoctorQuery>,
) -> ApiResult<Json<Vec<Doctor>>> {
    let filter = DoctorFilter {
        department_id: query.department_id,
        available: query.available,
        search: query.search,
    };
    let doctors = state
        .services
        .doctors
        .list(&filter, Page::new(query.limit, query.offset))?;
    Ok(Json(doctors))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewDoctor>,
) -> ApiResult<(StatusCode, Json<Doctor>)> {
    Ok(created(state.services.doctors.create(new)?))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Doctor>> {
    Ok(Json(state.services.doctors.get(id)?))
}

pub async fn update_doctor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<DoctorUpdate>,
) -> ApiResult<Json<Doctor>> {
    Ok(Json(state.services.doctors.update(id, update)?))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.doctors.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
