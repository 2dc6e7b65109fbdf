// rest_api/src/routes/patients.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::Page;
use models::medical::{NewPatient, Patient, PatientUpdate};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PatientQuery {
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_patients(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PatientQuery>,
) -> ApiResult<Json<Vec<Patient>>> {
    let patients = state
        .services
        .patients
        .list(query.search.as_deref(), Page::new(query.limit, query.offset))?;
    Ok(Json(patients))
}

pub async fn create_patient(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewPatient>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    Ok(created(state.services.patients.create(new)?))
}

pub async fn get_patient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(state.services.patients.get(id)?))
}

pub async fn update_patient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<PatientUpdate>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(state.services.patients.update(id, update)?))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.patients.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
