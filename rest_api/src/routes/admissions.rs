// rest_api/src/routes/admissions.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::{parse_status_filter, AdmissionFilter, Page};
use models::medical::{Admission, NewAdmission, TransferRequest};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::{AppState, RestApiError};

#[derive(Debug, Default, Deserialize)]
pub struct AdmissionQuery {
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_admissions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AdmissionQuery>,
) -> ApiResult<Json<Vec<Admission>>> {
    let filter = AdmissionFilter {
        status: parse_status_filter(query.status.as_deref())?,
        patient_id: query.patient_id,
    };
    let admissions = state
        .services
        .admissions
        .list(&filter, Page::new(query.limit, query.offset))?;
    Ok(Json(admissions))
}

pub async fn admit_patient(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewAdmission>,
) -> ApiResult<(StatusCode, Json<Admission>)> {
    Ok(created(state.services.admissions.admit_patient(new)?))
}

pub async fn get_admission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Admission>> {
    Ok(Json(state.services.admissions.get(id)?))
}

pub async fn discharge_patient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Admission>> {
    state
        .services
        .admissions
        .discharge_patient(id)?
        .map(Json)
        .ok_or_else(|| RestApiError::NotFound(format!("admission {} not found", id)))
}

pub async fn transfer_patient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> ApiResult<Json<Admission>> {
    Ok(Json(
        state.services.admissions.transfer_patient(id, request)?,
    ))
}
