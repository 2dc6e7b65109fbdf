// rest_api/src/routes/lab.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::{parse_status_filter, LabTestFilter, Page};
use models::medical::{
    LabTest, LabTestCatalog, LabTestCatalogUpdate, LabTestStatusUpdate, NewLabTest,
    NewLabTestCatalog,
};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LabTestQuery {
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_catalog(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> ApiResult<Json<Vec<LabTestCatalog>>> {
    let entries = state
        .services
        .lab
        .list_catalog(Page::new(query.limit, query.offset))?;
    Ok(Json(entries))
}

pub async fn create_catalog_entry(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewLabTestCatalog>,
) -> ApiResult<(StatusCode, Json<LabTestCatalog>)> {
    Ok(created(state.services.lab.create_catalog_entry(new)?))
}

pub async fn get_catalog_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<LabTestCatalog>> {
    Ok(Json(state.services.lab.get_catalog_entry(id)?))
}

pub async fn update_catalog_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<LabTestCatalogUpdate>,
) -> ApiResult<Json<LabTestCatalog>> {
    Ok(Json(state.services.lab.update_catalog_entry(id, update)?))
}

pub async fn delete_catalog_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.lab.delete_catalog_entry(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LabTestQuery>,
) -> ApiResult<Json<Vec<LabTest>>> {
    let filter = LabTestFilter {
        status: parse_status_filter(query.status.as_deref())?,
        patient_id: query.patient_id,
    };
    let tests = state
        .services
        .lab
        .list_tests(&filter, Page::new(query.limit, query.offset))?;
    Ok(Json(tests))
}

pub async fn order_test(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewLabTest>,
) -> ApiResult<(StatusCode, Json<LabTest>)> {
    Ok(created(state.services.lab.order_test(new)?))
}

pub async fn get_test(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<LabTest>> {
    Ok(Json(state.services.lab.get_test(id)?))
}

pub async fn update_test_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<LabTestStatusUpdate>,
) -> ApiResult<Json<LabTest>> {
    Ok(Json(state.services.lab.update_test_status(id, update)?))
}

pub async fn delete_test(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.lab.delete_test(id)?;
    Ok(StatusCode::NO_CONTENT)
}
