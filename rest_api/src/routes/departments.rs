// rest_api/src/routes/departments.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::Page;
use models::medical::{Department, DepartmentUpdate, NewDepartment};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_departments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DepartmentQuery>,
) -> ApiResult<Json<Vec<Department>>> {
    let departments = state
        .services
        .departments
        .list(Page::new(query.limit, query.offset))?;
    Ok(Json(departments))
}

pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewDepartment>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    Ok(created(state.services.departments.create(new)?))
}

pub async fn get_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Department>> {
    Ok(Json(state.services.departments.get(id)?))
}

pub async fn update_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<DepartmentUpdate>,
) -> ApiResult<Json<Department>> {
    Ok(Json(state.services.departments.update(id, update)?))
}

pub async fn delete_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.departments.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
