// rest_api/src/routes/wards.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lib::services::{parse_status_filter, BedFilter, Page};
use models::medical::{Bed, BedUpdate, NewBed, NewWard, Ward, WardOccupancy, WardUpdate};

use super::{created, ApiJson, ApiPath, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WardQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BedQuery {
    pub ward_id: Option<Uuid>,
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_wards(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WardQuery>,
) -> ApiResult<Json<Vec<Ward>>> {
    let wards = state
        .services
        .wards
        .list_wards(Page::new(query.limit, query.offset))?;
    Ok(Json(wards))
}

pub async fn create_ward(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewWard>,
) -> ApiResult<(StatusCode, Json<Ward>)> {
    Ok(created(state.services.wards.create_ward(new)?))
}

pub async fn get_ward(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Ward>> {
    Ok(Json(state.services.wards.get_ward(id)?))
}

pub async fn update_ward(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<WardUpdate>,
) -> ApiResult<Json<Ward>> {
    Ok(Json(state.services.wards.update_ward(id, update)?))
}

pub async fn delete_ward(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.wards.delete_ward(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn ward_occupancy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<WardOccupancy>> {
    Ok(Json(state.services.wards.occupancy(id)?))
}

pub async fn list_beds(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BedQuery>,
) -> ApiResult<Json<Vec<Bed>>> {
    let filter = BedFilter {
        ward_id: query.ward_id,
        status: parse_status_filter(query.status.as_deref())?,
    };
    let beds = state
        .services
        .wards
        .list_beds(&filter, Page::new(query.limit, query.offset))?;
    Ok(Json(beds))
}

pub async fn create_bed(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewBed>,
) -> ApiResult<(StatusCode, Json<Bed>)> {
    Ok(created(state.services.wards.create_bed(new)?))
}

pub async fn get_bed(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Bed>> {
    Ok(Json(state.services.wards.get_bed(id)?))
}

pub async fn update_bed(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<BedUpdate>,
) -> ApiResult<Json<Bed>> {
    Ok(Json(state.services.wards.update_bed(id, update)?))
}

pub async fn delete_bed(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.wards.delete_bed(id)?;
    Ok(StatusCode::NO_CONTENT)
}
