// rest_api/src/routes/stats.rs

use axum::extract::State;
use axum::Json;

use lib::services::DashboardStats;

use super::ApiResult;
use crate::AppState;

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.services.stats.dashboard()?))
}
