// rest_api/src/routes/users.rs

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use models::medical::{Role, User};
use security::AuthContext;

use super::{ApiJson, ApiPath, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.services.users.list()?))
}

/// Roles only pick the navigation menu, so any signed-in user may change
/// them.
pub async fn set_role(
    State(state): State<AppState>,
    caller: AuthContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(change): ApiJson<RoleChange>,
) -> ApiResult<Json<User>> {
    let user = state.services.users.set_role(&id, change.role)?;
    info!("User {} set role of {} to {}", caller.user.id, user.id, user.role);
    Ok(Json(user))
}
