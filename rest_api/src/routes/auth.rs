// rest_api/src/routes/auth.rs

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use models::medical::User;
use security::{expired_session_cookie, session_cookie, session_token, AuthContext};

use super::{ApiQuery, ApiResult};
use crate::{AppState, RestApiError};

/// What the identity provider appends to our callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    #[serde(flatten)]
    pub user: User,
    pub display_name: String,
    /// Navigation sections for the user's role.
    pub menu: Vec<String>,
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

// Handler for the /api/health endpoint
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage": state.storage_engine.to_string(),
    }))
}

pub async fn login(State(state): State<AppState>) -> ApiResult<Response> {
    let login_state = state.sessions.begin_login().await?;
    let url = state.identity.authorize_url(&login_state)?;
    Ok(found(url))
}

pub async fn callback(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CallbackQuery>,
) -> ApiResult<Response> {
    if let Some(error) = query.error {
        warn!(
            "Identity provider refused login: {} {}",
            error,
            query.error_description.unwrap_or_default()
        );
        return Err(RestApiError::Unauthorized(error));
    }
    let login_state = query
        .state
        .ok_or_else(|| RestApiError::Unauthorized("missing login state".to_string()))?;
    state.sessions.complete_login(&login_state).await?;
    let code = query
        .code
        .ok_or_else(|| RestApiError::InvalidInput("missing authorization code".to_string()))?;

    let profile = state.identity.exchange_code(&code).await?;
    let user = state
        .services
        .users
        .upsert_from_profile(profile, state.default_role)?;
    let (session, token) = state.sessions.start(&user.id).await?;
    info!("User {} logged in, session {}", user.id, session.id);

    let cookie = session_cookie(&token, state.sessions.ttl().num_seconds());
    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = session_token(&headers) {
        state.sessions.end(&token).await?;
    }
    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, state.post_logout_redirect.clone()),
            (header::SET_COOKIE, expired_session_cookie()),
        ],
    )
        .into_response())
}

pub async fn current_user(
    State(state): State<AppState>,
    context: AuthContext,
) -> Json<CurrentUser> {
    let menu = state.roles.sections_for(context.user.role);
    let display_name = context.user.display_name();
    Json(CurrentUser {
        user: context.user,
        display_name,
        menu,
    })
}
