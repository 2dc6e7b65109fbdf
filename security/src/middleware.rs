// security/src/middleware.rs

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use serde_json::json;

use lib::services::UserService;
use models::medical::User;

use crate::errors::AuthError;
use crate::session::{SessionManager, SESSION_COOKIE};

/// The authenticated caller, attached to every request that passed the
/// session guard.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub session_id: String,
}

/// State for [`require_session`].
#[derive(Clone)]
pub struct SessionGuard {
    pub sessions: SessionManager,
    pub users: UserService,
}

/// Reads the session token from `Authorization: Bearer` or, failing that,
/// from the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

impl SessionGuard {
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let token = session_token(headers).ok_or(AuthError::MissingSession)?;
        let session = self.sessions.resolve(&token).await?;
        let user = self
            .users
            .find(&session.user_id)?
            .ok_or_else(|| AuthError::InvalidSession("user no longer exists".to_string()))?;
        Ok(AuthContext {
            user,
            session_id: session.id,
        })
    }
}

/// Rejects requests without a live session with `401 {"error": ...}`
/// before they reach a handler.
pub async fn require_session(
    State(guard): State<SessionGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    match guard.authenticate(request.headers()).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) if err.is_unauthorized() => {
            debug!("Rejected {} {}: {}", request.method(), request.uri().path(), err);
            unauthorized("Unauthorized")
        }
        Err(err) => {
            error!("Session check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| unauthorized("Unauthorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InMemorySessionStore, TokenSigner};
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use chrono::Duration;
    use lib::Database;
    use models::medical::{IdentityProfile, Role};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn guard() -> SessionGuard {
        SessionGuard {
            sessions: SessionManager::new(
                Arc::new(InMemorySessionStore::new()),
                TokenSigner::new("0123456789abcdef0123456789abcdef").unwrap(),
                Duration::hours(1),
            ),
            users: UserService::new(Database::in_memory()),
        }
    }

    fn app(guard: SessionGuard) -> Router {
        Router::new()
            .route("/whoami", get(|ctx: AuthContext| async move { ctx.user.id }))
            .route_layer(axum::middleware::from_fn_with_state(guard, require_session))
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; hms_session=from-cookie".parse().unwrap());
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
        headers.insert(header::AUTHORIZATION, "Bearer from-header".parse().unwrap());
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[tokio::test]
    async fn requests_without_session_get_401() {
        let response = app(guard())
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_session_reaches_the_handler() {
        let guard = guard();
        guard
            .users
            .upsert_from_profile(
                IdentityProfile {
                    subject: "auth0|1".to_string(),
                    email: None,
                    given_name: None,
                    family_name: None,
                    picture: None,
                },
                Role::Admin,
            )
            .unwrap();
        let (_, token) = guard.sessions.start("auth0|1").await.unwrap();
        let response = app(guard)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
