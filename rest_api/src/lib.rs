// rest_api/src/lib.rs

//! The hospital HTTP API: axum routes over the domain services, guarded by
//! the session middleware from `security`.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use lib::{Database, HospitalError, Services, StorageEngineType};
use models::errors::ValidationError;
use models::medical::Role;
use security::{
    require_session, AuthError, IdentityProvider, InMemorySessionStore, OidcProvider,
    RolesConfig, SessionGuard, SessionManager, StaticIdentityProvider, TokenSigner,
};

pub mod config;
mod routes;

use crate::config::{ProviderKind, ServerSettings, Settings};
use crate::routes::{
    admissions, appointments, auth, bills, departments, doctors, lab, patients, stats, users,
    wards,
};

#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RestApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            RestApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            RestApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            RestApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<HospitalError> for RestApiError {
    fn from(err: HospitalError) -> Self {
        match err {
            HospitalError::NotFound { .. } => RestApiError::NotFound(err.to_string()),
            HospitalError::Conflict(msg) => RestApiError::Conflict(msg),
            HospitalError::Validation(e) => RestApiError::InvalidInput(e.to_string()),
            other => RestApiError::Storage(other.to_string()),
        }
    }
}

impl From<ValidationError> for RestApiError {
    fn from(err: ValidationError) -> Self {
        RestApiError::InvalidInput(err.to_string())
    }
}

impl From<AuthError> for RestApiError {
    fn from(err: AuthError) -> Self {
        match err {
            e if e.is_unauthorized() => RestApiError::Unauthorized(e.to_string()),
            AuthError::IdentityProvider(msg) => RestApiError::IdentityProvider(msg),
            other => RestApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for RestApiError {
    fn from(rejection: JsonRejection) -> Self {
        RestApiError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for RestApiError {
    fn from(rejection: PathRejection) -> Self {
        RestApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for RestApiError {
    fn from(rejection: QueryRejection) -> Self {
        RestApiError::InvalidInput(rejection.body_text())
    }
}

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub sessions: SessionManager,
    pub identity: Arc<dyn IdentityProvider>,
    pub roles: Arc<RolesConfig>,
    pub default_role: Role,
    pub post_logout_redirect: String,
    pub storage_engine: StorageEngineType,
}

impl AppState {
    /// Builds the shared state. Refuses settings that fail
    /// [`Settings::validate`].
    pub fn new(db: Database, settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let auth = &settings.auth;
        let identity: Arc<dyn IdentityProvider> = match auth.provider {
            ProviderKind::Oidc => Arc::new(
                OidcProvider::new(auth.oidc()).context("Failed to set up the OIDC provider")?,
            ),
            ProviderKind::Static => {
                warn!(
                    "Using the static identity provider; every login becomes '{}'",
                    auth.static_subject
                );
                Arc::new(StaticIdentityProvider::new(
                    auth.static_profile(),
                    auth.redirect_url.clone(),
                ))
            }
        };
        let signer = TokenSigner::new(&auth.session_secret)
            .context("Failed to set up session signing")?;
        let sessions = SessionManager::new(
            Arc::new(InMemorySessionStore::new()),
            signer,
            chrono::Duration::hours(auth.session_ttl_hours),
        );
        let roles = RolesConfig::load_or_default(Some(auth.roles_file.as_path()))?;

        Ok(AppState {
            services: Services::new(db),
            sessions,
            identity,
            roles: Arc::new(roles),
            default_role: auth.default_role,
            post_logout_redirect: auth.post_logout_redirect.clone(),
            storage_engine: settings.storage.engine,
        })
    }

    fn session_guard(&self) -> SessionGuard {
        SessionGuard {
            sessions: self.sessions.clone(),
            users: self.services.users.clone(),
        }
    }
}

/// All `/api` routes. Everything except health and the login round trip
/// sits behind `require_session`.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/user", get(auth::current_user))
        .route("/users", get(users::list_users))
        .route("/users/:id/role", patch(users::set_role))
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .patch(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/:id",
            get(doctors::get_doctor)
                .patch(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        .route(
            "/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/departments/:id",
            get(departments::get_department)
                .patch(departments::update_department)
                .delete(departments::delete_department),
        )
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .patch(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route(
            "/appointments/:id/status",
            patch(appointments::update_appointment_status),
        )
        .route(
            "/lab-catalog",
            get(lab::list_catalog).post(lab::create_catalog_entry),
        )
        .route(
            "/lab-catalog/:id",
            get(lab::get_catalog_entry)
                .patch(lab::update_catalog_entry)
                .delete(lab::delete_catalog_entry),
        )
        .route("/lab-tests", get(lab::list_tests).post(lab::order_test))
        .route("/lab-tests/:id", get(lab::get_test).delete(lab::delete_test))
        .route("/lab-tests/:id/status", patch(lab::update_test_status))
        .route("/wards", get(wards::list_wards).post(wards::create_ward))
        .route(
            "/wards/:id",
            get(wards::get_ward)
                .patch(wards::update_ward)
                .delete(wards::delete_ward),
        )
        .route("/wards/:id/occupancy", get(wards::ward_occupancy))
        .route("/beds", get(wards::list_beds).post(wards::create_bed))
        .route(
            "/beds/:id",
            get(wards::get_bed)
                .patch(wards::update_bed)
                .delete(wards::delete_bed),
        )
        .route(
            "/admissions",
            get(admissions::list_admissions).post(admissions::admit_patient),
        )
        .route("/admissions/:id", get(admissions::get_admission))
        .route(
            "/admissions/:id/discharge",
            patch(admissions::discharge_patient),
        )
        .route(
            "/admissions/:id/transfer",
            patch(admissions::transfer_patient),
        )
        .route("/bills", get(bills::list_bills).post(bills::create_bill))
        .route("/bills/:id", get(bills::get_bill).delete(bills::delete_bill))
        .route("/bills/:id/payment", post(bills::record_payment))
        .route("/bills/:id/cancel", patch(bills::cancel_bill))
        .route("/stats", get(stats::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.session_guard(),
            require_session,
        ));

    let public = Router::new()
        .route("/health", get(auth::health))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout));

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(state)
}

fn cors_layer(server: &ServerSettings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if server.allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring malformed CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// The router with CORS applied, ready to serve.
pub fn build_app(state: AppState, server: &ServerSettings) -> Router {
    build_router(state).layer(cors_layer(server))
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("REST API server failed to start or run")?;
    Ok(())
}

// Main function to start the REST API server
pub async fn start_server<F>(settings: Settings, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = Database::open(&settings.storage).with_context(|| {
        format!(
            "Failed to open {} storage at {}",
            settings.storage.engine,
            settings.storage.data_directory.display()
        )
    })?;
    let state = AppState::new(db.clone(), &settings)?;
    let app = build_app(state, &settings.server);

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;
    info!("Hospital API listening on {}", addr);

    serve(listener, app, shutdown).await?;

    db.flush().context("Failed to flush storage on shutdown")?;
    info!("REST API server stopped.");
    Ok(())
}
