use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::StatusCode;
use serde_json::{json, Value};

use lib::{Database, StorageConfig};
use rest_api::config::{ProviderKind, Settings};
use rest_api::AppState;

use crate::utils::{spawn_app, LOGIN_SUBJECT};

#[tokio::test]
async fn health_check_is_public() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/api/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in_memory");
}

#[tokio::test]
async fn protected_routes_without_session_return_401_and_change_nothing() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/patients"))
        .json(&json!({ "first_name": "Jane", "last_name": "Doe" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");

    for path in ["/api/patients", "/api/stats", "/api/auth/user", "/api/bills"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }

    let response = app
        .get("not-a-real-token", "/api/patients")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = app.login().await;
    let patients: Vec<Value> = app.get(&token, "/api/patients").await.json().await.unwrap();
    assert!(patients.is_empty());
}

#[tokio::test]
async fn login_round_trip_sets_session_cookie() {
    let app = spawn_app().await;

    let cookie = app.login_cookie().await;
    assert!(cookie.starts_with("hms_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));

    let pair = cookie.split(';').next().unwrap().to_string();
    let response = app
        .client
        .get(app.url("/api/auth/user"))
        .header(COOKIE, pair)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["id"], LOGIN_SUBJECT);
    assert_eq!(user["role"], "admin");
    assert_eq!(user["display_name"], "Local Admin");
    let menu: Vec<String> = serde_json::from_value(user["menu"].clone()).unwrap();
    assert!(menu.contains(&"users".to_string()));
}

#[tokio::test]
async fn login_redirects_to_provider_with_fresh_state() {
    let app = spawn_app().await;

    let first = app.client.get(app.url("/api/login")).send().await.unwrap();
    let second = app.client.get(app.url("/api/login")).send().await.unwrap();

    let first = first.headers()[LOCATION].to_str().unwrap().to_string();
    let second = second.headers()[LOCATION].to_str().unwrap().to_string();
    assert!(first.starts_with(&app.url("/api/callback?code=static&state=")));
    assert_ne!(first, second);
}

#[tokio::test]
async fn callback_with_unknown_state_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/callback?code=static&state=forged"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    let token = app.login().await;
    assert_eq!(app.get(&token, "/api/auth/user").await.status(), StatusCode::OK);

    let response = app
        .client
        .get(app.url("/api/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/");
    let cleared = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    assert_eq!(
        app.get(&token, "/api/auth/user").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn changing_a_role_changes_the_menu() {
    let app = spawn_app().await;
    let token = app.login().await;

    let response = app
        .patch(
            &token,
            &format!("/api/users/{}/role", LOGIN_SUBJECT),
            &json!({ "role": "lab_staff" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let user: Value = app.get(&token, "/api/auth/user").await.json().await.unwrap();
    assert_eq!(user["role"], "lab_staff");
    assert_eq!(user["menu"], json!(["dashboard", "lab-tests", "lab-catalog"]));

    let response = app
        .patch(
            &token,
            &format!("/api/users/{}/role", LOGIN_SUBJECT),
            &json!({ "role": "janitor" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let users: Vec<Value> = app.get(&token, "/api/users").await.json().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[test]
fn static_login_is_refused_unless_explicitly_allowed() {
    let mut settings = Settings::default();
    settings.storage = StorageConfig::in_memory();
    assert!(AppState::new(Database::in_memory(), &settings).is_err());

    settings.auth.provider = ProviderKind::Static;
    assert!(AppState::new(Database::in_memory(), &settings).is_err());

    settings.auth.allow_static_login = true;
    assert!(AppState::new(Database::in_memory(), &settings).is_ok());
}
