use regex::Regex;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::utils::{id, spawn_app};

#[tokio::test]
async fn created_patients_get_sequential_codes() {
    let app = spawn_app().await;
    let token = app.login().await;
    let pattern = Regex::new(r"^PAT-\d{5}$").unwrap();

    let first = app.create_patient(&token, "John", "Smith").await;
    let second = app.create_patient(&token, "Jane", "Doe").await;

    let first_code = first["patient_code"].as_str().unwrap();
    let second_code = second["patient_code"].as_str().unwrap();
    assert!(pattern.is_match(first_code));
    assert!(pattern.is_match(second_code));
    assert!(second_code > first_code);
}

#[tokio::test]
async fn search_filters_by_name() {
    let app = spawn_app().await;
    let token = app.login().await;
    app.create_patient(&token, "John", "Smith").await;
    app.create_patient(&token, "Jane", "Doe").await;

    let found: Vec<Value> = app
        .get(&token, "/api/patients?search=jan")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["first_name"], "Jane");

    let all: Vec<Value> = app
        .get(&token, "/api/patients?search=")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let paged: Vec<Value> = app
        .get(&token, "/api/patients?limit=1&offset=1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(paged.len(), 1);
}

#[tokio::test]
async fn bad_input_returns_400() {
    let app = spawn_app().await;
    let token = app.login().await;

    let response = app
        .client
        .post(app.url("/api/patients"))
        .bearer_auth(&token)
        .header("Content-Type", "application/json")
        .body("bad input")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(&token, "/api/patients", &json!({ "first_name": " ", "last_name": "Doe" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("first_name"));

    let response = app.get(&token, "/api/patients/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_patient() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;
    let path = format!("/api/patients/{}", id(&patient));

    let response = app
        .patch(&token, &path, &json!({ "phone": "+1 555 0100", "blood_group": "O+" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["phone"], "+1 555 0100");
    assert_eq!(updated["patient_code"], patient["patient_code"]);

    assert_eq!(app.delete(&token, &path).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&token, &path).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&token, &path).await.status(), StatusCode::NOT_FOUND);

    let unknown = format!("/api/patients/{}", Uuid::new_v4());
    let response = app.get(&token, &unknown).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}
