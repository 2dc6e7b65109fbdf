use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::utils::{id, spawn_app, TestApp};

async fn book(app: &TestApp, token: &str, patient: &Value, doctor: &Value, date: &str) -> Value {
    let response = app
        .post(
            token,
            "/api/appointments",
            &json!({
                "patient_id": patient["id"],
                "doctor_id": doctor["id"],
                "appointment_date": date,
                "appointment_time": "10:30",
                "reason": "Follow-up"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn status_filter_returns_only_matching_appointments() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;
    let doctor = app.create_doctor(&token).await;

    let kept = book(&app, &token, &patient, &doctor, "2026-05-01").await;
    let dropped = book(&app, &token, &patient, &doctor, "2026-05-02").await;
    assert_eq!(kept["status"], "scheduled");

    let response = app
        .patch(
            &token,
            &format!("/api/appointments/{}/status", id(&dropped)),
            &json!({ "status": "cancelled" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cancelled: Vec<Value> = app
        .get(&token, "/api/appointments?status=cancelled")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0]["id"], dropped["id"]);

    for query in ["", "?status=all"] {
        let all: Vec<Value> = app
            .get(&token, &format!("/api/appointments{}", query))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    let on_day: Vec<Value> = app
        .get(&token, "/api/appointments?date=2026-05-01")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0]["id"], kept["id"]);

    let response = app.get(&token, "/api/appointments?status=postponed").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_requires_known_patient_and_doctor() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;

    let response = app
        .post(
            &token,
            "/api/appointments",
            &json!({
                "patient_id": patient["id"],
                "doctor_id": "00000000-0000-0000-0000-000000000000",
                "appointment_date": "2026-05-01",
                "appointment_time": "09:00"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed: Vec<Value> = app.get(&token, "/api/appointments").await.json().await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn creating_a_doctor_promotes_the_user() {
    let app = spawn_app().await;
    let token = app.login().await;
    let doctor = app.create_doctor(&token).await;
    assert_eq!(doctor["is_available"], true);

    let user: Value = app.get(&token, "/api/auth/user").await.json().await.unwrap();
    assert_eq!(user["role"], "doctor");

    let found: Vec<Value> = app
        .get(&token, "/api/doctors?search=cardio&available=true")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let response = app
        .post(
            &token,
            "/api/doctors",
            &json!({ "user_id": user["id"], "specialization": "Neurology" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
