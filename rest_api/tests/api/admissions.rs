use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::utils::{id, spawn_app};

#[tokio::test]
async fn admit_and_discharge_keep_the_bed_in_step() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;
    let beds = app.create_beds(&token, 1).await;
    let bed_path = format!("/api/beds/{}", id(&beds[0]));

    let response = app
        .post(
            &token,
            "/api/admissions",
            &json!({ "patient_id": patient["id"], "bed_id": beds[0]["id"], "diagnosis": "Pneumonia" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let admission: Value = response.json().await.unwrap();
    assert_eq!(admission["status"], "admitted");

    let bed: Value = app.get(&token, &bed_path).await.json().await.unwrap();
    assert_eq!(bed["status"], "occupied");

    let response = app
        .patch(&token, &format!("/api/admissions/{}/discharge", id(&admission)), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let discharged: Value = response.json().await.unwrap();
    assert_eq!(discharged["status"], "discharged");
    assert!(discharged["discharge_date"].is_string());

    let bed: Value = app.get(&token, &bed_path).await.json().await.unwrap();
    assert_eq!(bed["status"], "available");

    let response = app
        .patch(&token, &format!("/api/admissions/{}/discharge", id(&admission)), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .patch(&token, &format!("/api/admissions/{}/discharge", Uuid::new_v4()), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn occupied_bed_rejects_a_second_admission() {
    let app = spawn_app().await;
    let token = app.login().await;
    let first = app.create_patient(&token, "Jane", "Doe").await;
    let second = app.create_patient(&token, "John", "Smith").await;
    let beds = app.create_beds(&token, 1).await;

    let admit = |patient: &Value| json!({ "patient_id": patient["id"], "bed_id": beds[0]["id"] });
    assert_eq!(
        app.post(&token, "/api/admissions", &admit(&first)).await.status(),
        StatusCode::CREATED
    );
    let response = app.post(&token, "/api/admissions", &admit(&second)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let admissions: Vec<Value> = app
        .get(&token, "/api/admissions?status=admitted")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(admissions.len(), 1);
    assert_eq!(admissions[0]["patient_id"], first["id"]);

    let response = app
        .delete(&token, &format!("/api/patients/{}", id(&first)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn transfer_moves_the_patient_between_beds() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;
    let beds = app.create_beds(&token, 2).await;

    let admission: Value = app
        .post(
            &token,
            "/api/admissions",
            &json!({ "patient_id": patient["id"], "bed_id": beds[0]["id"] }),
        )
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .patch(
            &token,
            &format!("/api/admissions/{}/transfer", id(&admission)),
            &json!({ "bed_id": beds[1]["id"] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let moved: Value = response.json().await.unwrap();
    assert_eq!(moved["bed_id"], beds[1]["id"]);

    let available: Vec<Value> = app
        .get(&token, "/api/beds?status=available")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["id"], beds[0]["id"]);

    let stats: Value = app.get(&token, "/api/stats").await.json().await.unwrap();
    assert_eq!(stats["active_admissions"], 1);
    assert_eq!(stats["beds"]["occupied"], 1);
    assert_eq!(stats["total_patients"], 1);
}
