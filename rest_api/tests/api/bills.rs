use regex::Regex;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::utils::{decimal, id, spawn_app, TestApp};

async fn bill_for(app: &TestApp, token: &str, patient: &Value, rate: &str) -> Value {
    let response = app
        .post(
            token,
            "/api/bills",
            &json!({
                "patient_id": patient["id"],
                "items": [{ "description": "Ward charges", "quantity": 1, "rate": rate, "amount": "1.00" }]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn pay(app: &TestApp, token: &str, bill: &Value, amount: &str) -> reqwest::Response {
    app.post(
        token,
        &format!("/api/bills/{}/payment", id(bill)),
        &json!({ "amount": amount, "payment_method": "card" }),
    )
    .await
}

#[tokio::test]
async fn payments_accumulate_until_paid() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;
    let bill = bill_for(&app, &token, &patient, "1000.00").await;

    assert!(Regex::new(r"^INV-\d{6}$")
        .unwrap()
        .is_match(bill["bill_number"].as_str().unwrap()));
    assert_eq!(decimal(&bill["items"][0]["amount"]), Decimal::from(1000));
    assert_eq!(decimal(&bill["total"]), Decimal::from(1000));
    assert_eq!(decimal(&bill["balance_due"]), Decimal::from(1000));
    assert_eq!(bill["payment_status"], "pending");

    let response = pay(&app, &token, &bill, "400").await;
    assert_eq!(response.status(), StatusCode::OK);
    let partial: Value = response.json().await.unwrap();
    assert_eq!(decimal(&partial["paid_amount"]), Decimal::from(400));
    assert_eq!(partial["payment_status"], "partial");

    let response = pay(&app, &token, &bill, "1200").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let unchanged: Value = app
        .get(&token, &format!("/api/bills/{}", id(&bill)))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(decimal(&unchanged["paid_amount"]), Decimal::from(400));

    let response = pay(&app, &token, &bill, "0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let paid: Value = pay(&app, &token, &bill, "600").await.json().await.unwrap();
    assert_eq!(decimal(&paid["paid_amount"]), Decimal::from(1000));
    assert_eq!(decimal(&paid["balance_due"]), Decimal::ZERO);
    assert_eq!(paid["payment_status"], "paid");
    assert_eq!(paid["payment_method"], "card");

    assert_eq!(
        app.delete(&token, &format!("/api/bills/{}", id(&bill))).await.status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        app.delete(&token, &format!("/api/patients/{}", id(&patient))).await.status(),
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn invoice_numbers_increase_and_cancelled_bills_are_filtered() {
    let app = spawn_app().await;
    let token = app.login().await;
    let patient = app.create_patient(&token, "Jane", "Doe").await;
    let first = bill_for(&app, &token, &patient, "10").await;
    let second = bill_for(&app, &token, &patient, "20").await;
    assert!(second["bill_number"].as_str().unwrap() > first["bill_number"].as_str().unwrap());

    let response = app
        .patch(&token, &format!("/api/bills/{}/cancel", id(&first)), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        pay(&app, &token, &first, "5").await.status(),
        StatusCode::CONFLICT
    );

    let cancelled: Vec<Value> = app
        .get(&token, "/api/bills?status=cancelled")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0]["id"], first["id"]);

    let stats: Value = app.get(&token, "/api/stats").await.json().await.unwrap();
    assert_eq!(decimal(&stats["unpaid_total"]), Decimal::from(20));

    assert_eq!(
        app.delete(&token, &format!("/api/bills/{}", id(&second))).await.status(),
        StatusCode::NO_CONTENT
    );
}
