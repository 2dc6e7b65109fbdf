use std::str::FromStr;

use reqwest::header::{LOCATION, SET_COOKIE};
use reqwest::{redirect, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use lib::{Database, StorageConfig};
use models::medical::Role;
use rest_api::config::{ProviderKind, Settings};
use rest_api::{build_app, serve, AppState};

/// Subject of the static identity provider's default profile.
pub const LOGIN_SUBJECT: &str = "dev|local-admin";

pub struct TestApp {
    pub address: String,
    pub client: Client,
}

/// Starts the API on a random port with in-memory storage and the static
/// identity provider.
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    let mut settings = Settings::default();
    settings.storage = StorageConfig::in_memory();
    settings.auth.provider = ProviderKind::Static;
    settings.auth.allow_static_login = true;
    settings.auth.redirect_url = format!("{}/api/callback", address);
    settings.auth.default_role = Role::Admin;

    let state = AppState::new(Database::in_memory(), &settings).expect("Failed to build app state");
    let app = build_app(state, &settings.server);
    tokio::spawn(serve(listener, app, std::future::pending()));

    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();
    TestApp { address, client }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Walks `/api/login` → provider → `/api/callback` and returns the
    /// `Set-Cookie` header of the final response.
    pub async fn login_cookie(&self) -> String {
        let response = self.client.get(self.url("/api/login")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        let authorize = response.headers()[LOCATION].to_str().unwrap().to_string();

        let response = self.client.get(&authorize).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/");
        response.headers()[SET_COOKIE].to_str().unwrap().to_string()
    }

    /// Logs in and returns the bare session token.
    pub async fn login(&self) -> String {
        let cookie = self.login_cookie().await;
        cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("hms_session="))
            .expect("session cookie")
            .to_string()
    }

    pub async fn get(&self, token: &str, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, token: &str, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a patient and returns its JSON.
    pub async fn create_patient(&self, token: &str, first: &str, last: &str) -> Value {
        let response = self
            .post(
                token,
                "/api/patients",
                &json!({ "first_name": first, "last_name": last }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    /// Creates a doctor profile for the logged-in user.
    pub async fn create_doctor(&self, token: &str) -> Value {
        let response = self
            .post(
                token,
                "/api/doctors",
                &json!({
                    "user_id": LOGIN_SUBJECT,
                    "specialization": "Cardiology",
                    "consultation_fee": "500.00"
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    /// Creates a ward with `beds` numbered beds and returns the bed JSONs.
    pub async fn create_beds(&self, token: &str, beds: usize) -> Vec<Value> {
        let response = self
            .post(
                token,
                "/api/wards",
                &json!({ "name": "General A", "ward_type": "general", "capacity": 10, "charge_per_day": "1500" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let ward: Value = response.json().await.unwrap();

        let mut created = Vec::new();
        for n in 1..=beds {
            let response = self
                .post(
                    token,
                    "/api/beds",
                    &json!({ "ward_id": ward["id"], "bed_number": format!("A-{}", n) }),
                )
                .await;
            assert_eq!(response.status(), StatusCode::CREATED);
            created.push(response.json().await.unwrap());
        }
        created
    }
}

pub fn id(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

pub fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).unwrap()
}
