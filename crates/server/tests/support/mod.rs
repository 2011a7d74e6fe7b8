#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, auth::ServerState};
use service::mock::{CapturingNotifier, InMemoryStore};
use service::registry::{Repositories, Services, ServicesConfig};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<CapturingNotifier>,
}

/// Router over the in-memory store; no database needed.
pub fn app() -> TestApp {
    let store = Arc::new(InMemoryStore::default());
    let notifier = Arc::new(CapturingNotifier::default());
    let services = Services::new(Repositories::in_memory(store.clone(), notifier.clone()), ServicesConfig::default());
    let router = routes::build_router(ServerState::new(services), CorsLayer::very_permissive());
    TestApp { router, store, notifier }
}

impl TestApp {
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn create_advisor(&self, tax_id: &str) -> i64 {
        let (status, body) = self
            .send("POST", "/v1/advisors", None, Some(json!({"name": "Dr. Ada", "tax_id": tax_id})))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn register_student(&self, advisor_id: i64, n: u32, course: &str) -> (StatusCode, Value) {
        self.send("POST", "/v1/students", None, Some(student_payload(advisor_id, n, course))).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send("POST", "/v1/auth/login", None, Some(json!({"email": email, "password": password})))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }
}

pub const PASSWORD: &str = "password123";

pub fn student_payload(advisor_id: i64, n: u32, course: &str) -> Value {
    json!({
        "name": format!("Student {n}"),
        "email": format!("s{n}@example.com"),
        "tax_id": format!("TAX-{n}"),
        "enrollment_number": format!("ENR-{n}"),
        "course": course,
        "password": PASSWORD,
        "advisor_id": advisor_id,
        "scholarship_starts_at": "2024-01-01",
        "scholarship_ends_at": "2024-12-31"
    })
}
