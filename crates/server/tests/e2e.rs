mod support;

use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let router = support::app().router;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health_and_docs() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "ok");

    let res = c.get(format!("{}/api-docs/openapi.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc: Value = res.json().await?;
    assert!(doc["paths"].get("/v1/students").is_some());
    Ok(())
}

#[tokio::test]
async fn e2e_register_login_and_browse_with_cookie() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let advisor: Value = c
        .post(format!("{}/v1/advisors", app.base_url))
        .json(&json!({"name": "Dr. Ada", "tax_id": "ADV-E2E"}))
        .send()
        .await?
        .json()
        .await?;
    let advisor_id = advisor["id"].as_i64().unwrap();

    let res = c
        .post(format!("{}/v1/students", app.base_url))
        .json(&support::student_payload(advisor_id, 1, "Computer Science"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    // without a session the listing is refused
    let res = c.get(format!("{}/v1/students", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c
        .post(format!("{}/v1/auth/login", app.base_url))
        .json(&json!({"email": "s1@example.com", "password": support::PASSWORD}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // the cookie store now carries auth_token
    let res = c.get(format!("{}/v1/students", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list: Value = res.json().await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let res = c.post(format!("{}/v1/auth/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/v1/auth/me", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
