use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use qval_engine::EngineConfig;
use qval_host::http::{AppState, app};
use qval_host::sessions::SessionRegistry;
use qval_llm::{ClientError, ValuationClient};
use qval_types::{AssetParams, PricePoint, ValuationResult};
use serde_json::{Value, json};
use tower::util::ServiceExt;

struct StubClient {
    response: Result<ValuationResult, ClientError>,
    delay: Duration,
}

#[async_trait]
impl ValuationClient for StubClient {
    async fn generate(&self, _params: &AssetParams) -> Result<ValuationResult, ClientError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }
}

fn valuation() -> ValuationResult {
    ValuationResult {
        price_path: vec![PricePoint {
            month: 0,
            synthetic_price: 50_000_000.0,
            upper_bound: 51_000_000.0,
            lower_bound: 49_000_000.0,
            proxy_correlation: 0.8,
        }],
        final_valuation: 55_000_000.0,
        volatility: 12.0,
        tangibility_ratio: 64.0,
        confidence_score: 85.0,
        market_commentary: "Constructive".to_string(),
        proxy_used: "iShares Global Infrastructure ETF".to_string(),
    }
}

fn app_with(client: StubClient) -> Router {
    let registry = Arc::new(SessionRegistry::new(
        Arc::new(client),
        EngineConfig {
            staging_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
        },
    ));
    app(AppState::new(registry))
}

fn params_body() -> Value {
    json!({
        "name": "Jebel Ali Cold Stores",
        "type": "Real Estate",
        "region": "MENA",
        "initialValue": 50_000_000.0,
        "currency": "USD",
        "tenureYears": 5,
        "description": "Temperature-controlled logistics portfolio"
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn request(app: &Router, method: &str, path: &str, body: Option<Value>) -> axum::response::Response {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.expect("route request")
}

async fn create_session(app: &Router) -> String {
    let response = request(app, "POST", "/api/sessions", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

async fn poll_until(app: &Router, id: &str, status: &str) -> Value {
    for _ in 0..100 {
        let response = request(app, "GET", &format!("/api/sessions/{id}"), None).await;
        let state = body_json(response).await;
        if state["status"] == status {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never reached {status}");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::ZERO,
    });
    let response = request(&app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], true);
}

#[tokio::test]
async fn full_simulation_flow_reaches_report() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::ZERO,
    });
    let id = create_session(&app).await;

    let response = request(
        &app,
        "POST",
        &format!("/api/sessions/{id}/start"),
        Some(params_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let accepted = body_json(response).await;
    assert_eq!(accepted["status"], "THINKING");
    assert_eq!(accepted["progress"], 10);

    let state = poll_until(&app, &id, "COMPLETE").await;
    assert_eq!(state["progress"], 100);

    let response = request(&app, "GET", &format!("/api/sessions/{id}/report"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["assetName"], "Jebel Ali Cold Stores");
    assert_eq!(report["tradable"], true);
    assert_eq!(report["finalValuationDisplay"], "USD 55,000,000");
    assert_eq!(report["chart"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn client_failure_surfaces_error_state_only() {
    let app = app_with(StubClient {
        response: Err(ClientError::EmptyResponse),
        delay: Duration::ZERO,
    });
    let id = create_session(&app).await;

    let response = request(
        &app,
        "POST",
        &format!("/api/sessions/{id}/start"),
        Some(params_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let state = poll_until(&app, &id, "ERROR").await;
    assert_eq!(state["progress"], 0);
    assert_eq!(state["message"], "Simulation Failed");

    let response = request(&app, "GET", &format!("/api/sessions/{id}/report"), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn double_start_is_conflict() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::from_millis(200),
    });
    let id = create_session(&app).await;

    let first = request(
        &app,
        "POST",
        &format!("/api/sessions/{id}/start"),
        Some(params_body()),
    )
    .await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = request(
        &app,
        "POST",
        &format!("/api/sessions/{id}/start"),
        Some(params_body()),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "busy");
}

#[tokio::test]
async fn invalid_params_are_unprocessable() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::ZERO,
    });
    let id = create_session(&app).await;

    let mut bad = params_body();
    bad["tenureYears"] = json!(45);
    let response = request(
        &app,
        "POST",
        &format!("/api/sessions/{id}/start"),
        Some(bad),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "invalid_params");
}

#[tokio::test]
async fn reset_returns_session_to_idle() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::ZERO,
    });
    let id = create_session(&app).await;

    let response = request(
        &app,
        "POST",
        &format!("/api/sessions/{id}/start"),
        Some(params_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    poll_until(&app, &id, "COMPLETE").await;

    let response = request(&app, "POST", &format!("/api/sessions/{id}/reset"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let state = body_json(response).await;
    assert_eq!(state["status"], "IDLE");
    assert_eq!(state["progress"], 0);

    let response = request(&app, "GET", &format!("/api/sessions/{id}/report"), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::ZERO,
    });
    let id = uuid::Uuid::new_v4();
    let response = request(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_page_is_served_at_root() {
    let app = app_with(StubClient {
        response: Ok(valuation()),
        delay: Duration::ZERO,
    });
    let response = request(&app, "GET", "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("Q-Val"));
    assert!(html.contains("tenureYears"));
}
