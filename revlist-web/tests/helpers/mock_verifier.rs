//! Local payment verification endpoint
//!
//! Answers by payment id:
//! - `pay_123`: completed, verified
//! - `pay_pending`: pending
//! - `pay_500`: HTTP 500
//! - `pay_garbled`: 200 with a non-JSON body
//! - `pay_refunded`: 200 with an unknown status
//! - `pay_slow`: answers after two seconds
//!
//! Requests without the bearer token and `apikey` header get HTTP 401.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-anon-key";

#[derive(Debug, Deserialize)]
struct VerifyBody {
    payment_id: String,
    processor: String,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<AtomicUsize>,
}

/// Running mock endpoint; the server task ends with the test runtime
pub struct MockVerifier {
    pub url: String,
    requests: Arc<AtomicUsize>,
}

impl MockVerifier {
    pub async fn start() -> Self {
        let state = MockState::default();
        let requests = state.requests.clone();

        let app = Router::new()
            .route("/functions/v1/verify-payment", post(verify))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/functions/v1/verify-payment", addr),
            requests,
        }
    }

    /// Requests received so far, authorized or not
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn verify(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<VerifyBody>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let bearer = format!("Bearer {}", TEST_API_KEY);
    let authorized = headers.get("authorization").and_then(|v| v.to_str().ok())
        == Some(bearer.as_str())
        && headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(TEST_API_KEY);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing credentials").into_response();
    }

    let payment = |status: &str, verified: bool| {
        Json(json!({
            "data": {
                "status": status,
                "payment_id": body.payment_id,
                "amount": 29,
                "processor": body.processor,
                "tier": "Pro",
                "verified": verified,
            }
        }))
        .into_response()
    };

    match body.payment_id.as_str() {
        "pay_123" => payment("completed", true),
        "pay_pending" => payment("pending", false),
        "pay_refunded" => payment("refunded", true),
        "pay_500" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "pay_garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "pay_slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            payment("completed", true)
        }
        _ => (StatusCode::NOT_FOUND, "unknown payment").into_response(),
    }
}
