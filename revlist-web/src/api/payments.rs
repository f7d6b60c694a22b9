//! Payment return page endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::ApiResult;
use crate::payment::{resolve_with_policy, PaymentCheck, PaymentParams, PaymentStatus};
use crate::AppState;

/// Payment check payload
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PaymentResponse {
    /// Nothing to check; the page shows "payment information unavailable"
    Unavailable,
    Resolved {
        payment: PaymentStatus,
        headline: &'static str,
    },
}

impl From<PaymentCheck> for PaymentResponse {
    fn from(check: PaymentCheck) -> Self {
        match check {
            PaymentCheck::Unavailable => PaymentResponse::Unavailable,
            PaymentCheck::Resolved(payment) => PaymentResponse::Resolved {
                headline: payment.status.headline(),
                payment,
            },
        }
    }
}

/// GET /api/payments/status?payment_id=...&processor=...
///
/// Runs the check on its own task, cancelled through the drop guard if the
/// client goes away.
pub async fn get_payment_status(
    State(state): State<AppState>,
    Query(params): Query<PaymentParams>,
) -> ApiResult<Json<PaymentResponse>> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let verifier = state.verifier.clone();
    let policy = state.poll_policy;
    let check = tokio::spawn(async move {
        resolve_with_policy(verifier.as_ref(), &params, &policy, &cancel).await
    })
    .await??;

    Ok(Json(check.into()))
}
