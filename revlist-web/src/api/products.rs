//! Product detail endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, ApiResult};
use crate::product_view::{build_product_view, ProductDisplay, ProductView};
use crate::AppState;

/// Product page payload: the view plus its rendered display values
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub view: ProductView,
    pub display: ProductDisplay,
}

/// GET /api/products/:id
///
/// The pipeline runs on its own task. If the client goes away the handler
/// future is dropped, and its drop guard cancels that task.
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    if product_id <= 0 {
        return Err(ApiError::BadRequest(format!(
            "Invalid product id: {}",
            product_id
        )));
    }

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let store = state.store.clone();
    let view = tokio::spawn(async move {
        build_product_view(store.as_ref(), product_id, &cancel).await
    })
    .await??;
    let display = ProductDisplay::from_view(&view);

    Ok(Json(ProductResponse { view, display }))
}
