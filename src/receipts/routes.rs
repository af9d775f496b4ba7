//! Delivery-receipt webhook endpoint.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::debug;

use super::model::{DeliveryReceipt, QueuedReceipt};
use super::queue::ReceiptQueue;

/// Diagnostic returned for a missing or unparseable receipt payload.
pub const MALFORMED_PAYLOAD_DIAGNOSTIC: &str = "Expecting a text message receipt payload. Ensure that the payload has an ID, reference, recipient, status and notification type";

/// Shared state for the receipt routes.
#[derive(Clone)]
pub struct ReceiptRouteState {
    pub queue: Arc<dyn ReceiptQueue>,
}

#[derive(Debug, Deserialize)]
struct ReceiptQuery {
    id: Option<String>,
}

/// GET/POST /api/delivery-receipts
///
/// A body that parses as a receipt is echoed back with 200 and queued onto
/// the delivery log; anything else gets the fixed 400 diagnostic. When `id`
/// arrives both as a query parameter and in the body, the query parameter
/// wins.
async fn receive_delivery_receipt(
    State(state): State<ReceiptRouteState>,
    Query(query): Query<ReceiptQuery>,
    body: Bytes,
) -> Response {
    let mut receipt: DeliveryReceipt = match serde_json::from_slice(&body) {
        Ok(receipt) => receipt,
        Err(e) => {
            debug!(error = %e, "rejected malformed delivery receipt payload");
            return (StatusCode::BAD_REQUEST, MALFORMED_PAYLOAD_DIAGNOSTIC).into_response();
        }
    };

    if let Some(id) = query.id {
        receipt.id = Some(id);
    }

    state.queue.enqueue(QueuedReceipt::now(receipt.clone())).await;

    (StatusCode::OK, Json(receipt)).into_response()
}

/// Build the delivery-receipt routes.
pub fn receipt_routes(state: ReceiptRouteState) -> Router {
    Router::new()
        .route(
            "/api/delivery-receipts",
            get(receive_delivery_receipt).post(receive_delivery_receipt),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
