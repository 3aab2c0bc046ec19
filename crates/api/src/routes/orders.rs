//! Order-status trigger.
//!
//! The shop calls this once per status transition. The SMS is sent before the
//! response is written, but its outcome never fails the request: the status
//! change has already happened on the shop side.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kwt_common::error::AppError;
use kwt_common::types::{OrderEvent, OrderSnapshot, OrderStatus};
use kwt_notifier::{Delivery, SettingsService};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders/{status}/events", post(order_status_changed))
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub order_id: u64,
    pub order_number: String,
    pub billing_phone: String,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub event_id: Uuid,
    pub order_id: u64,
    pub status: OrderStatus,
    pub delivery: Delivery,
}

/// POST /api/orders/{status}/events: Notify the customer of a status change.
async fn order_status_changed(
    State(state): State<AppState>,
    Path(status): Path<String>,
    Json(req): Json<OrderStatusRequest>,
) -> Result<(StatusCode, Json<OrderStatusResponse>), AppError> {
    let status: OrderStatus = status.parse()?;
    let event_id = Uuid::new_v4();

    let config = SettingsService::load(&state.pool).await?;
    let event = OrderEvent {
        order: OrderSnapshot {
            order_number: req.order_number,
            billing_phone: req.billing_phone,
        },
        status,
    };

    let delivery = state.dispatcher.dispatch(&event, &config).await;

    tracing::info!(
        event_id = %event_id,
        order_id = req.order_id,
        status = %status,
        delivery = ?delivery,
        "Order status event handled"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(OrderStatusResponse {
            event_id,
            order_id: req.order_id,
            status,
            delivery,
        }),
    ))
}
