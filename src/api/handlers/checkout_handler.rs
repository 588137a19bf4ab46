//! Checkout and receipt handlers. All routes require a bearer token.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{CartSession, IdempotencyKey, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Buyer, Receipt};
use crate::errors::{AppError, AppResult};
use crate::services::{CheckoutItem, CheckoutOrder};

/// Requested line. Missing fields are rejected by the checkout rules.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemRequest {
    #[serde(default)]
    #[schema(example = "p1")]
    pub product_id: String,
    #[serde(default)]
    #[schema(example = 2)]
    pub qty: i64,
}

/// Checkout request. Client prices, if sent, are ignored.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart_items: Vec<CheckoutItemRequest>,
    /// Buyer name printed on the receipt
    pub name: Option<String>,
    /// Buyer email printed on the receipt; informational only
    #[validate(length(max = 254, message = "email is too long"))]
    pub email: Option<String>,
}

/// Receipt wrapper returned by checkout and single-receipt lookup
#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptResponse {
    pub receipt: Receipt,
}

pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout))
        .route("/receipts", get(list_receipts))
        .route("/receipts/:id", get(get_receipt))
}

/// Price the requested items, record a receipt and empty the cart
#[utoipa::path(
    post,
    path = "/api/checkout",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    params(
        ("X-Cart-Session" = Option<String>, Header, description = "Cart to clear"),
        ("Idempotency-Key" = Option<String>, Header, description = "Replays with the same key return the first receipt")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed", body = ReceiptResponse),
        (status = 400, description = "Empty cart or invalid item"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    CartSession(cart): CartSession,
    IdempotencyKey(idempotency_key): IdempotencyKey,
    ValidatedJson(payload): ValidatedJson<CheckoutRequest>,
) -> AppResult<Json<ReceiptResponse>> {
    let order = CheckoutOrder {
        items: payload
            .cart_items
            .into_iter()
            .map(|item| CheckoutItem {
                product_id: item.product_id,
                qty: item.qty,
            })
            .collect(),
        buyer: Buyer::new(payload.name, payload.email),
        idempotency_key,
    };

    let receipt = state
        .checkout_service
        .checkout(current_user.id, cart, order)
        .await?;

    Ok(Json(ReceiptResponse { receipt }))
}

/// Receipts of the signed-in account, newest first
#[utoipa::path(
    get,
    path = "/api/receipts",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Receipts", body = [Receipt]),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn list_receipts(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Receipt>>> {
    let receipts = state.checkout_service.list_receipts(current_user.id).await?;
    Ok(Json(receipts))
}

/// One receipt of the signed-in account
#[utoipa::path(
    get,
    path = "/api/receipts/{id}",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Receipt id")),
    responses(
        (status = 200, description = "Receipt", body = ReceiptResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "No such receipt for this account")
    )
)]
pub async fn get_receipt(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ReceiptResponse>> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::not_found("Receipt"))?;
    let receipt = state
        .checkout_service
        .get_receipt(current_user.id, id)
        .await?;

    Ok(Json(ReceiptResponse { receipt }))
}
