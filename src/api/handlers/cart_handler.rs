//! Cart handlers. The cart is chosen by the `X-Cart-Session` header.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{CartSession, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CartAddOutcome, CartView};
use crate::errors::{AppError, AppResult};
use crate::types::SuccessResponse;

/// Add-to-cart request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[validate(length(min = 1, message = "productId is required"))]
    #[schema(example = "p1")]
    pub product_id: String,
    #[validate(range(min = 1, message = "qty must be a positive integer"))]
    #[schema(example = 1)]
    pub qty: i64,
}

/// Quantity update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartRequest {
    #[validate(range(min = 1, message = "qty must be a positive integer"))]
    #[schema(example = 3)]
    pub qty: i64,
}

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(view_cart).post(add_to_cart))
        .route("/cart/:id", put(update_line).delete(remove_line))
}

/// Line ids that are not UUIDs cannot exist in any cart.
fn line_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Cart item"))
}

/// Current cart contents and total
#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    params(("X-Cart-Session" = Option<String>, Header, description = "Cart key; the shared cart when absent")),
    responses(
        (status = 200, description = "Cart contents", body = CartView),
        (status = 400, description = "Malformed cart key")
    )
)]
pub async fn view_cart(
    State(state): State<AppState>,
    CartSession(key): CartSession,
) -> AppResult<Json<CartView>> {
    let view = state.cart_service.view(&key).await?;
    Ok(Json(view))
}

/// Add a product; an existing line for the product has its quantity increased
#[utoipa::path(
    post,
    path = "/api/cart",
    tag = "Cart",
    params(("X-Cart-Session" = Option<String>, Header, description = "Cart key")),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "New line created", body = crate::domain::CartLine),
        (status = 200, description = "Existing line incremented", body = crate::domain::CartLine),
        (status = 400, description = "Validation error")
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    CartSession(key): CartSession,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> AppResult<Response> {
    let outcome = state
        .cart_service
        .add(key, payload.product_id, payload.qty)
        .await?;

    Ok(match outcome {
        CartAddOutcome::Created(line) => (StatusCode::CREATED, Json(line)).into_response(),
        CartAddOutcome::Updated(line) => (StatusCode::OK, Json(line)).into_response(),
    })
}

/// Set the quantity of a line
#[utoipa::path(
    put,
    path = "/api/cart/{id}",
    tag = "Cart",
    params(
        ("id" = String, Path, description = "Cart line id"),
        ("X-Cart-Session" = Option<String>, Header, description = "Cart key")
    ),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity updated", body = SuccessResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Line not in this cart")
    )
)]
pub async fn update_line(
    State(state): State<AppState>,
    CartSession(key): CartSession,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCartRequest>,
) -> AppResult<SuccessResponse> {
    state
        .cart_service
        .update(&key, line_id(&id)?, payload.qty)
        .await?;
    Ok(SuccessResponse::ok())
}

/// Remove a line
#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    tag = "Cart",
    params(
        ("id" = String, Path, description = "Cart line id"),
        ("X-Cart-Session" = Option<String>, Header, description = "Cart key")
    ),
    responses(
        (status = 200, description = "Line removed", body = SuccessResponse),
        (status = 404, description = "Line not in this cart")
    )
)]
pub async fn remove_line(
    State(state): State<AppState>,
    CartSession(key): CartSession,
    Path(id): Path<String>,
) -> AppResult<SuccessResponse> {
    state.cart_service.remove(&key, line_id(&id)?).await?;
    Ok(SuccessResponse::ok())
}
