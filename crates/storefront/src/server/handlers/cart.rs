use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::protocol::{CartDto, MessageResponse};

use crate::server::error::ApiResult;
use crate::server::extract::{AdminUser, CurrentUser, Path};
use crate::server::state::AppState;

/// `POST /api/carts/products/:productId/quantity/:quantity`
pub async fn add_product(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((product_id, quantity)): Path<(i64, i64)>,
) -> ApiResult<(StatusCode, Json<CartDto>)> {
    let dto = state
        .services
        .carts
        .add_product(&caller, product_id, quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /api/carts`
pub async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<CartDto>>> {
    Ok(Json(state.services.carts.list_all().await?))
}

/// `GET /api/carts/users/cart`
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<CartDto>> {
    Ok(Json(state.services.carts.get_for_user(&caller).await?))
}

/// `PUT /api/cart/products/:productId/quantity/:operation`
pub async fn update_quantity(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((product_id, operation)): Path<(i64, String)>,
) -> ApiResult<Json<CartDto>> {
    Ok(Json(
        state
            .services
            .carts
            .update_quantity(&caller, product_id, &operation)
            .await?,
    ))
}

/// `DELETE /api/carts/:cartId/product/:productId`
pub async fn remove_product(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((cart_id, product_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(
        state
            .services
            .carts
            .remove_product(&caller, cart_id, product_id)
            .await?,
    ))
}
