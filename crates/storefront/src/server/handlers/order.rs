use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::protocol::{OrderDto, OrderRequest};

use crate::server::error::ApiResult;
use crate::server::extract::{CurrentUser, Path, ValidatedJson};
use crate::server::state::AppState;

/// `POST /api/order/users/payments/:paymentMethod`
pub async fn place(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(payment_method): Path<String>,
    ValidatedJson(req): ValidatedJson<OrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderDto>)> {
    let dto = state
        .services
        .orders
        .place_order(&caller, &payment_method, req)
        .await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /api/orders/users`
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<Vec<OrderDto>>> {
    Ok(Json(state.services.orders.list_for_user(&caller).await?))
}
