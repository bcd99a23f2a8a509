use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::protocol::{AddressDto, AddressRequest, MessageResponse};

use crate::server::error::ApiResult;
use crate::server::extract::{AdminUser, CurrentUser, Path, ValidatedJson};
use crate::server::state::AppState;

/// `POST /api/addresses`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(req): ValidatedJson<AddressRequest>,
) -> ApiResult<(StatusCode, Json<AddressDto>)> {
    let dto = state.services.addresses.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /api/addresses`
pub async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<AddressDto>>> {
    Ok(Json(state.services.addresses.list_all().await?))
}

/// `GET /api/addresses/:addressId`
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(address_id): Path<i64>,
) -> ApiResult<Json<AddressDto>> {
    Ok(Json(state.services.addresses.get(&caller, address_id).await?))
}

/// `GET /api/users/addresses`
pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<Vec<AddressDto>>> {
    Ok(Json(state.services.addresses.list_for_user(&caller).await?))
}

/// `PUT /api/addresses/:addressId`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(address_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<AddressRequest>,
) -> ApiResult<Json<AddressDto>> {
    Ok(Json(
        state
            .services
            .addresses
            .update(&caller, address_id, req)
            .await?,
    ))
}

/// `DELETE /api/addresses/:addressId`
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(address_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(
        state.services.addresses.delete(&caller, address_id).await?,
    ))
}
