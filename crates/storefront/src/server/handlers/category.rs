use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::protocol::{CategoryDto, CategoryRequest, Page, PageQuery};

use crate::server::error::ApiResult;
use crate::server::extract::{AdminUser, Path, Query, ValidatedJson};
use crate::server::state::AppState;

/// `GET /api/public/categories`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<CategoryDto>>> {
    Ok(Json(state.services.categories.list(&query).await?))
}

/// `POST /api/admin/categories`
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryDto>)> {
    let dto = state.services.categories.create(req).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `PUT /api/admin/categories/:categoryId`
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CategoryRequest>,
) -> ApiResult<Json<CategoryDto>> {
    Ok(Json(state.services.categories.update(category_id, req).await?))
}

/// `DELETE /api/admin/categories/:categoryId`
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<CategoryDto>> {
    Ok(Json(state.services.categories.delete(category_id).await?))
}
