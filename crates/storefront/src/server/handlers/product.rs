use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::protocol::{Page, PageQuery, ProductDto, ProductImageRequest, ProductRequest};

use crate::server::error::ApiResult;
use crate::server::extract::{AdminUser, Path, Query, ValidatedJson};
use crate::server::state::AppState;

/// `POST /api/admin/categories/:categoryId/product`
pub async fn add(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductDto>)> {
    let dto = state.services.products.add(category_id, req).await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// `GET /api/public/products`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ProductDto>>> {
    Ok(Json(state.services.products.list(&query).await?))
}

/// `GET /api/public/categories/:categoryId/products`
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ProductDto>>> {
    Ok(Json(
        state
            .services
            .products
            .list_by_category(category_id, &query)
            .await?,
    ))
}

/// `GET /api/public/products/keyword/:keyword`
pub async fn search(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ProductDto>>> {
    Ok(Json(state.services.products.search(&keyword, &query).await?))
}

/// `GET /api/public/products/:productId`
pub async fn get(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<ProductDto>> {
    Ok(Json(state.services.products.get(product_id).await?))
}

/// `PUT /api/admin/products/:productId`
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ProductRequest>,
) -> ApiResult<Json<ProductDto>> {
    Ok(Json(state.services.products.update(product_id, req).await?))
}

/// `PUT /api/admin/products/:productId/image`
pub async fn update_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ProductImageRequest>,
) -> ApiResult<Json<ProductDto>> {
    Ok(Json(
        state.services.products.update_image(product_id, req).await?,
    ))
}

/// `DELETE /api/admin/products/:productId`
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<ProductDto>> {
    Ok(Json(state.services.products.delete(product_id).await?))
}
