use axum::extract::State;
use axum::Json;
use common::protocol::{LoginRequest, MessageResponse, SignupRequest, UserInfoResponse};

use crate::server::error::ApiResult;
use crate::server::extract::{CurrentUser, ValidatedJson};
use crate::server::state::AppState;

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.services.auth.signup(req).await?))
}

/// `POST /api/auth/signin`
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<UserInfoResponse>> {
    Ok(Json(state.services.auth.signin(req).await?))
}

/// `GET /api/auth/username`
pub async fn username(CurrentUser(caller): CurrentUser) -> String {
    caller.sub
}

/// `GET /api/auth/user`
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<Json<UserInfoResponse>> {
    Ok(Json(state.services.auth.current_user(&caller).await?))
}

/// `POST /api/auth/signout`
pub async fn signout(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Json<MessageResponse> {
    Json(state.services.auth.signout(&caller).await)
}
