//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::{auth::*, user::*},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token_pair = state.auth_service.login(req).await?;

    Ok(Json(token_pair))
}

/// 获取当前用户信息
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth_service.profile(&current_user).await?;

    Ok(Json(user))
}

/// 更新当前用户资料
pub async fn update_current_user(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Query(query): Query<UpdateProfileQuery>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .auth_service
        .update_profile(&current_user, query)
        .await?;

    Ok(Json(user))
}
