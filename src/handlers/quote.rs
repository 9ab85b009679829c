//! 报价单的 HTTP 处理器

use crate::{
    auth::middleware::{AdminUser, CurrentUser},
    error::AppError,
    middleware::AppState,
    models::quote::*,
    repository::QuoteRepository,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 提交报价请求
///
/// 访客可提交；带有效令牌时报价单关联到该用户
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    current_user: Option<CurrentUser>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user_id = current_user.map(|user| user.user_id);
    let quote_number = generate_quote_number(Utc::now());

    let repo = QuoteRepository::new(state.db.clone());
    let quote = repo.create(&req, &quote_number, user_id).await?;

    tracing::info!(
        quote_id = %quote.id,
        quote_number = %quote.quote_number,
        guest = user_id.is_none(),
        "Quote submitted"
    );

    Ok((StatusCode::CREATED, Json(quote)))
}

/// 当前用户的报价单
pub async fn list_my_quotes(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<Vec<Quote>>, AppError> {
    let repo = QuoteRepository::new(state.db.clone());
    let quotes = repo.list_by_user(current_user.user_id).await?;

    Ok(Json(quotes))
}

/// 所有报价单（管理员）
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<QuoteListQuery>,
) -> Result<Json<Vec<Quote>>, AppError> {
    let repo = QuoteRepository::new(state.db.clone());
    let quotes = repo.list(query.status).await?;

    Ok(Json(quotes))
}

/// 获取报价单详情（提交者或管理员）
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Quote>, AppError> {
    let repo = QuoteRepository::new(state.db.clone());
    let quote = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote not found"))?;

    if !quote.is_visible_to(current_user.user_id, current_user.is_superuser) {
        return Err(AppError::Forbidden(
            "Not authorized to access this quote".to_string(),
        ));
    }

    Ok(Json(quote))
}

/// 更新报价单状态（管理员）
pub async fn update_quote_status(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateQuoteStatusRequest>,
) -> Result<Json<Quote>, AppError> {
    req.validate()?;
    let req = req.without_empty_fields();

    let repo = QuoteRepository::new(state.db.clone());
    let quote = repo
        .update_status(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Quote not found"))?;

    tracing::info!(
        user_id = %admin.user_id,
        quote_id = %id,
        status = ?quote.status,
        "Quote status updated"
    );

    Ok(Json(quote))
}
