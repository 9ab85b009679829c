//! 商品分类的 HTTP 处理器

use crate::{
    auth::middleware::AdminUser,
    error::AppError,
    middleware::AppState,
    models::category::*,
    repository::CategoryRepository,
    slug::slugify,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出分类
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.list(query.include_inactive).await?;

    Ok(Json(categories))
}

/// 获取分类详情
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(category))
}

/// 创建分类（管理员）
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let slug = slugify(&req.name);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Category name must contain letters or digits".to_string(),
        ));
    }

    let repo = CategoryRepository::new(state.db.clone());
    if repo.slug_exists(&slug, None).await? {
        return Err(AppError::bad_request("Category with this name already exists"));
    }

    let category = repo.create(&req, &slug).await?;

    tracing::info!(user_id = %admin.user_id, category_id = %category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// 更新分类（管理员）
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    req.validate()?;

    let repo = CategoryRepository::new(state.db.clone());

    // 改名时重新生成 slug
    let slug = match req.name.as_deref() {
        Some(name) => {
            let slug = slugify(name);
            if slug.is_empty() {
                return Err(AppError::Validation(
                    "Category name must contain letters or digits".to_string(),
                ));
            }
            if repo.slug_exists(&slug, Some(id)).await? {
                return Err(AppError::bad_request("Category with this name already exists"));
            }
            Some(slug)
        }
        None => None,
    };

    let category = repo
        .update(id, &req, slug.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    tracing::info!(user_id = %admin.user_id, category_id = %id, "Category updated");

    Ok(Json(category))
}
