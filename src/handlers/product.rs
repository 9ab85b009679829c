//! 商品的 HTTP 处理器

use crate::{
    auth::middleware::AdminUser,
    config::PaginationConfig,
    error::AppError,
    middleware::AppState,
    models::product::*,
    repository::ProductRepository,
    slug::{slugify, with_random_suffix},
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

/// 计算分页大小：缺省用默认值，并限制在 1..=max_page_size
pub fn page_limit(requested: Option<i64>, pagination: &PaginationConfig) -> i64 {
    let max = pagination.max_page_size.max(1);
    requested
        .unwrap_or(pagination.default_page_size)
        .clamp(1, max)
}

/// 列出在售商品
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(mut query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let limit = page_limit(query.limit, &state.config.pagination);
    query.skip = query.skip.max(0);

    let repo = ProductRepository::new(state.db.clone());
    let products = repo.list_active(&query, limit).await?;

    Ok(Json(products))
}

/// 获取商品详情
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(product))
}

/// 创建商品（管理员）
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    req.check_prices().map_err(AppError::Validation)?;

    let repo = ProductRepository::new(state.db.clone());
    let slug = unique_slug(&repo, &req.name).await?;
    let product = repo.create(&req, &slug).await?;

    tracing::info!(user_id = %admin.user_id, product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// 更新商品（管理员）
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    req.validate()?;
    req.check_prices().map_err(AppError::Validation)?;

    let repo = ProductRepository::new(state.db.clone());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    // 仅在改名时重新生成 slug
    let slug = match req.name.as_deref() {
        Some(name) if name != existing.name => Some(unique_slug(&repo, name).await?),
        _ => None,
    };

    let product = repo
        .update(id, &req, slug.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    tracing::info!(user_id = %admin.user_id, product_id = %id, "Product updated");

    Ok(Json(product))
}

/// 下架商品（管理员，软删除）
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let repo = ProductRepository::new(state.db.clone());

    if !repo.deactivate(id).await? {
        return Err(AppError::not_found("Product not found"));
    }

    tracing::info!(user_id = %admin.user_id, product_id = %id, "Product deactivated");

    Ok(StatusCode::NO_CONTENT)
}

// slug 冲突时追加随机后缀
async fn unique_slug(repo: &ProductRepository, name: &str) -> Result<String, AppError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Product name must contain letters or digits".to_string(),
        ));
    }

    if repo.slug_exists(&slug).await? {
        Ok(with_random_suffix(&slug))
    } else {
        Ok(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> PaginationConfig {
        PaginationConfig {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_page_limit_defaults_and_clamps() {
        assert_eq!(page_limit(None, &pagination()), 20);
        assert_eq!(page_limit(Some(50), &pagination()), 50);
        assert_eq!(page_limit(Some(1000), &pagination()), 100);
        assert_eq!(page_limit(Some(0), &pagination()), 1);
        assert_eq!(page_limit(Some(-5), &pagination()), 1);
    }
}
