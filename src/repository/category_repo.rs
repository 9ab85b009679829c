//! Category repository (分类数据访问)

use crate::{error::AppError, models::category::*};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CategoryRepository {
    db: PgPool,
}

impl CategoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出分类（按 sort_order 排序）
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM categories
            WHERE $1 OR is_active = TRUE
            ORDER BY sort_order, name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// 获取分类
    pub async fn get(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(category)
    }

    /// 检查 slug 是否已被占用（可排除指定分类）
    pub async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// 创建分类
    pub async fn create(&self, req: &CreateCategoryRequest, slug: &str) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(slug)
        .bind(&req.description)
        .bind(req.is_active)
        .bind(req.sort_order)
        .fetch_one(&self.db)
        .await?;

        Ok(category)
    }

    /// 更新分类
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateCategoryRequest,
        slug: Option<&str>,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(slug)
        .bind(&req.description)
        .bind(req.is_active)
        .bind(req.sort_order)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }
}
