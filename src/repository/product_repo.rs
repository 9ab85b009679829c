//! Product repository (商品数据访问)

use crate::{error::AppError, models::product::*};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

pub struct ProductRepository {
    db: PgPool,
}

impl ProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出在售商品
    pub async fn list_active(
        &self,
        query: &ProductListQuery,
        limit: i64,
    ) -> Result<Vec<Product>, AppError> {
        let pattern = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE is_active = TRUE
              AND ($1::uuid IS NULL OR category_id = $1)
              AND ($2::boolean IS NULL OR is_featured = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR description ILIKE $3)
            ORDER BY created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(query.category_id)
        .bind(query.is_featured)
        .bind(pattern)
        .bind(query.skip.max(0))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// 获取商品
    pub async fn get(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(product)
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    /// 创建商品
    pub async fn create(&self, req: &CreateProductRequest, slug: &str) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (name, slug, description, price, compare_at_price, stock, sku,
                 category_id, features, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(slug)
        .bind(&req.description)
        .bind(&req.price)
        .bind(&req.compare_at_price)
        .bind(req.stock)
        .bind(&req.sku)
        .bind(req.category_id)
        .bind(Json(&req.features))
        .bind(req.is_featured)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// 更新商品
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateProductRequest,
        slug: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                compare_at_price = COALESCE($6, compare_at_price),
                stock = COALESCE($7, stock),
                category_id = COALESCE($8, category_id),
                is_active = COALESCE($9, is_active),
                is_featured = COALESCE($10, is_featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(slug)
        .bind(&req.description)
        .bind(&req.price)
        .bind(&req.compare_at_price)
        .bind(req.stock)
        .bind(req.category_id)
        .bind(req.is_active)
        .bind(req.is_featured)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    /// 软删除（is_active = false）
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 转义 LIKE 通配符
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
