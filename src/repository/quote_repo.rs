//! Quote repository (报价单数据访问)

use crate::{error::AppError, models::quote::*};
use sqlx::PgPool;
use uuid::Uuid;

pub struct QuoteRepository {
    db: PgPool,
}

impl QuoteRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建报价单
    pub async fn create(
        &self,
        req: &CreateQuoteRequest,
        quote_number: &str,
        user_id: Option<Uuid>,
    ) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes
                (quote_number, user_id, contact_name, contact_email, contact_phone,
                 company_name, industry, uniform_type, quantity, requirements,
                 customization_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(quote_number)
        .bind(user_id)
        .bind(&req.contact_name)
        .bind(&req.contact_email)
        .bind(&req.contact_phone)
        .bind(&req.company_name)
        .bind(&req.industry)
        .bind(&req.uniform_type)
        .bind(req.quantity)
        .bind(&req.requirements)
        .bind(&req.customization_notes)
        .fetch_one(&self.db)
        .await?;

        Ok(quote)
    }

    /// 获取报价单
    pub async fn get(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(quote)
    }

    /// 列出用户自己的报价单
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(quotes)
    }

    /// 列出所有报价单（可按状态过滤）
    pub async fn list(&self, status: Option<QuoteStatus>) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT * FROM quotes
            WHERE $1::quote_status IS NULL OR status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(quotes)
    }

    /// 更新报价单状态
    pub async fn update_status(
        &self,
        id: Uuid,
        req: &UpdateQuoteStatusRequest,
    ) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET
                status = $2,
                admin_response = COALESCE($3, admin_response),
                responded_at = CASE WHEN $3 IS NOT NULL THEN NOW() ELSE responded_at END,
                estimated_price = COALESCE($4, estimated_price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.status)
        .bind(&req.admin_response)
        .bind(&req.estimated_price)
        .fetch_optional(&self.db)
        .await?;

        Ok(quote)
    }
}
