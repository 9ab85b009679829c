//! Quote request domain models

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 报价单状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "quote_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Reviewed,
    Responded,
    Closed,
}

/// Quote request for bulk or custom uniform orders
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub quote_number: String,

    // 客户（访客报价时为空）
    pub user_id: Option<Uuid>,

    // 联系信息
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,

    // 公司信息
    pub company_name: String,
    pub industry: Option<String>,

    // 需求
    pub uniform_type: String,
    pub quantity: i32,
    pub requirements: String,
    pub logo_url: Option<String>,
    pub customization_notes: Option<String>,

    // 状态与回复
    pub status: QuoteStatus,
    pub admin_response: Option<String>,
    pub estimated_price: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// 报价单仅对提交者和管理员可见
    pub fn is_visible_to(&self, user_id: Uuid, is_superuser: bool) -> bool {
        is_superuser || self.user_id == Some(user_id)
    }
}

/// Create quote request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(length(min = 1, max = 255))]
    pub contact_name: String,
    #[validate(email)]
    pub contact_email: String,
    #[validate(length(min = 1, max = 20))]
    pub contact_phone: String,
    #[validate(length(min = 1, max = 255))]
    pub company_name: String,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub uniform_type: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub requirements: String,
    pub customization_notes: Option<String>,
}

/// Update quote status request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
    pub admin_response: Option<String>,
    #[validate(length(max = 100))]
    pub estimated_price: Option<String>,
}

impl UpdateQuoteStatusRequest {
    /// 空字符串视为未提供，不覆盖已有回复，也不更新 responded_at
    pub fn without_empty_fields(mut self) -> Self {
        self.admin_response = self.admin_response.filter(|s| !s.is_empty());
        self.estimated_price = self.estimated_price.filter(|s| !s.is_empty());
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteListQuery {
    pub status: Option<QuoteStatus>,
}

/// 生成报价单号：QT-<年份>-<6位数字>
pub fn generate_quote_number(now: DateTime<Utc>) -> String {
    let digits: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("QT-{}-{:06}", now.year(), digits)
}
