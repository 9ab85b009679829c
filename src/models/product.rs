//! Product domain models

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,

    // 价格
    pub price: BigDecimal,
    pub compare_at_price: Option<BigDecimal>,

    // 库存
    pub stock: i32,
    pub sku: Option<String>,

    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub features: Json<Vec<String>>,

    // 状态
    pub is_active: bool,
    pub is_featured: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create product request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub compare_at_price: Option<BigDecimal>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: Option<Uuid>,
    #[validate(length(max = 100))]
    pub sku: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl CreateProductRequest {
    /// 价格字段必须非负
    pub fn check_prices(&self) -> Result<(), String> {
        check_non_negative("price", Some(&self.price))?;
        check_non_negative("compare_at_price", self.compare_at_price.as_ref())
    }
}

/// Update product request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub compare_at_price: Option<BigDecimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl UpdateProductRequest {
    pub fn check_prices(&self) -> Result<(), String> {
        check_non_negative("price", self.price.as_ref())?;
        check_non_negative("compare_at_price", self.compare_at_price.as_ref())
    }
}

fn check_non_negative(field: &str, value: Option<&BigDecimal>) -> Result<(), String> {
    match value {
        Some(v) if *v < BigDecimal::zero() => Err(format!("{} must be >= 0", field)),
        _ => Ok(()),
    }
}

/// Product listing filters
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
    pub category_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(price: &str) -> CreateProductRequest {
        CreateProductRequest {
            name: "Security Guard Shirt".to_string(),
            description: None,
            price: BigDecimal::from_str(price).unwrap(),
            compare_at_price: None,
            stock: 10,
            category_id: None,
            sku: None,
            features: vec![],
            is_featured: false,
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(request("45000.00").check_prices().is_ok());
        assert!(request("0").check_prices().is_ok());
        assert!(request("-1.50").check_prices().is_err());
    }

    #[test]
    fn test_negative_stock_rejected() {
        let mut req = request("10");
        req.stock = -1;
        assert!(req.validate().is_err());
    }
}
