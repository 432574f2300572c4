use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub product_code: String,
    pub product_name: String,
    pub description: String,
    pub category_name: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    pub image_url: Option<String>,
    #[schema(value_type = String, example = "4.50")]
    pub average_rating: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductVariant {
    pub variant_id: i64,
    #[schema(value_type = Option<String>)]
    pub weight: Option<Decimal>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}
