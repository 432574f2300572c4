use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Product, ProductDetail},
};

pub mod filter;
pub mod postgres;

pub use filter::{ListingFilter, WhereClause};
pub use postgres::PgProductRepository;

pub type DynProductRepository = Arc<dyn ProductRepository>;

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_code: String,
    pub name: String,
    pub description: String,
    pub category_name: Option<String>,
    pub price: Decimal,
    pub weight: Option<Decimal>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub inserted_id: Option<i64>,
    pub affected_rows: u64,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn count(&self, filter: &ListingFilter) -> AppResult<i64>;

    async fn fetch_page(
        &self,
        filter: &ListingFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Product>>;

    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<ProductDetail>>;

    /// Inserts a product. Zero affected rows is reported, not raised.
    async fn insert(&self, product: &NewProduct) -> AppResult<InsertResult>;
}
