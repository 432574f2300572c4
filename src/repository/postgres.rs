use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{EntityTrait, ModelTrait, QueryOrder};

use super::{InsertResult, ListingFilter, NewProduct, ProductRepository};
use crate::{
    db::{DbPool, OrmConn},
    entity::{Categories, ProductVariants, Products, product_variants},
    error::AppResult,
    models::{Product, ProductDetail, ProductVariant},
};

const LISTING_FROM: &str = "FROM products p JOIN categories c ON p.category_id = c.id";

const LISTING_COLUMNS: &str = "p.id, p.product_code, p.name AS product_name, p.description, \
     c.category_name, p.price, p.image_url, p.average_rating, p.created_at";

#[derive(Clone)]
pub struct PgProductRepository {
    pool: DbPool,
    orm: OrmConn,
}

impl PgProductRepository {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self { pool, orm }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn count(&self, filter: &ListingFilter) -> AppResult<i64> {
        let clause = filter.where_clause();
        let sql = format!("SELECT COUNT(1) {LISTING_FROM} {}", clause.sql);

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in &clause.binds {
            query = query.bind(value);
        }
        let total = query.fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn fetch_page(
        &self,
        filter: &ListingFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Product>> {
        let clause = filter.where_clause();
        let limit_at = clause.next_placeholder();
        let sql = format!(
            "SELECT {LISTING_COLUMNS} {LISTING_FROM} {} ORDER BY p.id ASC LIMIT ${} OFFSET ${}",
            clause.sql,
            limit_at,
            limit_at + 1
        );

        let mut query = sqlx::query_as::<_, Product>(&sql);
        for value in &clause.binds {
            query = query.bind(value);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<ProductDetail>> {
        let found = Products::find_by_id(id)
            .find_also_related(Categories)
            .one(&self.orm)
            .await?;
        let (model, category) = match found {
            Some((model, Some(category))) => (model, category),
            _ => return Ok(None),
        };

        let variants = model
            .find_related(ProductVariants)
            .order_by_asc(product_variants::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|variant| ProductVariant {
                variant_id: variant.id,
                weight: variant.weight,
                image_url: variant.image_url,
            })
            .collect();

        let product = Product {
            id: model.id,
            product_code: model.product_code,
            product_name: model.name,
            description: model.description,
            category_name: category.category_name,
            price: model.price,
            image_url: model.image_url,
            average_rating: model.average_rating,
            created_at: model.created_at.with_timezone(&Utc),
        };

        Ok(Some(ProductDetail { product, variants }))
    }

    async fn insert(&self, product: &NewProduct) -> AppResult<InsertResult> {
        // The category is resolved in the same statement; an unknown name selects no row.
        let inserted_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (product_code, name, description, category_id, price, weight, image_url)
            SELECT $1, $2, $3, c.id, $5, $6, $7
            FROM categories c
            WHERE c.category_name = $4
            RETURNING id
            "#,
        )
        .bind(&product.product_code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category_name)
        .bind(product.price)
        .bind(product.weight)
        .bind(&product.image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(InsertResult {
            inserted_id,
            affected_rows: u64::from(inserted_id.is_some()),
        })
    }
}
