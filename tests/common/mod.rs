#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use product_catalog_api::{
    error::{AppError, AppResult},
    images::ImageStore,
    models::{Product, ProductDetail, ProductVariant},
    repository::{InsertResult, ListingFilter, NewProduct, ProductRepository},
    state::AppState,
};

/// In-memory catalog with failure switches and call counters.
#[derive(Default)]
pub struct InMemoryRepository {
    categories: Vec<String>,
    products: Mutex<Vec<Product>>,
    variants: Mutex<Vec<(i64, ProductVariant)>>,
    inserted: Mutex<Vec<NewProduct>>,
    pub fail_reads: AtomicBool,
    pub fail_inserts: AtomicBool,
    pub count_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new(categories: &[&str]) -> Self {
        Self {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        *self.products.lock().unwrap() = products;
        self
    }

    pub fn add_variant(&self, product_id: i64, weight: Option<Decimal>) {
        let mut variants = self.variants.lock().unwrap();
        let variant_id = variants.len() as i64 + 1;
        variants.push((
            product_id,
            ProductVariant {
                variant_id,
                weight,
                image_url: None,
            },
        ));
    }

    pub fn inserted(&self) -> Vec<NewProduct> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn product_count(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("simulated read failure")));
        }
        Ok(())
    }

    fn matching(&self, filter: &ListingFilter) -> Vec<Product> {
        let mut rows: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                filter.keyword.as_ref().is_none_or(|k| {
                    p.product_name
                        .to_lowercase()
                        .contains(&k.to_lowercase())
                })
            })
            .filter(|p| filter.category.as_ref().is_none_or(|c| &p.category_name == c))
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        rows
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn count(&self, filter: &ListingFilter) -> AppResult<i64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.matching(filter).len() as i64)
    }

    async fn fetch_page(
        &self,
        filter: &ListingFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Product>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<ProductDetail>> {
        self.check_reads()?;
        let product = self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned();
        Ok(product.map(|product| ProductDetail {
            variants: self
                .variants
                .lock()
                .unwrap()
                .iter()
                .filter(|(pid, _)| *pid == id)
                .map(|(_, v)| v.clone())
                .collect(),
            product,
        }))
    }

    async fn insert(&self, new: &NewProduct) -> AppResult<InsertResult> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("simulated insert failure")));
        }
        let Some(category) = new
            .category_name
            .as_ref()
            .filter(|c| self.categories.contains(c))
        else {
            return Ok(InsertResult {
                inserted_id: None,
                affected_rows: 0,
            });
        };

        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        products.push(Product {
            id,
            product_code: new.product_code.clone(),
            product_name: new.name.clone(),
            description: new.description.clone(),
            category_name: category.clone(),
            price: new.price,
            image_url: new.image_url.clone(),
            average_rating: Decimal::ZERO,
            created_at: Utc::now(),
        });
        self.inserted.lock().unwrap().push(new.clone());

        Ok(InsertResult {
            inserted_id: Some(id),
            affected_rows: 1,
        })
    }
}

pub fn product(id: i64, name: &str, category: &str) -> Product {
    Product {
        id,
        product_code: format!("P{:03}", id % 1000),
        product_name: name.to_string(),
        description: format!("{name} description"),
        category_name: category.to_string(),
        price: Decimal::new(999, 2),
        image_url: None,
        average_rating: Decimal::ZERO,
        created_at: Utc::now(),
    }
}

/// `count` products named "Item N" with ids 1..=count, all in `category`.
pub fn numbered_products(count: i64, category: &str) -> Vec<Product> {
    (1..=count)
        .map(|id| product(id, &format!("Item {id}"), category))
        .collect()
}

pub fn state_with(repo: Arc<InMemoryRepository>, images: ImageStore) -> AppState {
    AppState::new(repo, images)
}

pub fn files_in(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}
