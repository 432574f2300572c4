use std::sync::Arc;

use crate::{
    db::{DbPool, orm_from_pool},
    images::ImageStore,
    middleware::access::{AllowAll, DynAccessPolicy},
    repository::{DynProductRepository, PgProductRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub repo: DynProductRepository,
    pub images: ImageStore,
    pub access: DynAccessPolicy,
}

impl AppState {
    pub fn new(repo: DynProductRepository, images: ImageStore) -> Self {
        Self {
            repo,
            images,
            access: Arc::new(AllowAll),
        }
    }

    pub fn from_pool(pool: DbPool, images: ImageStore) -> Self {
        let orm = orm_from_pool(&pool);
        Self::new(Arc::new(PgProductRepository::new(pool, orm)), images)
    }

    pub fn with_access(mut self, access: DynAccessPolicy) -> Self {
        self.access = access;
        self
    }
}
