use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{
        CreateProductMultipart, CreateProductResponse, FieldError, ListingResult, ProductForm,
    },
    error::ErrorDetail,
    models::{Product, ProductDetail, ProductVariant},
    repository::InsertResult,
    response::{ApiResponse, CatalogResponse},
    routes::{health, products as product_routes},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
    ),
    components(
        schemas(
            Product,
            ProductVariant,
            ProductDetail,
            ListingResult,
            ProductForm,
            CreateProductMultipart,
            CreateProductResponse,
            FieldError,
            InsertResult,
            ErrorDetail,
            health::HealthData,
            ApiResponse<health::HealthData>,
            CatalogResponse<ProductDetail>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
