use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    dto::products::{CreateProductMultipart, CreateProductResponse, ListingResult, ProductForm},
    error::AppResult,
    images::ImageUpload,
    models::ProductDetail,
    response::CatalogResponse,
    routes::params::ListingParams,
    services::{listing_service, product_service},
    state::AppState,
};

pub const IMAGE_FIELD: &str = "avatar";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{product_id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api",
    params(ListingParams),
    responses(
        (status = 200, description = "One listing page, a redirect hint, or success=false", body = ListingResult),
        (status = 400, description = "Query string could not be parsed")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> AppResult<Json<ListingResult>> {
    let Query(params) = params?;
    Ok(Json(
        listing_service::list_products(&state, params.into_query()).await,
    ))
}

#[utoipa::path(
    get,
    path = "/api/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with variants, or success=false", body = CatalogResponse<ProductDetail>),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Json<CatalogResponse<ProductDetail>> {
    Json(product_service::get_product(&state, &product_id).await)
}

#[utoipa::path(
    post,
    path = "/api",
    request_body(content = CreateProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Creation result; success=false on validation or store failure", body = CreateProductResponse),
        (status = 400, description = "Malformed multipart body"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<CreateProductResponse>> {
    let mut form = ProductForm::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        if name == IMAGE_FIELD {
            let content_type = field.content_type().map(str::to_owned);
            let has_filename = field.file_name().is_some_and(|f| !f.is_empty());
            let bytes = field.bytes().await?;
            // Browsers send an empty, unnamed part when no file was picked.
            if has_filename || !bytes.is_empty() {
                upload = Some(ImageUpload {
                    content_type,
                    bytes,
                });
            }
            continue;
        }
        let value = field.text().await?;
        form.set(&name, value);
    }

    Ok(Json(
        product_service::create_product(&state, form, upload).await,
    ))
}
