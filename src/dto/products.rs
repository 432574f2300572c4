use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ErrorDetail, models::Product, repository::InsertResult};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    pub success: bool,
    /// Query string of the corrected page, e.g. `?page=3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub per_page: i64,
    pub total_rows: i64,
    pub total_pages: i64,
    pub page: i64,
    pub rows: Vec<Product>,
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl ListingResult {
    pub fn redirect_page(&self) -> Option<i64> {
        self.redirect
            .as_deref()
            .and_then(|r| r.strip_prefix("?page="))
            .and_then(|p| p.parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Legacy name of `price`; used only when `price` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl ProductForm {
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "product_code" => &mut self.product_code,
            "name" => &mut self.name,
            "description" => &mut self.description,
            "category_name" => &mut self.category_name,
            "weight" => &mut self.weight,
            "price" => &mut self.price,
            "base_price" => &mut self.base_price,
            "img_url" => &mut self.img_url,
            "folder" => &mut self.folder,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn effective_price(&self) -> Option<&str> {
        self.price.as_deref().or(self.base_price.as_deref())
    }
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CreateProductMultipart {
    pub product_code: String,
    pub name: String,
    pub description: String,
    pub category_name: Option<String>,
    pub weight: Option<String>,
    pub price: String,
    pub img_url: Option<String>,
    pub folder: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub avatar: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(value_type = String)]
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub success: bool,
    pub body_data: ProductForm,
    pub result: Option<InsertResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    /// Why an attached file was not stored; the product is created without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_rejected: Option<String>,
}
