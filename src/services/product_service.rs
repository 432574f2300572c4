use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{
    dto::products::{CreateProductResponse, FieldError, ProductForm},
    error::{AppError, ErrorDetail},
    images::{ImageError, ImageRejection, ImageStore, ImageUpload, StoredImage, UploadFolder},
    models::ProductDetail,
    repository::{InsertResult, NewProduct, ProductRepository},
    response::CatalogResponse,
    state::AppState,
};

pub async fn get_product(state: &AppState, product_id: &str) -> CatalogResponse<ProductDetail> {
    let Ok(id) = product_id.trim().parse::<i64>() else {
        return CatalogResponse::missing();
    };

    match state.repo.fetch_by_id(id).await {
        Ok(Some(detail)) => CatalogResponse::found(detail),
        Ok(None) => CatalogResponse::missing(),
        Err(err) => {
            tracing::error!(error = ?err, product_id = id, "product lookup failed");
            CatalogResponse::failed(err.detail())
        }
    }
}

pub async fn create_product(
    state: &AppState,
    form: ProductForm,
    upload: Option<ImageUpload>,
) -> CreateProductResponse {
    let creation = ProductCreation::new(state.repo.as_ref(), &state.images);
    let report = creation.run(&form, upload).await;
    report.into_response(form)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreationOutcome {
    Rejected { errors: Vec<FieldError> },
    UploadFailed { error: ErrorDetail },
    Compensated { error: Option<ErrorDetail> },
    Completed { result: InsertResult },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreationReport {
    pub outcome: CreationOutcome,
    pub image_rejected: Option<ImageRejection>,
}

impl CreationReport {
    fn new(outcome: CreationOutcome, image_rejected: Option<ImageRejection>) -> Self {
        Self {
            outcome,
            image_rejected,
        }
    }

    pub fn into_response(self, body_data: ProductForm) -> CreateProductResponse {
        let mut response = CreateProductResponse {
            success: false,
            body_data,
            result: None,
            errors: None,
            error: None,
            image_rejected: self.image_rejected.map(|reason| reason.to_string()),
        };
        match self.outcome {
            CreationOutcome::Rejected { errors } => response.errors = Some(errors),
            CreationOutcome::UploadFailed { error } => response.error = Some(error),
            CreationOutcome::Compensated { error } => response.error = error,
            CreationOutcome::Completed { result } => {
                response.success = true;
                response.result = Some(result);
            }
        }
        response
    }
}

/// A staged image is deleted on every failure path after it was written, and only there.
pub struct ProductCreation<'a> {
    repo: &'a dyn ProductRepository,
    images: &'a ImageStore,
}

impl<'a> ProductCreation<'a> {
    pub fn new(repo: &'a dyn ProductRepository, images: &'a ImageStore) -> Self {
        Self { repo, images }
    }

    pub async fn run(&self, form: &ProductForm, upload: Option<ImageUpload>) -> CreationReport {
        let mut image_rejected = None;
        let staged = match upload {
            None => None,
            Some(upload) => {
                let folder = UploadFolder::from_field(form.folder.as_deref());
                match self.images.save(upload, folder).await {
                    Ok(stored) => Some(stored),
                    Err(ImageError::Rejected(reason)) => {
                        tracing::info!(reason = %reason, "attached file skipped");
                        image_rejected = Some(reason);
                        None
                    }
                    Err(ImageError::Io(err)) => {
                        let err = AppError::from(err);
                        tracing::error!(error = ?err, "failed to store uploaded image");
                        return CreationReport::new(
                            CreationOutcome::UploadFailed {
                                error: err.detail(),
                            },
                            None,
                        );
                    }
                }
            }
        };

        let mut product = match validate(form) {
            Ok(product) => product,
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "product form rejected");
                self.compensate(staged).await;
                return CreationReport::new(CreationOutcome::Rejected { errors }, image_rejected);
            }
        };
        if let Some(stored) = &staged {
            product.image_url = Some(stored.filename().to_owned());
        }

        let outcome = match self.repo.insert(&product).await {
            Ok(result) if result.affected_rows > 0 => {
                tracing::info!(
                    product_id = ?result.inserted_id,
                    product_code = %product.product_code,
                    "product created"
                );
                CreationOutcome::Completed { result }
            }
            Ok(_) => {
                tracing::warn!(
                    product_code = %product.product_code,
                    category = ?product.category_name,
                    "insert affected no rows"
                );
                self.compensate(staged).await;
                CreationOutcome::Compensated { error: None }
            }
            Err(err) => {
                tracing::error!(error = ?err, product_code = %product.product_code, "product insert failed");
                self.compensate(staged).await;
                CreationOutcome::Compensated {
                    error: Some(err.detail()),
                }
            }
        };

        CreationReport::new(outcome, image_rejected)
    }

    async fn compensate(&self, staged: Option<StoredImage>) {
        if let Some(image) = staged {
            self.images.delete(image).await;
        }
    }
}

pub fn validate(form: &ProductForm) -> Result<NewProduct, Vec<FieldError>> {
    let mut errors = Vec::new();

    let product_code = match form.product_code.as_deref() {
        None | Some("") => {
            errors.push(FieldError::new("product_code", "required"));
            None
        }
        Some(code) if !is_product_code(code) => {
            errors.push(FieldError::new(
                "product_code",
                "must be P followed by three digits",
            ));
            None
        }
        Some(code) => Some(code.to_owned()),
    };

    let name = required_text(&mut errors, "name", form.name.as_deref());
    let description = required_text(&mut errors, "description", form.description.as_deref());

    let price = match non_blank(form.effective_price()) {
        None => {
            errors.push(FieldError::new("price", "required"));
            None
        }
        Some(raw) => match Decimal::from_str(raw) {
            Ok(price) if !price.is_sign_negative() => Some(price),
            _ => {
                errors.push(FieldError::new("price", "must be a non-negative number"));
                None
            }
        },
    };

    // Blank weight means "no weight", never an empty string.
    let weight = match non_blank(form.weight.as_deref()) {
        None => None,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(weight) => Some(weight),
            Err(_) => {
                errors.push(FieldError::new("weight", "must be a number"));
                None
            }
        },
    };

    match (product_code, name, description, price) {
        (Some(product_code), Some(name), Some(description), Some(price)) if errors.is_empty() => {
            Ok(NewProduct {
                product_code,
                name,
                description,
                category_name: non_blank(form.category_name.as_deref()).map(str::to_owned),
                price,
                weight,
                image_url: non_blank(form.img_url.as_deref()).map(str::to_owned),
            })
        }
        _ => Err(errors),
    }
}

/// `P` followed by exactly three ASCII digits.
fn is_product_code(code: &str) -> bool {
    code.len() == 4
        && code.starts_with('P')
        && code[1..].bytes().all(|b| b.is_ascii_digit())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<&str>,
) -> Option<String> {
    match non_blank(value) {
        Some(v) => Some(v.to_owned()),
        None => {
            errors.push(FieldError::new(field, "required"));
            None
        }
    }
}
