use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ErrorDetail;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

// Domain failures are reported with `success: false` and an HTTP 200 status.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl<T: Serialize> CatalogResponse<T> {
    pub fn found(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn missing() -> Self {
        Self {
            success: false,
            data: None,
            error: None,
        }
    }

    pub fn failed(error: ErrorDetail) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}
