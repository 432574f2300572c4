use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::{error::AppError, state::AppState};

pub type DynAccessPolicy = Arc<dyn AccessPolicy>;

#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

pub trait AccessPolicy: Send + Sync {
    fn check(&self, request: &AccessRequest<'_>) -> AccessDecision;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn check(&self, _request: &AccessRequest<'_>) -> AccessDecision {
        AccessDecision::Allow
    }
}

pub async fn authorize(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let decision = state.access.check(&AccessRequest {
        method: request.method(),
        path: request.uri().path(),
    });

    match decision {
        AccessDecision::Allow => Ok(next.run(request).await),
        AccessDecision::Deny => {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "request denied by access policy"
            );
            Err(AppError::Forbidden)
        }
    }
}
