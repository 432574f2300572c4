use serde::Deserialize;
use utoipa::IntoParams;

use crate::{repository::ListingFilter, services::listing_service::ListingQuery};

// `page` stays text so a malformed value falls back to page 1 instead of failing extraction.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// Page number, default 1.
    pub page: Option<String>,
    /// Substring of the product name.
    pub keyword: Option<String>,
    /// Exact category name.
    pub category_name: Option<String>,
}

impl ListingParams {
    pub fn into_query(self) -> ListingQuery {
        let page = self.page.as_deref().and_then(parse_page).unwrap_or(1);
        ListingQuery {
            filter: ListingFilter::new(self.keyword.as_deref(), self.category_name.as_deref()),
            page,
        }
    }
}

/// Integer pages that overflow `i64` saturate, so they are still corrected by a redirect.
fn parse_page(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(page) = raw.parse::<i64>() {
        return Some(page);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}
