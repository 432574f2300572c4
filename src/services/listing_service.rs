use crate::{
    dto::products::ListingResult,
    error::AppResult,
    repository::{ListingFilter, ProductRepository},
    state::AppState,
};

pub const PER_PAGE: i64 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub page: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResolution {
    Redirect { page: i64 },
    Empty,
    Window { page: i64, limit: i64, offset: i64 },
}

pub fn total_pages(total_rows: i64) -> i64 {
    if total_rows <= 0 {
        0
    } else {
        (total_rows + PER_PAGE - 1) / PER_PAGE
    }
}

pub fn precheck(page: i64) -> Option<PageResolution> {
    (page < 1).then_some(PageResolution::Redirect { page: 1 })
}

pub fn resolve_page(page: i64, total_rows: i64) -> PageResolution {
    if let Some(redirect) = precheck(page) {
        return redirect;
    }
    // A zero-row result is served as-is for any page, without a bounds check.
    if total_rows == 0 {
        return PageResolution::Empty;
    }
    let pages = total_pages(total_rows);
    if page > pages {
        return PageResolution::Redirect { page: pages };
    }
    PageResolution::Window {
        page,
        limit: PER_PAGE,
        offset: (page - 1) * PER_PAGE,
    }
}

pub async fn list_products(state: &AppState, query: ListingQuery) -> ListingResult {
    match resolve_listing(state.repo.as_ref(), &query).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = ?err, page = query.page, "listing query failed");
            ListingResult {
                error: Some(err.detail()),
                ..base_result(&query)
            }
        }
    }
}

pub async fn resolve_listing(
    repo: &dyn ProductRepository,
    query: &ListingQuery,
) -> AppResult<ListingResult> {
    if let Some(PageResolution::Redirect { page }) = precheck(query.page) {
        return Ok(redirect_result(query, page, 0));
    }

    let total_rows = repo.count(&query.filter).await?;

    match resolve_page(query.page, total_rows) {
        PageResolution::Redirect { page } => Ok(redirect_result(query, page, total_rows)),
        PageResolution::Empty => Ok(ListingResult {
            success: true,
            page: query.page,
            ..base_result(query)
        }),
        PageResolution::Window {
            page,
            limit,
            offset,
        } => {
            let rows = repo.fetch_page(&query.filter, limit, offset).await?;
            tracing::debug!(page, total_rows, returned = rows.len(), "listing window fetched");
            Ok(ListingResult {
                success: true,
                total_rows,
                total_pages: total_pages(total_rows),
                page,
                rows,
                ..base_result(query)
            })
        }
    }
}

fn redirect_result(query: &ListingQuery, page: i64, total_rows: i64) -> ListingResult {
    ListingResult {
        redirect: Some(format!("?page={page}")),
        total_rows,
        total_pages: total_pages(total_rows),
        page: query.page,
        ..base_result(query)
    }
}

fn base_result(query: &ListingQuery) -> ListingResult {
    ListingResult {
        success: false,
        redirect: None,
        per_page: PER_PAGE,
        total_rows: 0,
        total_pages: 0,
        page: 0,
        rows: Vec::new(),
        keyword: query.filter.keyword_echo(),
        category: query.filter.category.clone(),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(12), 1);
        assert_eq!(total_pages(13), 2);
        assert_eq!(total_pages(120), 10);
    }

    #[test]
    fn pages_below_one_redirect_to_first() {
        for page in [0, -1, i64::MIN] {
            assert_eq!(precheck(page), Some(PageResolution::Redirect { page: 1 }));
            assert_eq!(resolve_page(page, 50), PageResolution::Redirect { page: 1 });
        }
        assert_eq!(precheck(1), None);
    }

    #[test]
    fn zero_rows_skip_bounds_check() {
        assert_eq!(resolve_page(1, 0), PageResolution::Empty);
        assert_eq!(resolve_page(999_999, 0), PageResolution::Empty);
    }

    #[test]
    fn pages_past_the_end_redirect_to_last() {
        assert_eq!(resolve_page(4, 25), PageResolution::Redirect { page: 3 });
        assert_eq!(resolve_page(2, 12), PageResolution::Redirect { page: 1 });
    }

    #[test]
    fn in_range_pages_get_a_window() {
        assert_eq!(
            resolve_page(1, 25),
            PageResolution::Window {
                page: 1,
                limit: 12,
                offset: 0
            }
        );
        assert_eq!(
            resolve_page(3, 25),
            PageResolution::Window {
                page: 3,
                limit: 12,
                offset: 24
            }
        );
    }
}
