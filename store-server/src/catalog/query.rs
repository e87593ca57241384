//! Catalog Query Builder
//!
//! The HTTP boundary still speaks the legacy parameter dialect (absent or
//! `"all"` means "no filter", `price` is a `"min-max"` pair), but the core
//! works on tagged-option types: each filter dimension is either present
//! with a parsed value or absent, and present dimensions combine with AND.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use thiserror::Error;

/// Default page size, matching the storefront's three-per-page grid.
pub const DEFAULT_PAGE_SIZE: i64 = 3;

/// Raw search parameters as they arrive on the wire
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Substring to match against product names
    pub query: Option<String>,
    pub category: Option<String>,
    /// Inclusive price range, `"min-max"`
    pub price: Option<String>,
    /// Inclusive lower bound on rating
    pub rating: Option<String>,
    /// Sort key: featured | lowest | highest | toprated | newest
    pub order: Option<String>,
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

/// Query parameter errors - all caller errors, surfaced as 400s
#[derive(Debug, Error)]
pub enum QueryParseError {
    #[error("Invalid price range '{0}', expected 'min-max'")]
    InvalidPriceRange(String),

    #[error("Invalid rating '{0}'")]
    InvalidRating(String),

    #[error("Page must be a positive integer, got {0}")]
    InvalidPage(i64),

    #[error("Page size must be a positive integer, got {0}")]
    InvalidPageSize(i64),
}

/// Typed product filter - one tagged option per dimension, AND-combined
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name
    pub name_contains: Option<String>,
    /// Exact category tag
    pub category: Option<String>,
    /// Inclusive (min, max) price bounds
    pub price_range: Option<(f64, f64)>,
    /// Inclusive lower bound on rating
    pub min_rating: Option<f64>,
}

impl ProductFilter {
    /// Append this filter's WHERE clause (with binds) to a query.
    ///
    /// Used identically by the page query and its count query so both
    /// always agree on the match set.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut sep = " WHERE ";
        if let Some(text) = &self.name_contains {
            // SQLite LIKE is case-insensitive for ASCII
            qb.push(sep)
                .push("name LIKE ")
                .push_bind(format!("%{}%", escape_like(text)))
                .push(" ESCAPE '\\'");
            sep = " AND ";
        }
        if let Some(category) = &self.category {
            qb.push(sep).push("category = ").push_bind(category.clone());
            sep = " AND ";
        }
        if let Some((min, max)) = self.price_range {
            qb.push(sep)
                .push("price >= ")
                .push_bind(min)
                .push(" AND price <= ")
                .push_bind(max);
            sep = " AND ";
        }
        if let Some(min_rating) = self.min_rating {
            qb.push(sep).push("rating >= ").push_bind(min_rating);
        }
    }
}

/// Escape LIKE wildcards in user-supplied match text.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Sort order for catalog queries
///
/// Ties break by insertion order (secondary `id ASC`); the default sort
/// is newest-id-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    Featured,
    LowestPrice,
    HighestPrice,
    TopRated,
    Newest,
    #[default]
    Default,
}

impl ProductSort {
    /// Map a request sort key; unrecognized keys fall back to the default.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("featured") => Self::Featured,
            Some("lowest") => Self::LowestPrice,
            Some("highest") => Self::HighestPrice,
            Some("toprated") => Self::TopRated,
            Some("newest") => Self::Newest,
            _ => Self::Default,
        }
    }

    /// ORDER BY expression for this sort.
    pub fn order_by_sql(&self) -> &'static str {
        match self {
            Self::Featured => "featured DESC, id ASC",
            Self::LowestPrice => "price ASC, id ASC",
            Self::HighestPrice => "price DESC, id ASC",
            Self::TopRated => "rating DESC, id ASC",
            Self::Newest => "created_at DESC, id ASC",
            Self::Default => "id DESC",
        }
    }
}

/// Validated pagination window (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl PageParams {
    /// Build from optional raw values. Non-positive values are caller
    /// errors, rejected rather than clamped - a zero page size would make
    /// the result set unbounded.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self, QueryParseError> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 1 {
            return Err(QueryParseError::InvalidPage(page));
        }
        if page_size < 1 {
            return Err(QueryParseError::InvalidPageSize(page_size));
        }
        Ok(Self { page, page_size })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        self.page_size * (self.page - 1)
    }

    /// Total page count for a given match count: ceil(total / page_size).
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.page_size - 1) / self.page_size
    }
}

/// Fully parsed catalog query
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub filter: ProductFilter,
    pub sort: ProductSort,
    pub page: PageParams,
}

impl SearchParams {
    /// Parse the wire dialect into the typed query.
    pub fn into_query(self) -> Result<CatalogQuery, QueryParseError> {
        let name_contains = filter_param(self.query);
        let category = filter_param(self.category);

        let price_range = match filter_param(self.price) {
            Some(raw) => Some(parse_price_range(&raw)?),
            None => None,
        };

        let min_rating = match filter_param(self.rating) {
            Some(raw) => {
                let rating: f64 = raw
                    .parse()
                    .map_err(|_| QueryParseError::InvalidRating(raw.clone()))?;
                if !rating.is_finite() {
                    return Err(QueryParseError::InvalidRating(raw));
                }
                Some(rating)
            }
            None => None,
        };

        Ok(CatalogQuery {
            filter: ProductFilter {
                name_contains,
                category,
                price_range,
                min_rating,
            },
            sort: ProductSort::from_key(self.order.as_deref()),
            page: PageParams::new(self.page, self.page_size)?,
        })
    }
}

/// Normalize one raw filter value: absent, empty and the `"all"` sentinel
/// all mean "dimension off".
fn filter_param(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "all")
}

/// Parse an inclusive `"min-max"` price pair.
fn parse_price_range(raw: &str) -> Result<(f64, f64), QueryParseError> {
    let err = || QueryParseError::InvalidPriceRange(raw.to_string());
    let (min_str, max_str) = raw.split_once('-').ok_or_else(|| err())?;
    let min: f64 = min_str.trim().parse().map_err(|_| err())?;
    let max: f64 = max_str.trim().parse().map_err(|_| err())?;
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(err());
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn test_empty_params_mean_no_filters() {
        let q = params().into_query().unwrap();
        assert_eq!(q.filter, ProductFilter::default());
        assert_eq!(q.sort, ProductSort::Default);
        assert_eq!(q.page, PageParams { page: 1, page_size: DEFAULT_PAGE_SIZE });
    }

    #[test]
    fn test_all_sentinel_disables_dimension() {
        let mut p = params();
        p.query = Some("all".to_string());
        p.category = Some("all".to_string());
        p.price = Some("all".to_string());
        p.rating = Some("all".to_string());
        let q = p.into_query().unwrap();
        assert_eq!(q.filter, ProductFilter::default());
    }

    #[test]
    fn test_price_range_parses_inclusive_pair() {
        let mut p = params();
        p.price = Some("50-150".to_string());
        let q = p.into_query().unwrap();
        assert_eq!(q.filter.price_range, Some((50.0, 150.0)));
    }

    #[test]
    fn test_price_range_rejects_malformed() {
        for raw in ["50", "a-b", "50-", "-", "150-50"] {
            let mut p = params();
            p.price = Some(raw.to_string());
            assert!(
                matches!(p.into_query(), Err(QueryParseError::InvalidPriceRange(_))),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn test_rating_parses_lower_bound() {
        let mut p = params();
        p.rating = Some("4".to_string());
        let q = p.into_query().unwrap();
        assert_eq!(q.filter.min_rating, Some(4.0));
    }

    #[test]
    fn test_rating_rejects_garbage() {
        let mut p = params();
        p.rating = Some("many".to_string());
        assert!(matches!(p.into_query(), Err(QueryParseError::InvalidRating(_))));
    }

    #[test]
    fn test_sort_key_mapping() {
        assert_eq!(ProductSort::from_key(Some("featured")), ProductSort::Featured);
        assert_eq!(ProductSort::from_key(Some("lowest")), ProductSort::LowestPrice);
        assert_eq!(ProductSort::from_key(Some("highest")), ProductSort::HighestPrice);
        assert_eq!(ProductSort::from_key(Some("toprated")), ProductSort::TopRated);
        assert_eq!(ProductSort::from_key(Some("newest")), ProductSort::Newest);
        assert_eq!(ProductSort::from_key(Some("sideways")), ProductSort::Default);
        assert_eq!(ProductSort::from_key(None), ProductSort::Default);
    }

    #[test]
    fn test_page_params_reject_non_positive() {
        assert!(matches!(
            PageParams::new(Some(0), None),
            Err(QueryParseError::InvalidPage(0))
        ));
        assert!(matches!(
            PageParams::new(None, Some(0)),
            Err(QueryParseError::InvalidPageSize(0))
        ));
        assert!(matches!(
            PageParams::new(Some(-1), Some(-5)),
            Err(QueryParseError::InvalidPage(-1))
        ));
    }

    #[test]
    fn test_offset_and_limit() {
        let p = PageParams::new(Some(3), Some(5)).unwrap();
        assert_eq!(p.offset(), 10);
        assert_eq!(p.limit(), 5);
    }

    #[test]
    fn test_total_pages_ceiling() {
        let p = PageParams::new(None, Some(3)).unwrap();
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(3), 1);
        assert_eq!(p.total_pages(4), 2);
        assert_eq!(p.total_pages(9), 3);
    }

    #[test]
    fn test_push_where_composes_with_and() {
        let filter = ProductFilter {
            name_contains: Some("shirt".to_string()),
            category: Some("Shirts".to_string()),
            price_range: Some((10.0, 20.0)),
            min_rating: Some(3.0),
        };
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM product");
        filter.push_where(&mut qb);
        let sql = qb.sql();
        assert!(sql.contains("WHERE name LIKE "));
        assert!(sql.contains(" AND category = "));
        assert!(sql.contains(" AND price >= "));
        assert!(sql.contains(" AND rating >= "));
    }

    #[test]
    fn test_push_where_empty_filter_adds_nothing() {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM product");
        ProductFilter::default().push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM product");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%_cotton\\"), "100\\%\\_cotton\\\\");
    }
}
