//! Catalog query engine
//!
//! Translates untyped search parameters into the typed filter, sort and
//! pagination values consumed by the product repository.

pub mod query;

pub use query::{
    CatalogQuery, DEFAULT_PAGE_SIZE, PageParams, ProductFilter, ProductSort, QueryParseError,
    SearchParams,
};
