//! Product Repository

use super::{RepoError, RepoResult};
use crate::catalog::CatalogQuery;
use shared::models::{Product, ProductInput};
use shared::util::{now_millis, snowflake_id, to_slug};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PRODUCT_SELECT: &str = "SELECT id, name, slug, image, brand, category, description, price, count_in_stock, rating, num_reviews, featured, created_at FROM product";

/// Validate the mutable field set shared by create and update.
fn validate(data: &ProductInput) -> RepoResult<()> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name cannot be empty".into()));
    }
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(RepoError::Validation("price must be non-negative".into()));
    }
    if data.count_in_stock < 0 {
        return Err(RepoError::Validation("stock count must be non-negative".into()));
    }
    if !data.rating.is_finite() || !(0.0..=5.0).contains(&data.rating) {
        return Err(RepoError::Validation("rating must be within 0-5".into()));
    }
    if data.num_reviews < 0 {
        return Err(RepoError::Validation("review count must be non-negative".into()));
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE slug = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_category(pool: &SqlitePool, category: &str) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE category = ? ORDER BY id");
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(category)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Distinct category tags across the catalog (for filter UIs).
pub async fn distinct_categories(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT category FROM product ORDER BY category")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_categories(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT category) FROM product")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Execute a catalog query: one page of matches plus the total match
/// count ignoring pagination. Both statements share the same WHERE
/// clause, so the count always describes the same match set.
pub async fn search(pool: &SqlitePool, query: &CatalogQuery) -> RepoResult<(Vec<Product>, i64)> {
    let mut qb = QueryBuilder::<Sqlite>::new(PRODUCT_SELECT);
    query.filter.push_where(&mut qb);
    qb.push(" ORDER BY ")
        .push(query.sort.order_by_sql())
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());
    let products = qb.build_query_as::<Product>().fetch_all(pool).await?;

    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM product");
    query.filter.push_where(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    Ok((products, total))
}

/// Create a new product. The slug is derived from the name; a colliding
/// slug surfaces as `Duplicate`.
pub async fn create(pool: &SqlitePool, data: ProductInput) -> RepoResult<Product> {
    validate(&data)?;
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO product (id, name, slug, image, brand, category, description, price, count_in_stock, rating, num_reviews, featured, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(to_slug(&data.name))
    .bind(&data.image)
    .bind(&data.brand)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.count_in_stock)
    .bind(data.rating)
    .bind(data.num_reviews)
    .bind(data.featured)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Replace a product's full mutable field set; partial updates are not
/// supported. The slug is recomputed from the new name.
pub async fn update(pool: &SqlitePool, id: i64, data: ProductInput) -> RepoResult<Product> {
    validate(&data)?;
    let rows = sqlx::query(
        "UPDATE product SET name = ?, slug = ?, image = ?, brand = ?, category = ?, description = ?, price = ?, count_in_stock = ?, rating = ?, num_reviews = ?, featured = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(to_slug(&data.name))
    .bind(&data.image)
    .bind(&data.brand)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.count_in_stock)
    .bind(data.rating)
    .bind(data.num_reviews)
    .bind(data.featured)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete a product. Best-effort idempotent: deleting a missing id
/// returns `false` rather than erroring.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PageParams, ProductFilter, ProductSort, SearchParams};
    use crate::db::testing::{product_input, test_pool};

    fn query_with(filter: ProductFilter, sort: ProductSort, page: PageParams) -> CatalogQuery {
        CatalogQuery { filter, sort, page }
    }

    fn default_page() -> PageParams {
        PageParams::new(None, Some(10)).unwrap()
    }

    async fn seed_four_prices(pool: &sqlx::SqlitePool) -> Vec<Product> {
        let mut created = Vec::new();
        for (name, price) in [
            ("Alpha Shirt", 120.0),
            ("Beta Shirt", 100.0),
            ("Gamma Pants", 80.0),
            ("Delta Pants", 40.0),
        ] {
            created.push(create(pool, product_input(name, "Apparel", price, 5)).await.unwrap());
        }
        created
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let pool = test_pool().await;
        let p = create(&pool, product_input("Nike Slim Shirt", "Shirts", 120.0, 10))
            .await
            .unwrap();
        assert_eq!(p.slug, "nike-slim-shirt");
        assert_eq!(p.category, "Shirts");
        assert_eq!(p.count_in_stock, 10);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let pool = test_pool().await;
        create(&pool, product_input("Same Name", "A", 10.0, 1)).await.unwrap();
        let err = create(&pool, product_input("Same  Name", "B", 20.0, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let pool = test_pool().await;
        let err = create(&pool, product_input("Bad", "A", -1.0, 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let pool = test_pool().await;
        let p = create(&pool, product_input("Puma Shoes", "Shoes", 65.0, 3)).await.unwrap();
        let found = find_by_slug(&pool, "puma-shoes").await.unwrap().unwrap();
        assert_eq!(found.id, p.id);
        assert!(find_by_slug(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_recomputes_slug() {
        let pool = test_pool().await;
        let p = create(&pool, product_input("Old Name", "A", 10.0, 1)).await.unwrap();
        let mut input = product_input("New Name", "B", 12.5, 7);
        input.rating = 4.5;
        let updated = update(&pool, p.id, input).await.unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.slug, "new-name");
        assert_eq!(updated.category, "B");
        assert_eq!(updated.price, 12.5);
        assert_eq!(updated.rating, 4.5);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let err = update(&pool, 999, product_input("X", "A", 1.0, 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_best_effort_idempotent() {
        let pool = test_pool().await;
        let p = create(&pool, product_input("Doomed", "A", 1.0, 1)).await.unwrap();
        assert!(delete(&pool, p.id).await.unwrap());
        assert!(!delete(&pool, p.id).await.unwrap());
        assert!(find_by_id(&pool, p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_distinct_categories() {
        let pool = test_pool().await;
        create(&pool, product_input("A", "Shirts", 1.0, 1)).await.unwrap();
        create(&pool, product_input("B", "Pants", 1.0, 1)).await.unwrap();
        create(&pool, product_input("C", "Shirts", 1.0, 1)).await.unwrap();
        let cats = distinct_categories(&pool).await.unwrap();
        assert_eq!(cats, vec!["Pants".to_string(), "Shirts".to_string()]);
        assert_eq!(count_categories(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_price_range_inclusive() {
        // Prices {120, 100, 80, 40} filtered by 50-150 → exactly three matches
        let pool = test_pool().await;
        seed_four_prices(&pool).await;

        let filter = ProductFilter {
            price_range: Some((50.0, 150.0)),
            ..Default::default()
        };
        let (products, total) = search(
            &pool,
            &query_with(filter, ProductSort::LowestPrice, default_page()),
        )
        .await
        .unwrap();

        assert_eq!(total, 3);
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![80.0, 100.0, 120.0]);
    }

    #[tokio::test]
    async fn test_search_count_ignores_pagination() {
        let pool = test_pool().await;
        seed_four_prices(&pool).await;

        let page = PageParams::new(Some(1), Some(3)).unwrap();
        let (products, total) = search(
            &pool,
            &query_with(ProductFilter::default(), ProductSort::Default, page),
        )
        .await
        .unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(total, 4);
        assert_eq!(page.total_pages(total), 2);

        let page2 = PageParams::new(Some(2), Some(3)).unwrap();
        let (rest, total2) = search(
            &pool,
            &query_with(ProductFilter::default(), ProductSort::Default, page2),
        )
        .await
        .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(total2, 4);
    }

    #[tokio::test]
    async fn test_search_lowest_and_highest_are_reverses() {
        let pool = test_pool().await;
        seed_four_prices(&pool).await;

        let (asc, _) = search(
            &pool,
            &query_with(ProductFilter::default(), ProductSort::LowestPrice, default_page()),
        )
        .await
        .unwrap();
        let (desc, _) = search(
            &pool,
            &query_with(ProductFilter::default(), ProductSort::HighestPrice, default_page()),
        )
        .await
        .unwrap();

        let asc_ids: Vec<i64> = asc.iter().map(|p| p.id).collect();
        let mut desc_ids: Vec<i64> = desc.iter().map(|p| p.id).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
    }

    #[tokio::test]
    async fn test_search_name_is_case_insensitive_substring() {
        let pool = test_pool().await;
        seed_four_prices(&pool).await;

        let filter = ProductFilter {
            name_contains: Some("SHIRT".to_string()),
            ..Default::default()
        };
        let (products, total) = search(
            &pool,
            &query_with(filter, ProductSort::Default, default_page()),
        )
        .await
        .unwrap();
        assert_eq!(total, 2);
        assert!(products.iter().all(|p| p.name.contains("Shirt")));
    }

    #[tokio::test]
    async fn test_search_filters_combine_with_and() {
        let pool = test_pool().await;
        seed_four_prices(&pool).await;
        create(&pool, product_input("Shirt Other", "Outlet", 90.0, 1)).await.unwrap();

        let filter = ProductFilter {
            name_contains: Some("shirt".to_string()),
            category: Some("Apparel".to_string()),
            price_range: Some((110.0, 130.0)),
            ..Default::default()
        };
        let (products, total) = search(
            &pool,
            &query_with(filter, ProductSort::Default, default_page()),
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(products[0].name, "Alpha Shirt");
    }

    #[tokio::test]
    async fn test_search_min_rating() {
        let pool = test_pool().await;
        for (name, rating) in [("Low", 2.0), ("Mid", 4.0), ("High", 4.5)] {
            let mut input = product_input(name, "A", 10.0, 1);
            input.rating = rating;
            create(&pool, input).await.unwrap();
        }
        let filter = ProductFilter {
            min_rating: Some(4.0),
            ..Default::default()
        };
        let (products, total) = search(
            &pool,
            &query_with(filter, ProductSort::TopRated, default_page()),
        )
        .await
        .unwrap();
        assert_eq!(total, 2);
        assert_eq!(products[0].name, "High");
    }

    #[tokio::test]
    async fn test_search_featured_weight_descending() {
        let pool = test_pool().await;
        for (name, featured) in [("Plain", 0), ("Promoted", 10), ("Pinned", 5)] {
            let mut input = product_input(name, "A", 10.0, 1);
            input.featured = featured;
            create(&pool, input).await.unwrap();
        }
        let (products, _) = search(
            &pool,
            &query_with(ProductFilter::default(), ProductSort::Featured, default_page()),
        )
        .await
        .unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Promoted", "Pinned", "Plain"]);
    }

    #[tokio::test]
    async fn test_search_parsed_from_wire_params() {
        // End to end through the boundary parse: the legacy dialect drives
        // the same typed query.
        let pool = test_pool().await;
        seed_four_prices(&pool).await;

        let params = SearchParams {
            query: Some("all".to_string()),
            category: Some("Apparel".to_string()),
            price: Some("50-150".to_string()),
            rating: Some("all".to_string()),
            order: Some("lowest".to_string()),
            page: Some(1),
            page_size: Some(2),
        };
        let q = params.into_query().unwrap();
        let (products, total) = search(&pool, &q).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, 80.0);
        assert_eq!(q.page.total_pages(total), 2);
    }
}
