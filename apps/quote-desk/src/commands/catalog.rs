//! # Catalog Commands
//!
//! Browsing the product catalog before a line is priced.
//!
//! ```text
//! {"command":"list_products","args":{"categoryId":2,"query":"blind"}}
//!       │
//!       ▼
//! validate_search_query ──► catalog().list_products() ──► filter_products
//! ```
//!
//! The catalog is small enough to filter in memory after one hydrated load.

use serde::Deserialize;
use tracing::debug;

use quotecraft_core::catalog::filter_products;
use quotecraft_core::validation::validate_search_query;
use quotecraft_core::{Category, CategoryId, Product};

use crate::error::ApiError;
use crate::state::DbState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListProductsArgs {
    /// `None` or ≤ 0 lists every category.
    pub category_id: Option<CategoryId>,
    pub query: String,
}

/// Lists products, optionally narrowed by category and a search query.
pub async fn list_products(
    db: &DbState,
    args: ListProductsArgs,
) -> Result<Vec<Product>, ApiError> {
    let query = validate_search_query(&args.query).map_err(|e| ApiError::validation(e.to_string()))?;
    debug!(category_id = ?args.category_id, query = %query, "list_products command");

    let products = db.inner().catalog().list_products().await?;
    let matches: Vec<Product> = filter_products(&products, args.category_id, &query)
        .into_iter()
        .cloned()
        .collect();

    debug!(total = products.len(), matched = matches.len(), "Products filtered");
    Ok(matches)
}

/// Lists all categories.
pub async fn list_categories(db: &DbState) -> Result<Vec<Category>, ApiError> {
    debug!("list_categories command");
    Ok(db.inner().catalog().list_categories().await?)
}

/// Loads one product for pricing.
pub(crate) async fn load_product(db: &DbState, id: i64) -> Result<Product, ApiError> {
    db.inner()
        .catalog()
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_app;

    #[tokio::test]
    async fn test_list_products_filters() {
        let seeded = seeded_app().await;
        let app = &seeded.app;

        let all = list_products(&app.db, ListProductsArgs::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let blinds = list_products(
            &app.db,
            ListProductsArgs {
                category_id: None,
                query: "  BLIND ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(blinds.len(), 1);
        assert_eq!(blinds[0].name, "Roller Blind");

        let windows = list_products(
            &app.db,
            ListProductsArgs {
                category_id: Some(blinds[0].category_id + 100),
                query: String::new(),
            },
        )
        .await
        .unwrap();
        assert!(windows.is_empty());
    }

    #[tokio::test]
    async fn test_list_products_rejects_long_query() {
        let seeded = seeded_app().await;
        let app = &seeded.app;
        let err = list_products(
            &app.db,
            ListProductsArgs {
                category_id: None,
                query: "x".repeat(101),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_list_categories_and_missing_product() {
        let seeded = seeded_app().await;
        let app = &seeded.app;
        let names: Vec<String> = list_categories(&app.db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Blinds", "Services", "Windows"]);

        let err = load_product(&app.db, 999).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
