//! Catalog browsing filters.

use crate::types::{CategoryId, Product};

/// Filters products by category and a free-text query.
///
/// ## Rules
/// - `category_id` of `None` or ≤ 0 means every category
/// - The query matches case-insensitively against the name, description and
///   category name; a blank query matches everything
pub fn filter_products<'a>(
    products: &'a [Product],
    category_id: Option<CategoryId>,
    query: &str,
) -> Vec<&'a Product> {
    let category = category_id.filter(|id| *id > 0);
    let needle = query.trim().to_lowercase();

    products
        .iter()
        .filter(|p| category.map_or(true, |id| p.category_id == id))
        .filter(|p| needle.is_empty() || matches_query(p, &needle))
        .collect()
}

fn matches_query(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product
            .category_name
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: i64, name: &str, category_id: i64, category: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: format!("{} made to measure", name),
            pros: None,
            cons: None,
            category_id,
            category_name: Some(category.to_string()),
            base_price: Money::from_cents(1_000),
            price_per_square_meter: false,
            can_export: true,
            extras: vec![],
            images: vec![],
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Roller Blind", 1, "Blinds"),
            product(2, "Venetian Blind", 1, "Blinds"),
            product(3, "Awning", 2, "Outdoor"),
        ]
    }

    fn ids(products: Vec<&Product>) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_no_filters() {
        let products = catalog();
        assert_eq!(ids(filter_products(&products, None, "")), vec![1, 2, 3]);
        assert_eq!(ids(filter_products(&products, Some(0), "  ")), vec![1, 2, 3]);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        assert_eq!(ids(filter_products(&products, Some(2), "")), vec![3]);
        assert!(filter_products(&products, Some(9), "").is_empty());
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let products = catalog();
        assert_eq!(ids(filter_products(&products, None, "ROLLER")), vec![1]);
        assert_eq!(ids(filter_products(&products, None, "outdoor")), vec![3]);
        assert_eq!(ids(filter_products(&products, Some(1), "blind")), vec![1, 2]);
    }
}
