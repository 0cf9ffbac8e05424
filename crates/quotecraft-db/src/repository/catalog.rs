//! # Catalog Repository
//!
//! Read access to the product catalog, plus the inserts used by seeding.
//!
//! ## Hydration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    list_products()                                      │
//! │                                                                         │
//! │  Query 1: products LEFT JOIN categories   ──► ProductRow (+ name)      │
//! │  Query 2: extra_options ORDER BY id       ──┐                          │
//! │  Query 3: product_images ORDER BY order   ──┤ grouped by product_id    │
//! │                                              ▼                          │
//! │                     Product { extras, images, category_name }          │
//! │                                                                         │
//! │  Three queries in total, whatever the catalog size.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The quote engine trusts whatever this returns; only inserts validate.

use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use quotecraft_core::validation::{validate_catalog_name, validate_catalog_price};
use quotecraft_core::{
    Category, CategoryId, ExtraOption, Money, Product, ProductId, ProductImage,
};

use crate::error::{DbError, DbResult};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    pros: Option<String>,
    cons: Option<String>,
    category_id: i64,
    category_name: Option<String>,
    base_price_cents: i64,
    price_per_square_meter: bool,
    can_export: bool,
}

#[derive(Debug, FromRow)]
struct ExtraRow {
    id: i64,
    product_id: i64,
    name: String,
    price_cents: i64,
    price_per_square_meter: bool,
    use_product_dimensions: bool,
}

#[derive(Debug, FromRow)]
struct ImageRow {
    id: i64,
    product_id: i64,
    image_url: String,
    display_order: i64,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<ExtraRow> for ExtraOption {
    fn from(row: ExtraRow) -> Self {
        ExtraOption {
            id: row.id,
            name: row.name,
            price: Money::from_cents(row.price_cents),
            price_per_square_meter: row.price_per_square_meter,
            use_product_dimensions: row.use_product_dimensions,
        }
    }
}

impl From<ImageRow> for ProductImage {
    fn from(row: ImageRow) -> Self {
        ProductImage {
            id: row.id,
            product_id: row.product_id,
            image_url: row.image_url,
            display_order: row.display_order,
        }
    }
}

impl ProductRow {
    fn into_product(self, extras: Vec<ExtraOption>, images: Vec<ProductImage>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            pros: self.pros,
            cons: self.cons,
            category_id: self.category_id,
            category_name: self.category_name,
            base_price: Money::from_cents(self.base_price_cents),
            price_per_square_meter: self.price_per_square_meter,
            can_export: self.can_export,
            extras,
            images,
        }
    }
}

const PRODUCT_COLUMNS: &str = r#"
    SELECT
        p.id,
        p.name,
        p.description,
        p.pros,
        p.cons,
        p.category_id,
        c.name AS category_name,
        p.base_price_cents,
        p.price_per_square_meter,
        p.can_export
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

// =============================================================================
// Inputs
// =============================================================================

/// An extra option to insert with a new product.
#[derive(Debug, Clone)]
pub struct NewExtraOption {
    pub name: String,
    pub price: Money,
    pub price_per_square_meter: bool,
    pub use_product_dimensions: bool,
}

/// A product to insert, with its extras and images.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub category_id: CategoryId,
    pub base_price: Money,
    pub price_per_square_meter: bool,
    pub can_export: bool,
    pub extras: Vec<NewExtraOption>,
    /// Image URLs, in display order.
    pub images: Vec<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.catalog();
///
/// let products = repo.list_products().await?;
/// let category = repo.get_category(2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists every product with its extras, images and category name.
    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("{} ORDER BY p.id", PRODUCT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        let mut extras = group_by_product(
            sqlx::query_as::<_, ExtraRow>(
                "SELECT id, product_id, name, price_cents, price_per_square_meter, \
                 use_product_dimensions FROM extra_options ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?,
            |row| row.product_id,
        );

        let mut images = group_by_product(
            sqlx::query_as::<_, ImageRow>(
                "SELECT id, product_id, image_url, display_order FROM product_images \
                 ORDER BY display_order, id",
            )
            .fetch_all(&self.pool)
            .await?,
            |row| row.product_id,
        );

        let products: Vec<Product> = rows
            .into_iter()
            .map(|row| {
                let product_extras = extras.remove(&row.id).unwrap_or_default();
                let product_images = images.remove(&row.id).unwrap_or_default();
                row.into_product(
                    product_extras.into_iter().map(ExtraOption::from).collect(),
                    product_images.into_iter().map(ProductImage::from).collect(),
                )
            })
            .collect();

        debug!(count = products.len(), "Loaded catalog products");
        Ok(products)
    }

    /// Gets one product, hydrated like [`CatalogRepository::list_products`].
    pub async fn get_product(&self, id: ProductId) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("{} WHERE p.id = ?1", PRODUCT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            debug!(id, "Product not found");
            return Ok(None);
        };

        let extras: Vec<ExtraRow> = sqlx::query_as(
            "SELECT id, product_id, name, price_cents, price_per_square_meter, \
             use_product_dimensions FROM extra_options WHERE product_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let images: Vec<ImageRow> = sqlx::query_as(
            "SELECT id, product_id, image_url, display_order FROM product_images \
             WHERE product_id = ?1 ORDER BY display_order, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_product(
            extras.into_iter().map(ExtraOption::from).collect(),
            images.into_iter().map(ProductImage::from).collect(),
        )))
    }

    /// Gets one product or fails with `NotFound`.
    pub async fn require_product(&self, id: ProductId) -> DbResult<Product> {
        self.get_product(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists categories by name.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Gets a category by id.
    pub async fn get_category(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    /// Inserts a category.
    ///
    /// ## Errors
    /// `UniqueViolation` when the name is taken.
    pub async fn insert_category(&self, name: &str) -> DbResult<Category> {
        validate_catalog_name("category name", name)?;
        let name = name.trim();
        debug!(name = %name, "Inserting category");

        let id = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
                other => other,
            })?
            .last_insert_rowid();

        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    /// Inserts a product with its extras and images in one transaction.
    pub async fn insert_product(&self, product: &NewProduct) -> DbResult<Product> {
        validate_catalog_name("product name", &product.name)?;
        validate_catalog_price("base price", product.base_price.cents())?;
        for extra in &product.extras {
            validate_catalog_name("extra name", &extra.name)?;
            validate_catalog_price("extra price", extra.price.cents())?;
        }

        debug!(
            name = %product.name,
            extras = product.extras.len(),
            images = product.images.len(),
            "Inserting product"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let product_id = sqlx::query(
            r#"
            INSERT INTO products (
                name, description, pros, cons, category_id,
                base_price_cents, price_per_square_meter, can_export
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(product.name.trim())
        .bind(&product.description)
        .bind(&product.pros)
        .bind(&product.cons)
        .bind(product.category_id)
        .bind(product.base_price.cents())
        .bind(product.price_per_square_meter)
        .bind(product.can_export)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for extra in &product.extras {
            sqlx::query(
                r#"
                INSERT INTO extra_options (
                    product_id, name, price_cents, price_per_square_meter, use_product_dimensions
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(product_id)
            .bind(extra.name.trim())
            .bind(extra.price.cents())
            .bind(extra.price_per_square_meter)
            .bind(extra.use_product_dimensions)
            .execute(&mut *tx)
            .await?;
        }

        for (order, url) in product.images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO product_images (product_id, image_url, display_order) VALUES (?1, ?2, ?3)",
            )
            .bind(product_id)
            .bind(url)
            .bind(order as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        self.require_product(product_id).await
    }

    /// Counts catalog products.
    pub async fn count_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn group_by_product<T>(rows: Vec<T>, key: impl Fn(&T) -> i64) -> HashMap<i64, Vec<T>> {
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn blind(category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: "Roller Blind".to_string(),
            description: "Blackout fabric".to_string(),
            pros: Some("Blocks light".to_string()),
            cons: None,
            category_id,
            base_price: Money::from_cents(4_500),
            price_per_square_meter: true,
            can_export: true,
            extras: vec![
                NewExtraOption {
                    name: "Motor".to_string(),
                    price: Money::from_cents(12_000),
                    price_per_square_meter: false,
                    use_product_dimensions: true,
                },
                NewExtraOption {
                    name: "Side channel".to_string(),
                    price: Money::from_cents(1_500),
                    price_per_square_meter: true,
                    use_product_dimensions: false,
                },
            ],
            images: vec!["/uploads/front.jpg".to_string(), "/uploads/side.jpg".to_string()],
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_product() {
        let db = db().await;
        let category = db.catalog().insert_category("Blinds").await.unwrap();

        let product = db.catalog().insert_product(&blind(category.id)).await.unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Blinds"));
        assert_eq!(product.base_price.cents(), 4_500);
        assert_eq!(product.extras.len(), 2);
        assert!(product.extras[1].needs_custom_dimensions());
        assert_eq!(product.images[0].image_url, "/uploads/front.jpg");
        assert_eq!(product.images[1].display_order, 1);

        let fetched = db.catalog().get_product(product.id).await.unwrap();
        assert_eq!(fetched, Some(product));
    }

    #[tokio::test]
    async fn test_list_products_groups_children() {
        let db = db().await;
        let blinds = db.catalog().insert_category("Blinds").await.unwrap();
        let outdoor = db.catalog().insert_category("Outdoor").await.unwrap();

        db.catalog().insert_product(&blind(blinds.id)).await.unwrap();
        let mut awning = blind(outdoor.id);
        awning.name = "Awning".to_string();
        awning.extras.truncate(1);
        awning.images.clear();
        db.catalog().insert_product(&awning).await.unwrap();

        let products = db.catalog().list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].extras.len(), 2);
        assert_eq!(products[1].extras.len(), 1);
        assert!(products[1].images.is_empty());
        assert_eq!(products[1].category_name.as_deref(), Some("Outdoor"));
        assert_eq!(db.catalog().count_products().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let db = db().await;
        assert_eq!(db.catalog().get_product(99).await.unwrap(), None);
        assert!(matches!(
            db.catalog().require_product(99).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_categories() {
        let db = db().await;
        db.catalog().insert_category("Windows").await.unwrap();
        let doors = db.catalog().insert_category("Doors").await.unwrap();

        let names: Vec<String> = db
            .catalog()
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Doors", "Windows"]);

        assert_eq!(db.catalog().get_category(doors.id).await.unwrap(), Some(doors));

        let err = db.catalog().insert_category("Doors").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_validates_input() {
        let db = db().await;
        let category = db.catalog().insert_category("Blinds").await.unwrap();

        let mut product = blind(category.id);
        product.name = "  ".to_string();
        let err = db.catalog().insert_product(&product).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.catalog().count_products().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_category_rolls_back() {
        let db = db().await;
        let err = db.catalog().insert_product(&blind(42)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.catalog().count_products().await.unwrap(), 0);
    }
}
