//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogRepository                  ExportRepository                    │
//! │  ├── list_products()                ├── save(draft)                     │
//! │  ├── get_product(id)                ├── list_all()                      │
//! │  ├── list_categories()              ├── list_for_user(user_id)          │
//! │  ├── insert_category(name)          ├── get(id)                         │
//! │  └── insert_product(new)            └── count()                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold a pool clone and are created per call via
//! [`crate::Database::catalog`] and [`crate::Database::exports`].

pub mod catalog;
pub mod export;
