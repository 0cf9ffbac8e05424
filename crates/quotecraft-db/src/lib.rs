//! # quotecraft-db: Storage for QuoteCraft
//!
//! SQLite storage for the two collaborators the quote engine talks to: the
//! product catalog it reads from and the export history it appends to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteCraft Data Flow                             │
//! │                                                                         │
//! │  quote-desk command (list_products / export_quote)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 quotecraft-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo   │    │ 001_catalog  │  │   │
//! │  │   │ SqlitePool    │◄───│ ExportRepo    │    │ 002_export_  │  │   │
//! │  │   │               │    │               │    │   history    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, or QUOTECRAFT_DB_PATH)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quotecraft_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("quotecraft.db")).await?;
//!
//! let products = db.catalog().list_products().await?;
//! let record = db.exports().save(&draft).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::{CatalogRepository, NewExtraOption, NewProduct};
pub use repository::export::ExportRepository;
