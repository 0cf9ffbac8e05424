//! # Database State
//!
//! The `Database` from `quotecraft-db` wraps a `SqlitePool`, so commands can
//! query concurrently without extra locking.

use quotecraft_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = db_state.inner().catalog().list_products().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
