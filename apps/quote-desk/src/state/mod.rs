//! # State Module
//!
//! Separate state types, each command takes only the ones it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │   QuoteState     │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  actor           │  │  currency        │          │
//! │  │  (SQLite     │  │  Mutex<Quote>    │  │  actor identity  │          │
//! │  │   pool)      │  │                  │  │  db path         │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • QuoteState: the session's one quote, behind a Mutex                 │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod quote;

pub use config::{ConfigError, ConfigState};
pub use db::DbState;
pub use quote::QuoteState;
