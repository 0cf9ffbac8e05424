//! # Quote Desk Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteCraft Quote Desk                            │
//! │                                                                         │
//! │  frontend / script                                                      │
//! │       │  {"command":"add_line","args":{...}}\n                          │
//! │       ▼                                                                 │
//! │  stdin ──► lib.rs serve() ──► commands::dispatch() ──► stdout          │
//! │                                    │                                    │
//! │                          state/ (DbState, QuoteState, ConfigState)      │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                   quotecraft.db (local file, WAL mode)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The setup lives in lib.rs so it can be tested.

#[tokio::main]
async fn main() {
    if let Err(e) = quotecraft_desk::run().await {
        eprintln!("quote-desk: {}", e);
        std::process::exit(1);
    }
}
