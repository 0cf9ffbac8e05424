//! # Quote Desk Library
//!
//! Wires the quote engine and its storage to a line-oriented JSON command
//! protocol on stdin/stdout.
//!
//! ## Module Organization
//! ```text
//! quotecraft_desk/
//! ├── lib.rs          ◄─── You are here (startup & serve loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── quote.rs    ◄─── The session's quote
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Request envelope & dispatch
//! │   ├── catalog.rs  ◄─── Product/category browsing
//! │   ├── quote.rs    ◄─── Line pricing and quote editing
//! │   ├── export.rs   ◄─── Export and export history
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Protocol
//! ```text
//! → {"id":1,"command":"price_line","args":{"productId":3,"width":200,"height":100}}
//! ← {"id":1,"ok":true,"data":{"price":10000,"squareMeters":2.0,...}}
//! → {"id":2,"command":"remove_line","args":{"index":9}}
//! ← {"id":2,"ok":false,"error":{"code":"NOT_FOUND","message":"..."}}
//! ```
//! Logs go to stderr so stdout carries only responses.

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use quotecraft_db::{Database, DbConfig};
use state::{ConfigState, DbState, QuoteState};

/// Everything a command may need, created once at startup.
#[derive(Debug)]
pub struct App {
    pub db: DbState,
    pub quote: QuoteState,
    pub config: ConfigState,
}

impl App {
    /// Builds the session state; the quote starts empty and belongs to the
    /// configured actor.
    pub fn new(db: Database, config: ConfigState) -> Self {
        App {
            db: DbState::new(db),
            quote: QuoteState::new(config.actor()),
            config,
        }
    }
}

/// Runs the quote desk until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG overrides the default filter) │
/// │  2. Load ConfigState from QUOTECRAFT_* variables                       │
/// │  3. Determine Database Path (override, else platform data dir)         │
/// │  4. Connect to Database (WAL, pending migrations)                      │
/// │  5. Serve commands from stdin, one JSON object per line                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting QuoteCraft quote desk");

    let config = ConfigState::load()?;
    let db_path = get_database_path(&config)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let app = App::new(db, config);
    info!(user = %app.quote.actor().username, "State initialized");

    serve(&app, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    app.db.inner().close().await;
    info!("Input closed, shutting down");
    Ok(())
}

/// Reads requests line by line and writes one response line for each.
///
/// Blank lines are skipped. Malformed requests get an error response; only
/// I/O failures end the loop.
pub async fn serve<R, W>(app: &App, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = commands::handle_line(app, line).await;
        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');

        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }

    debug!("End of input");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quotecraft=trace` - Show trace for quotecraft crates only
/// - Default: `info,quotecraft=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quotecraft=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.quotecraft.quote-desk/quotecraft.db`
/// - **Windows**: `%APPDATA%\quotecraft\quote-desk\data\quotecraft.db`
/// - **Linux**: `~/.local/share/quote-desk/quotecraft.db`
///
/// `QUOTECRAFT_DB_PATH` overrides the platform path.
fn get_database_path(config: &ConfigState) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "quotecraft", "quote-desk")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("quotecraft.db"))
}
