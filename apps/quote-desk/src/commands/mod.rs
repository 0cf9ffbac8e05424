//! # Commands Module
//!
//! Every command the quote desk understands, and the envelope around them.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (envelope & dispatch)
//! ├── catalog.rs  ◄─── list_products, list_categories
//! ├── quote.rs    ◄─── price_line, add_line, remove_line, move_line_up,
//! │                    move_line_down, add_feature, remove_feature,
//! │                    set_company_name, clear_quote, get_quote
//! ├── export.rs   ◄─── export_quote, list_exports
//! └── config.rs   ◄─── get_config
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"id":7,"command":"add_feature","args":{"lineIndex":0,...}}           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  handle_line() ── parse Request ── dispatch(command, args)             │
//! │         │                               │                               │
//! │         │                 parse_args::<AddFeatureArgs>(args)            │
//! │         │                               │                               │
//! │         │                 quote::add_feature(&app.quote, ...)           │
//! │         ▼                               │                               │
//! │  Response { id: 7, ok, data | error } ◄─┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command function takes only the state it needs, so it can be called
//! directly from tests.

pub mod catalog;
pub mod config;
pub mod export;
pub mod quote;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use quotecraft_core::history::ExportPeriod;

use crate::error::{ApiError, ErrorCode};
use crate::App;

/// One request line.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Echoed back on the response for correlation.
    #[serde(default)]
    pub id: Option<Value>,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// One response line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn from_result(id: Option<Value>, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Response {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

/// Parses and runs one request line.
pub async fn handle_line(app: &App, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed request");
            return Response::from_result(
                None,
                Err(ApiError::invalid_request(format!("Malformed request: {}", e))),
            );
        }
    };

    let result = dispatch(app, &request.command, request.args).await;
    if let Err(e) = &result {
        debug!(command = %request.command, code = ?e.code, "Command failed");
    }
    Response::from_result(request.id, result)
}

/// Runs a named command with JSON arguments.
pub async fn dispatch(app: &App, command: &str, args: Value) -> Result<Value, ApiError> {
    debug!(command, "dispatch");

    match command {
        // Catalog
        "list_products" => to_data(catalog::list_products(&app.db, parse_args(args)?).await?),
        "list_categories" => to_data(catalog::list_categories(&app.db).await?),

        // Quote
        "price_line" => to_data(quote::price_line(&app.db, parse_args(args)?).await?),
        "add_line" => to_data(quote::add_line(&app.db, &app.quote, &app.config, parse_args(args)?).await?),
        "remove_line" => to_data(quote::remove_line(&app.quote, &app.config, parse_args(args)?)?),
        "move_line_up" => to_data(quote::move_line_up(&app.quote, &app.config, parse_args(args)?)),
        "move_line_down" => {
            to_data(quote::move_line_down(&app.quote, &app.config, parse_args(args)?))
        }
        "add_feature" => to_data(quote::add_feature(&app.quote, &app.config, parse_args(args)?)?),
        "remove_feature" => {
            to_data(quote::remove_feature(&app.quote, &app.config, parse_args(args)?)?)
        }
        "set_company_name" => {
            to_data(quote::set_company_name(&app.quote, &app.config, parse_args(args)?))
        }
        "clear_quote" => to_data(quote::clear_quote(&app.quote, &app.config)),
        "get_quote" => to_data(quote::get_quote(&app.quote, &app.config)),

        // Export
        "export_quote" => to_data(export::export_quote(&app.db, &app.quote, &app.config).await?),
        "list_exports" => {
            // {"period":"week"}; no arguments lists everything
            let period = if args.is_null() {
                ExportPeriod::default()
            } else {
                parse_args(args)?
            };
            to_data(export::list_exports(&app.db, &app.quote, period).await?)
        }

        // Config
        "get_config" => to_data(config::get_config(&app.config)),

        other => Err(ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command: {}", other),
        )),
    }
}

/// Deserializes command arguments; missing arguments read as `{}`.
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ApiError> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| ApiError::invalid_request(format!("Invalid arguments: {}", e)))
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use quotecraft_core::{ExtraOptionId, Money, Product};
    use quotecraft_db::{Database, DbConfig, NewExtraOption, NewProduct};

    use crate::state::ConfigState;
    use crate::App;

    /// An app over an in-memory catalog of three products.
    pub(crate) struct Seeded {
        pub app: App,
        /// 50.00/m², extras: tinted glass (10.00/m², line area) and
        /// mosquito net (10.00/m², own dimensions)
        pub window: Product,
        pub tinted: ExtraOptionId,
        pub net: ExtraOptionId,
        /// 100.00 flat
        pub blind: Product,
        /// 20.00 flat, not exportable
        pub install: Product,
    }

    pub(crate) async fn seeded_app() -> Seeded {
        seeded_app_as(false).await
    }

    pub(crate) async fn seeded_app_as(is_admin: bool) -> Seeded {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let windows = catalog.insert_category("Windows").await.unwrap();
        let blinds = catalog.insert_category("Blinds").await.unwrap();
        let services = catalog.insert_category("Services").await.unwrap();

        let window = catalog
            .insert_product(&product("Casement Window", windows.id, 5_000, true, true, vec![
                extra("Tinted glass", 1_000, true),
                extra("Mosquito net", 1_000, false),
            ]))
            .await
            .unwrap();
        let blind = catalog
            .insert_product(&product("Roller Blind", blinds.id, 10_000, false, true, vec![]))
            .await
            .unwrap();
        let install = catalog
            .insert_product(&product("Installation", services.id, 2_000, false, false, vec![]))
            .await
            .unwrap();

        let config = ConfigState {
            is_admin,
            ..ConfigState::default()
        };

        Seeded {
            app: App::new(db, config),
            tinted: window.extras[0].id,
            net: window.extras[1].id,
            window,
            blind,
            install,
        }
    }

    fn product(
        name: &str,
        category_id: i64,
        cents: i64,
        per_square_meter: bool,
        can_export: bool,
        extras: Vec<NewExtraOption>,
    ) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "Made to measure".to_string(),
            pros: None,
            cons: None,
            category_id,
            base_price: Money::from_cents(cents),
            price_per_square_meter: per_square_meter,
            can_export,
            extras,
            images: vec![],
        }
    }

    fn extra(name: &str, cents: i64, use_product_dimensions: bool) -> NewExtraOption {
        NewExtraOption {
            name: name.to_string(),
            price: Money::from_cents(cents),
            price_per_square_meter: true,
            use_product_dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_app;

    #[tokio::test]
    async fn test_handle_line_round_trip() {
        let seeded = seeded_app().await;
        let line = format!(
            r#"{{"id":1,"command":"price_line","args":{{"productId":{},"width":200,"height":100}}}}"#,
            seeded.window.id
        );

        let response = handle_line(&seeded.app, &line).await;
        assert!(response.ok);
        assert_eq!(response.id, Some(Value::from(1)));
        let data = response.data.unwrap();
        assert_eq!(data["price"], 10_000);
        assert_eq!(data["squareMeters"], 2.0);
    }

    #[tokio::test]
    async fn test_handle_line_errors() {
        let seeded = seeded_app().await;

        let response = handle_line(&seeded.app, "{not json").await;
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);

        let response = handle_line(&seeded.app, r#"{"command":"fly"}"#).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::UnknownCommand);

        let response = handle_line(&seeded.app, r#"{"command":"remove_line","args":{"index":"x"}}"#).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);

        let response = handle_line(&seeded.app, r#"{"command":"remove_line","args":{"index":0}}"#).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_argument_defaults() {
        let seeded = seeded_app().await;

        let products = dispatch(&seeded.app, "list_products", Value::Null).await.unwrap();
        assert_eq!(products.as_array().map(|a| a.len()), Some(3));

        let exports = dispatch(&seeded.app, "list_exports", Value::Null).await.unwrap();
        assert_eq!(exports["exports"], serde_json::json!([]));

        let exports = dispatch(&seeded.app, "list_exports", serde_json::json!({"period": "today"}))
            .await
            .unwrap();
        assert_eq!(exports["allUsers"], false);
    }
}
