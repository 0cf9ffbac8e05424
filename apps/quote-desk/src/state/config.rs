//! # Configuration State
//!
//! Stores configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`QUOTECRAFT_*`)
//! 2. Defaults (this file)
//!
//! | Variable                      | Field               | Default     |
//! |-------------------------------|---------------------|-------------|
//! | `QUOTECRAFT_DB_PATH`          | `database_path`     | platform    |
//! | `QUOTECRAFT_CURRENCY_CODE`    | `currency_code`     | `EUR`       |
//! | `QUOTECRAFT_CURRENCY_SYMBOL`  | `currency_symbol`   | `€`         |
//! | `QUOTECRAFT_CURRENCY_DECIMALS`| `currency_decimals` | `2`         |
//! | `QUOTECRAFT_THOUSANDS_SEP`    | `thousands_separator` | `,`       |
//! | `QUOTECRAFT_USER_ID`          | `user_id`           | `1`         |
//! | `QUOTECRAFT_USERNAME`         | `username`          | `local`     |
//! | `QUOTECRAFT_ADMIN`            | `is_admin`          | `false`     |
//!
//! Read-only after initialization, so no mutex.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quotecraft_core::{Actor, Money, UserId};

/// Errors from reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is set but cannot be parsed.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Database file override. `None` uses the platform data directory.
    #[serde(skip)]
    pub database_path: Option<PathBuf>,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places shown for amounts (0 to 2)
    pub currency_decimals: u8,

    /// Digit group separator, e.g. `,` in `€1,234.56`. Empty disables grouping.
    pub thousands_separator: String,

    /// Acting user, as supplied by the identity collaborator
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            currency_code: "EUR".to_string(),
            currency_symbol: "€".to_string(),
            currency_decimals: 2,
            thousands_separator: ",".to_string(),
            user_id: 1,
            username: "local".to_string(),
            is_admin: false,
        }
    }
}

impl ConfigState {
    /// Loads configuration from `QUOTECRAFT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup, over the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("QUOTECRAFT_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(code) = lookup("QUOTECRAFT_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("QUOTECRAFT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("QUOTECRAFT_CURRENCY_DECIMALS") {
            let decimals: u8 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("QUOTECRAFT_CURRENCY_DECIMALS", &raw, "not a number"))?;
            if decimals > 2 {
                return Err(ConfigError::invalid(
                    "QUOTECRAFT_CURRENCY_DECIMALS",
                    &raw,
                    "at most 2",
                ));
            }
            config.currency_decimals = decimals;
        }

        if let Some(separator) = lookup("QUOTECRAFT_THOUSANDS_SEP") {
            config.thousands_separator = separator;
        }

        if let Some(raw) = lookup("QUOTECRAFT_USER_ID") {
            config.user_id = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("QUOTECRAFT_USER_ID", &raw, "not an integer"))?;
        }

        if let Some(username) = lookup("QUOTECRAFT_USERNAME") {
            let username = username.trim();
            if username.is_empty() {
                return Err(ConfigError::invalid("QUOTECRAFT_USERNAME", username, "empty"));
            }
            config.username = username.to_string();
        }

        if let Some(raw) = lookup("QUOTECRAFT_ADMIN") {
            config.is_admin = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => return Err(ConfigError::invalid("QUOTECRAFT_ADMIN", &raw, "not a boolean")),
            };
        }

        Ok(config)
    }

    /// The acting user for this session.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.user_id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }

    /// Formats an amount with the configured symbol and digit grouping.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123_456)), "€1,234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        // Amounts are held in cents; fewer display decimals round half away from zero.
        let scale = 10_u64.pow(2 - self.currency_decimals.min(2) as u32);
        let units = (cents.unsigned_abs() + scale / 2) / scale;
        let divisor = 10_u64.pow(self.currency_decimals.min(2) as u32);

        let mut formatted = format!(
            "{}{}{}",
            if cents < 0 && units > 0 { "-" } else { "" },
            self.currency_symbol,
            group_digits(units / divisor, &self.thousands_separator)
        );
        if self.currency_decimals > 0 {
            formatted.push_str(&format!(
                ".{:0width$}",
                units % divisor,
                width = self.currency_decimals as usize
            ));
        }
        formatted
    }
}

fn group_digits(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    if separator.is_empty() {
        return digits;
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ConfigState, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigState::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "€12.34");
        assert_eq!(config.format_currency(Money::from_cents(1)), "€0.01");
        assert_eq!(config.format_currency(Money::zero()), "€0.00");
        assert_eq!(config.format_currency(Money::from_cents(123_456_789)), "€1,234,567.89");
        assert_eq!(config.format_currency(Money::from_cents(-123_456)), "-€1,234.56");
    }

    #[test]
    fn test_format_currency_without_grouping() {
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            thousands_separator: String::new(),
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(Money::from_cents(123_456)), "$1234.56");
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(load(&[]).unwrap(), ConfigState::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = load(&[
            ("QUOTECRAFT_DB_PATH", "/tmp/q.db"),
            ("QUOTECRAFT_CURRENCY_SYMBOL", "kr "),
            ("QUOTECRAFT_CURRENCY_DECIMALS", "0"),
            ("QUOTECRAFT_THOUSANDS_SEP", " "),
            ("QUOTECRAFT_USER_ID", "7"),
            ("QUOTECRAFT_USERNAME", " maria "),
            ("QUOTECRAFT_ADMIN", "yes"),
        ])
        .unwrap();

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/q.db")));
        assert_eq!(config.format_currency(Money::from_cents(1_234_500)), "kr 12 345");
        let actor = config.actor();
        assert_eq!(actor.id, 7);
        assert_eq!(actor.username, "maria");
        assert!(actor.is_admin);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("QUOTECRAFT_USER_ID", "seven")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(load(&[("QUOTECRAFT_CURRENCY_DECIMALS", "9")]).is_err());
        assert!(load(&[("QUOTECRAFT_ADMIN", "maybe")]).is_err());
        assert!(load(&[("QUOTECRAFT_USERNAME", "  ")]).is_err());
    }
}
