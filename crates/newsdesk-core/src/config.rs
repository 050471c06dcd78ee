use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{NewsdeskError, Result};
use crate::i18n::Language;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_THEME: &str = "federacion_poker";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration stored in `config.toml`.
///
/// Every field has a default so a partial or missing file still yields a
/// usable configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the remote API, including the version prefix.
    pub api_base_url: String,
    pub language: Language,
    /// Visual theme requested when rendering previews.
    pub theme: String,
    /// Per-request timeout applied by the HTTP transport.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            language: Language::default(),
            theme: DEFAULT_THEME.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Keys accepted by [`Self::set_value`].
    pub const KEYS: [&'static str; 4] = [
        "api_base_url",
        "language",
        "theme",
        "request_timeout_secs",
    ];

    /// Sets a field from its textual form.
    ///
    /// # Errors
    ///
    /// Returns a config error for an unknown key or an unparsable value.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_base_url" => {
                if value.is_empty() {
                    return Err(NewsdeskError::config("api_base_url must not be empty"));
                }
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "language" => {
                self.language = Language::from_str(value).map_err(|_| {
                    NewsdeskError::config(format!("Unsupported language '{value}' (use pt or es)"))
                })?;
            }
            "theme" => self.theme = value.to_string(),
            "request_timeout_secs" => {
                self.request_timeout_secs = value.parse().map_err(|_| {
                    NewsdeskError::config(format!("Invalid timeout '{value}'"))
                })?;
            }
            other => {
                return Err(NewsdeskError::config(format!(
                    "Unknown key '{other}' (expected one of: {})",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}
