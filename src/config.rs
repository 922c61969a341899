//! Frontend Configuration
//!
//! Read once at startup from an optional `window.__CRM_CONFIG__` object.
//! Every field falls back to a default, so an empty or missing object
//! gives a working same-origin setup.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Global the host page may define before the bundle loads
pub const CONFIG_GLOBAL: &str = "__CRM_CONFIG__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Base URL of the CRM API, without trailing slash
    pub api_base_url: String,
    /// Where to send the browser when the session expires
    pub login_url: String,
    /// Detail page URL; `{id}` is replaced by the opportunity id
    pub opportunity_url_template: String,
    /// How long notifications stay visible
    pub notice_timeout_ms: u32,
    /// Bearer token for API calls
    pub auth_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            login_url: "/login".to_string(),
            opportunity_url_template: "/opportunities/{id}".to_string(),
            notice_timeout_ms: 5000,
            auth_token: None,
        }
    }
}

impl AppConfig {
    /// Load from the page global, falling back to defaults
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).unwrap_or(JsValue::UNDEFINED);
        if value.is_undefined() || value.is_null() {
            tracing::debug!("[CONFIG] {} not set, using defaults", CONFIG_GLOBAL);
            return Self::default();
        }
        match serde_wasm_bindgen::from_value::<AppConfig>(value) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!("[CONFIG] Ignoring invalid {}: {}", CONFIG_GLOBAL, e);
                Self::default()
            }
        }
    }

    /// Strip trailing slashes and drop blank tokens
    pub fn normalized(mut self) -> Self {
        let trimmed = self.api_base_url.trim_end_matches('/').len();
        self.api_base_url.truncate(trimmed);
        if self.auth_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.auth_token = None;
        }
        self
    }

    pub fn opportunity_url(&self, opportunity_id: u32) -> String {
        self.opportunity_url_template.replace("{id}", &opportunity_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"apiBaseUrl": "https://crm.example.com/api/"}"#).unwrap();
        let config = config.normalized();
        assert_eq!(config.api_base_url, "https://crm.example.com/api");
        assert_eq!(config.login_url, "/login");
        assert_eq!(config.notice_timeout_ms, 5000);
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let config = AppConfig {
            auth_token: Some("  ".to_string()),
            ..AppConfig::default()
        }
        .normalized();
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn test_opportunity_url() {
        let config = AppConfig::default();
        assert_eq!(config.opportunity_url(42), "/opportunities/42");
    }
}
