//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::config::AppConfig;

/// Session the API client acts under
///
/// Passed explicitly to the board controller instead of living in
/// ambient global state.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub login_url: String,
}

impl SessionContext {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            auth_token: config.auth_token.clone(),
            login_url: config.login_url.clone(),
        }
    }

    /// Send the browser to the login page
    pub fn redirect_to_login(&self) {
        tracing::warn!("[SESSION] Unauthorized, redirecting to {}", self.login_url);
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(&self.login_url);
        }
    }
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the board from backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the board from backend - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(reload_trigger: (ReadSignal<u32>, WriteSignal<u32>)) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
        }
    }

    /// Trigger a reload of the board
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_config() {
        let config = AppConfig {
            api_base_url: "https://crm.example.com/api".to_string(),
            auth_token: Some("abc".to_string()),
            ..AppConfig::default()
        };
        let session = SessionContext::from_config(&config);
        assert_eq!(session.api_base_url, "https://crm.example.com/api");
        assert_eq!(session.auth_token.as_deref(), Some("abc"));
        assert_eq!(session.login_url, "/login");
    }
}
