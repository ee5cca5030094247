/// Runtime settings handed over by the page that loads the bundle
use log::{warn, Level};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_BASE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub api_base: String,
    /// Element to mount the app into; `None` mounts on `<body>`.
    pub mount_id: Option<String>,
    pub story_container_id: String,
    pub scroll_offset_px: f64,
    pub swap_event: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            mount_id: None,
            story_container_id: "story-shell".to_string(),
            scroll_offset_px: 80.0,
            swap_event: "htmx:afterSwap".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the config object passed from JavaScript. `undefined`/`null`
    /// and malformed objects yield the defaults.
    pub fn from_js(value: wasm_bindgen::JsValue) -> AppConfig {
        if value.is_undefined() || value.is_null() {
            return AppConfig::default();
        }
        serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring invalid app config: {}", e);
            AppConfig::default()
        })
    }

    pub fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "warn" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }
}
