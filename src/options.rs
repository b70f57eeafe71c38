use serde::Deserialize;
use wasm_bindgen::JsValue;

use viewmark_core::SyncConfig;

/// Options object accepted by the JavaScript entry points:
/// `{ enabled, debounceMs, precision }`, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindOptions {
    pub enabled: Option<bool>,
    pub debounce_ms: Option<u32>,
    pub precision: Option<usize>,
}

impl BindOptions {
    /// `undefined`/`null` mean defaults; a malformed object is reported and ignored.
    pub fn from_js(value: &JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        match serde_wasm_bindgen::from_value(value.clone()) {
            Ok(options) => options,
            Err(err) => {
                gloo::console::warn!("ignoring invalid viewmark options", err.to_string());
                Self::default()
            }
        }
    }

    pub fn into_config(self) -> SyncConfig {
        let defaults = SyncConfig::default();
        SyncConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            debounce_ms: self.debounce_ms.unwrap_or(defaults.debounce_ms),
            precision: self.precision.unwrap_or(defaults.precision),
        }
    }
}
