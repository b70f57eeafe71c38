use gloo::events::EventListener;
use wasm_bindgen::JsValue;
use web_sys::{History, Window};

use viewmark_core::FragmentLocation;

use crate::js::BindError;

/// The page URL's fragment. Writes go through `history.replaceState`, which
/// neither adds a history entry nor fires `hashchange`.
#[derive(Clone)]
pub struct BrowserLocation {
    window: Window,
    history: History,
}

impl BrowserLocation {
    pub fn new() -> Result<Self, BindError> {
        let window = web_sys::window().ok_or(BindError::MissingWindow)?;
        let history = window.history().map_err(|_| BindError::MissingHistory)?;
        Ok(Self { window, history })
    }

    /// Calls `on_change` for fragment changes the page did not make itself.
    /// The listener is removed when the returned value is dropped.
    pub fn listen<F>(&self, mut on_change: F) -> EventListener
    where
        F: FnMut() + 'static,
    {
        EventListener::new(&self.window, "hashchange", move |_event| on_change())
    }
}

impl FragmentLocation for BrowserLocation {
    fn fragment(&self) -> String {
        let hash = self.window.location().hash().unwrap_or_default();
        match hash.strip_prefix('#') {
            Some(rest) => rest.to_string(),
            None => hash,
        }
    }

    fn replace_fragment(&self, fragment: &str) {
        let url = format!("#{fragment}");
        if self
            .history
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
            .is_err()
        {
            gloo::console::warn!("failed to replace url fragment", url);
        }
    }
}
