//! Browser bindings that keep a map or deep-zoom viewer's center and zoom in
//! the URL fragment, so views can be bookmarked, shared and restored.
//!
//! JavaScript callers use [`bind_map_hash`] or [`bind_bookmark_url`]; Rust
//! callers with their own viewer can pair [`BrowserLocation`] and
//! [`TimeoutScheduler`] with [`viewmark_core::FragmentSync`].

mod binding;
mod js;
mod leaflet;
pub mod location;
pub mod options;
mod openseadragon;
pub mod timer;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use viewmark_core::{FragmentValue, ViewerControl};

use crate::binding::Binding;
use crate::leaflet::SlippyMap;
use crate::openseadragon::DeepZoomViewer;

pub use crate::js::BindError;
pub use crate::location::BrowserLocation;
pub use crate::options::BindOptions;
pub use crate::timer::TimeoutScheduler;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
}

/// Keeps a slippy map's view in `#lng=..;lat=..;zoom=..`.
#[wasm_bindgen]
pub struct MapHashBinding {
    binding: Rc<Binding<SlippyMap>>,
}

#[wasm_bindgen]
impl MapHashBinding {
    /// Writes a pending view change now. Returns whether one was pending.
    pub fn flush(&self) -> bool {
        self.binding.sync().flush()
    }

    /// Stops following the viewer and the address bar.
    pub fn detach(&self) {
        self.binding.detach();
    }

    /// The fragment the current view serializes to, without `#`.
    #[wasm_bindgen(getter)]
    pub fn fragment(&self) -> String {
        current_fragment(&self.binding)
    }
}

/// Keeps a deep-zoom viewer's view in `#x=..&y=..&zoom=..`.
#[wasm_bindgen]
pub struct BookmarkUrlBinding {
    binding: Rc<Binding<DeepZoomViewer>>,
}

#[wasm_bindgen]
impl BookmarkUrlBinding {
    pub fn flush(&self) -> bool {
        self.binding.sync().flush()
    }

    pub fn detach(&self) {
        self.binding.detach();
    }

    #[wasm_bindgen(getter)]
    pub fn fragment(&self) -> String {
        current_fragment(&self.binding)
    }
}

fn current_fragment<V: ViewerControl + 'static>(binding: &Binding<V>) -> String {
    let sync = binding.sync();
    sync.style().serialize(&sync.current_view())
}

/// Binds a Leaflet-style map. `options` is `{ enabled, debounceMs, precision }`;
/// when `enabled` is omitted the map's own `options.urlHash` decides.
#[wasm_bindgen(js_name = bindMapHash)]
pub fn bind_map_hash(map: JsValue, options: JsValue) -> Result<MapHashBinding, JsValue> {
    let binding = leaflet::bind(map, BindOptions::from_js(&options))?;
    Ok(MapHashBinding { binding })
}

/// Binds an OpenSeadragon-style viewer.
#[wasm_bindgen(js_name = bindBookmarkUrl)]
pub fn bind_bookmark_url(viewer: JsValue, options: JsValue) -> Result<BookmarkUrlBinding, JsValue> {
    let binding = openseadragon::bind(viewer, BindOptions::from_js(&options))?;
    Ok(BookmarkUrlBinding { binding })
}

/// Parses `key=value;k2=v2&k3=v3` into a plain object with typed values.
#[wasm_bindgen(js_name = parseParamString)]
pub fn parse_param_string(fragment: &str) -> JsValue {
    let params = viewmark_core::parse(fragment);
    let entries: Vec<(&str, JsValue)> = params
        .iter()
        .map(|(key, value)| (key, fragment_value_to_js(value)))
        .collect();
    js::object(&entries)
}

fn fragment_value_to_js(value: &FragmentValue) -> JsValue {
    match value {
        FragmentValue::Null => JsValue::NULL,
        FragmentValue::Bool(flag) => JsValue::from_bool(*flag),
        FragmentValue::Number(number) => JsValue::from_f64(*number),
        FragmentValue::String(text) => JsValue::from_str(text),
    }
}
