use std::rc::Rc;

use wasm_bindgen::JsValue;

use viewmark_core::{CoordinateSpace, Point, ViewerControl};

use crate::binding::{Binding, Subscription};
use crate::js::{self, BindError};
use crate::options::BindOptions;

const MAP_METHODS: &[&str] = &["getCenter", "getZoom", "setView", "on", "off", "whenReady"];

/// A slippy map exposing `getCenter`/`getZoom`/`setView`, `moveend` events
/// and a coordinate reference system under `options.crs`.
pub(crate) struct SlippyMap {
    map: JsValue,
    crs: JsValue,
}

impl SlippyMap {
    pub(crate) fn new(map: JsValue) -> Result<Self, BindError> {
        js::require_methods(&map, MAP_METHODS)?;
        let crs = js::get(&js::get(&map, "options")?, "crs")?;
        js::require_methods(&crs, &["unproject"])?;
        Ok(Self { map, crs })
    }

    /// The map's own opt-in flag (`options.urlHash`), if it set one.
    pub(crate) fn url_hash_option(&self) -> Option<bool> {
        js::get(&self.map, "options")
            .and_then(|options| js::get(&options, "urlHash"))
            .ok()
            .and_then(|value| value.as_bool())
    }
}

impl ViewerControl for SlippyMap {
    fn space(&self) -> CoordinateSpace {
        CoordinateSpace::Geographic
    }

    fn center(&self) -> Point {
        match js::call(&self.map, "getCenter", &[]) {
            Ok(center) => js::read_lat_lng(&center),
            Err(_) => Point::new(f64::NAN, f64::NAN),
        }
    }

    fn zoom(&self) -> f64 {
        js::call_number(&self.map, "getZoom")
    }

    fn set_view(&self, center: Point, zoom: f64) {
        let _ = js::call(
            &self.map,
            "setView",
            &[js::lat_lng(center), JsValue::from_f64(zoom)],
        );
    }

    fn unproject(&self, projected: Point) -> Point {
        match js::call(&self.crs, "unproject", &[js::xy(projected)]) {
            Ok(lat_lng) => js::read_lat_lng(&lat_lng),
            Err(_) => Point::new(f64::NAN, f64::NAN),
        }
    }

    fn content_loaded(&self) -> bool {
        js::get(&self.map, "_loaded")
            .map(|loaded| loaded.is_undefined() || loaded.is_truthy())
            .unwrap_or(true)
    }
}

/// Binds `map` once it reports ready: listens for `hashchange`, writes the
/// fragment after `moveend`, and restores the fragment present at load.
pub(crate) fn bind(map: JsValue, options: BindOptions) -> Result<Rc<Binding<SlippyMap>>, BindError> {
    let viewer = SlippyMap::new(map.clone())?;
    let enabled = options.enabled.or_else(|| viewer.url_hash_option());
    let config = BindOptions { enabled, ..options }.into_config();
    let binding = Binding::new(viewer, config)?;
    if !config.enabled {
        return Ok(binding);
    }

    let weak = Rc::downgrade(&binding);
    let target = map.clone();
    let ready = Subscription::new(&map, "off", "load", move |_| {
        let Some(binding) = weak.upgrade() else {
            return;
        };
        binding.listen_for_navigation();
        if let Err(err) = binding.watch_view(&target, "on", "off", &["moveend"]) {
            gloo::console::warn!("map hash: failed to watch moveend", err.to_string());
        }
        let activation = binding.sync().activate();
        tracing::debug!("map hash ready: {activation:?}");
    });
    let ready_fn = ready.function();
    binding.keep(ready);
    // runs the handler synchronously when the map is already loaded
    js::call(&map, "whenReady", &[ready_fn])?;
    Ok(binding)
}
