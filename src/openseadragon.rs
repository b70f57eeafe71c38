use std::rc::Rc;

use wasm_bindgen::JsValue;

use viewmark_core::{CoordinateSpace, Point, ViewerControl};

use crate::binding::{Binding, Subscription};
use crate::js::{self, BindError};
use crate::options::BindOptions;

const VIEWER_METHODS: &[&str] = &["addHandler", "removeHandler"];
const VIEWPORT_METHODS: &[&str] = &["getCenter", "getZoom", "zoomTo", "panTo"];

/// A deep-zoom image viewer. Its center is in viewport coordinates, so the
/// fragment carries `x`/`y` directly.
pub(crate) struct DeepZoomViewer {
    viewer: JsValue,
}

impl DeepZoomViewer {
    pub(crate) fn new(viewer: JsValue) -> Result<Self, BindError> {
        js::require_methods(&viewer, VIEWER_METHODS)?;
        js::require_methods(&js::get(&viewer, "viewport")?, VIEWPORT_METHODS)?;
        js::require_methods(&js::get(&viewer, "world")?, &["getItemCount"])?;
        Ok(Self { viewer })
    }

    // the viewport object is replaced when a new image opens, so look it up each time
    fn viewport(&self) -> JsValue {
        js::get(&self.viewer, "viewport").unwrap_or(JsValue::UNDEFINED)
    }
}

impl ViewerControl for DeepZoomViewer {
    fn space(&self) -> CoordinateSpace {
        CoordinateSpace::Cartesian
    }

    fn center(&self) -> Point {
        match js::call(&self.viewport(), "getCenter", &[]) {
            Ok(center) => js::read_xy(&center),
            Err(_) => Point::new(f64::NAN, f64::NAN),
        }
    }

    fn zoom(&self) -> f64 {
        js::call_number(&self.viewport(), "getZoom")
    }

    /// Zooms then pans, each immediately and only when it differs.
    fn set_view(&self, center: Point, zoom: f64) {
        let viewport = self.viewport();
        if zoom != self.zoom() {
            let _ = js::call(
                &viewport,
                "zoomTo",
                &[JsValue::from_f64(zoom), JsValue::NULL, JsValue::TRUE],
            );
        }
        if center != self.center() {
            let _ = js::call(&viewport, "panTo", &[js::xy(center), JsValue::TRUE]);
        }
    }

    fn unproject(&self, projected: Point) -> Point {
        projected
    }

    fn content_loaded(&self) -> bool {
        js::get(&self.viewer, "world")
            .map(|world| js::call_number(&world, "getItemCount") > 0.0)
            .unwrap_or(false)
    }
}

/// Restores the fragment (now, or once an image opens), then writes the
/// fragment after `zoom`/`pan` settle and follows `hashchange`.
pub(crate) fn bind(viewer: JsValue, options: BindOptions) -> Result<Rc<Binding<DeepZoomViewer>>, BindError> {
    let control = DeepZoomViewer::new(viewer.clone())?;
    let binding = Binding::new(control, options.into_config())?;
    let sync = binding.sync().clone();
    if !sync.config().enabled {
        return Ok(binding);
    }

    // a hashchange before the first image also leaves a fragment held
    let weak = Rc::downgrade(&sync);
    let opened = Subscription::add(&viewer, "addHandler", "removeHandler", "open", move |_| {
        let Some(sync) = weak.upgrade() else {
            return;
        };
        if let Some(outcome) = sync.content_ready() {
            tracing::debug!("bookmark url: applied after open: {outcome:?}");
        }
    })?;
    binding.keep(opened);

    let activation = sync.activate();
    tracing::debug!("bookmark url bound: {activation:?}");
    binding.watch_view(&viewer, "addHandler", "removeHandler", &["zoom", "pan"])?;
    binding.listen_for_navigation();
    Ok(binding)
}
