#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use viewmark::{parse_param_string, BindOptions, BrowserLocation, TimeoutScheduler};
use viewmark_core::{FragmentLocation, Scheduler, SyncConfig};

wasm_bindgen_test_configure!(run_in_browser);

fn history_length() -> u32 {
    web_sys::window()
        .and_then(|window| window.history().ok())
        .and_then(|history| history.length().ok())
        .unwrap_or(0)
}

#[wasm_bindgen_test]
fn replace_fragment_does_not_add_history_entries() {
    let location = BrowserLocation::new().expect("browser location");
    let before = history_length();
    location.replace_fragment("lng=1.00000;lat=2.00000;zoom=3");
    location.replace_fragment("lng=4.00000;lat=5.00000;zoom=6");
    assert_eq!(history_length(), before);
    assert_eq!(location.fragment(), "lng=4.00000;lat=5.00000;zoom=6");
}

#[wasm_bindgen_test]
async fn replace_fragment_does_not_fire_hashchange() {
    let location = BrowserLocation::new().expect("browser location");
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    let _listener = location.listen(move || counter.set(counter.get() + 1));
    location.replace_fragment("x=0.5&y=0.5&zoom=1");
    TimeoutFuture::new(50).await;
    assert_eq!(fired.get(), 0);
}

#[wasm_bindgen_test]
async fn dropped_timeout_never_runs() {
    let ran = Rc::new(Cell::new(0));
    let first = ran.clone();
    let second = ran.clone();
    let cancelled = TimeoutScheduler.schedule(10, Box::new(move || first.set(first.get() + 1)));
    let _kept = TimeoutScheduler.schedule(10, Box::new(move || second.set(second.get() + 10)));
    drop(cancelled);
    TimeoutFuture::new(50).await;
    assert_eq!(ran.get(), 10);
}

#[wasm_bindgen_test]
fn param_string_values_are_typed() {
    let parsed = parse_param_string("lng=10.5;lat=20.25&zoom=true&name=a+b&flag=null");
    let get = |key: &str| Reflect::get(&parsed, &JsValue::from_str(key)).expect("property");
    assert_eq!(get("lng").as_f64(), Some(10.5));
    assert_eq!(get("lat").as_f64(), Some(20.25));
    assert_eq!(get("zoom").as_bool(), Some(true));
    assert_eq!(get("name").as_string().as_deref(), Some("a b"));
    assert!(get("flag").is_null());
}

#[wasm_bindgen_test]
fn options_fill_in_defaults() {
    let options = js_sys::Object::new();
    Reflect::set(&options, &JsValue::from_str("debounceMs"), &JsValue::from_f64(250.0))
        .expect("set");
    let config = BindOptions::from_js(&options.into()).into_config();
    assert_eq!(
        config,
        SyncConfig {
            debounce_ms: 250,
            ..SyncConfig::default()
        }
    );
    assert_eq!(
        BindOptions::from_js(&JsValue::UNDEFINED).into_config(),
        SyncConfig::default()
    );
}

#[wasm_bindgen_test]
fn malformed_options_fall_back_to_defaults() {
    let config = BindOptions::from_js(&JsValue::from_str("fast")).into_config();
    assert_eq!(config, SyncConfig::default());
}
