use std::fmt;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use viewmark_core::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    MissingWindow,
    MissingHistory,
    MissingMethod { name: String },
    Js { context: String },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::MissingWindow => f.write_str("no window available"),
            BindError::MissingHistory => f.write_str("window.history is unavailable"),
            BindError::MissingMethod { name } => write!(f, "viewer is missing method '{name}'"),
            BindError::Js { context } => write!(f, "javascript call failed: {context}"),
        }
    }
}

impl std::error::Error for BindError {}

impl From<BindError> for JsValue {
    fn from(err: BindError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub(crate) fn get(target: &JsValue, key: &str) -> Result<JsValue, BindError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|_| BindError::Js {
        context: format!("read '{key}'"),
    })
}

pub(crate) fn method(target: &JsValue, name: &str) -> Result<Function, BindError> {
    get(target, name)?
        .dyn_into::<Function>()
        .map_err(|_| BindError::MissingMethod {
            name: name.to_string(),
        })
}

pub(crate) fn require_methods(target: &JsValue, names: &[&str]) -> Result<(), BindError> {
    for name in names {
        method(target, name)?;
    }
    Ok(())
}

pub(crate) fn call(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, BindError> {
    let func = method(target, name)?;
    let array = Array::new();
    for arg in args {
        array.push(arg);
    }
    func.apply(target, &array).map_err(|_| BindError::Js {
        context: format!("call '{name}'"),
    })
}

/// Reads a numeric property, `NaN` when absent or not a number.
pub(crate) fn number(target: &JsValue, key: &str) -> f64 {
    get(target, key)
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::NAN)
}

pub(crate) fn call_number(target: &JsValue, name: &str) -> f64 {
    call(target, name, &[])
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::NAN)
}

pub(crate) fn object(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

pub(crate) fn xy(point: Point) -> JsValue {
    object(&[
        ("x", JsValue::from_f64(point.x)),
        ("y", JsValue::from_f64(point.y)),
    ])
}

pub(crate) fn read_xy(value: &JsValue) -> Point {
    Point::new(number(value, "x"), number(value, "y"))
}

pub(crate) fn lat_lng(point: Point) -> JsValue {
    object(&[
        ("lat", JsValue::from_f64(point.lat())),
        ("lng", JsValue::from_f64(point.lng())),
    ])
}

pub(crate) fn read_lat_lng(value: &JsValue) -> Point {
    Point::from_lng_lat(number(value, "lng"), number(value, "lat"))
}
