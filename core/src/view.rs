use std::fmt::Write;

use crate::fragment::{parse, parse_numeric, FragmentParams};

pub const DEFAULT_PRECISION: usize = 5;

/// A position in the viewer's center space. Geographic centers carry
/// longitude in `x` and latitude in `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { x: lng, y: lat }
    }

    pub fn lng(&self) -> f64 {
        self.x
    }

    pub fn lat(&self) -> f64 {
        self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: Point,
    pub zoom: f64,
}

impl ViewState {
    pub const fn new(center: Point, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// Which space a viewer's center lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSpace {
    Geographic,
    Cartesian,
}

impl CoordinateSpace {
    pub fn style(self, precision: usize) -> FragmentStyle {
        match self {
            CoordinateSpace::Geographic => FragmentStyle::Geographic { precision },
            CoordinateSpace::Cartesian => FragmentStyle::Cartesian,
        }
    }
}

/// How a viewer family writes and reads its fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentStyle {
    /// `lng=..;lat=..;zoom=..`, coordinates fixed to `precision` decimals,
    /// read back with the permissive parser.
    Geographic { precision: usize },
    /// `x=..&y=..&zoom=..`, unrounded, read back with the strict numeric parser.
    Cartesian,
}

impl Default for FragmentStyle {
    fn default() -> Self {
        FragmentStyle::Geographic {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl FragmentStyle {
    pub fn delimiter(self) -> char {
        match self {
            FragmentStyle::Geographic { .. } => ';',
            FragmentStyle::Cartesian => '&',
        }
    }

    pub fn serialize(self, state: &ViewState) -> String {
        match self {
            FragmentStyle::Geographic { precision } => serialize_geographic(state, precision),
            FragmentStyle::Cartesian => serialize_cartesian(state),
        }
    }

    pub fn decode(self, fragment: &str) -> FragmentParams {
        match self {
            FragmentStyle::Geographic { .. } => parse(fragment),
            FragmentStyle::Cartesian => parse_numeric(fragment).params,
        }
    }
}

pub fn serialize_geographic(state: &ViewState, precision: usize) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "lng={};lat={};zoom={}",
        format_fixed(state.center.lng(), precision),
        format_fixed(state.center.lat(), precision),
        format_number(state.zoom)
    );
    out
}

pub fn serialize_cartesian(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "x={}&y={}&zoom={}",
        format_number(state.center.x),
        format_number(state.center.y),
        format_number(state.zoom)
    );
    out
}

/// Shortest text that parses back to the same value; integral values have no fraction.
/// Magnitudes of `1e21` and above, or below `1e-6`, use exponent form (`1e+21`, `1e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude < 1e21 && magnitude >= 1e-6 {
        return value.to_string();
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => text,
    }
}

pub fn format_fixed(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|ch| ch == '0' || ch == '.') => rest.to_string(),
        _ => text,
    }
}
