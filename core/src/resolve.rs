use crate::fragment::FragmentParams;
use crate::view::Point;

/// The parts of a view a fragment asks for. `None` means keep the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedView {
    pub center: Option<Point>,
    pub zoom: Option<f64>,
}

/// Center lookup order: `lng`+`lat`, then `lon`+`lat`, then `x`+`y` passed
/// through `unproject`. Keys that did not decode as numbers count as missing.
pub fn resolve_center<F>(params: &FragmentParams, unproject: F) -> Option<Point>
where
    F: FnOnce(Point) -> Point,
{
    let lat = params.number("lat");
    if let (Some(lng), Some(lat)) = (params.number("lng"), lat) {
        return Some(Point::from_lng_lat(lng, lat));
    }
    if let (Some(lon), Some(lat)) = (params.number("lon"), lat) {
        return Some(Point::from_lng_lat(lon, lat));
    }
    if let (Some(x), Some(y)) = (params.number("x"), params.number("y")) {
        return Some(unproject(Point::new(x, y)));
    }
    None
}

pub fn resolve_zoom(params: &FragmentParams) -> Option<f64> {
    params.number("zoom")
}

pub fn resolve<F>(params: &FragmentParams, unproject: F) -> ResolvedView
where
    F: FnOnce(Point) -> Point,
{
    ResolvedView {
        center: resolve_center(params, unproject),
        zoom: resolve_zoom(params),
    }
}
