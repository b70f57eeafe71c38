pub mod config;
pub mod fragment;
pub mod resolve;
pub mod sync;
pub mod view;

pub use config::{SyncConfig, DEFAULT_DEBOUNCE_MS};
pub use fragment::{
    parse, parse_into, parse_numeric, FragmentParams, FragmentValue, NumericParse, RejectReason,
    RejectedPair,
};
pub use resolve::{resolve, resolve_center, resolve_zoom, ResolvedView};
pub use sync::{Activation, ApplyOutcome, FragmentLocation, FragmentSync, Scheduler, ViewerControl};
pub use view::{
    format_fixed, format_number, serialize_cartesian, serialize_geographic, CoordinateSpace,
    FragmentStyle, Point, ViewState, DEFAULT_PRECISION,
};
