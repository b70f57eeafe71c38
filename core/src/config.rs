use crate::view::DEFAULT_PRECISION;

pub const DEFAULT_DEBOUNCE_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// A disabled binding never reads or writes the fragment.
    pub enabled: bool,
    /// Quiet period before a view change is written. `0` writes on every change.
    pub debounce_ms: u32,
    /// Decimals kept for geographic coordinates.
    pub precision: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            precision: DEFAULT_PRECISION,
        }
    }
}
