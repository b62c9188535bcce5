use serde::{Deserialize, Serialize};

fn default_page_size() -> u32 {
    10
}

fn default_debounce_ms() -> u64 {
    400
}

/// Per-panel configuration, constructed once per panel instance and passed
/// in explicitly — there is no ambient shared state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelConfig {
    /// Applied when a facet descriptor carries no page size of its own.
    /// 0 disables value slicing.
    pub default_page_size: u32,

    /// Quiescence window for sort/order toggles before a new round trip.
    /// 0 disables debouncing.
    pub sort_debounce_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            default_page_size: default_page_size(),
            sort_debounce_ms: default_debounce_ms(),
        }
    }
}
