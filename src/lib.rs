//! Faceted-search panel engine.
//!
//! Turns flat facet-count responses from a search service into a stateful,
//! navigable facet panel, and keeps that panel consistent as selections
//! narrow or widen the search: relative date-range bucketing, selection
//! token encoding/restoring, batch-vs-lazy load planning, and
//! reconciliation of the applicable facet set across round trips.
//!
//! The panel never talks to a server itself. Drive a
//! [`FacetPanelController`] directly with response events, or wrap a
//! [`FacetService`] implementation in a [`PanelSession`] to run complete
//! round trips.

pub mod error;
pub mod panel;
pub mod service;
pub mod types;
pub mod wire;


pub use error::{GriddleError, Result};
pub use panel::config::PanelConfig;
pub use panel::controller::{FacetLoadRequest, FacetPanelController, SearchMediator};
pub use panel::date_ranges::DateRangeBucketer;
pub use service::{EventQueue, FacetService, PanelSession};
pub use types::{Facet, FacetArguments, FacetEntry, FacetId};
