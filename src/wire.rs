//! Service response DTOs and the validated deserialization boundary.
//!
//! Everything the facet service returns passes through `into_validated`
//! exactly once; panel code downstream never re-checks shape.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::error::Result;
use crate::types::{Facet, FacetState, PropertyType, SolrType};

/// One available facet as announced by `GET /search/facets` — identity and
/// presentation hints, no values yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetDescriptor {
    pub id: String,
    pub property_type: PropertyType,
    pub solr_type: SolrType,
    #[serde(default)]
    pub order: u32,
    /// Absent means: use the panel's configured default.
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default = "collapsed")]
    pub default_state: FacetState,
}

fn collapsed() -> FacetState {
    FacetState::Collapsed
}

impl FacetDescriptor {
    /// Build a fresh panel facet at its lazy initial state.
    pub fn into_facet(&self, default_page_size: u32) -> Facet {
        Facet::new(
            self.id.clone(),
            self.property_type,
            self.solr_type,
            self.order,
            self.page_size.unwrap_or(default_page_size),
            self.default_state,
        )
    }
}

/// Body of `GET /search/facets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableFacetsResponse {
    pub data: Vec<FacetDescriptor>,
}

impl AvailableFacetsResponse {
    /// Drop malformed descriptors (blank id, duplicate id) with a warning
    /// and keep the rest; a partial panel beats a cleared one.
    pub fn into_validated(self) -> Result<Vec<FacetDescriptor>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut descriptors = Vec::with_capacity(self.data.len());
        for descriptor in self.data {
            if descriptor.id.trim().is_empty() {
                warn!("facet descriptor with blank id, skipping");
                continue;
            }
            if !seen.insert(descriptor.id.clone()) {
                warn!(facet = %descriptor.id, "duplicate facet descriptor, keeping first");
                continue;
            }
            descriptors.push(descriptor);
        }
        Ok(descriptors)
    }
}

/// A raw, pre-bucketing facet value count. For date facets the id is an
/// absolute date or one of the `before`/`after`/`between` sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFacetValue {
    pub id: String,
    pub count: u64,
}

/// Values for one facet from `GET /search/faceted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetResult {
    pub id: String,
    #[serde(default)]
    pub values: Vec<RawFacetValue>,
    /// Selection tokens the server echoes back for restore.
    #[serde(default)]
    pub selected_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetedData {
    pub facets: Vec<FacetResult>,
}

/// Body of `GET /search/faceted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetedSearchResponse {
    pub data: FacetedData,
}

impl FacetedSearchResponse {
    /// Drop value payloads with a blank facet id; the other facets in the
    /// response still apply.
    pub fn into_validated(self) -> Result<Vec<FacetResult>> {
        let mut results = Vec::with_capacity(self.data.facets.len());
        for result in self.data.facets {
            if result.id.trim().is_empty() {
                warn!("facet result with blank id, skipping");
                continue;
            }
            results.push(result);
        }
        Ok(results)
    }
}
