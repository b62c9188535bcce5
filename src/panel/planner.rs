//! Deciding which facets load eagerly, batched or individually, and which
//! stay lazy until the user expands them.

use tracing::debug;

use crate::panel::selection;
use crate::types::{Facet, FacetId, FacetState, PropertyType};

/// The round trips needed to populate a reconciled facet set: one batch
/// request for definition-property facets, one request per object-property
/// facet.
#[derive(Debug, Default, Clone)]
pub struct LoadPlan {
    pub batch: Vec<FacetId>,
    pub individual: Vec<FacetId>,
}

impl LoadPlan {
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty() && self.individual.is_empty()
    }
}

/// Walk the facets after reconciliation and decide their value loads.
///
/// A facet loads eagerly when it is expanded (currently or by default) or
/// when the restored selection targets it; everything else is reset to its
/// lazy initial state. Facets with an outstanding request are left alone —
/// the `loading` flag is the only mutation guard.
pub fn plan<'a, I>(facets: I, tokens: &[String]) -> LoadPlan
where
    I: IntoIterator<Item = &'a mut Facet>,
{
    let mut plan = LoadPlan::default();
    for facet in facets {
        if facet.loading {
            continue;
        }
        let wants_load = facet.state == FacetState::Expanded
            || facet.default_state == FacetState::Expanded
            || selection::has_token_for(&facet.id, tokens);
        if wants_load {
            facet.loading = true;
            facet.state = FacetState::Expanded;
            match facet.property_type {
                PropertyType::Definition => plan.batch.push(facet.id.clone()),
                PropertyType::Object => plan.individual.push(facet.id.clone()),
            }
        } else {
            facet.values.clear();
            facet.loaded = false;
            facet.state = facet.default_state;
            facet.slice_visible();
        }
    }
    debug!(
        batch = plan.batch.len(),
        individual = plan.individual.len(),
        "planned facet value loads"
    );
    plan
}

/// An explicit user expansion always loads individually, whatever the
/// property type. Returns the id to fetch, or `None` when the facet is
/// already loaded or mid-flight.
pub fn plan_expand(facet: &mut Facet) -> Option<FacetId> {
    if facet.loaded || facet.loading {
        return None;
    }
    facet.loading = true;
    Some(facet.id.clone())
}
