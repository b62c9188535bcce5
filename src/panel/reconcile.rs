//! Merging a new available-facets response into held panel state.

use std::collections::HashSet;
use tracing::debug;

use crate::types::Facet;
use crate::wire::FacetDescriptor;

/// Merge the held facets against a new available-facets list.
///
/// With no held facets or no active selection the new list simply replaces
/// the old one. Otherwise facets absent from the new list are dropped (the
/// selection narrowed them away) and facets newly present are added back at
/// their lazy initial state — a restored facet never resurrects the load or
/// value state it had before removal. The result is stable-sorted by
/// `order`; kept facets retain their identity and state untouched.
pub fn reconcile(
    held: Vec<Facet>,
    incoming: &[FacetDescriptor],
    selection_active: bool,
    default_page_size: u32,
) -> Vec<Facet> {
    if held.is_empty() || !selection_active {
        let mut fresh: Vec<Facet> = incoming
            .iter()
            .map(|d| d.into_facet(default_page_size))
            .collect();
        fresh.sort_by_key(|f| f.order);
        return fresh;
    }

    let incoming_ids: HashSet<&str> = incoming.iter().map(|d| d.id.as_str()).collect();
    let mut kept_ids: HashSet<String> = HashSet::new();
    let mut merged: Vec<Facet> = Vec::with_capacity(incoming.len());

    for facet in held {
        if incoming_ids.contains(facet.id.as_str()) {
            kept_ids.insert(facet.id.clone());
            merged.push(facet);
        } else {
            debug!(facet = %facet.id, "facet no longer applicable, dropping");
        }
    }

    for descriptor in incoming {
        if !kept_ids.contains(&descriptor.id) {
            debug!(facet = %descriptor.id, "facet applicable again, restoring lazily");
            merged.push(descriptor.into_facet(default_page_size));
        }
    }

    merged.sort_by_key(|f| f.order);
    merged
}
