//! The facet panel façade: owns the facet view-models and drives
//! reconciliation, load planning, bucketing, selection restore and slicing
//! in response to external events.

use indexmap::IndexMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{GriddleError, Result};
use crate::panel::config::PanelConfig;
use crate::panel::date_ranges::DateRangeBucketer;
use crate::panel::debounce::ToggleDebouncer;
use crate::panel::{planner, reconcile, selection};
use crate::types::{Facet, FacetArguments, FacetEntry, FacetId, FacetState, FacetValue};
use crate::wire::{AvailableFacetsResponse, FacetedSearchResponse};

/// One value-load round trip the mediator should execute.
#[derive(Debug, Clone)]
pub struct FacetLoadRequest {
    pub arguments: FacetArguments,
    pub facet_fields: Vec<FacetId>,
}

/// The narrow outbound surface of the panel. The controller never executes
/// a search or a load itself; it only raises these events on the injected
/// collaborator.
pub trait SearchMediator {
    /// The selection changed; the mediator owns triggering the next search.
    fn on_selection_changed(&mut self, tokens: &[String]);
    /// A value-load round trip is needed.
    fn on_load_requested(&mut self, request: FacetLoadRequest);
    /// A user-facing notice (panel cleared, service unavailable).
    fn on_panel_message(&mut self, message: &str);
}

pub struct FacetPanelController<M: SearchMediator> {
    panel_id: Uuid,
    config: PanelConfig,
    facets: IndexMap<FacetId, Facet>,
    /// The selection tokens in effect for the current search context.
    selection: Vec<String>,
    /// Criteria of the current context, used to address value loads.
    arguments: FacetArguments,
    bucketer: DateRangeBucketer,
    debouncer: ToggleDebouncer,
    mediator: M,
}

impl<M: SearchMediator> FacetPanelController<M> {
    pub fn new(config: PanelConfig, mediator: M) -> Self {
        let debouncer = ToggleDebouncer::new(config.sort_debounce_ms);
        FacetPanelController {
            panel_id: Uuid::new_v4(),
            config,
            facets: IndexMap::new(),
            selection: Vec::new(),
            arguments: FacetArguments::default(),
            bucketer: DateRangeBucketer::new(),
            debouncer,
            mediator,
        }
    }

    /// Facets in render order.
    pub fn facets(&self) -> impl Iterator<Item = &Facet> {
        self.facets.values()
    }

    pub fn facet(&self, id: &str) -> Option<&Facet> {
        self.facets.get(id)
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Restore an externally held selection (deep link, back navigation)
    /// before the next search context arrives.
    pub fn set_selection(&mut self, tokens: Vec<String>) {
        self.selection = tokens;
    }

    pub fn mediator(&self) -> &M {
        &self.mediator
    }

    pub fn mediator_mut(&mut self) -> &mut M {
        &mut self.mediator
    }

    /// Inbound "before search": stamp a copy of the host's arguments for
    /// the faceted call.
    pub fn prepare_arguments(&self, arguments: &FacetArguments) -> FacetArguments {
        arguments.faceted()
    }

    /// A new available-facets response arrived: reconcile it into the held
    /// set, then plan and request the value loads.
    pub fn on_available_facets(
        &mut self,
        response: AvailableFacetsResponse,
        arguments: &FacetArguments,
    ) -> Result<()> {
        let descriptors = response.into_validated()?;
        self.arguments = arguments.clone();

        let held: Vec<Facet> = std::mem::take(&mut self.facets).into_values().collect();
        let selection_active = !self.selection.is_empty();
        let merged = reconcile::reconcile(
            held,
            &descriptors,
            selection_active,
            self.config.default_page_size,
        );
        debug!(panel = %self.panel_id, facets = merged.len(), "reconciled available facets");
        self.facets = merged.into_iter().map(|f| (f.id.clone(), f)).collect();

        let plan = planner::plan(self.facets.values_mut(), &self.selection);
        if !plan.batch.is_empty() {
            let request = FacetLoadRequest {
                arguments: self.arguments.restricted_to(&plan.batch),
                facet_fields: plan.batch,
            };
            self.mediator.on_load_requested(request);
        }
        for id in plan.individual {
            let request = FacetLoadRequest {
                arguments: self.arguments.restricted_to(std::slice::from_ref(&id)),
                facet_fields: vec![id],
            };
            self.mediator.on_load_requested(request);
        }
        Ok(())
    }

    /// A value-load response arrived: bucket date values, restore the
    /// selection, slice, and mark the facets loaded. Payloads for facets
    /// reconciliation has since removed are discarded untouched.
    pub fn on_facet_values(&mut self, response: FacetedSearchResponse) -> Result<()> {
        let results = response.into_validated()?;
        for payload in results {
            let Some(facet) = self.facets.get_mut(&payload.id) else {
                debug!(panel = %self.panel_id, facet = %payload.id, "discarding values for facet no longer held");
                continue;
            };
            facet.values = if facet.solr_type.is_date() {
                self.bucketer
                    .bucket(&payload.values)
                    .into_iter()
                    .map(FacetEntry::DateRange)
                    .collect()
            } else {
                payload
                    .values
                    .iter()
                    .map(|raw| {
                        FacetEntry::Plain(FacetValue {
                            id: raw.id.clone(),
                            count: raw.count,
                            selected: false,
                        })
                    })
                    .collect()
            };
            selection::decode(facet, &self.selection);
            if !payload.selected_values.is_empty() {
                selection::decode(facet, &payload.selected_values);
            }
            facet.slice_visible();
            facet.loaded = true;
            facet.loading = false;
        }
        Ok(())
    }

    /// Transport failure on the available-facets call: the panel clears and
    /// the next search starts fresh.
    pub fn on_available_facets_error(&mut self, error: &GriddleError) {
        warn!(panel = %self.panel_id, %error, "available-facets call failed, clearing panel");
        self.facets.clear();
        self.mediator
            .on_panel_message("Facets are unavailable for this search.");
    }

    /// Transport failure on a value load: only the targeted facets are
    /// affected; their `loading` guard is released.
    pub fn on_facet_values_error(&mut self, facet_ids: &[FacetId], error: &GriddleError) {
        for id in facet_ids {
            if let Some(facet) = self.facets.get_mut(id) {
                warn!(panel = %self.panel_id, facet = %id, %error, "facet value load failed");
                facet.loading = false;
            }
        }
    }

    /// User toggled a section open or closed. Opening a facet that was
    /// never loaded issues one individual load.
    pub fn toggle_expansion(&mut self, facet_id: &str) -> Result<()> {
        let facet = self
            .facets
            .get_mut(facet_id)
            .ok_or_else(|| GriddleError::UnknownFacet(facet_id.to_string()))?;
        facet.state = match facet.state {
            FacetState::Expanded => FacetState::Collapsed,
            FacetState::Collapsed => FacetState::Expanded,
        };
        let load = if facet.state == FacetState::Expanded {
            planner::plan_expand(facet)
        } else {
            None
        };
        if let Some(id) = load {
            let request = FacetLoadRequest {
                arguments: self.arguments.restricted_to(std::slice::from_ref(&id)),
                facet_fields: vec![id],
            };
            self.mediator.on_load_requested(request);
        }
        Ok(())
    }

    /// User toggled one value. Re-encodes the whole selection and hands the
    /// tokens to the mediator; the mediator runs the search.
    pub fn toggle_value(&mut self, facet_id: &str, value_id: &str) -> Result<()> {
        let facet = self
            .facets
            .get_mut(facet_id)
            .ok_or_else(|| GriddleError::UnknownFacet(facet_id.to_string()))?;
        let mut found = false;
        for entry in &mut facet.values {
            if entry.id() == value_id {
                entry.set_selected(!entry.selected());
                found = true;
            }
        }
        if !found {
            return Err(GriddleError::UnknownValue {
                facet: facet_id.to_string(),
                value: value_id.to_string(),
            });
        }
        let tokens = selection::encode(self.facets.values());
        self.selection = tokens.clone();
        self.mediator.on_selection_changed(&tokens);
        Ok(())
    }

    /// Reveal the next page of a facet's values.
    pub fn show_more(&mut self, facet_id: &str) -> Result<()> {
        let facet = self
            .facets
            .get_mut(facet_id)
            .ok_or_else(|| GriddleError::UnknownFacet(facet_id.to_string()))?;
        facet.show_more();
        Ok(())
    }

    /// User toggled the result sort order. Rapid clicks collapse into one
    /// round trip through the quiescence window.
    pub fn on_sort_toggled(&mut self) {
        if !self.debouncer.should_fire() {
            debug!(panel = %self.panel_id, "sort toggle suppressed by debounce window");
            return;
        }
        let tokens = self.selection.clone();
        self.mediator.on_selection_changed(&tokens);
    }
}
