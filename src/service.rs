//! The async boundary to the external facet service, and a session driver
//! that wires service responses into controller events.

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::error::Result;
use crate::panel::config::PanelConfig;
use crate::panel::controller::{FacetLoadRequest, FacetPanelController, SearchMediator};
use crate::types::FacetArguments;
use crate::wire::{AvailableFacetsResponse, FacetedSearchResponse};

/// The two calls the external service exposes. Implementations own the
/// transport; the engine only sees validated response bodies.
#[async_trait]
pub trait FacetService: Send + Sync {
    /// `GET /search/facets` — the facets applicable to the given criteria,
    /// without values.
    async fn available_facets(&self, arguments: &FacetArguments)
        -> Result<AvailableFacetsResponse>;

    /// `GET /search/faceted` — value counts for the named facet fields.
    async fn facet_values(
        &self,
        arguments: &FacetArguments,
        facet_fields: &[String],
    ) -> Result<FacetedSearchResponse>;
}

/// Queue-backed mediator: records the controller's outbound events so the
/// session (or a host event loop) can drain them.
#[derive(Debug, Default)]
pub struct EventQueue {
    loads: VecDeque<FacetLoadRequest>,
    pub last_selection: Option<Vec<String>>,
    pub messages: Vec<String>,
}

impl EventQueue {
    pub fn pop_load(&mut self) -> Option<FacetLoadRequest> {
        self.loads.pop_front()
    }
}

impl SearchMediator for EventQueue {
    fn on_selection_changed(&mut self, tokens: &[String]) {
        self.last_selection = Some(tokens.to_vec());
    }

    fn on_load_requested(&mut self, request: FacetLoadRequest) {
        self.loads.push_back(request);
    }

    fn on_panel_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Owns a controller and a service and runs complete round trips.
///
/// One request is outstanding at a time; facet state is only mutated from
/// response events, and a value load is never issued before the
/// available-facets response that planned it has been applied.
pub struct PanelSession<S: FacetService> {
    service: S,
    controller: FacetPanelController<EventQueue>,
}

impl<S: FacetService> PanelSession<S> {
    pub fn new(config: PanelConfig, service: S) -> Self {
        PanelSession {
            service,
            controller: FacetPanelController::new(config, EventQueue::default()),
        }
    }

    pub fn controller(&self) -> &FacetPanelController<EventQueue> {
        &self.controller
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn controller_mut(&mut self) -> &mut FacetPanelController<EventQueue> {
        &mut self.controller
    }

    /// One full search context: fetch the available facets, reconcile, then
    /// drain every planned value load.
    ///
    /// A failed available-facets call clears the panel and returns the
    /// error; failed value loads degrade the affected facets only.
    pub async fn refresh(&mut self, arguments: FacetArguments) -> Result<()> {
        let faceted = self.controller.prepare_arguments(&arguments);
        let applied = match self.service.available_facets(&faceted).await {
            Ok(response) => self.controller.on_available_facets(response, &faceted),
            Err(error) => Err(error),
        };
        if let Err(error) = applied {
            self.controller.on_available_facets_error(&error);
            return Err(error);
        }
        self.drain_loads().await;
        Ok(())
    }

    /// Toggle a section; a lazy expansion fetches that one facet's values.
    pub async fn expand(&mut self, facet_id: &str) -> Result<()> {
        self.controller.toggle_expansion(facet_id)?;
        self.drain_loads().await;
        Ok(())
    }

    /// Toggle one value and return the new selection tokens for the host's
    /// search mediator; the session does not run the next search.
    pub fn select(&mut self, facet_id: &str, value_id: &str) -> Result<Vec<String>> {
        self.controller.toggle_value(facet_id, value_id)?;
        Ok(self.controller.selection().to_vec())
    }

    async fn drain_loads(&mut self) {
        while let Some(request) = self.controller.mediator_mut().pop_load() {
            match self
                .service
                .facet_values(&request.arguments, &request.facet_fields)
                .await
            {
                Ok(response) => {
                    if let Err(error) = self.controller.on_facet_values(response) {
                        self.controller
                            .on_facet_values_error(&request.facet_fields, &error);
                    }
                }
                Err(error) => self
                    .controller
                    .on_facet_values_error(&request.facet_fields, &error),
            }
        }
    }
}
