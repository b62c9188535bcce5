//! Shared helpers for the session tests: facet descriptor builders and an
//! in-memory facet service double.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use griddle::error::{GriddleError, Result};
use griddle::types::{FacetArguments, FacetState, PropertyType, SolrType};
use griddle::wire::{
    AvailableFacetsResponse, FacetDescriptor, FacetResult, FacetedData, FacetedSearchResponse,
    RawFacetValue,
};
use griddle::FacetService;

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "griddle=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn definition(id: &str, order: u32, default_state: FacetState) -> FacetDescriptor {
    FacetDescriptor {
        id: id.to_string(),
        property_type: PropertyType::Definition,
        solr_type: SolrType::String,
        order,
        page_size: None,
        default_state,
    }
}

pub fn object(id: &str, order: u32, default_state: FacetState) -> FacetDescriptor {
    FacetDescriptor {
        property_type: PropertyType::Object,
        ..definition(id, order, default_state)
    }
}

#[allow(dead_code)]
pub fn date(id: &str, order: u32, default_state: FacetState) -> FacetDescriptor {
    FacetDescriptor {
        solr_type: SolrType::Tdate,
        ..definition(id, order, default_state)
    }
}

/// In-memory stand-in for the facet service: canned available-facets
/// responses consumed in order, value counts served per field, optional
/// per-field failure injection, and a log of every value call.
#[derive(Default)]
pub struct MockService {
    available: Mutex<VecDeque<Result<AvailableFacetsResponse>>>,
    values: Mutex<HashMap<String, Vec<(String, u64)>>>,
    failing_fields: Mutex<HashSet<String>>,
    pub value_calls: Mutex<Vec<Vec<String>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_available(&self, descriptors: Vec<FacetDescriptor>) {
        self.available
            .lock()
            .unwrap()
            .push_back(Ok(AvailableFacetsResponse { data: descriptors }));
    }

    pub fn push_available_failure(&self, message: &str) {
        self.available
            .lock()
            .unwrap()
            .push_back(Err(GriddleError::Transport(message.to_string())));
    }

    pub fn set_values(&self, field: &str, values: Vec<(&str, u64)>) {
        self.values.lock().unwrap().insert(
            field.to_string(),
            values
                .into_iter()
                .map(|(v, c)| (v.to_string(), c))
                .collect(),
        );
    }

    pub fn fail_field(&self, field: &str) {
        self.failing_fields.lock().unwrap().insert(field.to_string());
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.value_calls.lock().unwrap().clone()
    }

    pub fn value_call_count(&self) -> usize {
        self.value_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FacetService for MockService {
    async fn available_facets(
        &self,
        _arguments: &FacetArguments,
    ) -> Result<AvailableFacetsResponse> {
        self.available
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GriddleError::Transport(
                    "no canned available-facets response".to_string(),
                ))
            })
    }

    async fn facet_values(
        &self,
        arguments: &FacetArguments,
        facet_fields: &[String],
    ) -> Result<FacetedSearchResponse> {
        assert!(arguments.facet, "value loads must carry facet=true");
        self.value_calls
            .lock()
            .unwrap()
            .push(facet_fields.to_vec());

        let failing = self.failing_fields.lock().unwrap();
        if let Some(field) = facet_fields.iter().find(|f| failing.contains(*f)) {
            return Err(GriddleError::Transport(format!(
                "injected failure for {}",
                field
            )));
        }

        let values = self.values.lock().unwrap();
        let facets = facet_fields
            .iter()
            .map(|field| FacetResult {
                id: field.clone(),
                values: values
                    .get(field)
                    .map(|counts| {
                        counts
                            .iter()
                            .map(|(v, c)| RawFacetValue {
                                id: v.clone(),
                                count: *c,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                selected_values: vec![],
            })
            .collect();
        Ok(FacetedSearchResponse {
            data: FacetedData { facets },
        })
    }
}
