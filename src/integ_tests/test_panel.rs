use chrono::{Duration, Local};

use crate::panel::config::PanelConfig;
use crate::panel::controller::{FacetLoadRequest, FacetPanelController, SearchMediator};
use crate::types::{FacetArguments, FacetEntry, FacetState, PropertyType, SolrType};
use crate::wire::{
    AvailableFacetsResponse, FacetDescriptor, FacetResult, FacetedData, FacetedSearchResponse,
    RawFacetValue,
};

#[derive(Default)]
struct RecordingMediator {
    selections: Vec<Vec<String>>,
    loads: Vec<FacetLoadRequest>,
    messages: Vec<String>,
}

impl SearchMediator for RecordingMediator {
    fn on_selection_changed(&mut self, tokens: &[String]) {
        self.selections.push(tokens.to_vec());
    }
    fn on_load_requested(&mut self, request: FacetLoadRequest) {
        self.loads.push(request);
    }
    fn on_panel_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

fn descriptor(
    id: &str,
    property_type: PropertyType,
    solr_type: SolrType,
    order: u32,
    page_size: Option<u32>,
    default_state: FacetState,
) -> FacetDescriptor {
    FacetDescriptor {
        id: id.to_string(),
        property_type,
        solr_type,
        order,
        page_size,
        default_state,
    }
}

fn available(descriptors: Vec<FacetDescriptor>) -> AvailableFacetsResponse {
    AvailableFacetsResponse { data: descriptors }
}

fn result(id: &str, values: Vec<(&str, u64)>) -> FacetResult {
    FacetResult {
        id: id.to_string(),
        values: values
            .into_iter()
            .map(|(v, count)| RawFacetValue {
                id: v.to_string(),
                count,
            })
            .collect(),
        selected_values: vec![],
    }
}

fn response(facets: Vec<FacetResult>) -> FacetedSearchResponse {
    FacetedSearchResponse {
        data: FacetedData { facets },
    }
}

fn controller() -> FacetPanelController<RecordingMediator> {
    FacetPanelController::new(PanelConfig::default(), RecordingMediator::default())
}

#[test]
fn date_range_selection_survives_a_new_search_context() {
    let mut panel = controller();
    let created = || {
        descriptor(
            "created",
            PropertyType::Definition,
            SolrType::Tdate,
            0,
            None,
            FacetState::Expanded,
        )
    };
    let yesterday = (Local::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    panel
        .on_available_facets(available(vec![created()]), &FacetArguments::default())
        .unwrap();
    panel
        .on_facet_values(response(vec![result("created", vec![(yesterday.as_str(), 3)])]))
        .unwrap();

    // select the bucketed "yesterday" range
    panel.toggle_value("created", "yesterday").unwrap();
    let tokens = panel.selection().to_vec();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].starts_with("created:"));
    assert!(tokens[0].contains(';'));
    assert_eq!(panel.mediator().selections.len(), 1);
    assert!(!panel.mediator().loads.is_empty());
    assert!(panel.mediator().messages.is_empty());

    // a new context arrives for the narrowed search; the facet survives
    // reconciliation and its fresh values restore the same selection
    panel
        .on_available_facets(available(vec![created()]), &FacetArguments::default())
        .unwrap();
    panel
        .on_facet_values(response(vec![result("created", vec![(yesterday.as_str(), 3)])]))
        .unwrap();

    let facet = panel.facet("created").unwrap();
    let selected: Vec<&str> = facet.selected_entries().map(|v| v.id()).collect();
    assert_eq!(selected, vec!["yesterday"]);
    assert_eq!(panel.selection(), tokens.as_slice());
}

#[test]
fn panel_renders_in_descriptor_order_not_arrival_order() {
    let mut panel = controller();
    panel
        .on_available_facets(
            available(vec![
                descriptor("subject", PropertyType::Definition, SolrType::String, 2, None, FacetState::Expanded),
                descriptor("author", PropertyType::Definition, SolrType::String, 1, None, FacetState::Expanded),
            ]),
            &FacetArguments::default(),
        )
        .unwrap();
    let ids: Vec<&str> = panel.facets().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["author", "subject"]);
}

#[test]
fn encode_order_follows_render_order_across_facets() {
    let mut panel = controller();
    panel
        .on_available_facets(
            available(vec![
                descriptor("subject", PropertyType::Definition, SolrType::String, 2, None, FacetState::Expanded),
                descriptor("author", PropertyType::Definition, SolrType::String, 1, None, FacetState::Expanded),
            ]),
            &FacetArguments::default(),
        )
        .unwrap();
    panel
        .on_facet_values(response(vec![
            result("subject", vec![("whaling", 2)]),
            result("author", vec![("melville", 7)]),
        ]))
        .unwrap();
    panel.toggle_value("subject", "whaling").unwrap();
    panel.toggle_value("author", "melville").unwrap();
    assert_eq!(
        panel.selection(),
        &["author:melville".to_string(), "subject:whaling".to_string()]
    );
}

#[test]
fn show_more_walks_through_all_pages() {
    let mut panel = controller();
    panel
        .on_available_facets(
            available(vec![descriptor(
                "author",
                PropertyType::Definition,
                SolrType::String,
                0,
                Some(5),
                FacetState::Expanded,
            )]),
            &FacetArguments::default(),
        )
        .unwrap();
    let values: Vec<(String, u64)> = (0..12).map(|i| (format!("a{}", i), 1)).collect();
    panel
        .on_facet_values(response(vec![result(
            "author",
            values.iter().map(|(v, c)| (v.as_str(), *c)).collect(),
        )]))
        .unwrap();

    assert_eq!(panel.facet("author").unwrap().visible_values().len(), 5);
    assert!(panel.facet("author").unwrap().has_more());

    panel.show_more("author").unwrap();
    assert_eq!(panel.facet("author").unwrap().visible_values().len(), 10);

    panel.show_more("author").unwrap();
    let facet = panel.facet("author").unwrap();
    assert_eq!(facet.visible_values().len(), 12);
    assert!(!facet.has_more(), "affordance hides once everything is visible");
}

#[test]
fn server_echoed_selected_values_are_restored() {
    let mut panel = controller();
    panel
        .on_available_facets(
            available(vec![descriptor(
                "author",
                PropertyType::Definition,
                SolrType::String,
                0,
                None,
                FacetState::Expanded,
            )]),
            &FacetArguments::default(),
        )
        .unwrap();
    panel
        .on_facet_values(response(vec![FacetResult {
            id: "author".into(),
            values: vec![
                RawFacetValue { id: "melville".into(), count: 7 },
                RawFacetValue { id: "verne".into(), count: 3 },
            ],
            selected_values: vec!["author:verne".to_string()],
        }]))
        .unwrap();
    let facet = panel.facet("author").unwrap();
    let selected: Vec<&str> = facet.selected_entries().map(|v| v.id()).collect();
    assert_eq!(selected, vec!["verne"]);
}

#[test]
fn date_sentinels_flow_through_to_the_panel() {
    let mut panel = controller();
    panel
        .on_available_facets(
            available(vec![descriptor(
                "created",
                PropertyType::Definition,
                SolrType::Date,
                0,
                None,
                FacetState::Expanded,
            )]),
            &FacetArguments::default(),
        )
        .unwrap();
    panel
        .on_facet_values(response(vec![result(
            "created",
            vec![("before", 11), ("between", 5), ("after", 2)],
        )]))
        .unwrap();
    let facet = panel.facet("created").unwrap();
    let ids: Vec<&str> = facet.values.iter().map(|v| v.id()).collect();
    // "between" buckets nowhere; the unbounded ranges carry their counts
    assert_eq!(ids, vec!["before", "after"]);
    match &facet.values[0] {
        FacetEntry::DateRange(range) => assert_eq!(range.count, 11),
        other => panic!("expected a date range, got {:?}", other),
    }
}
