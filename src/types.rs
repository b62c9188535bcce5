use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Facet identifier — the property name the server aggregates on.
pub type FacetId = String;

/// Wire format for a date-range boundary, shared by the selection codec and
/// the range bucketer.
pub const BOUNDARY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Wire representation of an unbounded boundary.
pub const WILDCARD: &str = "*";

/// How a facet's values are aggregated server-side. Definition properties
/// are cheap and always-on; object properties are expensive joins that are
/// loaded one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Definition,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetState {
    Expanded,
    Collapsed,
}

/// The server-side field type of the faceted property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolrType {
    Text,
    String,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Date,
    Tdate,
    #[serde(other)]
    Other,
}

impl SolrType {
    /// Date-typed facets get their raw values folded into relative ranges.
    pub fn is_date(&self) -> bool {
        matches!(self, SolrType::Date | SolrType::Tdate)
    }
}

/// One side of a date range. `Unbounded` is serialized as `"*"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Unbounded,
    At(NaiveDateTime),
}

impl RangeBound {
    pub fn format(&self) -> String {
        match self {
            RangeBound::Unbounded => WILDCARD.to_string(),
            RangeBound::At(ts) => ts.format(BOUNDARY_FORMAT).to_string(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s == WILDCARD {
            return Some(RangeBound::Unbounded);
        }
        parse_timestamp(s).map(RangeBound::At)
    }
}

impl Serialize for RangeBound {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for RangeBound {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RangeBound::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid range boundary: {}", s)))
    }
}

/// Parse a raw date string from the wire: full timestamp (with or without
/// fractional seconds and a trailing `Z`) or a bare date at midnight.
pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.strip_suffix('Z').unwrap_or(raw);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// A plain (non-date) facet value bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValue {
    pub id: String,
    pub count: u64,
    #[serde(default)]
    pub selected: bool,
}

/// A relative date-range bucket produced by the bucketer.
///
/// `included_ranges` lists sibling range ids whose original counts were
/// folded into this range's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeValue {
    pub id: String,
    pub order: u32,
    pub start: RangeBound,
    pub end: RangeBound,
    #[serde(default)]
    pub included_ranges: Vec<String>,
    pub count: u64,
    pub text: String,
    #[serde(default)]
    pub selected: bool,
}

/// A facet value: plain or date-range. The two shapes never mix within one
/// facet, but the panel treats them uniformly for selection and slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetEntry {
    DateRange(DateRangeValue),
    Plain(FacetValue),
}

impl FacetEntry {
    pub fn id(&self) -> &str {
        match self {
            FacetEntry::Plain(v) => &v.id,
            FacetEntry::DateRange(v) => &v.id,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            FacetEntry::Plain(v) => v.count,
            FacetEntry::DateRange(v) => v.count,
        }
    }

    pub fn selected(&self) -> bool {
        match self {
            FacetEntry::Plain(v) => v.selected,
            FacetEntry::DateRange(v) => v.selected,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        match self {
            FacetEntry::Plain(v) => v.selected = selected,
            FacetEntry::DateRange(v) => v.selected = selected,
        }
    }
}

/// One facet panel section and its full lifecycle state.
///
/// The identity is created once per available-facets response and mutated in
/// place while that response is current; reconciliation decides whether it
/// survives the next response.
#[derive(Debug, Clone)]
pub struct Facet {
    pub id: FacetId,
    pub property_type: PropertyType,
    pub solr_type: SolrType,
    /// Render position, stable across reconciliation.
    pub order: u32,
    /// Values shown per "show more" step. 0 disables slicing entirely.
    pub page_size: u32,
    pub state: FacetState,
    pub default_state: FacetState,
    pub loaded: bool,
    pub loading: bool,
    pub values: Vec<FacetEntry>,
    /// Length of the visible prefix of `values`.
    visible: usize,
}

impl Facet {
    pub fn new(
        id: FacetId,
        property_type: PropertyType,
        solr_type: SolrType,
        order: u32,
        page_size: u32,
        default_state: FacetState,
    ) -> Self {
        Facet {
            id,
            property_type,
            solr_type,
            order,
            page_size,
            state: default_state,
            default_state,
            loaded: false,
            loading: false,
            values: Vec::new(),
            visible: 0,
        }
    }

    /// The visible prefix of `values`: `min(page_size, len)`, or everything
    /// when `page_size` is 0.
    pub fn visible_values(&self) -> &[FacetEntry] {
        &self.values[..self.visible]
    }

    /// Re-derive the visible prefix after `values` changed.
    pub fn slice_visible(&mut self) {
        self.visible = if self.page_size == 0 {
            self.values.len()
        } else {
            (self.page_size as usize).min(self.values.len())
        };
    }

    /// Append the next `page_size` raw values (or the remainder) to the
    /// visible prefix.
    pub fn show_more(&mut self) {
        if self.page_size > 0 {
            self.visible = (self.visible + self.page_size as usize).min(self.values.len());
        }
    }

    /// Whether the "show more" affordance applies.
    pub fn has_more(&self) -> bool {
        self.page_size > 0 && self.visible < self.values.len()
    }

    /// A facet section renders only when expanded and holding at least one
    /// value with a nonzero count.
    pub fn is_renderable(&self) -> bool {
        self.state == FacetState::Expanded && self.values.iter().any(|v| v.count() > 0)
    }

    pub fn has_selection(&self) -> bool {
        self.values.iter().any(|v| v.selected())
    }

    /// Every selected value, including ones sliced out of the visible
    /// prefix, so active filters can render above the fold.
    pub fn selected_entries(&self) -> impl Iterator<Item = &FacetEntry> {
        self.values.iter().filter(|v| v.selected())
    }
}

/// The opaque criteria object forwarded to the facet service.
///
/// The engine copies it, stamps `facet`/`facetField`, and passes it on; it
/// never inspects the search-semantic content in `criteria`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetArguments {
    #[serde(flatten)]
    pub criteria: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub facet: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facet_field: Vec<FacetId>,
}

impl FacetArguments {
    pub fn from_criteria(criteria: serde_json::Map<String, serde_json::Value>) -> Self {
        FacetArguments {
            criteria,
            facet: false,
            facet_field: Vec::new(),
        }
    }

    /// Copy stamped for a full faceted call (no field restriction).
    pub fn faceted(&self) -> Self {
        let mut args = self.clone();
        args.facet = true;
        args.facet_field.clear();
        args
    }

    /// Copy restricted to the given facet fields, for batch or single-facet
    /// value loads.
    pub fn restricted_to(&self, fields: &[FacetId]) -> Self {
        let mut args = self.clone();
        args.facet = true;
        args.facet_field = fields.to_vec();
        args
    }
}
