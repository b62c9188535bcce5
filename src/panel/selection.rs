//! Wire codec for facet selections.
//!
//! A selection travels as flat tokens: `facetId:valueId` for plain values,
//! `facetId:start;end` for date ranges (boundaries ISO-formatted, `*` for
//! unbounded). Encoding and decoding are stateless and lossless for any
//! currently-selected value.

use tracing::warn;

use crate::types::{parse_timestamp, Facet, FacetEntry, RangeBound, WILDCARD};

pub const FACET_DELIMITER: char = ':';
pub const RANGE_DELIMITER: char = ';';

/// Encode every selected value of the given facets, facet order first, then
/// value array order.
pub fn encode<'a, I>(facets: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Facet>,
{
    let mut tokens = Vec::new();
    for facet in facets {
        for entry in &facet.values {
            if !entry.selected() {
                continue;
            }
            match entry {
                FacetEntry::Plain(value) => {
                    tokens.push(format!("{}{}{}", facet.id, FACET_DELIMITER, value.id));
                }
                FacetEntry::DateRange(value) => {
                    tokens.push(format!(
                        "{}{}{}{}{}",
                        facet.id,
                        FACET_DELIMITER,
                        value.start.format(),
                        RANGE_DELIMITER,
                        value.end.format()
                    ));
                }
            }
        }
    }
    tokens
}

/// Mark the facet's values selected for every token addressed to it.
/// Idempotent; tokens that match nothing are logged and skipped.
pub fn decode(facet: &mut Facet, tokens: &[String]) {
    for token in tokens {
        let Some((facet_id, rest)) = token.split_once(FACET_DELIMITER) else {
            warn!(%token, "malformed selection token");
            continue;
        };
        if facet_id != facet.id {
            continue;
        }
        let mut matched = false;
        if let Some((start, end)) = rest.split_once(RANGE_DELIMITER) {
            for entry in &mut facet.values {
                if let FacetEntry::DateRange(value) = entry {
                    if bound_matches(start, &value.start) && bound_matches(end, &value.end) {
                        value.selected = true;
                        matched = true;
                    }
                }
            }
        } else {
            for entry in &mut facet.values {
                if entry.id() == rest {
                    entry.set_selected(true);
                    matched = true;
                }
            }
        }
        if !matched {
            warn!(facet = %facet.id, %token, "selection token matched no value");
        }
    }
}

/// Whether any token targets the given facet.
pub fn has_token_for(facet_id: &str, tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|t| t.split_once(FACET_DELIMITER).map(|(id, _)| id) == Some(facet_id))
}

/// A token boundary matches a value boundary by formatted equality, with a
/// `*` token matching anything. Bare-date tokens normalize to midnight
/// before comparison.
fn bound_matches(token: &str, bound: &RangeBound) -> bool {
    if token == WILDCARD {
        return true;
    }
    match bound {
        RangeBound::Unbounded => false,
        RangeBound::At(ts) => {
            bound.format() == token || parse_timestamp(token).map_or(false, |t| t == *ts)
        }
    }
}
