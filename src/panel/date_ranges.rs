//! Relative date-range bucketing for date-typed facets.
//!
//! Raw date-valued counts from the service are folded into a fixed hierarchy
//! of eleven human-relative ranges (five past, today, five future), anchored
//! at local midnight. The hierarchy is rebuilt whenever the anchor day
//! changes, so a panel left open across midnight never shows stale buckets.

use chrono::{Duration, Local, Months, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::types::{parse_timestamp, DateRangeValue, RangeBound};
use crate::wire::RawFacetValue;

/// Value id marking an exact boundary match for the unbounded past range.
pub const BEFORE_SENTINEL: &str = "before";
/// Value id marking an exact boundary match for the unbounded future range.
pub const AFTER_SENTINEL: &str = "after";
/// Value id for an ambiguous partial-date match: counted toward no range,
/// never warned about.
pub const BETWEEN_SENTINEL: &str = "between";

/// Sibling ranges whose original counts fold into a range's total.
static INCLUDED_RANGES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("last_week", &["yesterday"][..]),
        ("last_month", &["last_week", "yesterday"][..]),
        ("last_year", &["last_month", "last_week", "yesterday"][..]),
        ("next_week", &["tomorrow"][..]),
        ("next_month", &["next_week", "tomorrow"][..]),
        ("next_year", &["next_month", "next_week", "tomorrow"][..]),
    ])
});

fn included_for(id: &str) -> &'static [&'static str] {
    INCLUDED_RANGES.get(id).copied().unwrap_or(&[])
}

#[derive(Debug, Clone)]
struct RangeDef {
    id: &'static str,
    order: u32,
    text: &'static str,
    start: RangeBound,
    end: RangeBound,
}

/// One generation of the hierarchy, valid for a single anchor day.
#[derive(Debug)]
struct RangeSet {
    anchor: NaiveDateTime,
    ranges: Vec<RangeDef>,
}

fn build_ranges(midnight: NaiveDateTime) -> Vec<RangeDef> {
    let m = midnight;
    let e = m + Duration::days(1);
    let month_back = m.checked_sub_months(Months::new(1)).unwrap_or(m);
    let year_back = m.checked_sub_months(Months::new(12)).unwrap_or(m);
    let month_ahead = e.checked_add_months(Months::new(1)).unwrap_or(e);
    let year_ahead = e.checked_add_months(Months::new(12)).unwrap_or(e);

    let def = |id, order, text, start, end| RangeDef {
        id,
        order,
        text,
        start,
        end,
    };
    let at = RangeBound::At;

    vec![
        def("before", 0, "More than a year ago", RangeBound::Unbounded, at(year_back)),
        def("last_year", 1, "Last year", at(year_back), at(month_back)),
        def("last_month", 2, "Last month", at(month_back), at(m - Duration::days(7))),
        def("last_week", 3, "Last week", at(m - Duration::days(7)), at(m - Duration::days(1))),
        def("yesterday", 4, "Yesterday", at(m - Duration::days(1)), at(m)),
        def("today", 5, "Today", at(m), at(e)),
        def("tomorrow", 6, "Tomorrow", at(e), at(e + Duration::days(1))),
        def("next_week", 7, "Next week", at(e + Duration::days(1)), at(e + Duration::days(7))),
        def("next_month", 8, "Next month", at(e + Duration::days(7)), at(month_ahead)),
        def("next_year", 9, "Next year", at(month_ahead), at(year_ahead)),
        def("after", 10, "More than a year ahead", at(year_ahead), RangeBound::Unbounded),
    ]
}

/// The tightest bounded range containing `ts`: smallest span wins. Ranges
/// are closed intervals, so a value at a shared boundary matches both
/// neighbors; on a span tie the later-iterated range wins, which is the one
/// starting at `ts` (a midnight value belongs to the day it opens, not the
/// day it closes). Unbounded ranges are reachable only through their
/// sentinels, never by numeric comparison.
fn tightest_range(ranges: &[RangeDef], ts: NaiveDateTime) -> Option<&RangeDef> {
    let mut best: Option<(&RangeDef, i64)> = None;
    for range in ranges {
        let (RangeBound::At(start), RangeBound::At(end)) = (range.start, range.end) else {
            continue;
        };
        if ts < start || ts > end {
            continue;
        }
        let span = (end - start).num_seconds();
        if best.map(|(_, s)| span <= s).unwrap_or(true) {
            best = Some((range, span));
        }
    }
    best.map(|(range, _)| range)
}

/// Folds raw date-facet counts into the relative-range hierarchy.
///
/// Never fails: unmatched values degrade to a warning and are omitted.
pub struct DateRangeBucketer {
    cached: Option<RangeSet>,
}

impl DateRangeBucketer {
    pub fn new() -> Self {
        DateRangeBucketer { cached: None }
    }

    /// Bucket against the current local clock.
    pub fn bucket(&mut self, values: &[RawFacetValue]) -> Vec<DateRangeValue> {
        self.bucket_at(values, Local::now().naive_local())
    }

    /// Bucket against an explicit clock value (tests, replays).
    pub fn bucket_at(&mut self, values: &[RawFacetValue], now: NaiveDateTime) -> Vec<DateRangeValue> {
        let midnight = now.date().and_time(NaiveTime::MIN);
        let set = self.ranges_for(midnight);

        // Exact-match counts per range, zero-initialized then filled,
        // independent of any folding.
        let mut exact: IndexMap<&str, u64> = set.ranges.iter().map(|r| (r.id, 0u64)).collect();

        for value in values {
            match value.id.as_str() {
                BETWEEN_SENTINEL => continue,
                BEFORE_SENTINEL => {
                    if let Some(range) = set.ranges.iter().find(|r| r.start == RangeBound::Unbounded)
                    {
                        *exact.entry(range.id).or_insert(0) += value.count;
                    }
                }
                AFTER_SENTINEL => {
                    if let Some(range) = set.ranges.iter().find(|r| r.end == RangeBound::Unbounded) {
                        *exact.entry(range.id).or_insert(0) += value.count;
                    }
                }
                raw => match parse_timestamp(raw) {
                    Some(ts) => match tightest_range(&set.ranges, ts) {
                        Some(range) => *exact.entry(range.id).or_insert(0) += value.count,
                        None => warn!(value = raw, "date facet value matched no range"),
                    },
                    None => warn!(value = raw, "unparseable date facet value"),
                },
            }
        }

        // Fold included siblings from the original exact counts so overlaps
        // are additive, never compounding. Ranges that matched nothing
        // themselves are dropped.
        let mut buckets = Vec::new();
        for range in &set.ranges {
            let own = exact.get(range.id).copied().unwrap_or(0);
            if own == 0 {
                continue;
            }
            let folded: u64 = own
                + included_for(range.id)
                    .iter()
                    .map(|id| exact.get(id).copied().unwrap_or(0))
                    .sum::<u64>();
            buckets.push(DateRangeValue {
                id: range.id.to_string(),
                order: range.order,
                start: range.start,
                end: range.end,
                included_ranges: included_for(range.id)
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                count: folded,
                text: range.text.to_string(),
                selected: false,
            });
        }
        buckets
    }

    fn ranges_for(&mut self, midnight: NaiveDateTime) -> &RangeSet {
        let stale = self
            .cached
            .as_ref()
            .map(|set| set.anchor != midnight)
            .unwrap_or(true);
        if stale {
            if let Some(old) = &self.cached {
                debug!(old = %old.anchor, new = %midnight, "day rollover, regenerating date ranges");
            }
            self.cached = None;
        }
        self.cached.get_or_insert_with(|| RangeSet {
            anchor: midnight,
            ranges: build_ranges(midnight),
        })
    }
}

impl Default for DateRangeBucketer {
    fn default() -> Self {
        Self::new()
    }
}
