//! Filter and rank engine.
//!
//! Every call recomputes the derived fields from the raw records; nothing is
//! retained between calls.

use crate::core::geo::distance_km;
use crate::core::hours::is_open_now;
use crate::domain::model::{DerivedView, GeoPoint, ServiceRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_MAX_KM: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub category: Option<String>,
    pub open_now_only: bool,
    pub user_location: Option<GeoPoint>,
    pub max_km: f64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: None,
            open_now_only: false,
            user_location: None,
            max_km: DEFAULT_MAX_KM,
        }
    }
}

impl SearchQuery {
    fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }

    fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }
}

pub fn derive_view(record: &ServiceRecord, user_location: Option<GeoPoint>, now: &NaiveDateTime) -> DerivedView {
    let distance = match user_location {
        Some(_) => distance_km(user_location, record.location()),
        None => None,
    };
    DerivedView {
        record: record.clone(),
        is_open_now: is_open_now(record.hours.as_ref(), now),
        distance_km: distance,
    }
}

/// Case-folded text the free-text query is matched against.
pub fn search_text(record: &ServiceRecord) -> String {
    format!(
        "{} {} {} {} {}",
        record.name,
        record.description,
        record.categories.join(" "),
        record.address,
        record.eligibility.join(" ")
    )
    .to_lowercase()
}

pub fn search(services: &[ServiceRecord], query: &SearchQuery, now: &NaiveDateTime) -> Vec<DerivedView> {
    let text = query.normalized_text();
    let category = query.active_category();

    let matched: Vec<DerivedView> = services
        .iter()
        .map(|record| derive_view(record, query.user_location, now))
        .filter(|view| text.is_empty() || search_text(&view.record).contains(&text))
        .filter(|view| category.map_or(true, |c| view.record.categories.iter().any(|rc| rc == c)))
        .filter(|view| !query.open_now_only || view.is_open_now)
        .filter(|view| {
            query.user_location.is_none() || view.distance_km.map_or(true, |d| d <= query.max_km)
        })
        .collect();

    let ranked = merge_sort_by(matched, &mut rank);

    tracing::debug!(
        total = services.len(),
        matched = ranked.len(),
        "search complete"
    );
    ranked
}

/// Distinct categories across the dataset, sorted.
pub fn categories(services: &[ServiceRecord]) -> Vec<String> {
    services
        .iter()
        .flat_map(|s| s.categories.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Pairwise result ordering.
///
/// Distance decides only when both views have one. Every other pair is
/// ordered open before closed, then by collated name. Equal distances compare
/// equal so the merge keeps dataset order.
fn rank(a: &DerivedView, b: &DerivedView) -> Ordering {
    if let (Some(da), Some(db)) = (a.distance_km, b.distance_km) {
        return da.total_cmp(&db);
    }
    b.is_open_now
        .cmp(&a.is_open_now)
        .then_with(|| collate(&a.record.name, &b.record.name))
}

/// Stable top-down merge sort.
///
/// `rank` is not transitive when views with and without a distance are mixed,
/// and `slice::sort_by` may panic on such a comparator. This sort returns a
/// deterministic permutation for any comparator.
fn merge_sort_by<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // ties take from the left run
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            _ => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}

/// Locale-style name ordering: letters compare case-insensitively first,
/// then lowercase sorts before uppercase at the first case difference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    folded: String,
    upper_mask: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(name: &str) -> Self {
        Self {
            folded: name.to_lowercase(),
            upper_mask: name.chars().map(char::is_uppercase).collect(),
            raw: name.to_string(),
        }
    }
}

pub fn collate(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}
