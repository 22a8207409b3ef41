//! Filter Collector for Travelgo.
//!
//! Reads whatever the host UI exposes through `FilterSource` into a
//! `FilterCriteria`. Absent or unreadable inputs never fail: they mean
//! "no constraint".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::filter::{FilterCriteria, SortOrder};

/// Checkbox groups.
pub const CONTINENT_GROUP: &str = "continent";
pub const PRICE_CATEGORY_GROUP: &str = "price_category";

/// Single-value fields.
pub const MIN_RATING_FIELD: &str = "min-rating";
pub const SEARCH_TERM_FIELD: &str = "search-term";
pub const PACKAGE_SEARCH_FIELD: &str = "search-package";
pub const SORT_FIELD: &str = "sort-select";
pub const PACKAGE_SORT_FIELD: &str = "sort-packages";
pub const MIN_PRICE_FIELD: &str = "min-price";
pub const MAX_PRICE_FIELD: &str = "max-price";
pub const MIN_DURATION_FIELD: &str = "min-duration";

const MAX_RATING: i64 = 5;

/// Read access to the filter inputs of a page.
pub trait FilterSource {
    /// Values of the checked boxes in `group`, in document order.
    fn checked_values(&self, group: &str) -> Vec<String>;
    /// Current value of the field `name`, `None` when the page has no such input.
    fn value(&self, name: &str) -> Option<String>;
}

/// Snapshot of a filter form, as sent by the host UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormState {
    #[serde(default)]
    pub checked: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, group: &str, value: &str) -> Self {
        self.checked
            .entry(group.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl FilterSource for FormState {
    fn checked_values(&self, group: &str) -> Vec<String> {
        self.checked.get(group).cloned().unwrap_or_default()
    }

    fn value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Builds the criteria from the current inputs. No side effects.
pub fn collect(source: &dyn FilterSource) -> FilterCriteria {
    let criteria = FilterCriteria {
        continents: non_blank(source.checked_values(CONTINENT_GROUP)),
        price_categories: non_blank(source.checked_values(PRICE_CATEGORY_GROUP)),
        min_rating: parse_rating(source.value(MIN_RATING_FIELD)),
        search_term: first_present(source, &[SEARCH_TERM_FIELD, PACKAGE_SEARCH_FIELD])
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        sort_order: first_present(source, &[SORT_FIELD, PACKAGE_SORT_FIELD])
            .and_then(|s| SortOrder::from_token(&s))
            .unwrap_or_default(),
        min_price: parse_amount(source.value(MIN_PRICE_FIELD)),
        max_price: parse_amount(source.value(MAX_PRICE_FIELD)),
        min_duration: source
            .value(MIN_DURATION_FIELD)
            .and_then(|s| s.trim().parse::<u32>().ok()),
    };
    debug!(?criteria, "filters collected");
    criteria
}

fn non_blank(values: Vec<String>) -> std::collections::BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn first_present(source: &dyn FilterSource, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| source.value(name))
        .find(|v| !v.trim().is_empty())
}

/// Non-numeric and negative ratings mean no constraint; anything above five
/// is capped.
fn parse_rating(raw: Option<String>) -> u8 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n.min(MAX_RATING) as u8,
        _ => 0,
    }
}

fn parse_amount(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}
