//! Query Builder for Travelgo.
//!
//! Serializes `FilterCriteria` into the query string of a listing endpoint.
//! Parameters are emitted in a fixed order, repeated groups in set order, so
//! the same criteria always give the same string.

use tracing::debug;

use crate::types::filter::FilterCriteria;
use crate::types::listing::ItemKind;

/// Builds the query string (no leading `?`, no trailing `&`).
pub fn build_query(criteria: &FilterCriteria, kind: ItemKind) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();

    match kind {
        ItemKind::Destination => {
            for continent in &criteria.continents {
                params.push(("continent", continent.clone()));
            }
            for category in &criteria.price_categories {
                params.push(("price_category", category.clone()));
            }
            if criteria.min_rating > 0 {
                params.push(("min_rating", criteria.min_rating.to_string()));
            }
            push_search(&mut params, criteria);
        }
        ItemKind::Package => {
            push_search(&mut params, criteria);
            if let Some(min) = criteria.min_price {
                params.push(("min_price", format_number(min)));
            }
            if let Some(max) = criteria.max_price {
                params.push(("max_price", format_number(max)));
            }
            if let Some(days) = criteria.min_duration {
                params.push(("min_duration", days.to_string()));
            }
        }
    }

    let query = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    debug!(kind = kind.label(), %query, "listing query built");
    query
}

/// Full listing URL for `base`, with `?query` only when there is one.
pub fn listing_url(base: &str, kind: ItemKind, criteria: &FilterCriteria) -> String {
    let mut url = format!("{}{}", base.trim_end_matches('/'), kind.listing_path());
    let query = build_query(criteria, kind);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

fn push_search(params: &mut Vec<(&str, String)>, criteria: &FilterCriteria) {
    let term = criteria.search_term.trim();
    if !term.is_empty() {
        params.push(("search", term.to_string()));
    }
}

/// `500` rather than `500.0` for whole amounts.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
