//! Local sorter and paginator for Travelgo.
//!
//! The backend neither sorts nor pages; both happen here on the cached result
//! set. Sorting is stable, so ties keep server order.

use std::cmp::Ordering;

use crate::types::filter::SortOrder;
use crate::types::listing::ListingItem;
use crate::types::pagination::PageControl;

/// Number of numbered buttons in the pagination bar.
const WINDOW: usize = 5;

/// Returns a new, reordered copy of `items`.
///
/// Price and duration orders only mean something for packages; items without
/// the field go after those that have it.
pub fn sort_items(items: &[ListingItem], order: SortOrder) -> Vec<ListingItem> {
    let mut sorted = items.to_vec();
    match order {
        SortOrder::Popularity | SortOrder::RatingDesc => {
            sorted.sort_by(|a, b| b.rating().total_cmp(&a.rating()))
        }
        SortOrder::NameAsc => sorted.sort_by(|a, b| a.name().cmp(b.name())),
        SortOrder::NameDesc => sorted.sort_by(|a, b| b.name().cmp(a.name())),
        SortOrder::PriceAsc => sorted.sort_by(|a, b| missing_last(a.price(), b.price(), false)),
        SortOrder::PriceDesc => sorted.sort_by(|a, b| missing_last(a.price(), b.price(), true)),
        SortOrder::DurationAsc => sorted.sort_by(|a, b| {
            missing_last(
                a.duration().map(f64::from),
                b.duration().map(f64::from),
                false,
            )
        }),
    }
    sorted
}

fn missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Slice `[(page-1)*page_size, page*page_size)` clamped to `items`.
///
/// Page 0, a zero page size and pages past the end all give an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = match (page - 1).checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// `ceil(total_items / page_size)`; 0 for an empty set.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Buttons of the pagination bar: up to five pages around `current`, plus
/// the first and last page with ellipses when they fall outside the window.
/// Empty when there is at most one page.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageControl> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(2).max(1);
    let end = (start + WINDOW - 1).min(total_pages);
    if end - start < WINDOW - 1 {
        start = end.saturating_sub(WINDOW - 1).max(1);
    }

    let mut controls = Vec::with_capacity(WINDOW + 4);
    if start > 1 {
        controls.push(PageControl::Page(1));
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }
    controls.extend((start..=end).map(PageControl::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Page(total_pages));
    }
    controls
}
