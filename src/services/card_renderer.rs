//! Card Renderer for Travelgo.
//!
//! Turns listing items into HTML fragments for the host page. One function
//! covers both item kinds; image choice is data-driven (server `image_url`,
//! else a per-kind placeholder). Every interpolated value goes through
//! `escape_html`.

use std::fmt::Write as _;

use crate::services::{auth_flow, listing_sorter};
use crate::types::errors::FetchError;
use crate::types::favorite::FavoriteSet;
use crate::types::listing::{Destination, ItemKind, ListingItem, Package};
use crate::types::pagination::{PageControl, PaginationState};

/// Longest description shown on a card, in characters.
pub const DESCRIPTION_LIMIT: usize = 100;

pub const MISSING_DESCRIPTION: &str = "No description available";

const DESTINATION_PLACEHOLDER: &str = "static/images/destinations/placeholder.jpg";
const PACKAGE_PLACEHOLDER: &str = "static/images/packages/placeholder.jpg";

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Cuts to the first 100 characters and appends `...`, but only when the
/// text is longer than that. Never splits a code point.
pub fn truncate_description(description: Option<&str>) -> String {
    match description {
        Some(text) if !text.is_empty() => {
            if text.chars().count() > DESCRIPTION_LIMIT {
                let mut cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
                cut.push_str("...");
                cut
            } else {
                text.to_string()
            }
        }
        _ => MISSING_DESCRIPTION.to_string(),
    }
}

/// Picks the card image: the server-supplied URL when present.
pub fn image_for(item: &ListingItem) -> &str {
    match item.image_url().map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => match item.kind() {
            ItemKind::Destination => DESTINATION_PLACEHOLDER,
            ItemKind::Package => PACKAGE_PLACEHOLDER,
        },
    }
}

/// Renders one card. Favorite state is looked up by the string form of the id.
pub fn render_card(item: &ListingItem, favorites: &FavoriteSet) -> String {
    match item {
        ListingItem::Destination(d) => render_destination(d, image_for(item), favorites),
        ListingItem::Package(p) => render_package(p, image_for(item)),
    }
}

pub fn render_cards(items: &[ListingItem], favorites: &FavoriteSet) -> String {
    items
        .iter()
        .map(|item| render_card(item, favorites))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_destination(d: &Destination, image: &str, favorites: &FavoriteSet) -> String {
    let id = escape_html(d.id.as_str());
    let title = escape_html(&format!("{}, {}", d.name, d.country));
    let heart = if favorites.contains(d.id.as_str()) {
        "fas"
    } else {
        "far"
    };

    format!(
        r#"<div class="destination-card" data-id="{id}">
  <div class="destination-image">
    <img src="{image}" alt="{title}">
    <div class="destination-overlay">
      <button class="favorite-btn" data-id="{id}"><i class="{heart} fa-heart"></i></button>
    </div>
  </div>
  <div class="destination-info">
    <h3>{title}</h3>
    <div class="destination-meta">
      <span><i class="fas fa-map-marker-alt"></i> {continent}</span>
      <span><i class="fas fa-star"></i> {rating}/5</span>
    </div>
    <p>{description}</p>
    <a href="{page}?id={id}" class="btn-details">See more</a>
  </div>
</div>"#,
        id = id,
        image = escape_html(image),
        title = title,
        heart = heart,
        continent = escape_html(&d.continent),
        rating = d.rating,
        description = escape_html(&truncate_description(d.description.as_deref())),
        page = ItemKind::Destination.detail_page(),
    )
}

/// Percentage shown on the discount badge, when the package is discounted.
pub fn discount_percent(package: &Package) -> Option<i64> {
    match package.old_price {
        Some(old) if old > package.price && old > 0.0 => {
            Some(((1.0 - package.price / old) * 100.0).round() as i64)
        }
        _ => None,
    }
}

fn render_package(p: &Package, image: &str) -> String {
    let id = escape_html(p.id.as_str());
    let name = escape_html(&p.name);
    let discount = discount_percent(p);

    let badge = discount
        .map(|pct| format!(r#"<div class="discount-badge">-{}%</div>"#, pct))
        .unwrap_or_default();
    let old_price = match (discount, p.old_price) {
        (Some(_), Some(old)) => format!(r#"<span class="old-price">{:.2} €</span>"#, old),
        _ => String::new(),
    };

    format!(
        r#"<div class="package-card" data-id="{id}">
  <div class="package-image">
    <img src="{image}" alt="{name}">
    {badge}
  </div>
  <div class="package-info">
    <h3>{name}</h3>
    <div class="package-meta">
      <span class="meta-item"><i class="fas fa-calendar-alt"></i> {duration} days</span>
    </div>
    <p>{description}</p>
    <div class="package-footer">
      <div class="package-price">{old_price}<span class="current-price">{price:.2} €</span></div>
      <a href="{page}?id={id}" class="btn-details">See more</a>
    </div>
  </div>
</div>"#,
        id = id,
        image = escape_html(image),
        name = name,
        badge = badge,
        duration = p.duration,
        description = escape_html(&truncate_description(p.description.as_deref())),
        old_price = old_price,
        price = p.price,
        page = ItemKind::Package.detail_page(),
    )
}

/// Inline replacement for the results container after a failed fetch.
pub fn render_error_panel(error: &FetchError, kind: ItemKind) -> String {
    format!(
        r#"<div class="error">
  <i class="fas fa-exclamation-triangle"></i>
  <p>{message}</p>
  <button class="retry-btn" data-action="retry">Try again</button>
  <a href="{page}" class="btn-details">See all {label}s</a>
</div>"#,
        message = escape_html(&error.user_message()),
        page = kind.listing_page(),
        label = kind.label(),
    )
}

pub fn render_empty_panel(kind: ItemKind) -> String {
    format!(
        r#"<div class="no-results">
  <i class="fas fa-search fa-3x"></i>
  <h3>No {label} found</h3>
  <p>Try changing your search criteria</p>
  <a href="{page}" class="suggestion-btn">See all {label}s</a>
</div>"#,
        label = kind.label(),
        page = kind.listing_page(),
    )
}

pub fn render_results_count(count: usize, kind: ItemKind) -> String {
    format!("{} {}(s) found", count, kind.label())
}

/// Previous/next buttons around the page window. Empty with one page or less.
pub fn render_pagination(state: &PaginationState) -> String {
    let total = state.total_pages();
    let controls = listing_sorter::page_window(state.current_page, total);
    if controls.is_empty() {
        return String::new();
    }
    let current = state.current_page.clamp(1, total);

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<button class="pagination-btn prev" data-page="{}"{}><i class="fas fa-chevron-left"></i></button>"#,
        current.saturating_sub(1).max(1),
        if current == 1 { " disabled" } else { "" }
    );
    for control in controls {
        match control {
            PageControl::Page(page) => {
                let _ = write!(
                    html,
                    r#"<button class="pagination-btn{}" data-page="{}">{}</button>"#,
                    if page == current { " active" } else { "" },
                    page,
                    page
                );
            }
            PageControl::Ellipsis => html.push_str(r#"<span class="pagination-dots">...</span>"#),
        }
    }
    let _ = write!(
        html,
        r#"<button class="pagination-btn next" data-page="{}"{}><i class="fas fa-chevron-right"></i></button>"#,
        (current + 1).min(total),
        if current == total { " disabled" } else { "" }
    );
    html
}

/// Shown on the favorites page when nobody is logged in.
pub fn render_login_required_panel() -> String {
    format!(
        r#"<div class="no-results">
  <i class="fas fa-lock fa-3x"></i>
  <h3>Log in to see your favorites</h3>
  <a href="{}" class="suggestion-btn">Log in</a>
</div>"#,
        auth_flow::LOGIN_PAGE
    )
}
