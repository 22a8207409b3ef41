//! HTML fragments for cards, panels and the pagination bar.

use travelgo::services::card_renderer::{
    discount_percent, escape_html, image_for, render_card, render_cards, render_empty_panel,
    render_error_panel, render_login_required_panel, render_pagination, render_results_count,
    truncate_description, DESCRIPTION_LIMIT, MISSING_DESCRIPTION,
};
use travelgo::types::errors::FetchError;
use travelgo::types::favorite::FavoriteSet;
use travelgo::types::listing::{Destination, ItemKind, ListingItem, Package};
use travelgo::types::pagination::PaginationState;

fn destination(id: u64, name: &str) -> Destination {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "country": "Japan",
        "continent": "Asie",
        "description": "Temples and gardens",
        "rating": 4.5
    }))
    .unwrap()
}

fn package(id: u64, price: f64, old_price: Option<f64>) -> Package {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": "Kyoto week",
        "duration": 7,
        "price": price,
        "old_price": old_price
    }))
    .unwrap()
}

#[test]
fn destination_card_contents() {
    let item = ListingItem::from(destination(3, "Kyoto"));
    let html = render_card(&item, &FavoriteSet::new());

    assert!(html.contains(r#"class="destination-card""#));
    assert!(html.contains("<h3>Kyoto, Japan</h3>"));
    assert!(html.contains("4.5/5"));
    assert!(html.contains(r#"href="destination-detail.html?id=3""#));
    assert!(html.contains(r#"<button class="favorite-btn" data-id="3"><i class="far fa-heart">"#));
    assert!(html.contains("static/images/destinations/placeholder.jpg"));
}

#[test]
fn favorite_destination_shows_solid_heart() {
    let item = ListingItem::from(destination(3, "Kyoto"));
    let favorites: FavoriteSet = ["3"].into_iter().collect();
    assert!(render_card(&item, &favorites).contains(r#"<i class="fas fa-heart">"#));
}

#[test]
fn names_are_escaped() {
    let item = ListingItem::from(destination(1, "<script>alert('x')</script>"));
    let html = render_card(&item, &FavoriteSet::new());
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
}

#[test]
fn server_image_is_preferred() {
    let mut d = destination(1, "Kyoto");
    d.image_url = Some("https://cdn.test/kyoto.jpg".to_string());
    let item = ListingItem::from(d);
    assert_eq!(image_for(&item), "https://cdn.test/kyoto.jpg");

    let mut blank = destination(2, "Nara");
    blank.image_url = Some("   ".to_string());
    assert_eq!(
        image_for(&ListingItem::from(blank)),
        "static/images/destinations/placeholder.jpg"
    );
}

#[test]
fn package_card_with_discount() {
    let item = ListingItem::from(package(9, 750.0, Some(1000.0)));
    let html = render_card(&item, &FavoriteSet::new());

    assert!(html.contains(r#"class="package-card""#));
    assert!(html.contains(r#"<div class="discount-badge">-25%</div>"#));
    assert!(html.contains(r#"<span class="old-price">1000.00 €</span>"#));
    assert!(html.contains(r#"<span class="current-price">750.00 €</span>"#));
    assert!(html.contains("7 days"));
    assert!(html.contains(r#"href="package-detail.html?id=9""#));
    assert!(!html.contains("favorite-btn"));
}

#[test]
fn package_without_discount_has_no_badge() {
    assert_eq!(discount_percent(&package(1, 500.0, None)), None);
    assert_eq!(discount_percent(&package(1, 500.0, Some(400.0))), None);

    let html = render_card(&ListingItem::from(package(1, 500.0, None)), &FavoriteSet::new());
    assert!(!html.contains("discount-badge"));
    assert!(!html.contains("old-price"));
}

#[test]
fn description_truncation_boundary() {
    let exact = "a".repeat(DESCRIPTION_LIMIT);
    assert_eq!(truncate_description(Some(&exact)), exact);

    let long = "é".repeat(DESCRIPTION_LIMIT + 1);
    let cut = truncate_description(Some(&long));
    assert!(cut.ends_with("..."));
    assert_eq!(cut.chars().count(), DESCRIPTION_LIMIT + 3);

    assert_eq!(truncate_description(None), MISSING_DESCRIPTION);
    assert_eq!(truncate_description(Some("")), MISSING_DESCRIPTION);
}

#[test]
fn cards_keep_input_order() {
    let items = vec![
        ListingItem::from(destination(1, "Alpha")),
        ListingItem::from(destination(2, "Beta")),
    ];
    let html = render_cards(&items, &FavoriteSet::new());
    let alpha = html.find("Alpha").unwrap();
    let beta = html.find("Beta").unwrap();
    assert!(alpha < beta);
    assert_eq!(render_cards(&[], &FavoriteSet::new()), "");
}

#[test]
fn panels() {
    let error = FetchError::Network("connection refused".to_string());
    let html = render_error_panel(&error, ItemKind::Destination);
    assert!(html.contains(&escape_html(&error.user_message())));
    assert!(html.contains(r#"data-action="retry""#));
    assert!(html.contains(r#"href="destinations.html""#));

    let empty = render_empty_panel(ItemKind::Package);
    assert!(empty.contains("No package found"));
    assert!(empty.contains(r#"href="packages.html""#));

    assert_eq!(render_results_count(12, ItemKind::Destination), "12 destination(s) found");
    assert!(render_login_required_panel().contains(r#"href="auth.html""#));
}

#[test]
fn pagination_single_page_is_empty() {
    let state = PaginationState {
        current_page: 1,
        items_per_page: 9,
        total_items: 9,
    };
    assert_eq!(render_pagination(&state), "");
}

#[test]
fn pagination_first_page() {
    let state = PaginationState {
        current_page: 1,
        items_per_page: 9,
        total_items: 30,
    };
    let html = render_pagination(&state);
    assert!(html.contains(r#"class="pagination-btn prev" data-page="1" disabled"#));
    assert!(html.contains(r#"<button class="pagination-btn active" data-page="1">1</button>"#));
    assert!(html.contains(r#"<button class="pagination-btn" data-page="4">4</button>"#));
    assert!(html.contains(r#"class="pagination-btn next" data-page="2">"#));
}

#[test]
fn pagination_last_page_disables_next() {
    let state = PaginationState {
        current_page: 4,
        items_per_page: 9,
        total_items: 30,
    };
    let html = render_pagination(&state);
    assert!(html.contains(r#"class="pagination-btn next" data-page="4" disabled"#));
    assert!(html.contains(r#"class="pagination-btn prev" data-page="3">"#));
}

#[test]
fn pagination_long_range_has_dots() {
    let state = PaginationState {
        current_page: 10,
        items_per_page: 1,
        total_items: 20,
    };
    let html = render_pagination(&state);
    assert_eq!(html.matches("pagination-dots").count(), 2);
    assert!(html.contains(r#"data-page="20">20</button>"#));
}
