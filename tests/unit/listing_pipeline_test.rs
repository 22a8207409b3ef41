//! End-to-end listing flows against the stub backend: search, paging,
//! sorting, favorites and the map.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{destination_json, destinations_json, StubRoute, StubServer};
use travelgo::database::connection::Database;
use travelgo::managers::session_manager::SessionManagerTrait;
use travelgo::managers::storage_manager::{keys, KeyValueStore, StorageArea, StorageManager};
use travelgo::services::api_client::ApiClient;
use travelgo::services::filter_collector::{FormState, CONTINENT_GROUP, SORT_FIELD};
use travelgo::services::listing_pipeline::{
    ListingPipeline, ToggleOutcome, LOGIN_REQUIRED_MESSAGE, SIMILAR_LIMIT,
};
use travelgo::types::favorite::SyncState;
use travelgo::types::filter::SortOrder;
use travelgo::types::listing::{ItemKind, ListingItem};
use travelgo::types::session::LoginResponse;

const PAGE_SIZE: usize = 9;

fn store() -> StorageManager {
    StorageManager::new(Arc::new(Database::open_in_memory().unwrap()))
}

fn pipeline(base_url: &str, store: &StorageManager) -> ListingPipeline<StorageManager> {
    let api = ApiClient::new(base_url, 2).unwrap();
    ListingPipeline::new(api, store.clone(), PAGE_SIZE, SortOrder::Popularity)
}

fn log_in(pipeline: &ListingPipeline<StorageManager>) {
    pipeline
        .session()
        .login(&LoginResponse {
            access_token: "tok-123".to_string(),
            token_type: Some("bearer".to_string()),
            user_name: "Ada".to_string(),
            user_email: "ada@example.com".to_string(),
        })
        .unwrap();
}

/// Every stored key/value pair, both areas, in a stable order.
fn storage_snapshot(db: &Database) -> Vec<(String, String, String)> {
    let conn = db.connection();
    let mut stmt = conn
        .prepare(
            "SELECT 'local', key, value FROM local_storage
             UNION ALL SELECT 'session', key, value FROM session_storage
             ORDER BY 1, 2",
        )
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}

fn names(items: &[ListingItem]) -> Vec<String> {
    items.iter().map(|i| i.name().to_string()).collect()
}

#[tokio::test]
async fn search_renders_first_page_and_count() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(20))]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.search(ItemKind::Destination, &FormState::new()).await;

    assert_eq!(view.error, None);
    assert_eq!(view.total_items, 20);
    assert_eq!(view.current_page, 1);
    assert_eq!(view.count_text, "20 destination(s) found");
    assert_eq!(view.results_html.matches("destination-card\"").count(), PAGE_SIZE);
    assert!(view.pagination_html.contains(r#"data-page="3">3</button>"#));
    assert_eq!(pipeline.state().pagination.total_pages(), 3);
}

#[tokio::test]
async fn form_inputs_reach_the_backend() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, "[]")]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);

    let form = FormState::new()
        .check(CONTINENT_GROUP, "Europe")
        .with_value(SORT_FIELD, "name-asc");
    let view = pipeline.search(ItemKind::Destination, &form).await;

    assert!(view.results_html.contains("No destination found"));
    assert_eq!(pipeline.state().sort, SortOrder::NameAsc);
    assert_eq!(server.requests_to("GET", "/destinations")[0].query(), "continent=Europe");
}

#[tokio::test]
async fn failed_search_keeps_previous_results() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(3))]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);
    pipeline.search(ItemKind::Destination, &FormState::new()).await;
    let before = pipeline.state().clone();

    // Packages are not served by the stub, so this search fails with a 404.
    let view = pipeline.search(ItemKind::Package, &FormState::new()).await;
    assert_eq!(view.error.as_deref(), Some("The requested item could not be found (404 Not Found)."));
    assert!(view.results_html.contains(r#"data-action="retry""#));
    assert_eq!(pipeline.state(), &before);
    assert_eq!(pipeline.change_page(1).total_items, 3);
}

#[tokio::test]
async fn paging_and_sorting_use_the_cache() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(20))]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);
    pipeline.search(ItemKind::Destination, &FormState::new()).await;

    let view = pipeline.change_page(3);
    assert_eq!(view.current_page, 3);
    assert_eq!(pipeline.state().current_page_items().len(), 2);

    let view = pipeline.change_sort(SortOrder::NameDesc);
    assert_eq!(view.current_page, 1);
    assert_eq!(
        names(&pipeline.state().current_page_items()[..2]),
        vec!["Destination 20", "Destination 19"]
    );

    let view = pipeline.change_page(99);
    assert!(pipeline.state().current_page_items().is_empty());
    assert_eq!(view.total_items, 20);

    assert_eq!(server.requests_to("GET", "/destinations").len(), 1);
}

#[tokio::test]
async fn toggle_requires_login() {
    let server = StubServer::start(vec![]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);

    let outcome = pipeline.toggle_favorite("3").unwrap();
    assert_eq!(
        outcome,
        ToggleOutcome::LoginRequired {
            message: LOGIN_REQUIRED_MESSAGE.to_string()
        }
    );
    assert_eq!(store.get(StorageArea::Local, keys::FAVORITES).unwrap(), None);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn toggle_writes_locally_and_mirrors_remotely() {
    let server = StubServer::start(vec![
        StubRoute::new("POST", "/favorites/3", 200, "{}"),
        StubRoute::new("DELETE", "/favorites/3", 200, "{}"),
    ])
    .await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);
    log_in(&pipeline);

    let outcome = pipeline.toggle_favorite("3").unwrap();
    assert_eq!(
        outcome,
        ToggleOutcome::Toggled {
            id: "3".to_string(),
            favorited: true,
            sync_dispatched: true
        }
    );
    assert_eq!(
        store.get(StorageArea::Local, keys::FAVORITES).unwrap().as_deref(),
        Some(r#"["3"]"#)
    );
    assert!(pipeline.state().favorites.contains("3"));

    pipeline.wait_for_sync().await;
    assert_eq!(pipeline.favorite_state("3"), Some(SyncState::Synced));
    let posts = server.requests_to("POST", "/favorites/3");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].header("authorization"), Some("Bearer tok-123"));

    pipeline.toggle_favorite("3").unwrap();
    pipeline.wait_for_sync().await;
    assert_eq!(server.requests_to("DELETE", "/favorites/3").len(), 1);
    assert!(!pipeline.state().favorites.contains("3"));
}

#[tokio::test]
async fn failed_remote_sync_keeps_local_favorite() {
    let server = StubServer::start(vec![StubRoute::new("POST", "/favorites/5", 500, "{}")]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);
    log_in(&pipeline);

    pipeline.toggle_favorite("5").unwrap();
    pipeline.wait_for_sync().await;

    assert_eq!(pipeline.favorite_state("5"), Some(SyncState::Failed));
    assert!(pipeline.state().favorites.contains("5"));
    assert_eq!(
        store.get(StorageArea::Local, keys::FAVORITES).unwrap().as_deref(),
        Some(r#"["5"]"#)
    );
}

#[tokio::test]
async fn favorite_hearts_follow_the_stored_set() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(2))]).await;
    let store = store();
    store.set(StorageArea::Local, keys::FAVORITES, r#"["2"]"#).unwrap();
    let mut pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.search(ItemKind::Destination, &FormState::new()).await;
    assert!(view
        .results_html
        .contains(r#"data-id="2"><i class="fas fa-heart">"#));
    assert!(view
        .results_html
        .contains(r#"data-id="1"><i class="far fa-heart">"#));
}

#[tokio::test]
async fn favorites_page_skips_missing_items() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations/1", 200, destination_json(1, "Paris"))]).await;
    let store = store();
    store.set(StorageArea::Local, keys::FAVORITES, r#"["1","404"]"#).unwrap();
    let mut pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.load_favorites_page().await;
    assert!(view.results_html.contains("Log in to see your favorites"));

    log_in(&pipeline);
    let view = pipeline.load_favorites_page().await;
    assert_eq!(view.total_items, 1);
    assert!(view.results_html.contains("Paris, France"));
    assert_eq!(view.count_text, "1 destination(s) found");
    assert!(pipeline.state().favorites.contains("404"));
}

#[tokio::test]
async fn map_points_cover_every_destination() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(6))]).await;
    let store = store();
    let pipeline = pipeline(&server.base_url, &store);

    let points = pipeline.map_points().await.unwrap();
    assert_eq!(points.len(), 6);
    assert!(points.iter().all(|p| !p.projected));
    assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[tokio::test]
async fn partial_coordinates_do_not_fail_the_listing() {
    let body = serde_json::json!([
        {"id": 1, "name": "Nowhere", "continent": "Europe", "rating": 4.0, "coordinates": {}},
        {"id": 2, "name": "Half", "continent": "Asie", "rating": 3.0, "coordinates": {"lat": 35.7}},
        {"id": 3, "name": "Paris", "continent": "Europe", "rating": 4.7,
         "coordinates": {"lat": 48.86, "lng": 2.35}}
    ])
    .to_string();
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, body)]).await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.search(ItemKind::Destination, &FormState::new()).await;
    assert_eq!(view.error, None);
    assert_eq!(view.total_items, 3);

    let points = pipeline.map_points().await.unwrap();
    let projected: Vec<bool> = points.iter().map(|p| p.projected).collect();
    assert_eq!(projected, vec![false, false, true]);
}

#[tokio::test]
async fn slow_add_cannot_overwrite_a_later_remove() {
    let server = StubServer::start(vec![
        StubRoute::new("POST", "/favorites/3", 500, "{}").delayed(Duration::from_millis(500)),
        StubRoute::new("DELETE", "/favorites/3", 200, "{}"),
    ])
    .await;
    let store = store();
    let mut pipeline = pipeline(&server.base_url, &store);
    log_in(&pipeline);

    pipeline.toggle_favorite("3").unwrap();
    pipeline.toggle_favorite("3").unwrap();
    pipeline.wait_for_sync().await;

    assert_eq!(server.requests_to("POST", "/favorites/3").len(), 1);
    assert_eq!(server.requests_to("DELETE", "/favorites/3").len(), 1);
    assert_eq!(pipeline.favorite_state("3"), Some(SyncState::Synced));
    assert!(!pipeline.state().favorites.contains("3"));
}

#[tokio::test]
async fn failed_search_leaves_storage_untouched() {
    let server = StubServer::start(vec![StubRoute::new(
        "GET",
        "/destinations",
        500,
        r#"{"detail":"boom"}"#,
    )])
    .await;
    let db = Arc::new(Database::open_in_memory().unwrap());
    let store = StorageManager::new(db.clone());
    store.set(StorageArea::Local, keys::FAVORITES, r#"["2","9"]"#).unwrap();
    let mut pipeline = pipeline(&server.base_url, &store);
    log_in(&pipeline);
    let before = storage_snapshot(&db);

    let view = pipeline.search(ItemKind::Destination, &FormState::new()).await;

    assert!(view.results_html.contains("500"));
    assert_eq!(
        view.error.as_deref(),
        Some("The server answered with an error (500 Internal Server Error). Please try again later.")
    );
    assert_eq!(storage_snapshot(&db), before);
    assert!(pipeline.state().favorites.contains("9"));
}

#[tokio::test]
async fn similar_destinations_share_the_continent() {
    let server = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(8))]).await;
    let store = store();
    let pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.similar(ItemKind::Destination, "2", Some("Europe")).await;

    assert_eq!(view.error, None);
    assert_eq!(view.total_items, SIMILAR_LIMIT);
    assert!(!view.results_html.contains(r#"data-id="2""#));
    assert!(view.results_html.contains(r#"data-id="1""#));
    assert!(view.pagination_html.is_empty());
    assert_eq!(server.requests_to("GET", "/destinations")[0].query(), "continent=Europe");
}

#[tokio::test]
async fn similar_packages_without_others_show_empty_panel() {
    let server = StubServer::start(vec![StubRoute::new(
        "GET",
        "/packages/",
        200,
        r#"[{"id": 4, "name": "Bali escape", "duration": 10, "price": 1299.0}]"#,
    )])
    .await;
    let store = store();
    let pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.similar(ItemKind::Package, "4", None).await;
    assert_eq!(view.total_items, 0);
    assert!(view.results_html.contains("No package found"));
    assert_eq!(server.requests_to("GET", "/packages/")[0].query(), "");
}

#[tokio::test]
async fn similar_reports_backend_failure() {
    let server = StubServer::start(vec![]).await;
    let store = store();
    let pipeline = pipeline(&server.base_url, &store);

    let view = pipeline.similar(ItemKind::Destination, "1", None).await;
    assert_eq!(
        view.error.as_deref(),
        Some("The requested item could not be found (404 Not Found).")
    );
}

#[tokio::test]
async fn reconfigure_keeps_pending_sync_and_favorites() {
    let old = StubServer::start(vec![
        StubRoute::new("POST", "/favorites/6", 200, "{}").delayed(Duration::from_millis(300)),
    ])
    .await;
    let new = StubServer::start(vec![StubRoute::new("GET", "/destinations", 200, destinations_json(4))]).await;
    let store = store();
    let mut pipeline = pipeline(&old.base_url, &store);
    log_in(&pipeline);

    pipeline.toggle_favorite("6").unwrap();
    pipeline.reconfigure(ApiClient::new(&new.base_url, 2).unwrap(), 2, SortOrder::NameAsc);
    assert_eq!(pipeline.state().pagination.items_per_page, 2);
    assert!(pipeline.state().favorites.contains("6"));

    pipeline.wait_for_sync().await;
    assert_eq!(old.requests_to("POST", "/favorites/6").len(), 1);
    assert_eq!(pipeline.favorite_state("6"), Some(SyncState::Synced));

    let view = pipeline.search(ItemKind::Destination, &FormState::new()).await;
    assert_eq!(view.total_items, 4);
    assert_eq!(new.requests_to("GET", "/destinations").len(), 1);
}
