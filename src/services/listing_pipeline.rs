//! Listing Pipeline for Travelgo.
//!
//! filter collection -> query -> fetch -> local sort -> page slice -> cards.
//!
//! All mutable page state lives in one `AppState` owned by the pipeline.
//! Transitions are pure functions on `AppState`; the only side effects are the
//! network calls and the favorites write in `toggle_favorite`.
//!
//! Network calls are also exposed as free functions over `ApiClient`, so a
//! host can run them without holding the pipeline and apply the result
//! afterwards. Superseded searches are not cancelled: whichever result is
//! applied last wins.

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::managers::favorites_manager::{FavoritesManager, FavoritesManagerTrait};
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::managers::storage_manager::KeyValueStore;
use crate::services::api_client::ApiClient;
use crate::services::card_renderer;
use crate::services::favorite_sync::FavoriteSync;
use crate::services::filter_collector::{self, FilterSource};
use crate::services::listing_sorter;
use crate::services::map_projection;
use crate::types::errors::{FetchError, StorageError};
use crate::types::favorite::{FavoriteAction, FavoriteSet, SyncState};
use crate::types::filter::{FilterCriteria, SortOrder};
use crate::types::listing::{ItemKind, ListingItem};
use crate::types::map::MapPoint;
use crate::types::pagination::PaginationState;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to add favorites";

/// Everything a listing page needs to re-render without the network.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub kind: ItemKind,
    pub favorites: FavoriteSet,
    pub pagination: PaginationState,
    pub sort: SortOrder,
    /// Sorted results of the last successful search.
    pub last_results: Vec<ListingItem>,
}

impl AppState {
    pub fn new(kind: ItemKind, page_size: usize, sort: SortOrder) -> Self {
        Self {
            kind,
            favorites: FavoriteSet::new(),
            pagination: PaginationState::new(page_size),
            sort,
            last_results: Vec::new(),
        }
    }

    /// New result set: sorted, back to page 1.
    pub fn with_results(&self, kind: ItemKind, results: &[ListingItem], sort: SortOrder) -> Self {
        let mut pagination = PaginationState::new(self.pagination.items_per_page);
        pagination.total_items = results.len();
        Self {
            kind,
            favorites: self.favorites.clone(),
            pagination,
            sort,
            last_results: listing_sorter::sort_items(results, sort),
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        let mut next = self.clone();
        next.pagination.current_page = page;
        next
    }

    /// Re-sorts the cached results and returns to page 1.
    pub fn with_sort(&self, sort: SortOrder) -> Self {
        let mut next = self.clone();
        next.sort = sort;
        next.last_results = listing_sorter::sort_items(&self.last_results, sort);
        next.pagination.current_page = 1;
        next
    }

    pub fn with_favorites(&self, favorites: FavoriteSet) -> Self {
        let mut next = self.clone();
        next.favorites = favorites;
        next
    }

    pub fn current_page_items(&self) -> &[ListingItem] {
        listing_sorter::paginate(
            &self.last_results,
            self.pagination.current_page,
            self.pagination.items_per_page,
        )
    }
}

/// Fragments handed back to the host page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingView {
    pub results_html: String,
    pub count_text: String,
    pub pagination_html: String,
    pub total_items: usize,
    pub current_page: usize,
    /// User-facing message when the fetch failed.
    pub error: Option<String>,
}

impl ListingView {
    /// View of the current page of `state`.
    pub fn from_state(state: &AppState) -> Self {
        let results_html = if state.last_results.is_empty() {
            card_renderer::render_empty_panel(state.kind)
        } else {
            card_renderer::render_cards(state.current_page_items(), &state.favorites)
        };
        Self {
            results_html,
            count_text: card_renderer::render_results_count(state.last_results.len(), state.kind),
            pagination_html: card_renderer::render_pagination(&state.pagination),
            total_items: state.pagination.total_items,
            current_page: state.pagination.current_page,
            error: None,
        }
    }

    /// Unpaged view of `items`, used by the favorites and similar-items
    /// panels. No items renders the empty panel.
    pub fn of_items(items: &[ListingItem], kind: ItemKind, favorites: &FavoriteSet) -> Self {
        let results_html = if items.is_empty() {
            card_renderer::render_empty_panel(kind)
        } else {
            card_renderer::render_cards(items, favorites)
        };
        Self {
            results_html,
            count_text: card_renderer::render_results_count(items.len(), kind),
            pagination_html: String::new(),
            total_items: items.len(),
            current_page: 1,
            error: None,
        }
    }

    pub fn from_fetch(
        result: &Result<Vec<ListingItem>, FetchError>,
        kind: ItemKind,
        favorites: &FavoriteSet,
    ) -> Self {
        match result {
            Ok(items) => Self::of_items(items, kind, favorites),
            Err(e) => Self::from_error(e, kind),
        }
    }

    pub fn login_required() -> Self {
        Self {
            results_html: card_renderer::render_login_required_panel(),
            count_text: String::new(),
            pagination_html: String::new(),
            total_items: 0,
            current_page: 1,
            error: None,
        }
    }

    pub fn from_error(error: &FetchError, kind: ItemKind) -> Self {
        Self {
            results_html: card_renderer::render_error_panel(error, kind),
            count_text: String::new(),
            pagination_html: String::new(),
            total_items: 0,
            current_page: 1,
            error: Some(error.user_message()),
        }
    }
}

/// Result of a favorite click.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// No session; nothing changed. `message` is the alert text.
    LoginRequired { message: String },
    Toggled {
        id: String,
        favorited: bool,
        /// Whether a remote sync was started.
        sync_dispatched: bool,
    },
}

pub struct ListingPipeline<S: KeyValueStore + Clone> {
    api: ApiClient,
    favorites: FavoritesManager<S>,
    session: SessionManager<S>,
    sync: FavoriteSync,
    state: AppState,
    pending_sync: Vec<JoinHandle<()>>,
}

impl<S: KeyValueStore + Clone> ListingPipeline<S> {
    pub fn new(api: ApiClient, store: S, page_size: usize, default_sort: SortOrder) -> Self {
        let favorites = FavoritesManager::new(store.clone());
        let initial = AppState::new(ItemKind::Destination, page_size, default_sort);
        let state = match favorites.load() {
            Ok(set) => initial.with_favorites(set),
            Err(e) => {
                warn!(error = %e, "could not load favorites");
                initial
            }
        };

        Self {
            sync: FavoriteSync::new(api.clone()),
            api,
            favorites,
            session: SessionManager::new(store),
            state,
            pending_sync: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Runs a full search from the current inputs.
    ///
    /// On failure the error panel is returned and neither the cached results
    /// nor stored favorites change.
    pub async fn search(
        &mut self,
        kind: ItemKind,
        source: &(dyn FilterSource + Sync),
    ) -> ListingView {
        let criteria = filter_collector::collect(source);
        self.search_with(kind, &criteria).await
    }

    pub async fn search_with(&mut self, kind: ItemKind, criteria: &FilterCriteria) -> ListingView {
        let result = self.api.fetch_listing(kind, criteria).await;
        self.apply_listing(kind, criteria.sort_order, result)
    }

    /// Applies a finished listing fetch. Lets a caller run the fetch on a
    /// cloned `ApiClient` without holding the pipeline.
    ///
    /// Superseded searches are not cancelled; the last one applied wins.
    pub fn apply_listing(
        &mut self,
        kind: ItemKind,
        sort: SortOrder,
        result: Result<Vec<ListingItem>, FetchError>,
    ) -> ListingView {
        match result {
            Ok(items) => {
                info!(kind = kind.label(), count = items.len(), "listing loaded");
                self.refresh_favorites();
                self.state = self.state.with_results(kind, &items, sort);
                ListingView::from_state(&self.state)
            }
            Err(e) => {
                error!(kind = kind.label(), error = %e, "listing fetch failed");
                ListingView::from_error(&e, kind)
            }
        }
    }

    /// Re-slices the cached results. Pages past the end render no cards.
    pub fn change_page(&mut self, page: usize) -> ListingView {
        self.state = self.state.with_page(page);
        ListingView::from_state(&self.state)
    }

    pub fn change_sort(&mut self, sort: SortOrder) -> ListingView {
        self.state = self.state.with_sort(sort);
        ListingView::from_state(&self.state)
    }

    /// Flips a favorite for the logged-in user.
    ///
    /// The local set is written before any network call and is never rolled
    /// back. The remote mirror runs in the background when a token exists.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<ToggleOutcome, StorageError> {
        if !self.session.is_logged_in() {
            return Ok(ToggleOutcome::LoginRequired {
                message: LOGIN_REQUIRED_MESSAGE.to_string(),
            });
        }

        let (next, action) = self.favorites.toggle(id)?;
        self.state = self.state.with_favorites(next);

        let sync_dispatched = match self.session.current_session() {
            Ok(Some(session)) if !session.token.is_empty() => {
                self.pending_sync.retain(|h| !h.is_finished());
                self.pending_sync
                    .push(self.sync.dispatch(&session.token, id, action));
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "session unreadable, favorite kept local only");
                false
            }
        };

        Ok(ToggleOutcome::Toggled {
            id: id.to_string(),
            favorited: action == FavoriteAction::Add,
            sync_dispatched,
        })
    }

    pub fn favorite_state(&self, id: &str) -> Option<SyncState> {
        self.sync.state(id)
    }

    /// Waits for every remote favorite sync started so far.
    pub async fn wait_for_sync(&mut self) {
        for handle in self.pending_sync.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "favorite sync task aborted");
            }
        }
    }

    /// Cards for every favorite destination. Ids that fail to load are
    /// dropped from the page, not from the set.
    pub async fn load_favorites_page(&mut self) -> ListingView {
        match self.favorites_for_page() {
            Some(favorites) => {
                let items = fetch_favorites(&self.api, &favorites).await;
                ListingView::of_items(&items, ItemKind::Destination, &favorites)
            }
            None => ListingView::login_required(),
        }
    }

    /// The freshly reloaded favorite set, or `None` without a session.
    pub fn favorites_for_page(&mut self) -> Option<FavoriteSet> {
        if !self.session.is_logged_in() {
            return None;
        }
        self.refresh_favorites();
        Some(self.state.favorites.clone())
    }

    /// Up to three other items shown under a detail page.
    pub async fn similar(&self, kind: ItemKind, id: &str, continent: Option<&str>) -> ListingView {
        let result = fetch_similar(&self.api, kind, id, continent).await;
        ListingView::from_fetch(&result, kind, &self.state.favorites)
    }

    /// Every destination placed on the schematic map.
    pub async fn map_points(&self) -> Result<Vec<MapPoint>, FetchError> {
        fetch_map_points(&self.api).await
    }

    /// Swaps in a client and page settings after a configuration change.
    /// Cached results are dropped; favorites, sync states and in-flight
    /// syncs carry over.
    pub fn reconfigure(&mut self, api: ApiClient, page_size: usize, default_sort: SortOrder) {
        self.sync = self.sync.with_api(api.clone());
        self.api = api;
        self.state = AppState::new(self.state.kind, page_size, default_sort)
            .with_favorites(self.state.favorites.clone());
        self.refresh_favorites();
    }

    /// Picks up changes written by other pages since the last render.
    fn refresh_favorites(&mut self) {
        match self.favorites.load() {
            Ok(set) => self.state = self.state.with_favorites(set),
            Err(e) => warn!(error = %e, "could not reload favorites"),
        }
    }
}

/// How many similar items a detail page shows.
pub const SIMILAR_LIMIT: usize = 3;

/// Fetches each favorite destination, skipping the ones that fail.
pub async fn fetch_favorites(api: &ApiClient, favorites: &FavoriteSet) -> Vec<ListingItem> {
    let mut items = Vec::with_capacity(favorites.len());
    for id in favorites.iter() {
        match api.get_destination(id).await {
            Ok(destination) => items.push(ListingItem::Destination(destination)),
            Err(e) => warn!(%id, error = %e, "skipping favorite that failed to load"),
        }
    }
    items
}

/// Destinations of the same continent, or any packages, minus `id`.
pub async fn fetch_similar(
    api: &ApiClient,
    kind: ItemKind,
    id: &str,
    continent: Option<&str>,
) -> Result<Vec<ListingItem>, FetchError> {
    let mut criteria = FilterCriteria::default();
    if kind == ItemKind::Destination {
        if let Some(continent) = continent.map(str::trim).filter(|c| !c.is_empty()) {
            criteria.continents.insert(continent.to_string());
        }
    }

    let items = api.fetch_listing(kind, &criteria).await?;
    Ok(items
        .into_iter()
        .filter(|item| item.id().as_str() != id.trim())
        .take(SIMILAR_LIMIT)
        .collect())
}

pub async fn fetch_map_points(api: &ApiClient) -> Result<Vec<MapPoint>, FetchError> {
    let items = api
        .fetch_listing(ItemKind::Destination, &FilterCriteria::default())
        .await?;
    let destinations: Vec<_> = items
        .into_iter()
        .filter_map(|item| match item {
            ListingItem::Destination(d) => Some(d),
            ListingItem::Package(_) => None,
        })
        .collect();
    Ok(map_projection::project_all(&destinations))
}
