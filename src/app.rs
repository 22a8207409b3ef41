//! App Core for Travelgo.
//!
//! Owns the store, the settings and the pipeline built from them.
//!
//! The RPC host shares one `App` behind a mutex. Network calls run on cloned
//! clients outside that lock, so `auth` is reference counted.

use std::sync::Arc;

use tracing::{info, warn};

use crate::database::connection::Database;
use crate::managers::storage_manager::StorageManager;
use crate::services::api_client::ApiClient;
use crate::services::auth_flow::AuthFlow;
use crate::services::listing_pipeline::ListingPipeline;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

pub struct App {
    pub db: Arc<Database>,
    pub storage: StorageManager,
    pub settings_engine: SettingsEngine,
    pub pipeline: ListingPipeline<StorageManager>,
    pub auth: Arc<AuthFlow<StorageManager>>,
}

impl App {
    /// Opens the store at `db_path` and loads settings from
    /// `settings_path` (platform default when `None`).
    ///
    /// An unreadable settings file is logged and replaced by defaults.
    pub fn new(db_path: &str, settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);

        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, path = settings_engine.get_config_path(), "using default settings");
        }
        settings_engine.apply_env_overrides();

        Self::with_parts(db, settings_engine)
    }

    /// Builds the app around an already opened database and loaded settings.
    pub fn with_parts(
        db: Arc<Database>,
        settings_engine: SettingsEngine,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let storage = StorageManager::new(db.clone());
        let (pipeline, auth) = Self::build_clients(&settings_engine, &storage)?;

        info!(
            api = settings_engine.get_settings().api.base_url.as_str(),
            "travelgo ready"
        );
        Ok(Self {
            db,
            storage,
            settings_engine,
            pipeline,
            auth,
        })
    }

    /// Points the HTTP-facing parts at the current `api.*` and `listing.*`
    /// settings. Cached results are dropped; favorites and in-flight syncs
    /// survive.
    pub fn reload_clients(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.settings_engine.get_settings();
        let api = ApiClient::new(&settings.api.base_url, settings.api.request_timeout_secs)?;
        let (page_size, default_sort) = (settings.listing.page_size, settings.listing.default_sort);

        self.auth = Arc::new(AuthFlow::new(api.clone(), self.storage.clone()));
        self.pipeline.reconfigure(api, page_size, default_sort);
        info!(api = settings.api.base_url.as_str(), "clients reloaded");
        Ok(())
    }

    fn build_clients(
        settings_engine: &SettingsEngine,
        storage: &StorageManager,
    ) -> Result<(ListingPipeline<StorageManager>, Arc<AuthFlow<StorageManager>>), Box<dyn std::error::Error>> {
        let settings = settings_engine.get_settings();
        let api = ApiClient::new(&settings.api.base_url, settings.api.request_timeout_secs)?;
        let pipeline = ListingPipeline::new(
            api.clone(),
            storage.clone(),
            settings.listing.page_size,
            settings.listing.default_sort,
        );
        let auth = Arc::new(AuthFlow::new(api, storage.clone()));
        Ok((pipeline, auth))
    }
}
