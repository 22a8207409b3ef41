//! Remote mirroring of favorite toggles.
//!
//! Fire-and-forget: the local set has already changed when `dispatch` runs.
//! Each id moves `Pending` -> `Synced` or `Failed`; failures are logged and
//! never retried or rolled back.
//!
//! Every dispatch for an id bumps that id's generation. A finished task only
//! records its outcome while its generation is still the latest, so a slow
//! older request can never overwrite the state of a newer one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::services::api_client::ApiClient;
use crate::types::favorite::{FavoriteAction, SyncState};

#[derive(Debug, Clone, Copy)]
struct Entry {
    generation: u64,
    state: SyncState,
}

#[derive(Clone)]
pub struct FavoriteSync {
    api: ApiClient,
    states: Arc<Mutex<HashMap<String, Entry>>>,
}

impl FavoriteSync {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Same tracked states, new client. Tasks already running keep the
    /// client they were started with.
    pub fn with_api(&self, api: ApiClient) -> Self {
        Self {
            api,
            states: Arc::clone(&self.states),
        }
    }

    /// Marks `id` pending and spawns the POST (add) or DELETE (remove).
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, token: &str, id: &str, action: FavoriteAction) -> JoinHandle<()> {
        let generation = self.begin(id);

        let api = self.api.clone();
        let states = Arc::clone(&self.states);
        let token = Zeroizing::new(token.to_string());
        let id = id.to_string();

        tokio::spawn(async move {
            let result = match action {
                FavoriteAction::Add => api.add_favorite(&token, &id).await,
                FavoriteAction::Remove => api.remove_favorite(&token, &id).await,
            };
            let state = match result {
                Ok(_) => {
                    debug!(%id, ?action, "favorite mirrored");
                    SyncState::Synced
                }
                Err(e) => {
                    warn!(%id, ?action, error = %e, "favorite sync failed");
                    SyncState::Failed
                }
            };

            let mut states = states.lock().unwrap_or_else(|p| p.into_inner());
            match states.get_mut(&id) {
                Some(entry) if entry.generation == generation => entry.state = state,
                _ => debug!(%id, ?action, "outcome superseded by a newer toggle"),
            }
        })
    }

    /// `None` for ids never dispatched in this process.
    pub fn state(&self, id: &str) -> Option<SyncState> {
        self.states
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(id)
            .map(|entry| entry.state)
    }

    fn begin(&self, id: &str) -> u64 {
        let mut states = self.states.lock().unwrap_or_else(|p| p.into_inner());
        let entry = states.entry(id.to_string()).or_insert(Entry {
            generation: 0,
            state: SyncState::Pending,
        });
        entry.generation += 1;
        entry.state = SyncState::Pending;
        entry.generation
    }
}
