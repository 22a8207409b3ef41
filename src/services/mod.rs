// Travelgo services
// Services implement the listing pipeline and its collaborators: filters, queries, the API, sorting, rendering, sync, auth, settings.

pub mod api_client;
pub mod auth_flow;
pub mod card_renderer;
pub mod crypto_service;
pub mod favorite_sync;
pub mod filter_collector;
pub mod listing_pipeline;
pub mod listing_sorter;
pub mod map_projection;
pub mod query_builder;
pub mod settings_engine;
