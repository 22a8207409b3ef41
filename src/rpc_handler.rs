//! RPC method handler for the Travelgo JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be tested without stdin/stdout.
//! `handle_method` maps one UI event to the pipeline, auth flow or settings.
//!
//! The app lock is never held across a network call: handlers clone the
//! client they need, release the lock, await, then lock again to apply.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::managers::session_manager::SessionManagerTrait;
use crate::services::filter_collector::{self, FormState};
use crate::services::listing_pipeline::{self, ListingView};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::filter::SortOrder;
use crate::types::listing::ItemKind;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

/// Ids arrive as strings or numbers, like the backend sends them.
fn id_param(params: &Value) -> Result<String, String> {
    match params.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err("missing id".to_string()),
    }
}

fn parse_param<T: DeserializeOwned + Default>(params: &Value, name: &str) -> Result<T, String> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid {}: {}", name, e)),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch one JSON-RPC call. `Err` carries the message shown to the user.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Listing ───
        "listing.search" => {
            let kind: ItemKind = str_param(params, "kind")?.parse()?;
            let form: FormState = parse_param(params, "form")?;
            let criteria = filter_collector::collect(&form);
            let api = app.lock().await.pipeline.api().clone();
            let result = api.fetch_listing(kind, &criteria).await;
            let view = app
                .lock()
                .await
                .pipeline
                .apply_listing(kind, criteria.sort_order, result);
            to_json(&view)
        }
        "listing.page" => {
            let page = params
                .get("page")
                .and_then(|v| v.as_u64())
                .ok_or("missing page")? as usize;
            let mut a = app.lock().await;
            to_json(&a.pipeline.change_page(page))
        }
        "listing.sort" => {
            let token = str_param(params, "sort")?;
            let sort = SortOrder::from_token(token).ok_or_else(|| format!("unknown sort: {}", token))?;
            let mut a = app.lock().await;
            to_json(&a.pipeline.change_sort(sort))
        }

        // ─── Favorites ───
        "favorite.toggle" => {
            let id = id_param(params)?;
            let mut a = app.lock().await;
            let outcome = a.pipeline.toggle_favorite(&id).map_err(|e| e.to_string())?;
            to_json(&outcome)
        }
        "favorite.state" => {
            let id = id_param(params)?;
            let a = app.lock().await;
            let favorited = a.pipeline.state().favorites.contains(&id);
            let sync = a.pipeline.favorite_state(&id);
            Ok(json!({"id": id, "favorited": favorited, "sync": sync}))
        }
        "favorites.page" => {
            let (api, favorites) = {
                let mut a = app.lock().await;
                (a.pipeline.api().clone(), a.pipeline.favorites_for_page())
            };
            let view = match favorites {
                Some(favorites) => {
                    let items = listing_pipeline::fetch_favorites(&api, &favorites).await;
                    ListingView::of_items(&items, ItemKind::Destination, &favorites)
                }
                None => ListingView::login_required(),
            };
            to_json(&view)
        }
        "listing.similar" => {
            let kind: ItemKind = str_param(params, "kind")?.parse()?;
            let id = id_param(params)?;
            let continent = params.get("continent").and_then(|v| v.as_str());
            let (api, favorites) = {
                let a = app.lock().await;
                (a.pipeline.api().clone(), a.pipeline.state().favorites.clone())
            };
            let result = listing_pipeline::fetch_similar(&api, kind, &id, continent).await;
            to_json(&ListingView::from_fetch(&result, kind, &favorites))
        }

        // ─── Details ───
        "destination.get" => {
            let id = id_param(params)?;
            let api = app.lock().await.pipeline.api().clone();
            let destination = api
                .get_destination(&id)
                .await
                .map_err(|e| e.user_message())?;
            to_json(&destination)
        }
        "package.get" => {
            let id = id_param(params)?;
            let api = app.lock().await.pipeline.api().clone();
            let package = api.get_package(&id).await.map_err(|e| e.user_message())?;
            to_json(&package)
        }
        "package.book" => {
            let id = id_param(params)?;
            let (api, auth) = {
                let a = app.lock().await;
                (a.pipeline.api().clone(), a.auth.clone())
            };
            let package = api.get_package(&id).await.map_err(|e| e.user_message())?;
            let outcome = auth.book_package(&package).map_err(|e| e.to_string())?;
            to_json(&outcome)
        }
        "map.points" => {
            let api = app.lock().await.pipeline.api().clone();
            let points = listing_pipeline::fetch_map_points(&api)
                .await
                .map_err(|e| e.user_message())?;
            to_json(&points)
        }

        // ─── Auth ───
        "auth.login" => {
            let email = str_param(params, "email")?;
            let password = str_param(params, "password")?;
            let auth = app.lock().await.auth.clone();
            let outcome = auth.login(email, password).await.map_err(|e| e.to_string())?;
            to_json(&outcome)
        }
        "auth.register" => {
            let name = str_param(params, "name")?;
            let email = str_param(params, "email")?;
            let password = str_param(params, "password")?;
            let auth = app.lock().await.auth.clone();
            auth.register(name, email, password)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "auth.logout" => {
            let scroll = params.get("scroll_position").and_then(|v| v.as_f64());
            let a = app.lock().await;
            a.auth.logout(scroll).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.get" => {
            let a = app.lock().await;
            let session = a.auth.session().current_session().map_err(|e| e.to_string())?;
            Ok(match session {
                Some(s) => json!({"logged_in": true, "user_name": s.user_name, "user_email": s.user_email}),
                None => json!({"logged_in": false}),
            })
        }
        "session.scroll" => {
            let a = app.lock().await;
            let offset = a
                .auth
                .session()
                .take_scroll_position()
                .map_err(|e| e.to_string())?;
            Ok(json!({"scroll_position": offset}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            if key.starts_with("api.") || key.starts_with("listing.") {
                a.reload_clients().map_err(|e| e.to_string())?;
            }
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
