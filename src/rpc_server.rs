//! Travelgo RPC Server: JSON-RPC over stdin/stdout for a UI host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"listing.search", "params":{"kind":"destination","form":{...}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Each request runs as its own task, so responses may arrive out of order;
//! the host matches them by id.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use travelgo::app::App;
use travelgo::platform;
use travelgo::rpc_handler::handle_method;
use travelgo::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns false once the window's budget is spent.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

type SharedStdout = Arc<Mutex<io::Stdout>>;

/// Writes one whole line under the lock so concurrent responses never
/// interleave.
async fn write_line(stdout: &SharedStdout, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    let mut out = stdout.lock().await;
    out.write_all(line.as_bytes()).await?;
    out.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Settings first, so the configured log filter applies from the start.
    let mut settings = SettingsEngine::new(None);
    let settings_error = settings.load().err();
    travelgo::logging::init(&settings.get_settings().logging.filter);
    if let Some(e) = settings_error {
        warn!(error = %e, "using default settings");
    }

    let data_dir = platform::get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("travelgo.db");
    let db_path = db_path.to_string_lossy().to_string();
    info!(db = %db_path, "opening client store");

    let app = Arc::new(Mutex::new(App::new(&db_path, Some(settings.get_config_path().to_string()))?));

    let stdout: SharedStdout = Arc::new(Mutex::new(io::stdout()));
    write_line(
        &stdout,
        &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}),
    )
    .await?;

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                write_line(&stdout, &json!({"id": null, "error": format!("parse error: {}", e)}))
                    .await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            warn!("rate limit exceeded");
            write_line(&stdout, &json!({"id": id, "error": "rate limit exceeded"})).await?;
            continue;
        }

        let method = req
            .get("method")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let params = req.get("params").cloned().unwrap_or_else(|| json!({}));

        let app = Arc::clone(&app);
        let stdout = Arc::clone(&stdout);
        in_flight.spawn(async move {
            let response = match handle_method(&app, &method, &params).await {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => {
                    error!(%method, error = %err, "rpc call failed");
                    json!({"id": id, "error": err})
                }
            };
            if let Err(e) = write_line(&stdout, &response).await {
                error!(%method, error = %e, "could not write response");
            }
        });

        // Reap finished requests.
        while let Some(joined) = in_flight.try_join_next() {
            if let Err(e) = joined {
                error!(error = %e, "rpc task panicked");
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "rpc task panicked");
        }
    }

    // Let in-flight favorite syncs finish before exiting.
    app.lock().await.pipeline.wait_for_sync().await;
    Ok(())
}
