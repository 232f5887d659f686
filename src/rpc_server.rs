//! WideChat session host: JSON over stdin/stdout for the browser extension.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tab.removed", "params":{"tab_id":7}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Pushed:   {"event":"ready",...} and {"event":"notification",...}

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use widechat_session::app::App;
use widechat_session::logging::init_logging;
use widechat_session::reactor;
use widechat_session::rpc_handler::handle_method;
use widechat_session::services::notifier::ChannelNotifier;
use widechat_session::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use widechat_session::types::notification::Notification;

/// Simple rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn notification_event(notification: Notification) -> Value {
    json!({
        "event": "notification",
        "id": notification.id,
        "title": notification.title,
        "message": notification.message,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut engine = SettingsEngine::new(None);
    let loaded = engine.load();
    init_logging(&engine.get_settings().logging.filter);
    if let Err(e) = loaded {
        tracing::warn!(error = %e, path = engine.get_config_path(), "Failed to load settings, using defaults");
    }
    let host_settings = engine.get_settings().host.clone();

    // Single writer keeps responses and pushed events from interleaving
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = out_rx.recv().await {
            let line = format!("{}\n", message);
            if stdout.write_all(line.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let (note_tx, mut note_rx) = mpsc::unbounded_channel::<Notification>();
    let forward_tx = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(notification) = note_rx.recv().await {
            if forward_tx.send(notification_event(notification)).is_err() {
                break;
            }
        }
    });

    let app = match App::from_settings(&engine, Arc::new(ChannelNotifier::new(note_tx))) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize session host");
            std::process::exit(1);
        }
    };
    let (reactor, reactor_task) = reactor::spawn(app, host_settings.queue_capacity);

    let _ = out_tx.send(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    tracing::info!("Session host ready");

    let mut rate_limiter = RateLimiter::new(host_settings.rate_limit_per_second);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = out_tx.send(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            let _ = out_tx.send(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(Value::Null);

        let response = match handle_method(&reactor, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        let _ = out_tx.send(response);
    }

    tracing::info!("Stdin closed, shutting down");
    drop(reactor);
    let _ = reactor_task.await;
    let _ = forwarder.await;
    drop(out_tx);
    let _ = writer.await;
}
