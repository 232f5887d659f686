//! Single-consumer reactor.
//!
//! Commands are queued on a bounded channel and executed one at a time by the
//! task that owns the [`App`]. A command's storage reads, HTTP calls and
//! storage writes finish before the next queued command starts.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::app::App;
use crate::types::event::Command;

struct Envelope {
    command: Command,
    reply: oneshot::Sender<Result<Value, String>>,
}

/// Cloneable sender side of the reactor.
#[derive(Clone)]
pub struct ReactorHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ReactorHandle {
    /// Queues a command and waits for its result.
    pub async fn send(&self, command: Command) -> Result<Value, String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { command, reply })
            .await
            .map_err(|_| "reactor stopped".to_string())?;
        rx.await.map_err(|_| "reactor dropped the command".to_string())?
    }
}

/// Spawns the reactor task on the current runtime.
///
/// The task ends once every [`ReactorHandle`] has been dropped.
pub fn spawn(app: App, capacity: usize) -> (ReactorHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(run(app, rx));
    (ReactorHandle { tx }, task)
}

async fn run(mut app: App, mut rx: mpsc::Receiver<Envelope>) {
    while let Some(Envelope { command, reply }) = rx.recv().await {
        let result = app.dispatch(command).await;
        if let Err(err) = &result {
            tracing::debug!(error = %err, "Command failed");
        }
        // The caller may have gone away; the command still ran.
        let _ = reply.send(result);
    }
    tracing::debug!("Reactor stopped");
}
