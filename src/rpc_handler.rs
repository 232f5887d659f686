//! RPC method handler for the session host protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! Stateful methods are turned into [`Command`]s and queued on the reactor;
//! cipher and pattern helpers touch no state and skip the queue. The cipher
//! runs on the blocking pool.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task;
use zeroize::Zeroizing;

use crate::managers::tab_watcher::is_agent_tab;
use crate::reactor::ReactorHandle;
use crate::services::crypto_service::{PasswordCipher, PasswordCipherTrait};
use crate::types::event::{BrowserEvent, Command};
use crate::types::tab::{TabChange, TabInfo};

#[derive(Deserialize)]
struct TabUpdatedParams {
    tab: TabInfo,
    #[serde(default)]
    change: TabChange,
}

#[derive(Deserialize)]
struct TabRemovedParams {
    #[serde(alias = "tabId")]
    tab_id: i64,
}

#[derive(Deserialize)]
struct WindowRemovedParams {
    #[serde(alias = "windowId")]
    window_id: i64,
}

#[derive(Deserialize)]
struct TabsParams {
    #[serde(default)]
    tabs: Vec<TabInfo>,
}

#[derive(Deserialize)]
struct LoginParams {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    domain: String,
}

#[derive(Deserialize)]
struct EncryptParams {
    plaintext: String,
    password: String,
}

#[derive(Deserialize)]
struct DecryptParams {
    blob: String,
    password: String,
}

#[derive(Deserialize)]
struct AgentParams {
    #[serde(default)]
    url: Option<String>,
}

fn parse<T: DeserializeOwned>(method: &str, params: &Value) -> Result<T, String> {
    // Methods without arguments may omit params entirely
    let params = if params.is_null() { json!({}) } else { params.clone() };
    serde_json::from_value(params).map_err(|e| format!("invalid params for {}: {}", method, e))
}

/// Maps a stateful method to its reactor command. `None` for anything else.
pub fn parse_command(method: &str, params: &Value) -> Result<Option<Command>, String> {
    let command = match method {
        "tab.updated" => {
            let p: TabUpdatedParams = parse(method, params)?;
            Command::Browser(BrowserEvent::TabUpdated {
                tab: p.tab,
                change: p.change,
            })
        }
        "tab.removed" => {
            let p: TabRemovedParams = parse(method, params)?;
            Command::Browser(BrowserEvent::TabRemoved { tab_id: p.tab_id })
        }
        "window.removed" => {
            let p: WindowRemovedParams = parse(method, params)?;
            Command::Browser(BrowserEvent::WindowRemoved {
                window_id: p.window_id,
            })
        }
        "browser.startup" => {
            let p: TabsParams = parse(method, params)?;
            Command::Browser(BrowserEvent::Startup { tabs: p.tabs })
        }
        "tabs.sync" => {
            let p: TabsParams = parse(method, params)?;
            Command::Browser(BrowserEvent::TabsSync { tabs: p.tabs })
        }
        "session.check" => Command::Browser(BrowserEvent::CheckAndLogout),
        "popup.open" => Command::PopupOpen,
        "popup.login" => {
            let p: LoginParams = parse(method, params)?;
            Command::PopupLogin {
                email: p.email,
                password: p.password,
                domain: p.domain,
            }
        }
        "popup.logout" => Command::PopupLogout,
        "popup.clear" => Command::PopupClear,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

/// Dispatch a protocol method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(reactor: &ReactorHandle, method: &str, params: &Value) -> Result<Value, String> {
    if let Some(command) = parse_command(method, params)? {
        return reactor.send(command).await;
    }

    match method {
        "ping" => Ok(json!({"pong": true})),
        "cipher.encrypt" => {
            let p: EncryptParams = parse(method, params)?;
            let password = Zeroizing::new(p.password);
            let plaintext = Zeroizing::new(p.plaintext);
            // Key derivation is CPU-bound; keep it off the runtime thread
            let blob = task::spawn_blocking(move || PasswordCipher::new().encrypt(&plaintext, &password))
                .await
                .map_err(|e| format!("cipher task failed: {}", e))?
                .map_err(|e| e.to_string())?;
            Ok(json!({"blob": blob}))
        }
        "cipher.decrypt" => {
            let p: DecryptParams = parse(method, params)?;
            let password = Zeroizing::new(p.password);
            let blob = p.blob;
            let plaintext = task::spawn_blocking(move || PasswordCipher::new().decrypt(&blob, &password))
                .await
                .map_err(|e| format!("cipher task failed: {}", e))?;
            Ok(json!({"plaintext": plaintext.as_ref().map(|s| s.as_str())}))
        }
        "tab.is_agent" => {
            let p: AgentParams = parse(method, params)?;
            Ok(json!({"agent": is_agent_tab(p.url.as_deref())}))
        }
        _ => Err(format!("unknown method: {}", method)),
    }
}
