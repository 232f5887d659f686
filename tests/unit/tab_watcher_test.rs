//! Unit tests for the tab-close watcher.
//!
//! Drives `check_and_logout` against scripted tab sets and a recording fake
//! of the auth API.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use serde_json::Value;

use common::{
    logged_in_store, ApiCall, FakeApi, RecordingNotifier, StaticTabs, UnsyncedTabs, AGENT_URL, DOMAIN,
};
use widechat_session::database::session_store::{MemorySessionStore, SessionStore};
use widechat_session::managers::tab_watcher::{TabCloseWatcher, WatchOutcome};
use widechat_session::types::credential::keys;

fn watcher(
    store: Arc<MemorySessionStore>,
    api: Arc<FakeApi>,
    notifier: Arc<RecordingNotifier>,
) -> TabCloseWatcher {
    TabCloseWatcher::new(store, api, notifier)
}

// ─── Logout decisions ───

#[tokio::test]
async fn test_no_agent_tab_logs_out_exactly_once() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let w = watcher(store.clone(), api.clone(), notifier.clone());

    let tabs = StaticTabs::of(&["https://example.com", "https://acme.widechat.com.br/admin"]);
    let outcome = w.check_and_logout(&tabs).await.unwrap();

    assert_eq!(outcome, WatchOutcome::LoggedOut);
    assert_eq!(
        api.calls(),
        vec![ApiCall::Logout {
            token: "tok-1".to_string(),
            domain: DOMAIN.to_string()
        }]
    );
    assert!(notifier.received().is_empty());
}

#[tokio::test]
async fn test_agent_tab_open_skips_logout() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let w = watcher(store.clone(), api.clone(), notifier);

    let tabs = StaticTabs::of(&["https://example.com", AGENT_URL]);
    let outcome = w.check_and_logout(&tabs).await.unwrap();

    assert_eq!(outcome, WatchOutcome::AgentTabOpen { agent_tabs: 1 });
    assert_eq!(api.logout_count(), 0);
    assert_eq!(store.get_string(keys::TOKEN).unwrap().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_counts_every_agent_tab() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let w = watcher(store, api, Arc::new(RecordingNotifier::default()));

    let tabs = StaticTabs::of(&[AGENT_URL, "https://other.widechat.com.br/user/agent/chat/9"]);
    let outcome = w.check_and_logout(&tabs).await.unwrap();
    assert_eq!(outcome, WatchOutcome::AgentTabOpen { agent_tabs: 2 });
}

#[tokio::test]
async fn test_tabs_without_url_are_not_agent_tabs() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let w = watcher(store, api.clone(), Arc::new(RecordingNotifier::default()));

    let tabs = StaticTabs(vec![None, None]);
    assert_eq!(w.check_and_logout(&tabs).await.unwrap(), WatchOutcome::LoggedOut);
    assert_eq!(api.logout_count(), 1);
}

#[tokio::test]
async fn test_no_domain_does_nothing() {
    let store = Arc::new(MemorySessionStore::new());
    store
        .set_many(&[(keys::TOKEN, Value::from("tok-1"))])
        .unwrap();
    let api = Arc::new(FakeApi::new());
    let w = watcher(store, api.clone(), Arc::new(RecordingNotifier::default()));

    let outcome = w.check_and_logout(&StaticTabs(vec![])).await.unwrap();
    assert_eq!(outcome, WatchOutcome::NoDomain);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_no_token_skips_logout() {
    let store = Arc::new(MemorySessionStore::new());
    store
        .set_many(&[(keys::SAVED_DOMAIN, Value::from(DOMAIN))])
        .unwrap();
    let api = Arc::new(FakeApi::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let w = watcher(store, api.clone(), notifier.clone());

    let outcome = w.check_and_logout(&StaticTabs(vec![])).await.unwrap();
    assert_eq!(outcome, WatchOutcome::NoToken);
    assert!(api.calls().is_empty());
    assert!(notifier.received().is_empty());
}

#[tokio::test]
async fn test_unknown_tab_set_skips_logout() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let w = watcher(store.clone(), api.clone(), notifier.clone());

    let outcome = w.check_and_logout(&UnsyncedTabs).await.unwrap();

    assert_eq!(outcome, WatchOutcome::TabsUnknown);
    assert!(api.calls().is_empty());
    assert!(notifier.received().is_empty());
    assert!(store.load_record().unwrap().is_logged_in());
}

// ─── Store effects ───

#[tokio::test]
async fn test_successful_logout_ends_session_but_keeps_credentials() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let w = watcher(store.clone(), api, Arc::new(RecordingNotifier::default()));

    w.check_and_logout(&StaticTabs(vec![])).await.unwrap();

    let record = store.load_record().unwrap();
    assert!(record.token.is_none());
    assert!(!record.logged_in);
    assert_eq!(record.email.as_deref(), Some("agent@acme.com"));
    assert_eq!(record.encrypted_password.as_deref(), Some("encrypted-blob"));
    assert_eq!(record.domain.as_deref(), Some(DOMAIN));
}

#[tokio::test]
async fn test_second_check_after_logout_is_a_no_op() {
    let store = logged_in_store("tok-1");
    let api = Arc::new(FakeApi::new());
    let w = watcher(store, api.clone(), Arc::new(RecordingNotifier::default()));

    w.check_and_logout(&StaticTabs(vec![])).await.unwrap();
    let second = w.check_and_logout(&StaticTabs(vec![])).await.unwrap();

    assert_eq!(second, WatchOutcome::NoToken);
    assert_eq!(api.logout_count(), 1);
}

#[tokio::test]
async fn test_failed_logout_notifies_and_keeps_store() {
    let store = logged_in_store("tok-1");
    let before = store.load_record().unwrap();
    let api = Arc::new(FakeApi::new().with_logout_ok(false));
    let notifier = Arc::new(RecordingNotifier::default());
    let w = watcher(store.clone(), api.clone(), notifier.clone());

    let outcome = w.check_and_logout(&StaticTabs(vec![])).await.unwrap();

    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(
        outcome,
        WatchOutcome::LogoutFailed {
            notification_id: received[0].id.clone()
        }
    );
    assert_eq!(store.load_record().unwrap(), before);
    assert_eq!(api.logout_count(), 1);
}
