//! Unit tests for the tab registry that mirrors the browser's open tabs.

use rstest::rstest;

use widechat_session::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use widechat_session::managers::tab_watcher::TabSource;
use widechat_session::types::event::BrowserEvent;
use widechat_session::types::tab::{TabChange, TabInfo, TabStatus};

const AGENT_URL: &str = "https://acme.widechat.com.br/user/agent";

fn registry_with(tabs: &[(i64, i64, &str)]) -> TabRegistry {
    let mut registry = TabRegistry::new();
    for (id, window, url) in tabs {
        registry.upsert_tab(TabInfo::new(*id, *window, Some(*url)));
    }
    registry
}

// ─── Direct operations ───

#[test]
fn test_new_registry_is_empty() {
    let registry = TabRegistry::new();
    assert_eq!(registry.tab_count(), 0);
    assert!(!registry.is_synced());
    assert!(registry.open_tab_urls().is_none());
}

#[test]
fn test_upsert_replaces_existing_tab() {
    let mut registry = registry_with(&[(1, 1, "https://a.com"), (2, 1, "https://b.com")]);
    registry.upsert_tab(TabInfo::new(1, 1, Some(AGENT_URL)));

    assert_eq!(registry.tab_count(), 2);
    assert_eq!(registry.get_tab(1).unwrap().url.as_deref(), Some(AGENT_URL));
}

#[test]
fn test_remove_tab_returns_removed() {
    let mut registry = registry_with(&[(1, 1, "https://a.com")]);
    let removed = registry.remove_tab(1).unwrap();
    assert_eq!(removed.id, 1);
    assert!(registry.remove_tab(1).is_none());
    assert_eq!(registry.tab_count(), 0);
}

#[test]
fn test_remove_window_drops_only_its_tabs() {
    let mut registry = registry_with(&[
        (1, 10, "https://a.com"),
        (2, 10, AGENT_URL),
        (3, 20, "https://c.com"),
    ]);
    assert_eq!(registry.remove_window(10), 2);
    assert_eq!(registry.tab_count(), 1);
    assert!(registry.get_tab(3).is_some());
    assert_eq!(registry.remove_window(99), 0);
}

// ─── Event application ───

#[test]
fn test_apply_tab_updated_inserts_unknown_tab() {
    let mut registry = TabRegistry::new();
    registry.apply(&BrowserEvent::TabUpdated {
        tab: TabInfo::new(5, 1, Some(AGENT_URL)),
        change: TabChange {
            status: Some(TabStatus::Complete),
            url: None,
        },
    });
    assert_eq!(registry.get_all_tabs(), &[TabInfo::new(5, 1, Some(AGENT_URL))]);
    assert!(!registry.is_synced());
}

#[test]
fn test_apply_tab_removed_and_window_removed() {
    let mut registry = registry_with(&[(1, 1, AGENT_URL), (2, 2, "https://b.com")]);
    registry.apply(&BrowserEvent::TabRemoved { tab_id: 1 });
    assert!(registry.get_tab(1).is_none());

    registry.apply(&BrowserEvent::WindowRemoved { window_id: 2 });
    assert_eq!(registry.tab_count(), 0);
}

#[rstest]
#[case::startup(BrowserEvent::Startup { tabs: vec![TabInfo::new(9, 1, Some("https://z.com"))] })]
#[case::sync(BrowserEvent::TabsSync { tabs: vec![TabInfo::new(9, 1, Some("https://z.com"))] })]
fn test_apply_full_snapshot_replaces_known_tabs(#[case] event: BrowserEvent) {
    let mut registry = registry_with(&[(1, 1, AGENT_URL), (2, 1, "https://b.com")]);
    registry.apply(&event);

    assert_eq!(registry.tab_count(), 1);
    assert_eq!(registry.get_all_tabs()[0].id, 9);
    assert_eq!(registry.open_tab_urls(), Some(vec![Some("https://z.com".to_string())]));
}

#[test]
fn test_removals_after_sync_keep_registry_synced() {
    let mut registry = TabRegistry::new();
    registry.apply(&BrowserEvent::Startup {
        tabs: vec![TabInfo::new(1, 1, Some(AGENT_URL))],
    });
    registry.apply(&BrowserEvent::TabRemoved { tab_id: 1 });
    assert!(registry.is_synced());
    assert_eq!(registry.open_tab_urls(), Some(vec![]));
}

#[test]
fn test_apply_check_leaves_tabs_alone() {
    let mut registry = registry_with(&[(1, 1, AGENT_URL)]);
    registry.apply(&BrowserEvent::CheckAndLogout);
    assert_eq!(registry.tab_count(), 1);
}
