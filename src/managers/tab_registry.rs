use crate::managers::tab_watcher::TabSource;
use crate::types::event::BrowserEvent;
use crate::types::tab::TabInfo;

/// Trait defining the tab registry interface.
pub trait TabRegistryTrait {
    /// Inserts or refreshes a tab.
    fn upsert_tab(&mut self, tab: TabInfo);
    /// Returns the removed tab, if it was known.
    fn remove_tab(&mut self, tab_id: i64) -> Option<TabInfo>;
    /// Removes every tab of a window and returns how many were dropped.
    fn remove_window(&mut self, window_id: i64) -> usize;
    fn replace_all(&mut self, tabs: Vec<TabInfo>);
    fn get_tab(&self, tab_id: i64) -> Option<&TabInfo>;
    fn get_all_tabs(&self) -> &[TabInfo];
    fn tab_count(&self) -> usize;
    /// True once a full snapshot (startup or sync) has been applied.
    fn is_synced(&self) -> bool;
}

/// In-memory mirror of the browser's open tabs, kept current by host events.
///
/// Tabs keep insertion order; a refreshed tab keeps its position. Until the
/// first snapshot arrives the registry only knows about tabs it was told
/// about one by one, so it does not claim to know the full tab set.
#[derive(Debug, Default, Clone)]
pub struct TabRegistry {
    tabs: Vec<TabInfo>,
    synced: bool,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_tab_index(&self, tab_id: i64) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    /// Folds a browser event into the registry.
    pub fn apply(&mut self, event: &BrowserEvent) {
        match event {
            BrowserEvent::TabUpdated { tab, change } => {
                let mut tab = tab.clone();
                if let Some(url) = &change.url {
                    tab.url = Some(url.clone());
                }
                self.upsert_tab(tab);
            }
            BrowserEvent::TabRemoved { tab_id } => {
                self.remove_tab(*tab_id);
            }
            BrowserEvent::WindowRemoved { window_id } => {
                self.remove_window(*window_id);
            }
            BrowserEvent::Startup { tabs } | BrowserEvent::TabsSync { tabs } => {
                self.replace_all(tabs.clone());
            }
            BrowserEvent::CheckAndLogout => {}
        }
    }
}

impl TabRegistryTrait for TabRegistry {
    fn upsert_tab(&mut self, tab: TabInfo) {
        match self.find_tab_index(tab.id) {
            Some(idx) => self.tabs[idx] = tab,
            None => self.tabs.push(tab),
        }
    }

    fn remove_tab(&mut self, tab_id: i64) -> Option<TabInfo> {
        self.find_tab_index(tab_id).map(|idx| self.tabs.remove(idx))
    }

    fn remove_window(&mut self, window_id: i64) -> usize {
        let before = self.tabs.len();
        self.tabs.retain(|t| t.window_id != window_id);
        before - self.tabs.len()
    }

    fn replace_all(&mut self, tabs: Vec<TabInfo>) {
        self.tabs.clear();
        for tab in tabs {
            self.upsert_tab(tab);
        }
        self.synced = true;
    }

    fn get_tab(&self, tab_id: i64) -> Option<&TabInfo> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> &[TabInfo] {
        &self.tabs
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn is_synced(&self) -> bool {
        self.synced
    }
}

impl TabSource for TabRegistry {
    fn open_tab_urls(&self) -> Option<Vec<Option<String>>> {
        if !self.synced {
            return None;
        }
        Some(self.tabs.iter().map(|t| t.url.clone()).collect())
    }
}
