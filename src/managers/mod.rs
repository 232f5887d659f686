// Session state managers
// Managers react to browser and popup events: tab registry, tab-close watcher, popup bootstrapper.

pub mod popup_session;
pub mod tab_registry;
pub mod tab_watcher;
