// Application state management

use chrono::{DateTime, Local};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::engine::{
    FilterScope, NavigationController, NavigationState, RenderedScreen, keys,
};

/// Everything a cached screen depends on. Any change forces a fresh dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenKey {
    pub state: NavigationState,
    pub filters: FilterScope,
    pub last_refresh: Option<DateTime<Local>>,
    pub ai_enabled: bool,
}

pub struct CachedScreen {
    pub key: ScreenKey,
    pub screen: RenderedScreen,
    pub rendered_at: Instant,
}

pub struct AppState {
    pub nav: NavigationController,
    pub list_state: ListState,
    pub screen: Option<CachedScreen>,
    /// One-line message shown above the footer (rejected switches, refreshes)
    pub status: Option<String>,
    pub dispatch_count: u64,
}

impl AppState {
    pub fn new(nav: NavigationController) -> Self {
        let mut state = Self {
            nav,
            list_state: ListState::default(),
            screen: None,
            status: None,
            dispatch_count: 0,
        };
        state.sync_selection();
        state
    }

    /// Point the list cursor at the active module
    pub fn sync_selection(&mut self) {
        let active = self.nav.active_module();
        let index = self
            .nav
            .nav_items()
            .iter()
            .position(|item| item.key == active)
            .unwrap_or(0);
        self.list_state.select(Some(index));
    }

    pub fn selected_key(&self) -> Option<String> {
        let index = self.list_state.selected()?;
        self.nav.nav_items().into_iter().nth(index).map(|item| item.key)
    }

    pub fn select_next(&mut self) {
        let len = self.nav.nav_items().len();
        if len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let prev = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(prev));
    }

    fn screen_key(&self) -> (ScreenKey, bool, Duration) {
        self.nav.session().read(|s| {
            let key = ScreenKey {
                state: s.navigation_state(),
                filters: s.filter_scope(),
                last_refresh: s.last_refresh(),
                ai_enabled: s.get_bool(keys::FEATURE_AI_ASSISTANT, true),
            };
            let enabled = s.get_bool(keys::CACHE_ENABLED, true);
            let ttl = Duration::from_secs(s.get_int(keys::CACHE_TTL, 300).max(0) as u64);
            (key, enabled, ttl)
        })
    }

    /// Re-dispatch if the session moved on since the last render, the cache is
    /// disabled, or the cached screen outlived its TTL.
    pub fn refresh_screen(&mut self) {
        let (key, cache_enabled, ttl) = self.screen_key();

        let fresh = match &self.screen {
            Some(cached) => {
                cache_enabled && cached.key == key && cached.rendered_at.elapsed() < ttl
            }
            None => false,
        };
        if fresh {
            return;
        }

        let screen = self.nav.render();
        self.dispatch_count += 1;
        self.screen = Some(CachedScreen {
            key,
            screen,
            rendered_at: Instant::now(),
        });
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}
