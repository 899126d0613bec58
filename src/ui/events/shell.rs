use super::{filters, *};
use crate::engine::FilterKey;

pub(super) fn handle_shell_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(),
        KeyCode::Enter => {
            if let Some(module) = state.selected_key() {
                state.nav.activate(&module);
                state.status = None;
            }
        }
        // Provider selector
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            if let Some(provider) = Provider::ALL.get(index).copied() {
                switch_provider(state, provider);
            }
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            let next = state.nav.current_provider().next();
            switch_provider(state, next);
        }
        // Filters
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let provider = state.nav.current_provider();
            cycle(state, FilterKey::tenant_key(provider));
        }
        KeyCode::Char('g') | KeyCode::Char('G') => cycle(state, FilterKey::Regions),
        KeyCode::Char('e') | KeyCode::Char('E') => cycle(state, FilterKey::Environment),
        KeyCode::Char('o') | KeyCode::Char('O') => cycle(state, FilterKey::ResourceGroup),
        // Session settings
        KeyCode::Char('m') | KeyCode::Char('M') => {
            if let Some(mode) = state.nav.session().update(filters::toggle_mode) {
                state.set_status(format!("{} mode", mode));
            }
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            if let Some(range) = state.nav.session().update(filters::cycle_time_range) {
                state.set_status(format!("Time range: {}", range));
            }
        }
        KeyCode::Char('u') | KeyCode::Char('U') => {
            let enabled = state
                .nav
                .session()
                .update(|s| filters::toggle_flag(s, keys::FEATURE_AUTO_REFRESH));
            if let Some(enabled) = enabled {
                state.set_status(format!(
                    "Auto refresh {}",
                    if enabled { "enabled" } else { "disabled" }
                ));
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            let at = state.nav.session().trigger_refresh();
            state.set_status(format!("Refreshed at {}", at.format("%H:%M:%S")));
        }
        _ => {}
    }
}

fn switch_provider(state: &mut AppState, provider: Provider) {
    match state.nav.switch_provider(provider) {
        Ok(true) => {
            state.sync_selection();
            state.set_status(format!("Switched to {}", provider));
        }
        Ok(false) => {}
        Err(err) => {
            tracing::error!(%err, "provider switch rejected");
            state.set_status(format!("Error: {}", err));
        }
    }
}

fn cycle(state: &mut AppState, key: FilterKey) {
    let changed = state
        .nav
        .session()
        .update(|s| filters::cycle_filter(s, key));
    if let Some(value) = changed {
        let provider = state.nav.current_provider();
        state.set_status(format!("{}: {}", key.label(provider), value));
    }
}
