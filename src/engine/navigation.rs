// Navigation controller: activation, provider switches, and per-render dispatch

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::catalog::AI_ASSISTANT;
use super::modules::{DispatchOutcome, ModuleRegistry};
use super::provider::Provider;
use super::session::{
    DEFAULT_MODULE, FilterScope, NavigationState, SessionError, SharedSession, keys,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavPhase {
    /// Nothing activated or rendered yet
    Idle,
    ModuleActive(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub active: bool,
    /// Whether the current provider has an implementation
    pub available: bool,
}

/// Everything a frame needs: the navigation chrome plus one dispatch outcome
#[derive(Debug, Clone, Serialize)]
pub struct RenderedScreen {
    pub state: NavigationState,
    pub nav: Vec<NavItem>,
    pub outcome: DispatchOutcome,
}

pub struct NavigationController {
    session: SharedSession,
    modules: Arc<ModuleRegistry>,
    budget: Option<Duration>,
    phase: NavPhase,
}

impl NavigationController {
    pub fn new(session: SharedSession, modules: Arc<ModuleRegistry>) -> Self {
        Self {
            session,
            modules,
            budget: None,
            phase: NavPhase::Idle,
        }
    }

    /// Cap how long a single renderer may take. `None` waits forever.
    pub fn with_dispatch_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub fn dispatch_budget(&self) -> Option<Duration> {
        self.budget
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn phase(&self) -> &NavPhase {
        &self.phase
    }

    pub fn current_provider(&self) -> Provider {
        self.session.read(|s| s.current_provider())
    }

    pub fn active_module(&self) -> String {
        self.session.read(|s| s.active_module().to_string())
    }

    pub fn activate(&mut self, module_key: &str) {
        match self.modules.activate(module_key) {
            Some(descriptor) => {
                tracing::debug!(module = module_key, label = %descriptor.label, "activating module")
            }
            None => tracing::debug!(module = module_key, "activating undescribed module"),
        }
        self.session.activate_module(module_key);
        self.phase = NavPhase::ModuleActive(module_key.to_string());
    }

    /// Switch provider. Lands on the dashboard with filters reset.
    pub fn switch_provider(&mut self, provider: Provider) -> Result<bool, SessionError> {
        let changed = self.session.switch_provider(provider)?;
        if changed {
            self.phase = NavPhase::ModuleActive(DEFAULT_MODULE.to_string());
        }
        Ok(changed)
    }

    /// Navigation entries for the current provider
    pub fn nav_items(&self) -> Vec<NavItem> {
        let (provider, active, ai_enabled) = self.session.read(|s| {
            (
                s.current_provider(),
                s.active_module().to_string(),
                s.get_bool(keys::FEATURE_AI_ASSISTANT, true),
            )
        });
        self.items_for(provider, &active, ai_enabled)
    }

    fn items_for(&self, provider: Provider, active: &str, ai_enabled: bool) -> Vec<NavItem> {
        self.modules
            .modules()
            .into_iter()
            .filter(|m| ai_enabled || m.key != AI_ASSISTANT)
            .map(|m| NavItem {
                key: m.key.clone(),
                label: m.label_for(provider).to_string(),
                icon: m.icon.clone(),
                active: m.key == active,
                available: self.modules.is_available(&m.key, provider),
            })
            .collect()
    }

    /// Dispatch whatever the session says is active
    pub fn dispatch_active(&mut self) -> (NavigationState, DispatchOutcome) {
        // Snapshot under the lock, render without it
        let (state, filters) = self.session.snapshot();
        let outcome = self.dispatch(&state, &filters);
        (state, outcome)
    }

    fn dispatch(&mut self, state: &NavigationState, filters: &FilterScope) -> DispatchOutcome {
        let outcome = self.modules.dispatch_with_budget(
            &state.active_module,
            state.provider,
            filters,
            self.budget,
        );
        self.phase = NavPhase::ModuleActive(state.active_module.clone());
        outcome
    }

    pub fn render(&mut self) -> RenderedScreen {
        let (state, filters, ai_enabled) = self.session.read(|s| {
            (
                s.navigation_state(),
                s.filter_scope(),
                s.get_bool(keys::FEATURE_AI_ASSISTANT, true),
            )
        });
        let outcome = self.dispatch(&state, &filters);
        let nav = self.items_for(state.provider, &state.active_module, ai_enabled);
        RenderedScreen {
            state,
            nav,
            outcome,
        }
    }
}
