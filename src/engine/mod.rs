// Navigation and session engine - independent of UI

pub mod catalog;
pub mod modules;
pub mod navigation;
pub mod provider;
pub mod session;

pub use catalog::{AI_ASSISTANT, standard_modules, standard_registry};
pub use modules::{
    DispatchOutcome, ModuleDescriptor, ModuleRegistry, ModuleRenderer, ViewBlock, ViewDescriptor,
};
pub use navigation::{NavItem, NavPhase, NavigationController, RenderedScreen};
pub use provider::{Provider, ProviderRegistry, Tenant, TenantStatus, UnknownProviderError};
pub use session::{
    ALL, CloudContext, DEFAULT_MODULE, FilterKey, FilterScope, NavigationState, SessionContext,
    SessionDefaults, SessionError, SessionValue, SharedSession, keys,
};

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Build the provider catalog, module table, session and controller from config
pub fn bootstrap(config: &Config, startup_provider: Option<Provider>) -> NavigationController {
    let providers = Arc::new(ProviderRegistry::from_config(&config.catalog));
    let modules = Arc::new(standard_registry(Arc::clone(&providers)));

    let defaults = SessionDefaults {
        provider: startup_provider.unwrap_or(config.startup.provider),
        module: config.startup.module.clone(),
    };
    let session = SharedSession::new(SessionContext::with_defaults(providers, defaults));

    let budget = match config.navigation.dispatch_timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    NavigationController::new(session, modules).with_dispatch_budget(budget)
}
