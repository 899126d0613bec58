#![allow(dead_code)] // Not every test binary uses every helper

use anyhow::{Result, anyhow};
use cloudidp::config::Config;
use cloudidp::engine::{
    self, FilterKey, FilterScope, ModuleDescriptor, ModuleRegistry, NavigationController, Provider,
    ProviderRegistry, SessionContext, SharedSession, ViewDescriptor,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Controller over the standard catalog with default config
pub fn standard_controller() -> NavigationController {
    engine::bootstrap(&Config::default(), None)
}

pub fn standard_controller_on(provider: Provider) -> NavigationController {
    engine::bootstrap(&Config::default(), Some(provider))
}

pub fn fresh_session() -> SessionContext {
    SessionContext::new(Arc::new(ProviderRegistry::builtin()))
}

/// Renderer that echoes the provider and whichever filter it is asked about
pub fn echo_renderer(key: FilterKey) -> impl Fn(&FilterScope) -> Result<ViewDescriptor> + Send + Sync {
    move |scope: &FilterScope| -> Result<ViewDescriptor> {
        Ok(ViewDescriptor::new(format!("{} {}", scope.provider, scope.get(key))))
    }
}

/// Small registry used to exercise failure and timeout paths:
/// `Healthy` renders, `Broken` errors, `Panicky` panics, `Slow` sleeps.
pub fn faulty_registry(sleep: Duration) -> ModuleRegistry {
    let mut modules = ModuleRegistry::new();
    for (key, icon) in [("Healthy", "✅"), ("Broken", "❌"), ("Panicky", "💥"), ("Slow", "🐢")] {
        modules.describe(ModuleDescriptor::new(key, icon, key));
    }

    modules.register("Healthy", Provider::Aws, echo_renderer(FilterKey::Regions));
    modules.register("Broken", Provider::Aws, |_: &FilterScope| -> Result<ViewDescriptor> {
        Err(anyhow!("inventory backend unreachable"))
    });
    modules.register("Panicky", Provider::Aws, |_: &FilterScope| -> Result<ViewDescriptor> {
        panic!("renderer blew up")
    });
    modules.register("Slow", Provider::Aws, move |_: &FilterScope| -> Result<ViewDescriptor> {
        std::thread::sleep(sleep);
        Ok(ViewDescriptor::new("finally"))
    });
    modules
}

pub fn controller_with(modules: ModuleRegistry, budget: Option<Duration>) -> NavigationController {
    NavigationController::new(SharedSession::new(fresh_session()), Arc::new(modules))
        .with_dispatch_budget(budget)
}

/// Renderer that counts its invocations
pub fn counting_renderer(
    counter: Arc<AtomicUsize>,
) -> impl Fn(&FilterScope) -> Result<ViewDescriptor> + Send + Sync {
    move |_: &FilterScope| -> Result<ViewDescriptor> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(ViewDescriptor::new("counted"))
    }
}
