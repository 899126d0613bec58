// Module dispatch table: (module key, provider) -> renderer

use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::provider::Provider;
use super::session::FilterScope;

/// What a module renderer hands back. The core never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewDescriptor {
    pub title: String,
    pub subtitle: Option<String>,
    pub blocks: Vec<ViewBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ViewBlock {
    Text(String),
    Metrics(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl ViewDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            blocks: Vec::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn block(mut self, block: ViewBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

/// A module implementation for one provider
pub trait ModuleRenderer: Send + Sync {
    fn render(&self, filters: &FilterScope) -> Result<ViewDescriptor>;
}

impl<F> ModuleRenderer for F
where
    F: Fn(&FilterScope) -> Result<ViewDescriptor> + Send + Sync,
{
    fn render(&self, filters: &FilterScope) -> Result<ViewDescriptor> {
        self(filters)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub key: String,
    pub icon: String,
    pub label: String,
    /// Labels that differ from `label` for a given provider
    pub provider_labels: HashMap<Provider, String>,
}

impl ModuleDescriptor {
    pub fn new(key: &str, icon: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            icon: icon.to_string(),
            label: label.to_string(),
            provider_labels: HashMap::new(),
        }
    }

    pub fn with_label(mut self, provider: Provider, label: &str) -> Self {
        self.provider_labels.insert(provider, label.to_string());
        self
    }

    pub fn label_for(&self, provider: Provider) -> &str {
        self.provider_labels
            .get(&provider)
            .map(String::as_str)
            .unwrap_or(&self.label)
    }
}

/// Result of a dispatch. Exactly one of these comes back for every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Rendered {
        module_key: String,
        provider: Provider,
        view: ViewDescriptor,
    },
    /// No implementation of this module for this provider yet
    Unavailable {
        module_key: String,
        provider: Provider,
    },
    /// The renderer errored, panicked, or ran out of time
    Failed {
        module_key: String,
        provider: Provider,
        error: String,
    },
}

impl DispatchOutcome {
    pub fn module_key(&self) -> &str {
        match self {
            Self::Rendered { module_key, .. }
            | Self::Unavailable { module_key, .. }
            | Self::Failed { module_key, .. } => module_key,
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Rendered { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::Failed { provider, .. } => *provider,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn view(&self) -> Option<&ViewDescriptor> {
        match self {
            Self::Rendered { view, .. } => Some(view),
            _ => None,
        }
    }
}

struct ModuleEntry {
    descriptor: Option<ModuleDescriptor>,
    order: usize,
    renderers: HashMap<Provider, Arc<dyn ModuleRenderer>>,
}

type WorkerKey = (String, Provider);

/// Two-level dispatch table, built once at startup
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleEntry>,
    /// Budgeted workers that have not returned yet, at most one per pair
    in_flight: Arc<Mutex<HashSet<WorkerKey>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, key: &str) -> &mut ModuleEntry {
        let next_order = self.modules.len();
        self.modules
            .entry(key.to_string())
            .or_insert_with(|| ModuleEntry {
                descriptor: None,
                order: next_order,
                renderers: HashMap::new(),
            })
    }

    /// Register navigation metadata. Modules list in the order their keys first appeared.
    pub fn describe(&mut self, descriptor: ModuleDescriptor) -> &mut Self {
        let entry = self.entry(&descriptor.key);
        entry.descriptor = Some(descriptor);
        self
    }

    pub fn register<R>(&mut self, module_key: &str, provider: Provider, renderer: R) -> &mut Self
    where
        R: ModuleRenderer + 'static,
    {
        self.register_shared(module_key, provider, Arc::new(renderer))
    }

    pub fn register_shared(
        &mut self,
        module_key: &str,
        provider: Provider,
        renderer: Arc<dyn ModuleRenderer>,
    ) -> &mut Self {
        let replaced = self
            .entry(module_key)
            .renderers
            .insert(provider, renderer)
            .is_some();
        if replaced {
            tracing::warn!(module = module_key, %provider, "replacing registered renderer");
        }
        self
    }

    /// Descriptor for a module about to become active, if it was described
    pub fn activate(&self, module_key: &str) -> Option<&ModuleDescriptor> {
        self.modules
            .get(module_key)
            .and_then(|e| e.descriptor.as_ref())
    }

    /// Described modules in display order
    pub fn modules(&self) -> Vec<&ModuleDescriptor> {
        let mut entries: Vec<&ModuleEntry> = self
            .modules
            .values()
            .filter(|e| e.descriptor.is_some())
            .collect();
        entries.sort_by_key(|e| e.order);
        entries
            .into_iter()
            .filter_map(|e| e.descriptor.as_ref())
            .collect()
    }

    pub fn is_available(&self, module_key: &str, provider: Provider) -> bool {
        self.lookup(module_key, provider).is_some()
    }

    /// Providers with a renderer for `module_key`, in display order
    pub fn providers_for(&self, module_key: &str) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.is_available(module_key, *p))
            .collect()
    }

    fn lookup(&self, module_key: &str, provider: Provider) -> Option<Arc<dyn ModuleRenderer>> {
        self.modules
            .get(module_key)
            .and_then(|e| e.renderers.get(&provider))
            .cloned()
    }

    /// Resolve and invoke the renderer for `(module_key, provider)`.
    ///
    /// Nothing a renderer does escapes this call: errors and panics come back
    /// as [`DispatchOutcome::Failed`].
    pub fn dispatch(
        &self,
        module_key: &str,
        provider: Provider,
        filters: &FilterScope,
    ) -> DispatchOutcome {
        self.dispatch_with_budget(module_key, provider, filters, None)
    }

    /// Like [`dispatch`](Self::dispatch), but gives up on renderers that take
    /// longer than `budget`. The abandoned renderer keeps its worker thread,
    /// and the pair fails fast until that worker returns.
    pub fn dispatch_with_budget(
        &self,
        module_key: &str,
        provider: Provider,
        filters: &FilterScope,
        budget: Option<Duration>,
    ) -> DispatchOutcome {
        let Some(renderer) = self.lookup(module_key, provider) else {
            tracing::debug!(module = module_key, %provider, "module not available for provider");
            return DispatchOutcome::Unavailable {
                module_key: module_key.to_string(),
                provider,
            };
        };

        let result = match budget {
            None => invoke(renderer.as_ref(), filters),
            Some(budget) => self.invoke_with_budget(
                (module_key.to_string(), provider),
                renderer,
                filters.clone(),
                budget,
            ),
        };

        match result {
            Ok(view) => DispatchOutcome::Rendered {
                module_key: module_key.to_string(),
                provider,
                view,
            },
            Err(error) => {
                tracing::warn!(module = module_key, %provider, %error, "module render failed");
                DispatchOutcome::Failed {
                    module_key: module_key.to_string(),
                    provider,
                    error,
                }
            }
        }
    }

    /// Budgeted workers still running, typically renderers that overran their budget
    pub fn workers_in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn invoke_with_budget(
        &self,
        key: WorkerKey,
        renderer: Arc<dyn ModuleRenderer>,
        filters: FilterScope,
        budget: Duration,
    ) -> Result<ViewDescriptor, String> {
        if !self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone())
        {
            return Err("still running from an earlier dispatch".to_string());
        }

        let (tx, rx) = mpsc::channel();
        let in_flight = Arc::clone(&self.in_flight);
        let worker_key = key.clone();

        let spawned = thread::Builder::new()
            .name("module-render".to_string())
            .spawn(move || {
                let result = invoke(renderer.as_ref(), &filters);
                // Clear before sending so a waiting caller never sees a stale entry
                in_flight
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&worker_key);
                // Receiver may be gone if we already timed out
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            self.in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);
            return Err(format!("could not start renderer: {}", e));
        }

        match rx.recv_timeout(budget) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(format!("timed out after {} ms", budget.as_millis()))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err("renderer exited without a result".to_string())
            }
        }
    }
}

fn invoke(renderer: &dyn ModuleRenderer, filters: &FilterScope) -> Result<ViewDescriptor, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(filters))) {
        Ok(Ok(view)) => Ok(view),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("renderer panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("renderer panicked: {}", s)
    } else {
        "renderer panicked".to_string()
    }
}
