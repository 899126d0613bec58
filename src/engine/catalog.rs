// Standard dashboard modules and the overview renderers wired up at startup

use anyhow::Result;
use std::sync::Arc;

use super::modules::{ModuleDescriptor, ModuleRegistry, ModuleRenderer, ViewBlock, ViewDescriptor};
use super::provider::{Provider, ProviderRegistry};
use super::session::{ALL, FilterKey, FilterScope};

pub const AI_ASSISTANT: &str = "AI Assistant";

/// Modules the Azure side has not shipped yet
const AZURE_PENDING: &[&str] = &["Developer Experience", AI_ASSISTANT];

/// The sixteen navigation entries, in display order
pub fn standard_modules() -> Vec<ModuleDescriptor> {
    vec![
        ModuleDescriptor::new("Dashboard", "🏠", "Dashboard"),
        ModuleDescriptor::new("Account Management", "👥", "Account Mgmt")
            .with_label(Provider::Azure, "Subscription Mgmt")
            .with_label(Provider::Gcp, "Project Mgmt"),
        ModuleDescriptor::new("Resource Inventory", "📦", "Resources"),
        ModuleDescriptor::new("Network", "🌐", "Network"),
        ModuleDescriptor::new("Organizations", "🏢", "Organizations")
            .with_label(Provider::Azure, "Management Groups")
            .with_label(Provider::Gcp, "Folders"),
        ModuleDescriptor::new("Design & Planning", "📐", "Design"),
        ModuleDescriptor::new("Provisioning", "🚀", "Provisioning"),
        ModuleDescriptor::new("CI/CD", "📄", "CI/CD"),
        ModuleDescriptor::new("Operations", "⚙️", "Operations"),
        ModuleDescriptor::new("Advanced Operations", "⚡", "Advanced Ops"),
        ModuleDescriptor::new("Security", "🔒", "Security & AI"),
        ModuleDescriptor::new("Container Management", "📦", "EKS")
            .with_label(Provider::Azure, "AKS")
            .with_label(Provider::Gcp, "GKE"),
        ModuleDescriptor::new("FinOps & Cost", "💰", "FinOps"),
        ModuleDescriptor::new("Lifecycle", "♻️", "Lifecycle"),
        ModuleDescriptor::new("Developer Experience", "👨‍💻", "DevEx"),
        ModuleDescriptor::new(AI_ASSISTANT, "🤖", "AI Assistant"),
    ]
}

/// Registry with every standard module described and overview renderers
/// for AWS (all modules) and Azure (all but the pending ones). GCP has none.
pub fn standard_registry(providers: Arc<ProviderRegistry>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();

    for descriptor in standard_modules() {
        let key = descriptor.key.clone();
        registry.describe(descriptor.clone());

        let renderer: Arc<dyn ModuleRenderer> = Arc::new(OverviewRenderer {
            module: descriptor,
            providers: Arc::clone(&providers),
        });

        registry.register_shared(&key, Provider::Aws, Arc::clone(&renderer));
        if !AZURE_PENDING.contains(&key.as_str()) {
            registry.register_shared(&key, Provider::Azure, renderer);
        }
    }

    registry
}

/// Placeholder page: the module heading plus the tenants and scope it would cover
pub struct OverviewRenderer {
    module: ModuleDescriptor,
    providers: Arc<ProviderRegistry>,
}

impl ModuleRenderer for OverviewRenderer {
    fn render(&self, filters: &FilterScope) -> Result<ViewDescriptor> {
        let provider = filters.provider;
        let noun = provider.tenant_noun();
        let tenants = self.providers.active_tenants(filters)?;

        let region = filters.get(FilterKey::Regions);
        let regions_in_scope = if region == ALL {
            self.providers.regions_for(provider)?.len()
        } else {
            1
        };

        let mut view = ViewDescriptor::new(format!(
            "{} {}",
            self.module.icon,
            self.module.label_for(provider)
        ))
        .subtitle(format!("{} Mode", provider))
        .block(ViewBlock::Metrics(vec![
            (format!("Active {}s", noun), tenants.len().to_string()),
            (format!("{}s in scope", provider.region_noun()), regions_in_scope.to_string()),
            ("Environment".to_string(), filters.get(FilterKey::Environment).to_string()),
        ]));

        if tenants.is_empty() {
            view = view.block(ViewBlock::Text(format!(
                "No active {}s match the current filters.",
                noun.to_lowercase()
            )));
        } else {
            view = view.block(ViewBlock::Table {
                headers: vec![
                    noun.to_string(),
                    "ID".to_string(),
                    "Environment".to_string(),
                    provider.region_noun().to_string(),
                ],
                rows: tenants
                    .iter()
                    .map(|t| {
                        vec![
                            t.name.clone(),
                            t.id.clone(),
                            t.environment.clone(),
                            t.home_region.clone(),
                        ]
                    })
                    .collect(),
            });
        }

        Ok(view)
    }
}
