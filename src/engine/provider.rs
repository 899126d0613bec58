// Provider catalog: regions, tenants, and default filter values per cloud

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::session::{ALL, FilterKey, FilterScope};
use crate::config::CatalogConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown cloud provider '{0}'")]
pub struct UnknownProviderError(pub String);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Provider {
    #[default]
    #[serde(rename = "AWS", alias = "aws")]
    Aws,
    #[serde(rename = "Azure", alias = "azure", alias = "AZURE")]
    Azure,
    #[serde(rename = "GCP", alias = "gcp")]
    Gcp,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::Gcp => "GCP",
        }
    }

    /// What tenants are called for this provider (accounts, subscriptions, projects)
    pub fn tenant_noun(&self) -> &'static str {
        match self {
            Self::Aws => "Account",
            Self::Azure => "Subscription",
            Self::Gcp => "Project",
        }
    }

    /// What regions are called for this provider
    pub fn region_noun(&self) -> &'static str {
        match self {
            Self::Azure => "Location",
            Self::Aws | Self::Gcp => "Region",
        }
    }

    /// Next provider in display order (wraps around)
    pub fn next(self) -> Self {
        match self {
            Self::Aws => Self::Azure,
            Self::Azure => Self::Gcp,
            Self::Gcp => Self::Aws,
        }
    }

    /// Parse a provider name, falling back to the platform default on garbage.
    ///
    /// Only for values that come from outside the typed API (session restores,
    /// free-form config). The failure is logged so it shows up in development.
    pub fn resolve_or_default(raw: &str) -> Self {
        match raw.parse() {
            Ok(provider) => provider,
            Err(err) => {
                tracing::error!(%err, fallback = %Provider::default(), "rejecting provider value");
                Provider::default()
            }
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" | "amazon" => Ok(Self::Aws),
            "azure" | "microsoft" => Ok(Self::Azure),
            "gcp" | "google" => Ok(Self::Gcp),
            _ => Err(UnknownProviderError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
}

/// An AWS account, Azure subscription, or GCP project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub environment: String,
    pub status: TenantStatus,
    pub home_region: String,
}

impl Tenant {
    fn new(id: &str, name: &str, environment: &str, home_region: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            environment: environment.to_string(),
            status: TenantStatus::Active,
            home_region: home_region.to_string(),
        }
    }

    fn suspended(mut self) -> Self {
        self.status = TenantStatus::Suspended;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub regions: Vec<String>,
    pub tenants: Vec<Tenant>,
}

pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-2",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
];

pub const AZURE_LOCATIONS: &[&str] = &[
    "East US",
    "East US 2",
    "West US",
    "West US 2",
    "Central US",
    "North Europe",
    "West Europe",
    "Southeast Asia",
    "East Asia",
    "UK South",
    "UK West",
    "Canada Central",
    "Canada East",
    "Australia East",
    "Australia Southeast",
];

pub const GCP_REGIONS: &[&str] = &[
    "us-central1",
    "us-east1",
    "us-west1",
    "europe-west1",
    "europe-west2",
    "asia-southeast1",
    "asia-northeast1",
];

pub const ENVIRONMENTS: &[&str] = &["production", "development", "staging", "sandbox"];

pub const AZURE_RESOURCE_GROUPS: &[&str] =
    &["Production-RG", "Development-RG", "Staging-RG", "Sandbox-RG"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Static catalog of supported providers
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    profiles: HashMap<Provider, ProviderProfile>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderRegistry {
    /// Catalog with the built-in region lists and demo tenant inventory
    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();

        profiles.insert(
            Provider::Aws,
            ProviderProfile {
                regions: owned(AWS_REGIONS),
                tenants: vec![
                    Tenant::new("123456789012", "Production-Main", "production", "us-east-1"),
                    Tenant::new("234567890123", "Development", "development", "us-west-2"),
                    Tenant::new("345678901234", "Staging", "staging", "us-east-1"),
                    Tenant::new("456789012345", "Legacy-Sandbox", "sandbox", "us-east-1").suspended(),
                ],
            },
        );

        profiles.insert(
            Provider::Azure,
            ProviderProfile {
                regions: owned(AZURE_LOCATIONS),
                tenants: vec![
                    Tenant::new(
                        "12345678-1234-1234-1234-123456789012",
                        "Production-Main",
                        "production",
                        "East US",
                    ),
                    Tenant::new(
                        "23456789-2345-2345-2345-234567890123",
                        "Development",
                        "development",
                        "West US",
                    ),
                    Tenant::new(
                        "34567890-3456-3456-3456-345678901234",
                        "Staging",
                        "staging",
                        "East US 2",
                    ),
                ],
            },
        );

        // GCP support is still in development: regions only, no projects yet
        profiles.insert(
            Provider::Gcp,
            ProviderProfile {
                regions: owned(GCP_REGIONS),
                tenants: Vec::new(),
            },
        );

        Self { profiles }
    }

    /// Built-in catalog with region lists overridden from config.
    /// Empty lists in config keep the built-in values.
    pub fn from_config(catalog: &CatalogConfig) -> Self {
        let mut registry = Self::builtin();
        let overrides = [
            (Provider::Aws, &catalog.aws_regions),
            (Provider::Azure, &catalog.azure_locations),
            (Provider::Gcp, &catalog.gcp_regions),
        ];

        for (provider, regions) in overrides {
            if regions.is_empty() {
                continue;
            }
            if let Some(profile) = registry.profiles.get_mut(&provider) {
                profile.regions = regions.clone();
            }
        }

        registry
    }

    /// Registry limited to the given providers
    pub fn restricted_to(mut self, providers: &[Provider]) -> Self {
        self.profiles.retain(|p, _| providers.contains(p));
        self
    }

    fn profile(&self, provider: Provider) -> Result<&ProviderProfile, UnknownProviderError> {
        self.profiles
            .get(&provider)
            .ok_or_else(|| UnknownProviderError(provider.name().to_string()))
    }

    pub fn supports(&self, provider: Provider) -> bool {
        self.profiles.contains_key(&provider)
    }

    /// Providers in display order
    pub fn providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.supports(*p))
            .collect()
    }

    pub fn regions_for(&self, provider: Provider) -> Result<&[String], UnknownProviderError> {
        Ok(&self.profile(provider)?.regions)
    }

    /// Default value for every filter key under `provider`
    pub fn default_filters(
        &self,
        provider: Provider,
    ) -> Result<BTreeMap<FilterKey, String>, UnknownProviderError> {
        self.profile(provider)?;
        Ok(FilterKey::ALL
            .into_iter()
            .map(|key| (key, ALL.to_string()))
            .collect())
    }

    /// Choices a sidebar offers for `key`, starting with the `all` sentinel.
    /// Keys that are not native to `provider` only offer the sentinel.
    pub fn filter_options(
        &self,
        provider: Provider,
        key: FilterKey,
    ) -> Result<Vec<String>, UnknownProviderError> {
        let profile = self.profile(provider)?;
        let mut options = vec![ALL.to_string()];

        if !FilterKey::native_to(provider).contains(&key) {
            return Ok(options);
        }

        match key {
            FilterKey::Accounts | FilterKey::Subscriptions | FilterKey::Projects => options.extend(
                profile
                    .tenants
                    .iter()
                    .filter(|t| t.is_active())
                    .map(|t| t.id.clone()),
            ),
            FilterKey::Regions => options.extend(profile.regions.iter().cloned()),
            FilterKey::ResourceGroup => options.extend(owned(AZURE_RESOURCE_GROUPS)),
            FilterKey::Environment => options.extend(owned(ENVIRONMENTS)),
        }

        Ok(options)
    }

    pub fn tenants(&self, provider: Provider) -> Result<&[Tenant], UnknownProviderError> {
        Ok(&self.profile(provider)?.tenants)
    }

    /// Active tenants of the scope's provider matching its tenant and environment filters
    pub fn active_tenants(&self, scope: &FilterScope) -> Result<Vec<&Tenant>, UnknownProviderError> {
        let selected = scope.get(FilterKey::tenant_key(scope.provider));
        let environment = scope.get(FilterKey::Environment);

        Ok(self
            .tenants(scope.provider)?
            .iter()
            .filter(|t| t.is_active())
            .filter(|t| selected == ALL || tenant_matches(t, selected))
            .filter(|t| environment == ALL || t.environment.eq_ignore_ascii_case(environment))
            .collect())
    }

    pub fn active_tenant_count(&self, provider: Provider) -> Result<usize, UnknownProviderError> {
        Ok(self
            .tenants(provider)?
            .iter()
            .filter(|t| t.is_active())
            .count())
    }
}

// Azure selections may carry a shortened subscription id
fn tenant_matches(tenant: &Tenant, selected: &str) -> bool {
    tenant.id == selected || tenant.id.starts_with(selected)
}
