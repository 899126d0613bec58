// Session-scoped key/value state with provider-dependent filters

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use uuid::Uuid;

use super::provider::{Provider, ProviderRegistry, UnknownProviderError};

/// Sentinel for "no filter applied"
pub const ALL: &str = "all";

/// Module every provider switch lands on
pub const DEFAULT_MODULE: &str = "Dashboard";

/// Well-known session keys
pub mod keys {
    pub const CLOUD_PROVIDER: &str = "cloud_provider";
    pub const MODE: &str = "mode";
    pub const TIME_RANGE: &str = "time_range";
    pub const LAST_REFRESH: &str = "last_refresh";
    pub const SELECTED_ACCOUNTS: &str = "selected_accounts";
    pub const SELECTED_REGIONS: &str = "selected_regions";
    pub const SELECTED_SUBSCRIPTIONS: &str = "selected_subscriptions";
    pub const SELECTED_RESOURCE_GROUP: &str = "selected_resource_group";
    pub const SELECTED_PROJECTS: &str = "selected_projects";
    pub const SELECTED_ENVIRONMENT: &str = "selected_environment";
    pub const ACTIVE_MODULE: &str = "active_module";
    pub const THEME_PREFERENCE: &str = "theme_preference";
    pub const CACHE_ENABLED: &str = "cache_enabled";
    pub const CACHE_TTL: &str = "cache_ttl";
    pub const FEATURE_AI_ASSISTANT: &str = "feature_ai_assistant";
    pub const FEATURE_AUTO_REFRESH: &str = "feature_auto_refresh";
}

pub const TIME_RANGES: &[&str] = &["Last 24 Hours", "Last 7 Days", "Last 30 Days", "Last 90 Days"];

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session key '{0}' can only be changed through a provider switch")]
    ReservedKey(String),

    #[error(transparent)]
    UnknownProvider(#[from] UnknownProviderError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionValue {
    Provider(Provider),
    Bool(bool),
    Int(i64),
    Timestamp(DateTime<Local>),
    Text(String),
}

impl SessionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Local>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_provider(&self) -> Option<Provider> {
        match self {
            Self::Provider(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for SessionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(p) => write!(f, "{}", p),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SessionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SessionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Provider-dependent session filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Accounts,
    Regions,
    Subscriptions,
    ResourceGroup,
    Projects,
    Environment,
}

impl FilterKey {
    pub const ALL: [FilterKey; 6] = [
        FilterKey::Accounts,
        FilterKey::Regions,
        FilterKey::Subscriptions,
        FilterKey::ResourceGroup,
        FilterKey::Projects,
        FilterKey::Environment,
    ];

    pub fn session_key(&self) -> &'static str {
        match self {
            Self::Accounts => keys::SELECTED_ACCOUNTS,
            Self::Regions => keys::SELECTED_REGIONS,
            Self::Subscriptions => keys::SELECTED_SUBSCRIPTIONS,
            Self::ResourceGroup => keys::SELECTED_RESOURCE_GROUP,
            Self::Projects => keys::SELECTED_PROJECTS,
            Self::Environment => keys::SELECTED_ENVIRONMENT,
        }
    }

    /// Key holding the selected account, subscription, or project
    pub fn tenant_key(provider: Provider) -> Self {
        match provider {
            Provider::Aws => Self::Accounts,
            Provider::Azure => Self::Subscriptions,
            Provider::Gcp => Self::Projects,
        }
    }

    /// Keys that mean something under `provider`, in sidebar order
    pub fn native_to(provider: Provider) -> &'static [FilterKey] {
        match provider {
            Provider::Aws => &[Self::Accounts, Self::Regions, Self::Environment],
            Provider::Azure => &[
                Self::Subscriptions,
                Self::Regions,
                Self::ResourceGroup,
                Self::Environment,
            ],
            Provider::Gcp => &[Self::Projects, Self::Regions, Self::Environment],
        }
    }

    /// Provider vocabulary used in cloud contexts
    pub fn context_name(&self, provider: Provider) -> &'static str {
        match (self, provider) {
            (Self::Accounts, _) => "account",
            (Self::Subscriptions, _) => "subscription",
            (Self::Projects, _) => "project",
            (Self::Regions, Provider::Azure) => "location",
            (Self::Regions, _) => "region",
            (Self::ResourceGroup, _) => "resource_group",
            (Self::Environment, _) => "environment",
        }
    }

    pub fn label(&self, provider: Provider) -> &'static str {
        match self {
            Self::Accounts | Self::Subscriptions | Self::Projects => provider.tenant_noun(),
            Self::Regions => provider.region_noun(),
            Self::ResourceGroup => "Resource Group",
            Self::Environment => "Environment",
        }
    }
}

/// Snapshot of the filters handed to module renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterScope {
    pub provider: Provider,
    pub values: BTreeMap<FilterKey, String>,
}

impl FilterScope {
    pub fn unfiltered(provider: Provider) -> Self {
        Self {
            provider,
            values: FilterKey::ALL
                .into_iter()
                .map(|k| (k, ALL.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, key: FilterKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or(ALL)
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// True if any provider-native filter narrows the view
    pub fn is_filtered(&self) -> bool {
        FilterKey::native_to(self.provider)
            .iter()
            .any(|k| self.get(*k) != ALL)
    }

    pub fn context(&self) -> CloudContext {
        CloudContext {
            provider: self.provider,
            entries: FilterKey::native_to(self.provider)
                .iter()
                .map(|k| (k.context_name(self.provider).to_string(), self.get(*k).to_string()))
                .collect(),
        }
    }
}

/// Provider-native filters, named the way the provider names them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudContext {
    pub provider: Provider,
    pub entries: Vec<(String, String)>,
}

impl CloudContext {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub active_module: String,
    pub provider: Provider,
}

/// Values the defaults table starts from
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub provider: Provider,
    pub module: String,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            module: DEFAULT_MODULE.to_string(),
        }
    }
}

pub struct SessionContext {
    id: Uuid,
    registry: Arc<ProviderRegistry>,
    defaults: SessionDefaults,
    values: HashMap<String, SessionValue>,
}

impl SessionContext {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_defaults(registry, SessionDefaults::default())
    }

    pub fn with_defaults(registry: Arc<ProviderRegistry>, defaults: SessionDefaults) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            registry,
            defaults,
            values: HashMap::new(),
        };
        session.initialize();
        tracing::debug!(session = %session.id, provider = %session.current_provider(), "session created");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Names of every key in the defaults table
    pub fn default_keys() -> Vec<&'static str> {
        default_table(&SessionDefaults::default())
            .into_iter()
            .map(|(k, _)| k)
            .collect()
    }

    /// Fill in any default key that is missing. Never overwrites.
    pub fn initialize(&mut self) {
        for (key, value) in default_table(&self.defaults) {
            self.values.entry(key.to_string()).or_insert(value);
        }
    }

    pub fn value(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    pub fn get(&self, key: &str, default: SessionValue) -> SessionValue {
        self.values.get(key).cloned().unwrap_or(default)
    }

    pub fn get_text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values
            .get(key)
            .and_then(SessionValue::as_text)
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(SessionValue::as_bool)
            .unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values
            .get(key)
            .and_then(SessionValue::as_int)
            .unwrap_or(default)
    }

    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Local>> {
        self.values.get(key).and_then(SessionValue::as_timestamp)
    }

    pub fn set(&mut self, key: &str, value: impl Into<SessionValue>) -> Result<(), SessionError> {
        if key == keys::CLOUD_PROVIDER {
            return Err(SessionError::ReservedKey(key.to_string()));
        }
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) {
        self.values
            .insert(key.session_key().to_string(), SessionValue::Text(value.into()));
    }

    pub fn current_provider(&self) -> Provider {
        self.values
            .get(keys::CLOUD_PROVIDER)
            .and_then(SessionValue::as_provider)
            .unwrap_or(self.defaults.provider)
    }

    pub fn active_module(&self) -> &str {
        self.get_text(keys::ACTIVE_MODULE, DEFAULT_MODULE)
    }

    pub fn activate_module(&mut self, module_key: &str) {
        self.values.insert(
            keys::ACTIVE_MODULE.to_string(),
            SessionValue::Text(module_key.to_string()),
        );
    }

    /// Switch provider, landing on the dashboard with every filter reset.
    ///
    /// Returns `Ok(false)` when `provider` is already active. The new filter
    /// values are computed before anything is written, so a rejected switch
    /// leaves the session untouched.
    pub fn switch_provider(&mut self, provider: Provider) -> Result<bool, SessionError> {
        let previous = self.current_provider();
        if previous == provider {
            return Ok(false);
        }

        let filters = self.registry.default_filters(provider)?;

        self.values.insert(
            keys::CLOUD_PROVIDER.to_string(),
            SessionValue::Provider(provider),
        );
        self.activate_module(DEFAULT_MODULE);
        for key in FilterKey::ALL {
            let value = filters.get(&key).map(String::as_str).unwrap_or(ALL);
            self.set_filter(key, value);
        }

        tracing::info!(session = %self.id, from = %previous, to = %provider, "switched cloud provider");
        Ok(true)
    }

    pub fn trigger_refresh(&mut self) -> DateTime<Local> {
        let now = Local::now();
        self.values
            .insert(keys::LAST_REFRESH.to_string(), SessionValue::Timestamp(now));
        now
    }

    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.get_timestamp(keys::LAST_REFRESH)
    }

    pub fn navigation_state(&self) -> NavigationState {
        NavigationState {
            active_module: self.active_module().to_string(),
            provider: self.current_provider(),
        }
    }

    pub fn filter_scope(&self) -> FilterScope {
        let mut scope = FilterScope::unfiltered(self.current_provider());
        for key in FilterKey::ALL {
            scope.set(key, self.get_text(key.session_key(), ALL));
        }
        scope
    }

    pub fn cloud_context(&self) -> CloudContext {
        self.filter_scope().context()
    }

    /// Sorted copy of every key/value pair
    pub fn entries(&self) -> BTreeMap<String, SessionValue> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn default_table(defaults: &SessionDefaults) -> Vec<(&'static str, SessionValue)> {
    let mut table: Vec<(&'static str, SessionValue)> = vec![
        (keys::CLOUD_PROVIDER, SessionValue::Provider(defaults.provider)),
        (keys::MODE, "Live".into()),
        (keys::TIME_RANGE, "Last 30 Days".into()),
        (keys::LAST_REFRESH, SessionValue::Timestamp(Local::now())),
    ];
    for key in FilterKey::ALL {
        table.push((key.session_key(), ALL.into()));
    }
    table.extend([
        (keys::ACTIVE_MODULE, defaults.module.as_str().into()),
        (keys::THEME_PREFERENCE, "auto".into()),
        (keys::CACHE_ENABLED, true.into()),
        (keys::CACHE_TTL, 300_i64.into()),
        (keys::FEATURE_AI_ASSISTANT, true.into()),
        (keys::FEATURE_AUTO_REFRESH, false.into()),
    ]);
    table
}

/// Handle to a session shared between the UI loop and dispatch workers.
/// Every access goes through the lock, so mutations are serialized.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionContext>>,
}

impl SharedSession {
    pub fn new(session: SessionContext) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionContext> {
        // A panic while holding the lock cannot leave a half-applied switch:
        // switch_provider validates before it writes.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionContext) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn switch_provider(&self, provider: Provider) -> Result<bool, SessionError> {
        self.update(|s| s.switch_provider(provider))
    }

    pub fn activate_module(&self, module_key: &str) {
        self.update(|s| s.activate_module(module_key))
    }

    pub fn trigger_refresh(&self) -> DateTime<Local> {
        self.update(SessionContext::trigger_refresh)
    }

    /// Navigation state and filters read under one lock
    pub fn snapshot(&self) -> (NavigationState, FilterScope) {
        self.read(|s| (s.navigation_state(), s.filter_scope()))
    }
}
