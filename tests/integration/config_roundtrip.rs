// Config files on disk and how they shape the bootstrapped engine

use cloudidp::config::Config;
use cloudidp::engine::{self, Provider, ProviderRegistry};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.startup.provider = Provider::Azure;
    config.startup.module = "Network".to_string();
    config.navigation.dispatch_timeout_ms = 500;
    config.catalog.aws_regions = vec!["us-east-1".to_string()];
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.startup.provider, Provider::Azure);
    assert_eq!(loaded.startup.module, "Network");
    assert_eq!(loaded.navigation.dispatch_timeout_ms, 500);
    assert_eq!(loaded.catalog.aws_regions, vec!["us-east-1"]);
}

#[test]
fn test_invalid_toml_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[startup\nprovider = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("config.toml"));
}

#[test]
fn test_unknown_provider_keeps_other_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[startup]
provider = "Oracle"
module = "Security"

[navigation]
dispatch_timeout_ms = 300

[catalog]
aws_regions = ["eu-west-1"]
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.startup.provider, Provider::Aws);
    assert_eq!(config.startup.rejected_provider.as_deref(), Some("Oracle"));
    assert_eq!(config.catalog.aws_regions, vec!["eu-west-1"]);

    let nav = engine::bootstrap(&config, None);
    assert_eq!(nav.current_provider(), Provider::Aws);
    assert_eq!(nav.active_module(), "Security");
    assert_eq!(nav.dispatch_budget(), Some(Duration::from_millis(300)));
}

#[test]
fn test_bootstrap_honours_startup_settings() {
    let mut config = Config::default();
    config.startup.provider = Provider::Azure;
    config.startup.module = "Security".to_string();
    config.navigation.dispatch_timeout_ms = 0;

    let nav = engine::bootstrap(&config, None);
    assert_eq!(nav.current_provider(), Provider::Azure);
    assert_eq!(nav.active_module(), "Security");
    assert_eq!(nav.dispatch_budget(), None);

    // The CLI override wins over the file
    let nav = engine::bootstrap(&config, Some(Provider::Gcp));
    assert_eq!(nav.current_provider(), Provider::Gcp);
}

#[test]
fn test_default_budget_comes_from_config() {
    let nav = engine::bootstrap(&Config::default(), None);
    assert_eq!(nav.dispatch_budget(), Some(Duration::from_millis(2000)));
}

#[test]
fn test_region_overrides_replace_builtin_lists() {
    let mut config = Config::default();
    config.catalog.gcp_regions = vec!["europe-north1".to_string(), "us-south1".to_string()];

    let registry = ProviderRegistry::from_config(&config.catalog);
    assert_eq!(
        registry.regions_for(Provider::Gcp).unwrap(),
        ["europe-north1".to_string(), "us-south1".to_string()]
    );
    // Untouched providers keep the built-in catalog
    assert_eq!(registry.regions_for(Provider::Aws).unwrap().len(), 10);
}
