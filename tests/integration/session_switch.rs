// Provider switches and the session defaults they reset to

use cloudidp::engine::{
    ALL, DEFAULT_MODULE, FilterKey, Provider, SessionError, SessionValue, keys,
};

use crate::common::helpers::*;

#[test]
fn test_fresh_session_defaults() {
    let session = fresh_session();

    assert_eq!(session.current_provider(), Provider::Aws);
    assert_eq!(session.active_module(), DEFAULT_MODULE);
    assert_eq!(session.get_text(keys::MODE, ""), "Live");
    assert_eq!(session.get_text(keys::TIME_RANGE, ""), "Last 30 Days");
    assert_eq!(session.get_int(keys::CACHE_TTL, 0), 300);
    assert!(session.get_bool(keys::CACHE_ENABLED, false));
    assert!(session.get_bool(keys::FEATURE_AI_ASSISTANT, false));
    assert!(!session.get_bool(keys::FEATURE_AUTO_REFRESH, true));
    assert!(session.last_refresh().is_some());

    for key in FilterKey::ALL {
        assert_eq!(session.filter_scope().get(key), ALL);
    }
}

#[test]
fn test_initialize_keeps_existing_values() {
    let mut session = fresh_session();
    session.set(keys::MODE, "Demo").unwrap();
    session.set_filter(FilterKey::Regions, "eu-west-1");
    let id = session.id();

    session.initialize();

    assert_eq!(session.get_text(keys::MODE, ""), "Demo");
    assert_eq!(session.filter_scope().get(FilterKey::Regions), "eu-west-1");
    assert_eq!(session.id(), id);
}

#[test]
fn test_switch_resets_module_and_filters() {
    let mut session = fresh_session();
    session.activate_module("Resource Inventory");
    session.set_filter(FilterKey::Accounts, "123456789012");
    session.set_filter(FilterKey::Regions, "us-west-2");
    session.set_filter(FilterKey::Environment, "production");

    let changed = session.switch_provider(Provider::Azure).unwrap();

    assert!(changed);
    assert_eq!(session.current_provider(), Provider::Azure);
    assert_eq!(session.active_module(), "Dashboard");
    let scope = session.filter_scope();
    for key in FilterKey::ALL {
        assert_eq!(scope.get(key), ALL, "{:?} should be reset", key);
    }
}

#[test]
fn test_same_provider_switch_is_a_noop() {
    let mut session = fresh_session();
    session.activate_module("Network");
    session.set_filter(FilterKey::Regions, "eu-central-1");

    let changed = session.switch_provider(Provider::Aws).unwrap();

    assert!(!changed);
    assert_eq!(session.active_module(), "Network");
    assert_eq!(session.filter_scope().get(FilterKey::Regions), "eu-central-1");
}

#[test]
fn test_switch_leaves_unrelated_keys_alone() {
    let mut session = fresh_session();
    session.set(keys::TIME_RANGE, "Last 7 Days").unwrap();
    session.set(keys::MODE, "Demo").unwrap();

    session.switch_provider(Provider::Gcp).unwrap();

    assert_eq!(session.get_text(keys::TIME_RANGE, ""), "Last 7 Days");
    assert_eq!(session.get_text(keys::MODE, ""), "Demo");
}

#[test]
fn test_provider_key_is_reserved() {
    let mut session = fresh_session();
    let err = session
        .set(keys::CLOUD_PROVIDER, SessionValue::Provider(Provider::Gcp))
        .unwrap_err();

    assert!(matches!(err, SessionError::ReservedKey(_)));
    assert_eq!(session.current_provider(), Provider::Aws);
}

#[test]
fn test_cloud_context_uses_provider_vocabulary() {
    let mut session = fresh_session();
    session.set_filter(FilterKey::Regions, "us-east-1");
    let aws = session.cloud_context();
    assert_eq!(aws.get("account"), Some(ALL));
    assert_eq!(aws.get("region"), Some("us-east-1"));
    assert_eq!(aws.get("location"), None);

    session.switch_provider(Provider::Azure).unwrap();
    let azure = session.cloud_context();
    assert_eq!(azure.provider, Provider::Azure);
    assert_eq!(azure.get("subscription"), Some(ALL));
    assert_eq!(azure.get("location"), Some(ALL));
    assert_eq!(azure.get("resource_group"), Some(ALL));

    session.switch_provider(Provider::Gcp).unwrap();
    let gcp = session.cloud_context();
    assert_eq!(gcp.get("project"), Some(ALL));
    assert_eq!(gcp.get("resource_group"), None);
}

#[test]
fn test_refresh_moves_timestamp_forward() {
    let mut session = fresh_session();
    let before = session.last_refresh().unwrap();
    let after = session.trigger_refresh();
    assert!(after >= before);
    assert_eq!(session.last_refresh(), Some(after));
}
