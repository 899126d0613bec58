// Dispatch outcomes: rendered, unavailable, failed, and timed out

use cloudidp::engine::{
    DispatchOutcome, FilterKey, FilterScope, Provider, ProviderRegistry, standard_registry,
};
use insta::assert_json_snapshot;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::common::helpers::*;

#[test]
fn test_gcp_container_management_is_unavailable() {
    let registry = standard_registry(Arc::new(ProviderRegistry::builtin()));
    let scope = FilterScope::unfiltered(Provider::Gcp);

    let outcome = registry.dispatch("Container Management", Provider::Gcp, &scope);

    assert_eq!(
        outcome,
        DispatchOutcome::Unavailable {
            module_key: "Container Management".to_string(),
            provider: Provider::Gcp,
        }
    );
}

#[test]
fn test_azure_pending_modules_are_unavailable() {
    let registry = standard_registry(Arc::new(ProviderRegistry::builtin()));
    let scope = FilterScope::unfiltered(Provider::Azure);

    assert!(registry
        .dispatch("Developer Experience", Provider::Azure, &scope)
        .is_unavailable());
    assert!(registry
        .dispatch("Container Management", Provider::Azure, &scope)
        .is_rendered());
}

#[test]
fn test_unknown_module_is_unavailable_not_an_error() {
    let registry = standard_registry(Arc::new(ProviderRegistry::builtin()));
    let scope = FilterScope::unfiltered(Provider::Aws);

    let outcome = registry.dispatch("Quantum Billing", Provider::Aws, &scope);
    assert!(outcome.is_unavailable());
    assert_eq!(outcome.module_key(), "Quantum Billing");
}

#[test]
fn test_renderer_receives_filter_snapshot() {
    let modules = faulty_registry(Duration::from_millis(0));
    let mut scope = FilterScope::unfiltered(Provider::Aws);
    scope.set(FilterKey::Regions, "ap-southeast-2");

    let outcome = modules.dispatch("Healthy", Provider::Aws, &scope);
    assert_eq!(outcome.view().unwrap().title, "AWS ap-southeast-2");
}

#[test]
fn test_failure_is_contained_and_next_dispatch_succeeds() {
    let mut nav = controller_with(faulty_registry(Duration::from_millis(0)), None);

    nav.activate("Broken");
    let failed = nav.render();
    match &failed.outcome {
        DispatchOutcome::Failed { error, .. } => {
            assert!(error.contains("inventory backend unreachable"))
        }
        other => panic!("expected failure, got {:?}", other),
    }

    nav.activate("Healthy");
    let ok = nav.render();
    assert!(ok.outcome.is_rendered());
    assert_eq!(ok.state.active_module, "Healthy");
}

#[test]
fn test_panicking_renderer_becomes_failed_outcome() {
    let modules = faulty_registry(Duration::from_millis(0));
    let scope = FilterScope::unfiltered(Provider::Aws);

    let outcome = modules.dispatch("Panicky", Provider::Aws, &scope);
    match outcome {
        DispatchOutcome::Failed { error, .. } => assert!(error.contains("renderer blew up")),
        other => panic!("expected failure, got {:?}", other),
    }

    // The registry is still usable afterwards
    assert!(modules.dispatch("Healthy", Provider::Aws, &scope).is_rendered());
}

#[test]
fn test_hung_renderer_times_out_within_budget() {
    let mut nav = controller_with(
        faulty_registry(Duration::from_secs(5)),
        Some(Duration::from_millis(50)),
    );

    nav.activate("Slow");
    let started = Instant::now();
    let screen = nav.render();

    assert!(started.elapsed() < Duration::from_secs(2));
    match &screen.outcome {
        DispatchOutcome::Failed { error, .. } => assert!(error.contains("timed out after 50 ms")),
        other => panic!("expected timeout, got {:?}", other),
    }

    nav.activate("Healthy");
    assert!(nav.render().outcome.is_rendered());
}

#[test]
fn test_repeated_renders_of_hung_module_reuse_one_worker() {
    let mut nav = controller_with(
        faulty_registry(Duration::from_secs(60)),
        Some(Duration::from_millis(20)),
    );
    nav.activate("Slow");

    for _ in 0..50 {
        assert!(nav.render().outcome.is_failed());
    }
    assert_eq!(nav.modules().workers_in_flight(), 1);

    match &nav.render().outcome {
        DispatchOutcome::Failed { error, .. } => assert!(error.contains("still running")),
        other => panic!("expected failure, got {:?}", other),
    }

    // Other modules are not blocked by the hung one
    nav.activate("Healthy");
    assert!(nav.render().outcome.is_rendered());
    assert_eq!(nav.modules().workers_in_flight(), 1);
}

#[test]
fn test_renderer_within_budget_succeeds() {
    let modules = faulty_registry(Duration::from_millis(10));
    let scope = FilterScope::unfiltered(Provider::Aws);

    let outcome =
        modules.dispatch_with_budget("Slow", Provider::Aws, &scope, Some(Duration::from_secs(5)));
    assert_eq!(outcome.view().unwrap().title, "finally");
}

#[test]
fn test_each_render_invokes_renderer_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut modules = faulty_registry(Duration::from_millis(0));
    modules.register("Healthy", Provider::Aws, counting_renderer(Arc::clone(&counter)));
    let mut nav = controller_with(modules, None);

    nav.activate("Healthy");
    nav.render();
    nav.render();

    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_outcome_serializes_with_tag() {
    let registry = standard_registry(Arc::new(ProviderRegistry::builtin()));
    let scope = FilterScope::unfiltered(Provider::Gcp);
    let outcome = registry.dispatch("Network", Provider::Gcp, &scope);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "unavailable");
    assert_eq!(json["module_key"], "Network");
    assert_eq!(json["provider"], "GCP");
}

#[test]
fn test_failed_outcome_json_shape() {
    let modules = faulty_registry(Duration::from_millis(0));
    let scope = FilterScope::unfiltered(Provider::Aws);
    let outcome = modules.dispatch("Broken", Provider::Aws, &scope);

    assert_json_snapshot!(outcome, @r#"
    {
      "outcome": "failed",
      "module_key": "Broken",
      "provider": "AWS",
      "error": "inventory backend unreachable"
    }
    "#);
}
