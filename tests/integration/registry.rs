//! Whole-registry validation, planning and diagnostics.

use harness_tracker::test_utils::{CallLog, FakeComponent};
use harness_tracker::{ComponentId, Registry, Tracker, TrackerConfig, TrackerError};

use crate::common::{registry_from, three_tier};

#[test]
fn three_tier_validates_and_plans() {
    let log = CallLog::new();
    let registry = three_tier(&log);

    registry.validate().unwrap();
    let order = registry.initialization_order().unwrap();

    assert_eq!(
        order,
        vec![ComponentId::from("DB"), ComponentId::from("Cache"), ComponentId::from("API")]
    );
    // Planning never initializes anything
    assert!(log.events().is_empty());
}

#[test]
fn dependency_tree_renders_shared_requirements_once() {
    let log = CallLog::new();
    let registry = three_tier(&log);

    let tree = registry.dependency_tree(&ComponentId::from("API"));

    assert_eq!(
        tree,
        "\
└── API
    ├── DB
    └── Cache
        └── DB
            └── (already listed)
"
    );
}

#[test]
fn validation_at_bind_time_rejects_cycles() {
    let log = CallLog::new();
    let registry = registry_from(vec![
        FakeComponent::new("a", &log).requires(["b"]),
        FakeComponent::new("b", &log).requires(["a"]),
    ]);
    let config = TrackerConfig::from_toml_str("validate_registry = true").unwrap();

    let err = match Tracker::with_config(registry, config) {
        Ok(_) => panic!("cyclic registry should be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, TrackerError::CircularDependency { .. }));
}

#[test]
fn duplicate_ids_rejected() {
    let log = CallLog::new();
    let mut registry: Registry<()> = Registry::new();
    registry.register(FakeComponent::new("DB", &log)).unwrap();

    let err = registry.register(FakeComponent::new("DB", &log).closable()).unwrap_err();
    assert_eq!(err.to_string(), "Component 'DB' is already registered");
}
