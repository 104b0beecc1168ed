//! Shared helpers for the harness-tracker test suites

// Not every suite uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use harness_tracker::test_utils::{CallLog, FakeComponent, FakeInstance};
use harness_tracker::{ComponentId, Instance, Registry, Tracker};

/// Build a registry from fake components, panicking on duplicate ids.
pub fn registry_from(components: Vec<FakeComponent>) -> Arc<Registry<()>> {
    let mut registry = Registry::new();
    for component in components {
        registry.register(component).expect("component ids in fixtures are unique");
    }
    Arc::new(registry)
}

/// The canonical three-tier fixture: DB, Cache (requires DB), API (requires DB, Cache).
///
/// DB and Cache are resettable, every tier is closable.
pub fn three_tier(log: &CallLog) -> Arc<Registry<()>> {
    registry_from(vec![
        FakeComponent::new("DB", log).resettable().closable(),
        FakeComponent::new("Cache", log).requires(["DB"]).resettable().closable(),
        FakeComponent::new("API", log).requires(["DB", "Cache"]).closable(),
    ])
}

/// Initialize `id` with the unit context.
pub fn init(tracker: &mut Tracker<()>, id: &str) -> Instance {
    tracker.initialize_id(&(), &ComponentId::from(id)).expect("fixture resolves")
}

/// Ids of the given instances, in order.
pub fn instance_ids(instances: &[Instance]) -> Vec<String> {
    instances
        .iter()
        .map(|i| i.downcast_ref::<FakeInstance>().expect("fake instance").id().to_string())
        .collect()
}
