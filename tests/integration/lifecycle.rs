//! Harness-style runs: several test cases sharing one tracker.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use harness_tracker::test_utils::{CallLog, FakeComponent, init_test_logging};
use harness_tracker::{
    Closer, Component, ComponentId, Dependencies, Instance, InstanceValue, Registry, Resettable,
    SweepOrder, Tracker, TrackerConfig,
};

use crate::common::{init, registry_from, three_tier};

#[test]
fn reset_between_cases_then_cleanup_at_shutdown() {
    init_test_logging(None);
    let log = CallLog::new();
    let mut tracker = Tracker::new(three_tier(&log));

    // case 1
    init(&mut tracker, "API");
    tracker.reset().unwrap();

    // case 2 reuses the same instances
    init(&mut tracker, "API");
    tracker.reset().unwrap();

    tracker.cleanup();

    assert_eq!(
        log.events(),
        [
            "init:DB",
            "init:Cache",
            "init:API",
            "reset:DB",
            "reset:Cache",
            "reset:DB",
            "reset:Cache",
            "close:DB",
            "close:Cache",
            "close:API",
        ]
    );
    assert!(tracker.is_empty());
}

#[test]
fn reset_aggregates_one_entry_per_failure() {
    let log = CallLog::new();
    let registry = registry_from(vec![
        FakeComponent::new("a", &log).failing_reset("a is wedged"),
        FakeComponent::new("b", &log).failing_reset("b is wedged"),
        FakeComponent::new("c", &log).requires(["a", "b"]).resettable(),
    ]);
    let mut tracker = Tracker::new(registry);
    init(&mut tracker, "c");

    let err = tracker.reset().unwrap_err();

    assert_eq!(log.ids_for("reset"), ["a", "b", "c"]);
    assert_eq!(err.len(), 2);
    let msg = err.to_string();
    assert!(msg.contains("a: a is wedged"));
    assert!(msg.contains("b: b is wedged"));
    assert_eq!(tracker.len(), 3);
}

#[test]
fn cleanup_is_best_effort_and_always_empties() {
    let log = CallLog::new();
    let registry = registry_from(vec![
        FakeComponent::new("DB", &log).failing_close("disk detached"),
        FakeComponent::new("Cache", &log).requires(["DB"]).failing_close("already stopped"),
        FakeComponent::new("API", &log).requires(["Cache"]).closable(),
    ]);
    let mut tracker = Tracker::new(registry);
    init(&mut tracker, "API");

    tracker.cleanup();

    assert_eq!(log.ids_for("close"), ["DB", "Cache", "API"]);
    assert!(tracker.all().is_empty());
    assert!(tracker.get("DB").is_none());
}

#[test]
fn cleanup_twice_is_harmless() {
    let log = CallLog::new();
    let mut tracker = Tracker::new(three_tier(&log));
    init(&mut tracker, "Cache");

    tracker.cleanup();
    tracker.cleanup();

    assert_eq!(log.count("close:DB"), 1);
    assert!(tracker.is_empty());
}

#[test]
fn reverse_cleanup_closes_dependents_first() {
    let log = CallLog::new();
    let config = TrackerConfig::from_toml_str(r#"cleanup_order = "reverse""#).unwrap();
    assert_eq!(config.cleanup_order, SweepOrder::Reverse);
    let mut tracker = Tracker::with_config(three_tier(&log), config).unwrap();
    init(&mut tracker, "API");

    tracker.cleanup();

    assert_eq!(log.ids_for("close"), ["API", "Cache", "DB"]);
}

#[test]
fn new_resolution_cycle_after_cleanup() {
    let log = CallLog::new();
    let mut tracker = Tracker::new(three_tier(&log));

    init(&mut tracker, "API");
    tracker.cleanup();
    init(&mut tracker, "Cache");

    assert_eq!(tracker.ids(), vec![ComponentId::from("DB"), ComponentId::from("Cache")]);
    assert_eq!(log.count("init:DB"), 2);
}

/// A value with both capabilities, counting calls with atomics rather than a log.
#[derive(Default)]
struct Pool {
    resets: AtomicUsize,
    closes: AtomicUsize,
}

impl Resettable for Pool {
    fn reset(&self) -> anyhow::Result<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Closer for Pool {
    fn close(&self) -> anyhow::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl InstanceValue for Pool {
    fn as_resettable(&self) -> Option<&dyn Resettable> {
        Some(self)
    }

    fn as_closer(&self) -> Option<&dyn Closer> {
        Some(self)
    }
}

struct PoolComponent {
    id: ComponentId,
}

impl Component<()> for PoolComponent {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn requires(&self) -> &[ComponentId] {
        &[]
    }

    fn init(&self, _ctx: &(), _deps: &Dependencies) -> anyhow::Result<Instance> {
        Ok(Instance::new(Pool::default()))
    }
}

#[test]
fn custom_instance_capabilities_are_detected() {
    let mut registry: Registry<()> = Registry::new();
    registry
        .register(PoolComponent {
            id: ComponentId::from("pool"),
        })
        .unwrap();
    let mut tracker = Tracker::new(Arc::new(registry));

    let pool = init(&mut tracker, "pool");
    tracker.reset().unwrap();
    tracker.reset().unwrap();
    tracker.cleanup();

    let pool = pool.downcast_ref::<Pool>().unwrap();
    assert_eq!(pool.resets.load(Ordering::SeqCst), 2);
    assert_eq!(pool.closes.load(Ordering::SeqCst), 1);
}
