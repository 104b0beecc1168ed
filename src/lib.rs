//! harness-tracker - dependency resolution and lifecycle tracking for test harnesses
//!
//! A test harness usually needs a handful of infrastructure pieces (mock services,
//! clusters, fixtures) that depend on one another. This crate lazily instantiates
//! each of those *components* exactly once, initializing its prerequisites first,
//! remembers the order in which everything came up, and later resets or tears
//! down every live instance in one sweep.
//!
//! # Architecture Overview
//!
//! - [`component`] - The [`Component`] trait, component identifiers, and the opaque
//!   [`Instance`] values components produce (with optional [`Resettable`] and
//!   [`Closer`] capabilities)
//! - [`registry`] - Identifier to component lookup, whole-graph validation, and
//!   dependency tree rendering
//! - [`tracker`] - The memoized resolver plus the ordered instance bookkeeping and
//!   the reset / cleanup sweeps
//! - [`config`] - Tracker configuration loaded from TOML
//! - [`core`] - Error types shared by the other modules
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use harness_tracker::{Component, ComponentId, Dependencies, Instance, InstanceValue};
//! use harness_tracker::{Registry, Tracker};
//!
//! struct Database;
//! impl InstanceValue for Database {}
//!
//! struct DatabaseComponent {
//!     id: ComponentId,
//! }
//!
//! impl Component<()> for DatabaseComponent {
//!     fn id(&self) -> &ComponentId {
//!         &self.id
//!     }
//!
//!     fn requires(&self) -> &[ComponentId] {
//!         &[]
//!     }
//!
//!     fn init(&self, _ctx: &(), _deps: &Dependencies) -> anyhow::Result<Instance> {
//!         Ok(Instance::new(Database))
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register(DatabaseComponent { id: ComponentId::from("db") })?;
//!
//! let mut tracker = Tracker::new(Arc::new(registry));
//! let db = tracker.initialize_id(&(), &ComponentId::from("db"))?;
//! assert!(db.downcast_ref::<Database>().is_some());
//!
//! tracker.cleanup();
//! assert!(tracker.is_empty());
//! # Ok::<(), harness_tracker::TrackerError>(())
//! ```

pub mod component;
pub mod config;
pub mod core;
pub mod registry;
pub mod tracker;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use component::{
    Closer, Component, ComponentId, Dependencies, Instance, InstanceValue, Resettable,
};
pub use config::{SweepOrder, TrackerConfig};
pub use core::{ResetError, ResetFailure, TrackerError};
pub use registry::Registry;
pub use tracker::Tracker;
