//! Test utilities for harness-tracker
//!
//! This module provides helpers for writing tests against the tracker:
//! - One-time tracing initialization that plays well with the test harness
//! - Scriptable fake components whose instances record every lifecycle call
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use harness_tracker::test_utils::{CallLog, FakeComponent};
//! use harness_tracker::{ComponentId, Registry, Tracker};
//!
//! let log = CallLog::new();
//! let mut registry: Registry<()> = Registry::new();
//! registry.register(FakeComponent::new("db", &log).resettable()).unwrap();
//!
//! let mut tracker = Tracker::new(Arc::new(registry));
//! tracker.initialize_id(&(), &ComponentId::from("db")).unwrap();
//! tracker.reset().unwrap();
//! assert_eq!(log.events(), ["init:db", "reset:db"]);
//! ```

pub mod fixtures;

pub use fixtures::{CallLog, FakeComponent, FakeInstance};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. It respects the `RUST_LOG` environment
/// variable if set, or uses the provided log level.
///
/// # Arguments
///
/// * `level` - Optional log level to use. If None, uses `RUST_LOG` environment variable
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=harness_tracker=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // Silent unless asked
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
