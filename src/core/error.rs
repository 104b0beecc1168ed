//! Error handling for the tracker
//!
//! Two error types live here:
//! - [`TrackerError`] - returned by resolution and registry operations
//! - [`ResetError`] - the aggregate returned by [`Tracker::reset`] when one or more
//!   instances failed to reset
//!
//! # Examples
//!
//! ```rust
//! use harness_tracker::{ComponentId, TrackerError};
//!
//! let error = TrackerError::DependencyNotFound {
//!     dependency: ComponentId::from("missing"),
//!     component: ComponentId::from("api"),
//! };
//! assert_eq!(error.to_string(), "unable to resolve dependency missing for component api");
//! ```
//!
//! [`Tracker::reset`]: crate::Tracker::reset

use std::fmt;

use thiserror::Error;

use crate::component::ComponentId;

/// The main error type for tracker and registry operations
///
/// # Error Categories
///
/// ## Resolution
/// - [`DependencyNotFound`] - A required identifier is not in the registry
/// - [`CircularDependency`] - The requirement graph loops back on itself
/// - [`UnknownComponent`] - A component was requested by id but never registered
/// - [`Init`] - A component's own initializer failed
///
/// ## Registration
/// - [`DuplicateComponent`] - Two components share one identifier
///
/// [`DependencyNotFound`]: TrackerError::DependencyNotFound
/// [`CircularDependency`]: TrackerError::CircularDependency
/// [`UnknownComponent`]: TrackerError::UnknownComponent
/// [`Init`]: TrackerError::Init
/// [`DuplicateComponent`]: TrackerError::DuplicateComponent
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A component requires an identifier the registry does not know about
    ///
    /// # Fields
    /// - `dependency`: The identifier that could not be found
    /// - `component`: The component that declared the requirement
    #[error("unable to resolve dependency {dependency} for component {component}")]
    DependencyNotFound {
        /// The identifier that could not be found
        dependency: ComponentId,
        /// The component that declared the requirement
        component: ComponentId,
    },

    /// Circular dependency detected in the requirement graph
    ///
    /// Example: `api` requires `cache`, `cache` requires `api`.
    ///
    /// # Fields
    /// - `chain`: The dependency chain showing the circular reference
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// String representation of the circular dependency chain
        chain: String,
    },

    /// Component requested by identifier is not registered
    #[error("Component '{id}' is not registered")]
    UnknownComponent {
        /// Identifier that was requested
        id: ComponentId,
    },

    /// Component identifier registered twice
    #[error("Component '{id}' is already registered")]
    DuplicateComponent {
        /// Identifier that was registered twice
        id: ComponentId,
    },

    /// A component's initializer failed
    ///
    /// The underlying error is passed through verbatim: both `Display` and
    /// `source()` are those of the error the component returned.
    #[error(transparent)]
    Init(#[from] anyhow::Error),
}

impl TrackerError {
    /// Build a [`TrackerError::CircularDependency`] from the ids forming the loop.
    ///
    /// The first id is repeated at the end so the chain reads as a closed loop.
    pub(crate) fn circular<'a>(path: impl IntoIterator<Item = &'a ComponentId>) -> Self {
        let chain = path.into_iter().map(ComponentId::as_str).collect::<Vec<_>>().join(" → ");
        Self::CircularDependency {
            chain,
        }
    }
}

/// A single reset failure recorded during [`Tracker::reset`].
///
/// [`Tracker::reset`]: crate::Tracker::reset
#[derive(Debug)]
pub struct ResetFailure {
    /// Component whose instance failed to reset
    pub id: ComponentId,
    /// Error returned by the instance
    pub error: anyhow::Error,
}

impl fmt::Display for ResetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.id, self.error)
    }
}

/// Aggregate of every reset failure from one sweep, in encounter order.
///
/// Never constructed empty: a sweep without failures returns `Ok(())`.
#[derive(Error, Debug)]
#[error("{}", format_failures(.failures))]
pub struct ResetError {
    failures: Vec<ResetFailure>,
}

impl ResetError {
    pub(crate) fn new(failures: Vec<ResetFailure>) -> Self {
        Self {
            failures,
        }
    }

    /// Every failure, in the order the sweep hit them.
    pub fn failures(&self) -> &[ResetFailure] {
        &self.failures
    }

    /// Number of instances that failed to reset.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always `false` for errors produced by the tracker.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consume the aggregate and return the individual failures.
    pub fn into_failures(self) -> Vec<ResetFailure> {
        self.failures
    }
}

fn format_failures(failures: &[ResetFailure]) -> String {
    let listed = failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
    format!("failed to reset {} component(s): {listed}", failures.len())
}
