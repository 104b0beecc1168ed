//! Component abstractions
//!
//! A *component* is one piece of test infrastructure: it has an identifier, a list of
//! identifiers it requires, and an initializer that turns a context plus the already
//! resolved requirements into an [`Instance`].
//!
//! The context type `C` is chosen by the harness and passed through the tracker
//! untouched. Components that do not care about it can implement
//! `Component<C>` for every `C`.

mod instance;

pub use instance::{AsAny, Closer, Dependencies, Instance, InstanceValue, Resettable};

use std::borrow::Borrow;
use std::fmt;

/// Identifier naming a component and, once resolved, its instance.
///
/// Identifiers are compared for equality only; no ordering is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentId(String);

impl ComponentId {
    /// Create an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A unit of test infrastructure the tracker can instantiate.
///
/// # Contract
///
/// - [`id`](Component::id) is unique within a registry.
/// - [`requires`](Component::requires) lists direct dependencies in the order they
///   should be brought up. Duplicates are tolerated.
/// - [`init`](Component::init) receives exactly the declared requirements in
///   `deps`. Any error it returns reaches the caller of
///   [`Tracker::initialize`](crate::Tracker::initialize) unchanged.
pub trait Component<C: ?Sized> {
    /// Identifier of this component.
    fn id(&self) -> &ComponentId;

    /// Identifiers this component needs initialized before it.
    fn requires(&self) -> &[ComponentId];

    /// Create the instance for this component.
    fn init(&self, ctx: &C, deps: &Dependencies) -> anyhow::Result<Instance>;
}
