//! Opaque instance values and their optional capabilities.

use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::sync::Arc;

use super::ComponentId;

/// Capability: the instance can return to a clean state between test cases.
pub trait Resettable {
    /// Reset internal state. The instance stays usable afterwards.
    fn reset(&self) -> anyhow::Result<()>;
}

/// Capability: the instance holds resources that must be released at teardown.
pub trait Closer {
    /// Release held resources.
    fn close(&self) -> anyhow::Result<()>;
}

/// Upcast helper so any `'static` value can be viewed as [`Any`].
pub trait AsAny: Any {
    /// View `self` as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value produced by a component initializer.
///
/// The capability accessors default to `None`. A value that supports reset or
/// teardown opts in by returning itself:
///
/// ```rust
/// use harness_tracker::{Closer, InstanceValue};
///
/// struct MockServer;
///
/// impl Closer for MockServer {
///     fn close(&self) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
///
/// impl InstanceValue for MockServer {
///     fn as_closer(&self) -> Option<&dyn Closer> {
///         Some(self)
///     }
/// }
/// ```
pub trait InstanceValue: AsAny + Send + Sync {
    /// The [`Resettable`] capability, if this value has one.
    fn as_resettable(&self) -> Option<&dyn Resettable> {
        None
    }

    /// The [`Closer`] capability, if this value has one.
    fn as_closer(&self) -> Option<&dyn Closer> {
        None
    }
}

/// Shared handle to an initialized component value.
///
/// Cloning is cheap and yields a handle to the same value; [`Instance::ptr_eq`]
/// tells whether two handles point at the same value.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Arc<dyn InstanceValue>,
}

impl Instance {
    /// Wrap a freshly created value.
    pub fn new<T: InstanceValue>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Name of the concrete type behind this handle.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the concrete value if it is a `T`.
    pub fn downcast_ref<T: InstanceValue>(&self) -> Option<&T> {
        let value: &dyn InstanceValue = self.value.as_ref();
        value.as_any().downcast_ref::<T>()
    }

    /// Whether both handles refer to the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// The [`Resettable`] capability, if the value has one.
    pub fn resettable(&self) -> Option<&dyn Resettable> {
        self.value.as_resettable()
    }

    /// The [`Closer`] capability, if the value has one.
    pub fn closer(&self) -> Option<&dyn Closer> {
        self.value.as_closer()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("resettable", &self.resettable().is_some())
            .field("closer", &self.closer().is_some())
            .finish()
    }
}

/// Resolved requirements handed to [`Component::init`](super::Component::init).
///
/// Holds one entry per declared requirement, keyed by the identifier the
/// component asked for.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    values: HashMap<ComponentId, Instance>,
}

impl Dependencies {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, id: ComponentId, instance: Instance) {
        self.values.insert(id, instance);
    }

    /// Instance resolved for `id`.
    pub fn get(&self, id: &str) -> Option<&Instance> {
        self.values.get(id)
    }

    /// Instance resolved for `id`, downcast to its concrete type.
    ///
    /// # Errors
    ///
    /// Fails if `id` was not a declared requirement or its value is not a `T`.
    pub fn get_as<T: InstanceValue>(&self, id: &str) -> anyhow::Result<&T> {
        let instance = self
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("dependency {id} was not resolved"))?;
        instance.downcast_ref::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "dependency {id} is a {}, not a {}",
                instance.type_name(),
                std::any::type_name::<T>()
            )
        })
    }

    /// Whether `id` was resolved.
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Number of resolved requirements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no requirements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(id, instance)` pairs in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, ComponentId, Instance> {
        self.values.iter()
    }
}
