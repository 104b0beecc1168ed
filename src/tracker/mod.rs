//! Memoized component resolution and lifecycle tracking.
//!
//! The [`Tracker`] instantiates components on demand. Requesting a component first
//! resolves everything it requires, depth first and in declared order, through the
//! same memo table, so a component shared by several dependents is initialized
//! exactly once. The order in which instances come up is recorded; because
//! requirements always finish before the component that needs them, that order is
//! a valid topological order of the requirement graph.
//!
//! Between test cases [`Tracker::reset`] gives every resettable instance a chance
//! to clear its state. At shutdown [`Tracker::cleanup`] closes everything that can
//! be closed and empties the tracker so it can resolve again.
//!
//! # Failure Semantics
//!
//! | Failure                         | Effect                                            |
//! |---------------------------------|---------------------------------------------------|
//! | requirement not in registry     | error before any initializer runs, no state change |
//! | requirement loop                | error before any initializer runs, no state change |
//! | initializer error               | passed through verbatim; earlier instances stay    |
//! | reset error                     | logged, collected, sweep continues                 |
//! | close error                     | logged, sweep continues, never returned            |


use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::component::{Component, ComponentId, Dependencies, Instance};
use crate::config::{SweepOrder, TrackerConfig};
use crate::core::{ResetError, ResetFailure, TrackerError};
use crate::registry::{ClosureCheck, Registry};

/// Keeps track of every component instance created for one registry.
pub struct Tracker<C: ?Sized> {
    /// Component id to instance
    instance_map: HashMap<ComponentId, Instance>,
    /// Instances in the order they were initialized, used for ordered sweeps
    instances: Vec<(ComponentId, Instance)>,
    registry: Arc<Registry<C>>,
    config: TrackerConfig,
}

impl<C: ?Sized> Tracker<C> {
    /// Create an empty tracker bound to `registry`, using default settings.
    pub fn new(registry: Arc<Registry<C>>) -> Self {
        Self {
            instance_map: HashMap::new(),
            instances: Vec::new(),
            registry,
            config: TrackerConfig::default(),
        }
    }

    /// Create an empty tracker bound to `registry` with explicit settings.
    ///
    /// # Errors
    ///
    /// With `validate_registry` enabled, fails if [`Registry::validate`] does.
    pub fn with_config(
        registry: Arc<Registry<C>>,
        config: TrackerConfig,
    ) -> Result<Self, TrackerError> {
        if config.validate_registry {
            registry.validate()?;
        }

        Ok(Self {
            config,
            ..Self::new(registry)
        })
    }

    /// The registry this tracker resolves against.
    pub fn registry(&self) -> &Arc<Registry<C>> {
        &self.registry
    }

    /// Settings in effect.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Initialize a component, and everything it requires, and start tracking it.
    ///
    /// If the component's id was already initialized the stored instance is returned
    /// without calling any initializer.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::DependencyNotFound`] if any not-yet-initialized part of the
    ///   requirement closure names an id missing from the registry
    /// - [`TrackerError::CircularDependency`] if that closure loops
    /// - [`TrackerError::Init`] carrying the error of the first initializer that failed
    pub fn initialize(
        &mut self,
        ctx: &C,
        component: &dyn Component<C>,
    ) -> Result<Instance, TrackerError> {
        if let Some(instance) = self.instance_map.get(component.id()) {
            debug!(component = %component.id(), "Component already initialized");
            return Ok(instance.clone());
        }

        self.check_resolvable(component)?;
        self.resolve(ctx, component)
    }

    /// Look a component up in the registry and [`initialize`](Tracker::initialize) it.
    ///
    /// # Errors
    ///
    /// [`TrackerError::UnknownComponent`] if `id` is not registered, otherwise as
    /// [`Tracker::initialize`].
    pub fn initialize_id(&mut self, ctx: &C, id: &ComponentId) -> Result<Instance, TrackerError> {
        let component = match self.registry.get(id.as_str()) {
            Some(component) => Arc::clone(component),
            None => {
                return Err(TrackerError::UnknownComponent {
                    id: id.clone(),
                });
            }
        };
        self.initialize(ctx, component.as_ref())
    }

    /// Walk the unresolved part of the requirement closure without initializing
    /// anything, failing on the first unknown requirement or loop.
    fn check_resolvable(&self, component: &dyn Component<C>) -> Result<(), TrackerError> {
        let resolved = |id: &ComponentId| self.instance_map.contains_key(id);
        ClosureCheck::new(self.registry.as_ref(), resolved).check(component)
    }

    fn resolve(&mut self, ctx: &C, component: &dyn Component<C>) -> Result<Instance, TrackerError> {
        let id = component.id();
        if let Some(instance) = self.instance_map.get(id) {
            return Ok(instance.clone());
        }

        let requires = component.requires();
        let mut deps = Dependencies::with_capacity(requires.len());
        for dep_id in requires {
            let dep = match self.registry.get(dep_id.as_str()) {
                Some(dep) => Arc::clone(dep),
                None => {
                    return Err(TrackerError::DependencyNotFound {
                        dependency: dep_id.clone(),
                        component: id.clone(),
                    });
                }
            };
            let instance = self.resolve(ctx, dep.as_ref())?;
            deps.insert(dep_id.clone(), instance);
        }

        debug!(component = %id, dependencies = deps.len(), "Initializing component");
        let instance = component.init(ctx, &deps).inspect_err(|err| {
            debug!(component = %id, error = %format!("{err:#}"), "Component initialization failed");
        })?;

        self.instance_map.insert(id.clone(), instance.clone());
        self.instances.push((id.clone(), instance.clone()));
        Ok(instance)
    }

    /// The tracked instance for `id`, if it has been initialized.
    pub fn get(&self, id: &str) -> Option<&Instance> {
        self.instance_map.get(id)
    }

    /// Whether `id` has been initialized.
    pub fn contains(&self, id: &str) -> bool {
        self.instance_map.contains_key(id)
    }

    /// Every tracked instance, in initialization order.
    ///
    /// The returned vector is a snapshot; later changes to the tracker do not
    /// affect it.
    pub fn all(&self) -> Vec<Instance> {
        self.instances.iter().map(|(_, instance)| instance.clone()).collect()
    }

    /// Identifiers of every tracked instance, in initialization order.
    pub fn ids(&self) -> Vec<ComponentId> {
        self.instances.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Number of tracked instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether nothing has been initialized since construction or the last cleanup.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Reset every instance that supports it, in initialization order.
    ///
    /// A failing reset does not stop the sweep. Tracker bookkeeping is unchanged.
    ///
    /// # Errors
    ///
    /// [`ResetError`] holding one entry per failed reset, in sweep order.
    pub fn reset(&self) -> Result<(), ResetError> {
        let mut failures = Vec::new();

        for (id, instance) in &self.instances {
            if let Some(resettable) = instance.resettable() {
                debug!(component = %id, "Resetting state for component");
                if let Err(err) = resettable.reset() {
                    error!(
                        component = %id,
                        error = %format!("{err:#}"),
                        "Error resetting component state"
                    );
                    failures.push(ResetFailure {
                        id: id.clone(),
                        error: err,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ResetError::new(failures))
        }
    }

    /// Close every instance that supports it, then forget all instances.
    ///
    /// Close failures are logged and otherwise ignored; the sweep always runs to the
    /// end. The sweep direction follows [`TrackerConfig::cleanup_order`]. Afterwards
    /// the tracker is empty and ready to resolve again.
    pub fn cleanup(&mut self) {
        let order: Box<dyn Iterator<Item = &(ComponentId, Instance)>> =
            match self.config.cleanup_order {
                SweepOrder::Initialization => Box::new(self.instances.iter()),
                SweepOrder::Reverse => Box::new(self.instances.iter().rev()),
            };

        for (id, instance) in order {
            if let Some(closer) = instance.closer() {
                debug!(component = %id, "Cleaning up state for component");
                if let Err(err) = closer.close() {
                    error!(
                        component = %id,
                        error = %format!("{err:#}"),
                        "Error cleaning up component state"
                    );
                }
            }
        }

        self.instance_map.clear();
        self.instances.clear();
    }
}
