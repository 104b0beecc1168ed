//! Component registry
//!
//! The registry maps identifiers to component definitions. The tracker only
//! ever reads from it; registration happens up front while the harness is
//! being assembled.
//!
//! Beyond lookup, the registry can check the whole declared graph before anything
//! is initialized ([`Registry::validate`]), produce a full initialization plan
//! ([`Registry::initialization_order`]), and render a requirement tree for
//! diagnostics ([`Registry::dependency_tree`]).

mod closure;

pub(crate) use closure::ClosureCheck;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::component::{Component, ComponentId};
use crate::core::TrackerError;

/// Identifier to component lookup table.
pub struct Registry<C: ?Sized> {
    components: Vec<Arc<dyn Component<C>>>,
    index: HashMap<ComponentId, usize>,
}

impl<C: ?Sized> Registry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a component under its own identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::DuplicateComponent`] if the identifier is taken.
    pub fn register<T>(&mut self, component: T) -> Result<(), TrackerError>
    where
        T: Component<C> + 'static,
    {
        self.register_arc(Arc::new(component))
    }

    /// Register an already shared component.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::DuplicateComponent`] if the identifier is taken.
    pub fn register_arc(&mut self, component: Arc<dyn Component<C>>) -> Result<(), TrackerError> {
        let id = component.id().clone();
        if self.index.contains_key(&id) {
            return Err(TrackerError::DuplicateComponent {
                id,
            });
        }

        debug!(component = %id, requires = component.requires().len(), "Registering component");
        self.index.insert(id, self.components.len());
        self.components.push(component);
        Ok(())
    }

    /// Look up a component by identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Component<C>>> {
        self.index.get(id).map(|&i| &self.components[i])
    }

    /// Whether a component is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered identifiers, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.iter().map(|c| c.id())
    }

    /// Check that every declared requirement is registered and that the
    /// requirement graph has no cycles.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::DependencyNotFound`] for the first unregistered requirement,
    ///   in registration then declaration order
    /// - [`TrackerError::CircularDependency`] if the graph loops
    pub fn validate(&self) -> Result<(), TrackerError> {
        self.check_registered()?;

        let mut check = ClosureCheck::new(self, |_: &ComponentId| false);
        for component in &self.components {
            check.check(component.as_ref())?;
        }
        Ok(())
    }

    /// Every registered component in an order that initializes requirements
    /// before the components that need them.
    ///
    /// # Errors
    ///
    /// Fails the same way as [`Registry::validate`].
    pub fn initialization_order(&self) -> Result<Vec<ComponentId>, TrackerError> {
        self.check_registered()?;

        let graph = self.requirement_graph();
        match toposort(&graph, None) {
            // Edges point at requirements, so the sort lists dependents first
            Ok(sorted) => Ok(sorted.into_iter().rev().map(|idx| graph[idx].clone()).collect()),
            Err(cycle) => Err(self.cycle_through(&graph[cycle.node_id()])),
        }
    }

    /// Every identifier `id` needs, directly or indirectly.
    ///
    /// Unregistered requirements are included since they are still part of the
    /// declared closure.
    pub fn transitive_requirements(&self, id: &ComponentId) -> HashSet<ComponentId> {
        let mut seen = HashSet::new();
        let mut pending: Vec<&ComponentId> = match self.get(id.as_str()) {
            Some(component) => component.requires().iter().collect(),
            None => Vec::new(),
        };

        while let Some(next) = pending.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(component) = self.get(next.as_str()) {
                pending.extend(component.requires());
            }
        }
        seen
    }

    /// Human-readable requirement tree rooted at `id`.
    ///
    /// A component that already appeared higher up is not expanded again.
    ///
    /// ```text
    /// └── api
    ///     ├── db
    ///     └── cache
    ///         └── db
    ///             └── (already listed)
    /// ```
    pub fn dependency_tree(&self, id: &ComponentId) -> String {
        let mut out = String::new();
        let mut listed = HashSet::new();
        self.write_tree(id, "", true, &mut listed, &mut out);
        out
    }

    fn write_tree(
        &self,
        id: &ComponentId,
        indent: &str,
        last: bool,
        listed: &mut HashSet<ComponentId>,
        out: &mut String,
    ) {
        let (branch, carry) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(&format!("{indent}{branch}{id}\n"));
        let indent = format!("{indent}{carry}");

        if !listed.insert(id.clone()) {
            out.push_str(&format!("{indent}└── (already listed)\n"));
            return;
        }
        let Some(component) = self.get(id.as_str()) else {
            out.push_str(&format!("{indent}└── (not registered)\n"));
            return;
        };

        let requires = component.requires();
        for (i, dep) in requires.iter().enumerate() {
            self.write_tree(dep, &indent, i + 1 == requires.len(), listed, out);
        }
    }

    fn check_registered(&self) -> Result<(), TrackerError> {
        for component in &self.components {
            if let Some(missing) = component.requires().iter().find(|dep| !self.contains(dep.as_str()))
            {
                return Err(TrackerError::DependencyNotFound {
                    dependency: missing.clone(),
                    component: component.id().clone(),
                });
            }
        }
        Ok(())
    }

    /// Graph with one node per component, in registration order, and an edge
    /// from each component to every registered requirement.
    fn requirement_graph(&self) -> DiGraph<ComponentId, ()> {
        let mut graph = DiGraph::with_capacity(self.components.len(), self.components.len());
        for component in &self.components {
            graph.add_node(component.id().clone());
        }
        for (from, component) in self.components.iter().enumerate() {
            for dep in component.requires() {
                if let Some(&to) = self.index.get(dep) {
                    graph.update_edge(NodeIndex::new(from), NodeIndex::new(to), ());
                }
            }
        }
        graph
    }

    /// The loop reachable from `id`, as reported by the closure walk.
    fn cycle_through(&self, id: &ComponentId) -> TrackerError {
        let mut check = ClosureCheck::new(self, |_: &ComponentId| false);
        let found = self.get(id.as_str()).and_then(|root| check.check(root.as_ref()).err());
        // toposort only reports nodes that reach a loop
        found.unwrap_or_else(|| TrackerError::circular([id, id]))
    }
}

impl<C: ?Sized> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}
