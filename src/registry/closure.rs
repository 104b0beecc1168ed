//! Requirement closure check.
//!
//! One depth-first walk serves both [`Registry::validate`] and the tracker's
//! pre-flight before initialization. It stops at the first requirement that is
//! not registered or that loops back onto the current walk path.

use std::collections::HashMap;

use super::Registry;
use crate::component::{Component, ComponentId};
use crate::core::TrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// On the current walk path
    InProgress,
    /// Whole subtree checked
    Done,
}

/// Depth-first check of requirement closures against a registry.
///
/// Ids accepted by the `resolved` predicate are treated as leaves: they must be
/// registered, but their own requirements are not walked again. Visit state is
/// kept across calls to [`ClosureCheck::check`], so checking many roots costs one
/// pass over the graph.
pub(crate) struct ClosureCheck<'r, C: ?Sized, F> {
    registry: &'r Registry<C>,
    resolved: F,
    visits: HashMap<ComponentId, Visit>,
    path: Vec<ComponentId>,
}

impl<'r, C, F> ClosureCheck<'r, C, F>
where
    C: ?Sized,
    F: Fn(&ComponentId) -> bool,
{
    pub(crate) fn new(registry: &'r Registry<C>, resolved: F) -> Self {
        Self {
            registry,
            resolved,
            visits: HashMap::new(),
            path: Vec::new(),
        }
    }

    /// Check everything `root` needs.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::DependencyNotFound`] for the first unregistered requirement
    /// - [`TrackerError::CircularDependency`] with the loop, first id repeated at the end
    pub(crate) fn check(&mut self, root: &dyn Component<C>) -> Result<(), TrackerError> {
        if self.visits.contains_key(root.id()) {
            return Ok(());
        }
        self.path.clear();
        self.visit(root)
    }

    fn visit(&mut self, component: &dyn Component<C>) -> Result<(), TrackerError> {
        let registry = self.registry;
        let id = component.id();
        self.visits.insert(id.clone(), Visit::InProgress);
        self.path.push(id.clone());

        for dep_id in component.requires() {
            let dep = registry.get(dep_id.as_str()).ok_or_else(|| {
                TrackerError::DependencyNotFound {
                    dependency: dep_id.clone(),
                    component: id.clone(),
                }
            })?;

            if (self.resolved)(dep_id) {
                continue;
            }

            match self.visits.get(dep_id).copied() {
                Some(Visit::Done) => {}
                Some(Visit::InProgress) => {
                    let start = self.path.iter().position(|p| p == dep_id).unwrap_or(0);
                    return Err(TrackerError::circular(self.path[start..].iter().chain([dep_id])));
                }
                None => self.visit(dep.as_ref())?,
            }
        }

        self.path.pop();
        self.visits.insert(id.clone(), Visit::Done);
        Ok(())
    }
}
