//! Scriptable fake components.
//!
//! [`FakeComponent`] is configured through a small builder: which ids it requires,
//! which capabilities its instances expose, and which lifecycle calls should fail.
//! Every call lands in a shared [`CallLog`] as `"<action>:<id>"`, which lets tests
//! assert on exact ordering across components.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Result, anyhow};

use crate::component::{
    Closer, Component, ComponentId, Dependencies, Instance, InstanceValue, Resettable,
};

/// Ordered record of lifecycle calls shared by fake components.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.into());
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How many times `event` was recorded.
    pub fn count(&self, event: &str) -> usize {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.iter().filter(|e| *e == event).count()
    }

    /// Events starting with `action:` in recorded order, with the prefix removed.
    pub fn ids_for(&self, action: &str) -> Vec<String> {
        let prefix = format!("{action}:");
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[derive(Debug, Clone, Default)]
struct Behavior {
    resettable: bool,
    closable: bool,
    init_error: Option<String>,
    reset_error: Option<String>,
    close_error: Option<String>,
}

/// Component whose lifecycle is scripted by the test.
#[derive(Debug, Clone)]
pub struct FakeComponent {
    id: ComponentId,
    requires: Vec<ComponentId>,
    log: CallLog,
    behavior: Behavior,
}

impl FakeComponent {
    /// A component with no requirements and no capabilities.
    pub fn new(id: &str, log: &CallLog) -> Self {
        Self {
            id: ComponentId::from(id),
            requires: Vec::new(),
            log: log.clone(),
            behavior: Behavior::default(),
        }
    }

    /// Declare required ids, in order.
    pub fn requires<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ComponentId>,
    {
        self.requires.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Instances expose [`Resettable`].
    pub fn resettable(mut self) -> Self {
        self.behavior.resettable = true;
        self
    }

    /// Instances expose [`Closer`].
    pub fn closable(mut self) -> Self {
        self.behavior.closable = true;
        self
    }

    /// `init` fails with `message`.
    pub fn failing_init(mut self, message: &str) -> Self {
        self.behavior.init_error = Some(message.to_string());
        self
    }

    /// Instances are resettable and every reset fails with `message`.
    pub fn failing_reset(mut self, message: &str) -> Self {
        self.behavior.resettable = true;
        self.behavior.reset_error = Some(message.to_string());
        self
    }

    /// Instances are closable and every close fails with `message`.
    pub fn failing_close(mut self, message: &str) -> Self {
        self.behavior.closable = true;
        self.behavior.close_error = Some(message.to_string());
        self
    }
}

impl<C: ?Sized> Component<C> for FakeComponent {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn requires(&self) -> &[ComponentId] {
        &self.requires
    }

    fn init(&self, _ctx: &C, deps: &Dependencies) -> Result<Instance> {
        self.log.record(format!("init:{}", self.id));
        if let Some(message) = &self.behavior.init_error {
            return Err(anyhow!("{message}"));
        }

        Ok(Instance::new(FakeInstance {
            id: self.id.clone(),
            dependencies: deps.clone(),
            log: self.log.clone(),
            behavior: self.behavior.clone(),
        }))
    }
}

/// Instance produced by [`FakeComponent`].
#[derive(Debug)]
pub struct FakeInstance {
    id: ComponentId,
    dependencies: Dependencies,
    log: CallLog,
    behavior: Behavior,
}

impl FakeInstance {
    /// Id of the component that produced this instance.
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// Requirements the component received at init.
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }
}

impl Resettable for FakeInstance {
    fn reset(&self) -> Result<()> {
        self.log.record(format!("reset:{}", self.id));
        match &self.behavior.reset_error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

impl Closer for FakeInstance {
    fn close(&self) -> Result<()> {
        self.log.record(format!("close:{}", self.id));
        match &self.behavior.close_error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

impl InstanceValue for FakeInstance {
    fn as_resettable(&self) -> Option<&dyn Resettable> {
        if self.behavior.resettable {
            Some(self)
        } else {
            None
        }
    }

    fn as_closer(&self) -> Option<&dyn Closer> {
        if self.behavior.closable {
            Some(self)
        } else {
            None
        }
    }
}
