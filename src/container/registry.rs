use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::field::field_model::{Action, SelectableField};
use crate::page::host::FormHost;

/// A named bucket of supplier field keys, kept per registering action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Container {
    pub push: Vec<String>,
    pub exclude: Vec<String>,
}

impl Container {
    fn list_mut(&mut self, action: Action) -> Option<&mut Vec<String>> {
        match action {
            Action::Push => Some(&mut self.push),
            Action::Exclude => Some(&mut self.exclude),
            Action::Include => None,
        }
    }

    pub fn keys(&self, action: Action) -> &[String] {
        match action {
            Action::Push => &self.push,
            Action::Exclude => &self.exclude,
            Action::Include => &[],
        }
    }

    /// Every supplier of the container, push list first, without repeats.
    pub fn suppliers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.push.len() + self.exclude.len());
        for key in self.push.iter().chain(self.exclude.iter()) {
            if !out.contains(&key.as_str()) {
                out.push(key);
            }
        }
        out
    }
}

/// Values gathered for a field: action → container → values.
pub type ContainerValues = BTreeMap<Action, BTreeMap<String, Vec<String>>>;

/// Session-wide mapping from container name to its suppliers.
///
/// Append-only: keys are never removed. A key whose field disappeared
/// is simply skipped when values are read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerRegistry {
    containers: HashMap<String, Container>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the container if it does not exist yet.
    pub fn ensure(&mut self, name: &str) -> &mut Container {
        self.containers.entry(name.to_string()).or_default()
    }

    /// Register the field as supplier of each of its push/exclude
    /// containers. Idempotent.
    pub fn set(&mut self, field: &SelectableField) -> usize {
        let mut added = 0;
        for (action, name) in field.bindings.iter() {
            if !action.registers() {
                continue;
            }
            let container = self.ensure(name);
            if let Some(list) = container.list_mut(action) {
                if !list.iter().any(|k| k == &field.key) {
                    list.push(field.key.clone());
                    added += 1;
                }
            }
        }
        added
    }

    /// Read the current values behind every container the field is
    /// bound to. Keys the host cannot resolve are skipped.
    ///
    /// Any bound action reads all suppliers of the container, so an
    /// include field sees what push fields supplied.
    pub fn get(&self, field: &SelectableField, host: &dyn FormHost) -> ContainerValues {
        let mut out = ContainerValues::new();

        for (action, name) in field.bindings.iter() {
            let values = out
                .entry(action)
                .or_default()
                .entry(name.to_string())
                .or_default();

            let Some(container) = self.containers.get(name) else {
                continue;
            };

            for key in container.suppliers() {
                if let Some(value) = host.field_value(key) {
                    values.extend(value.into_values());
                }
            }
        }

        out
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    /// Container names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.containers.keys().map(|k| k.as_str()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
