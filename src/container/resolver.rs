use serde::{Deserialize, Serialize};

use crate::container::registry::ContainerRegistry;
use crate::field::field_model::{Action, ContainerBindings, SelectableField};

/// Class prefixes that mark a widget as taking part in a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagClasses {
    #[serde(default = "default_push")]
    pub push: String,

    #[serde(default = "default_include")]
    pub include: String,

    #[serde(default = "default_exclude")]
    pub exclude: String,
}

impl Default for TagClasses {
    fn default() -> Self {
        Self {
            push: default_push(),
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

fn default_push() -> String { "xtend-push".to_string() }
fn default_include() -> String { "xtend-include".to_string() }
fn default_exclude() -> String { "xtend-exclude".to_string() }

impl TagClasses {
    fn prefix(&self, action: Action) -> &str {
        match action {
            Action::Push => &self.push,
            Action::Include => &self.include,
            Action::Exclude => &self.exclude,
        }
    }

    /// Parse one class of the form `<prefix>-<container>`.
    ///
    /// The container name is the run of ASCII letters following the
    /// dash, lower-cased. Prefixes compare case-insensitively.
    pub fn parse(&self, class: &str) -> Option<(Action, String)> {
        let lower = class.to_ascii_lowercase();
        for action in Action::ALL {
            let prefix = self.prefix(action).to_ascii_lowercase();
            if prefix.is_empty() {
                continue;
            }
            let Some(rest) = lower.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let Some(rest) = rest.strip_prefix('-') else {
                continue;
            };
            let name: String = rest.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
            if !name.is_empty() {
                return Some((action, name));
            }
        }
        None
    }
}

/// Outcome of resolving one page worth of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub bound_fields: usize,
    /// Markers dropped because the action was already bound
    pub ignored_tags: usize,
}

/// Turns declared tags into bindings and seeds the registry.
pub struct BindingResolver<'a> {
    pub tags: &'a TagClasses,
}

impl<'a> BindingResolver<'a> {
    pub fn new(tags: &'a TagClasses) -> Self {
        Self { tags }
    }

    /// Resolve bindings for a list of fields.
    pub fn initialize_all(
        &self,
        fields: &mut [SelectableField],
        registry: &mut ContainerRegistry,
    ) -> ResolveSummary {
        let mut summary = ResolveSummary::default();
        for field in fields.iter_mut() {
            self.initialize_into(field, registry, &mut summary);
        }
        summary
    }

    /// Resolve bindings for one field, recursing into containers of
    /// fields. Only leaves are bound.
    pub fn initialize(&self, field: &mut SelectableField, registry: &mut ContainerRegistry) -> ResolveSummary {
        let mut summary = ResolveSummary::default();
        self.initialize_into(field, registry, &mut summary);
        summary
    }

    fn initialize_into(
        &self,
        field: &mut SelectableField,
        registry: &mut ContainerRegistry,
        summary: &mut ResolveSummary,
    ) {
        if !field.is_leaf() {
            for child in field.children.iter_mut() {
                self.initialize_into(child, registry, summary);
            }
            return;
        }

        let (bindings, ignored) = self.resolve(field);
        summary.ignored_tags += ignored;
        if bindings.is_empty() {
            return;
        }

        for (_, name) in bindings.iter() {
            registry.ensure(name);
        }
        field.bindings = bindings;
        registry.set(field);
        summary.bound_fields += 1;
    }

    /// Bindings of a leaf: explicit configuration when present,
    /// otherwise parsed from its classes.
    pub fn resolve(&self, field: &SelectableField) -> (ContainerBindings, usize) {
        if let Some(declared) = &field.declared {
            return (declared.clone(), 0);
        }

        let mut bindings = ContainerBindings::default();
        let mut ignored = 0;
        for class in &field.tags {
            if let Some((action, name)) = self.tags.parse(class) {
                if !bindings.bind(action, &name) {
                    ignored += 1;
                }
            }
        }
        (bindings, ignored)
    }
}
