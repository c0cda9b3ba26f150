use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::page::page_model::RepeaterLayout;

// ============================================================================
// Container actions and per-field bindings
// ============================================================================

/// What a field does with a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Supplies its selected values into the container
    Push,
    /// Forces the container's values into its own candidate list
    Include,
    /// Removes the container's values from its own candidate list
    Exclude,
}

impl Action {
    /// Processing order of the result filter.
    pub const ALL: [Action; 3] = [Action::Push, Action::Include, Action::Exclude];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Push => "push",
            Action::Include => "include",
            Action::Exclude => "exclude",
        }
    }

    /// Actions whose fields register themselves as container suppliers.
    pub fn registers(&self) -> bool {
        matches!(self, Action::Push | Action::Exclude)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container configuration of one field: at most one container per action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerBindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplies: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes_from: Option<String>,
}

impl ContainerBindings {
    pub fn container_for(&self, action: Action) -> Option<&str> {
        match action {
            Action::Push => self.supplies.as_deref(),
            Action::Include => self.includes_from.as_deref(),
            Action::Exclude => self.excludes_from.as_deref(),
        }
    }

    /// Bind `action` to `container`. Returns false when the action is
    /// already bound; the existing binding is kept.
    pub fn bind(&mut self, action: Action, container: &str) -> bool {
        let slot = match action {
            Action::Push => &mut self.supplies,
            Action::Include => &mut self.includes_from,
            Action::Exclude => &mut self.excludes_from,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(container.to_string());
        true
    }

    /// Bound (action, container) pairs in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, &str)> + '_ {
        Action::ALL
            .into_iter()
            .filter_map(move |a| self.container_for(a).map(|c| (a, c)))
    }

    pub fn is_empty(&self) -> bool {
        self.supplies.is_none() && self.includes_from.is_none() && self.excludes_from.is_none()
    }
}

// ============================================================================
// Field tree
// ============================================================================

/// Structural kind of a field node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain input widget; the only kind that carries bindings
    Leaf,
    /// Field group (top-level or nested); children are its sub fields
    Group,
    /// Repeater; children are its rows
    Repeater { layout: RepeaterLayout },
    /// One repeater row; children are the row's fields
    RepeaterRow,
}

/// One node of the field index.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableField {
    /// Full key: hierarchy-qualified, taken from the widget's input id
    pub key: String,
    pub name: Option<String>,
    pub field_type: String,
    pub label: Option<String>,
    pub kind: FieldKind,

    /// Class list as declared on the page
    pub tags: Vec<String>,

    /// Explicit configuration supplied with the widget, if any
    pub declared: Option<ContainerBindings>,

    /// Resolved bindings (empty until the resolver ran)
    pub bindings: ContainerBindings,

    pub children: Vec<SelectableField>,
}

impl SelectableField {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, FieldKind::Leaf)
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Display label, falling back to name then key.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.key)
    }
}

// ============================================================================
// Field values as read from the host
// ============================================================================

/// Current value of a field as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Empty,
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// Normalize a raw JSON value: null → empty, scalar → single,
    /// array → many. Nested nulls and objects are dropped.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Empty,
            Value::Array(items) => {
                FieldValue::Many(items.iter().filter_map(scalar_to_string).collect())
            }
            other => match scalar_to_string(other) {
                Some(s) => FieldValue::Single(s),
                None => FieldValue::Empty,
            },
        }
    }

    /// Values as a sequence; a scalar becomes a one-element list.
    pub fn into_values(self) -> Vec<String> {
        match self {
            FieldValue::Empty => vec![],
            FieldValue::Single(v) => vec![v],
            FieldValue::Many(vs) => vs,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Single(v) => same_value(v, id),
            FieldValue::Many(vs) => vs.iter().any(|v| same_value(v, id)),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer form of a stored value. Non-numeric values never match an id.
pub fn numeric_value(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Equality of two stored values: textual, or numeric when both parse.
pub fn same_value(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
