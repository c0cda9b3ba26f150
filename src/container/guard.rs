use serde::Serialize;

use crate::field::field_model::{Action, SelectableField};
use crate::field::index::FieldIndex;
use crate::page::host::{FormHost, Notice};

/// A field that still relies on the value being removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    pub key: String,
    pub label: String,
    pub container: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemovalDecision {
    Allow,
    Deny { blockers: Vec<Blocker>, notice: Notice },
}

impl RemovalDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RemovalDecision::Allow)
    }
}

/// Decide whether `value_id` may be deselected from a push field.
///
/// Denied when any other field bound as include to one of the field's
/// push containers currently holds the value. The check only reads;
/// displaying the notice is left to the caller.
pub fn check_before_remove(
    field: &SelectableField,
    value_id: &str,
    value_text: &str,
    index: &FieldIndex,
    host: &dyn FormHost,
) -> RemovalDecision {
    let Some(container) = field.bindings.container_for(Action::Push) else {
        return RemovalDecision::Allow;
    };

    let blockers: Vec<Blocker> = index
        .leaves()
        .into_iter()
        .filter(|other| other.key != field.key)
        .filter(|other| other.bindings.container_for(Action::Include) == Some(container))
        .filter(|other| {
            host.field_value(&other.key)
                .map(|v| v.contains(value_id))
                .unwrap_or(false)
        })
        .map(|other| Blocker {
            key: other.key.clone(),
            label: host
                .field_label(&other.key)
                .unwrap_or_else(|| other.display_label().to_string()),
            container: container.to_string(),
        })
        .collect();

    if blockers.is_empty() {
        return RemovalDecision::Allow;
    }

    let shown = if value_text.is_empty() { value_id } else { value_text };
    let lines = blockers
        .iter()
        .map(|b| format!("\"{}\" can not be removed: used in field \"{}\".", shown, b.label))
        .collect();

    RemovalDecision::Deny {
        blockers,
        notice: Notice::warning(lines),
    }
}
