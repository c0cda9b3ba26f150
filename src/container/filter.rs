use crate::container::registry::{ContainerRegistry, ContainerValues};
use crate::field::field_model::{Action, SelectableField, numeric_value};
use crate::page::host::FormHost;
use crate::search::search_model::ResultEntry;

/// Filtered results and the action that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub results: Vec<ResultEntry>,
    /// Last action that produced a list; None means pass-through
    pub applied: Option<Action>,
}

/// Shape a candidate list according to the field's container bindings.
///
/// Actions run in order push, include, exclude. Each action that
/// produces a list replaces the list of the previous one; lists are
/// never merged. An include that matches nothing produces no list.
/// When no action produces a list the raw results come back untouched.
pub fn filter_list(
    raw: Vec<ResultEntry>,
    field: &SelectableField,
    registry: &ContainerRegistry,
    host: &dyn FormHost,
    suppress_duplicates: bool,
) -> FilterOutcome {
    if !field.is_bound() {
        return FilterOutcome {
            results: raw,
            applied: None,
        };
    }

    let values = registry.get(field, host);
    let mut produced: Option<(Action, Vec<ResultEntry>)> = None;

    for (action, container) in field.bindings.iter() {
        let stored = container_values(&values, action, container);

        let list = match action {
            Action::Push if suppress_duplicates => Some(difference(&raw, &stored)),
            Action::Push => None,
            Action::Include => {
                let list = include(&raw, &stored, suppress_duplicates);
                (!list.is_empty()).then_some(list)
            }
            Action::Exclude => Some(difference(&raw, &stored)),
        };

        if let Some(list) = list {
            produced = Some((action, list));
        }
    }

    match produced {
        Some((action, results)) => FilterOutcome {
            results,
            applied: Some(action),
        },
        None => FilterOutcome {
            results: raw,
            applied: None,
        },
    }
}

fn container_values<'v>(values: &'v ContainerValues, action: Action, container: &str) -> &'v [String] {
    values
        .get(&action)
        .and_then(|by_name| by_name.get(container))
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

fn stored_ids(stored: &[String]) -> Vec<i64> {
    stored.iter().filter_map(|v| numeric_value(v)).collect()
}

/// Raw entries whose id is not among the stored values, in raw order.
fn difference(raw: &[ResultEntry], stored: &[String]) -> Vec<ResultEntry> {
    let ids = stored_ids(stored);
    raw.iter()
        .filter(|entry| match entry.numeric_id() {
            Some(id) => !ids.contains(&id),
            None => true,
        })
        .cloned()
        .collect()
}

/// Raw entries matching stored values, in stored order.
fn include(raw: &[ResultEntry], stored: &[String], suppress_duplicates: bool) -> Vec<ResultEntry> {
    let mut out: Vec<ResultEntry> = Vec::new();
    for id in stored_ids(stored) {
        for entry in raw.iter().filter(|e| e.numeric_id() == Some(id)) {
            if suppress_duplicates && out.contains(entry) {
                continue;
            }
            out.push(entry.clone());
        }
    }
    out
}
