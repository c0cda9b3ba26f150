use std::collections::HashMap;

use crate::field::field_model::{FieldKind, SelectableField};
use crate::page::page_model::{FieldGroupElement, PageSnapshot, WidgetElement};

/// Hierarchical index of every field on the page.
///
/// Built in one pass over the snapshot and discarded wholesale on
/// structural changes; there is no incremental update.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    pub roots: Vec<SelectableField>,

    /// Full key → child positions from the roots
    paths: HashMap<String, Vec<usize>>,

    /// Widgets skipped because they carry no input id
    pub skipped: usize,
}

impl FieldIndex {
    /// Index every field group of the page.
    pub fn build(page: &mut PageSnapshot) -> Self {
        let mut index = FieldIndex::default();

        for group in page.groups.iter_mut() {
            if let Some(root) = build_tree(group, &mut index.skipped) {
                index.roots.push(root);
            }
        }

        let mut paths = HashMap::new();
        for (i, root) in index.roots.iter().enumerate() {
            record_paths(root, vec![i], &mut paths);
        }
        index.paths = paths;
        index
    }

    pub fn get(&self, key: &str) -> Option<&SelectableField> {
        let path = self.paths.get(key)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for i in rest {
            node = node.children.get(*i)?;
        }
        Some(node)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SelectableField> {
        let path = self.paths.get(key)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for i in rest {
            node = node.children.get_mut(*i)?;
        }
        Some(node)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.paths.contains_key(key)
    }

    /// Leaf fields, depth-first in page order.
    pub fn leaves(&self) -> Vec<&SelectableField> {
        let mut out = Vec::new();
        for root in &self.roots {
            collect_leaves(root, &mut out);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Build the tree of one field group, writing full keys back onto the
/// widgets. Returns None for elements that are not field groups.
pub fn build_tree(group: &mut FieldGroupElement, skipped: &mut usize) -> Option<SelectableField> {
    let key = group.group_key()?.to_string();

    let children = group
        .fields
        .iter_mut()
        .filter_map(|w| build_field(w, skipped))
        .collect();

    Some(SelectableField {
        name: None,
        field_type: "group".into(),
        label: None,
        kind: FieldKind::Group,
        tags: vec![],
        declared: None,
        bindings: Default::default(),
        children,
        key,
    })
}

fn build_field(widget: &mut WidgetElement, skipped: &mut usize) -> Option<SelectableField> {
    let key = match widget.input_id.clone() {
        Some(id) if !id.is_empty() => id,
        _ => {
            *skipped += 1;
            return None;
        }
    };

    let (kind, children) = if widget.is_repeater() {
        let rows = widget
            .rows
            .iter_mut()
            .filter(|r| !r.clone)
            .map(|row| SelectableField {
                key: format!("{}-{}", key, row.data_id),
                name: None,
                field_type: "repeater-row".into(),
                label: None,
                kind: FieldKind::RepeaterRow,
                tags: vec![],
                declared: None,
                bindings: Default::default(),
                children: row
                    .fields
                    .iter_mut()
                    .filter_map(|w| build_field(w, skipped))
                    .collect(),
            })
            .collect();
        (FieldKind::Repeater { layout: widget.layout }, rows)
    } else if widget.is_group() {
        let fields = widget
            .fields
            .iter_mut()
            .filter_map(|w| build_field(w, skipped))
            .collect();
        (FieldKind::Group, fields)
    } else {
        (FieldKind::Leaf, vec![])
    };

    widget.data_fkey = Some(key.clone());

    Some(SelectableField {
        key,
        name: widget.name.clone(),
        field_type: widget.field_type.clone(),
        label: widget.label.clone(),
        kind,
        tags: widget.classes.clone(),
        declared: widget.bindings.clone(),
        bindings: Default::default(),
        children,
    })
}

fn record_paths(node: &SelectableField, path: Vec<usize>, paths: &mut HashMap<String, Vec<usize>>) {
    // first occurrence in page order wins on duplicate keys
    paths.entry(node.key.clone()).or_insert_with(|| path.clone());
    for (i, child) in node.children.iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(i);
        record_paths(child, child_path, paths);
    }
}

fn collect_leaves<'a>(node: &'a SelectableField, out: &mut Vec<&'a SelectableField>) {
    if node.is_leaf() {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}
