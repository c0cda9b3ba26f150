use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::field_model::ContainerBindings;

// ============================================================================
// Page snapshot: the host page as delivered to the engine
// ============================================================================

/// A complete page of field groups, deserialized from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub groups: Vec<FieldGroupElement>,
}

/// An on-page field group (`acf-group_<key>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroupElement {
    pub id: String,

    #[serde(default)]
    pub fields: Vec<WidgetElement>,
}

impl FieldGroupElement {
    /// Group key: the element id without its `acf-` prefix.
    ///
    /// Returns None when the id does not look like a field group.
    pub fn group_key(&self) -> Option<&str> {
        self.id
            .strip_prefix("acf-")
            .filter(|rest| rest.starts_with("group_"))
    }
}

/// Layout of a repeater's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeaterLayout {
    #[default]
    Table,
    Block,
    Row,
}

/// One interactive widget on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetElement {
    /// Id of the widget's own input element (the stable identifier)
    #[serde(default)]
    pub input_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Field type: select, post_object, repeater, group, text, ...
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Class list of the wrapper element (tag markers live here)
    #[serde(default)]
    pub classes: Vec<String>,

    /// Current value: null, scalar or array
    #[serde(default)]
    pub value: Value,

    /// Explicit container configuration, preferred over class markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<ContainerBindings>,

    /// Sub fields of a group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<WidgetElement>,

    /// Rows of a repeater
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RepeaterRowElement>,

    #[serde(default)]
    pub layout: RepeaterLayout,

    /// Full key written back by the field index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_fkey: Option<String>,
}

impl WidgetElement {
    pub fn is_repeater(&self) -> bool {
        self.field_type == "repeater"
    }

    pub fn is_group(&self) -> bool {
        self.field_type == "group"
    }
}

/// One row of a repeater. The hidden template row is flagged `clone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeaterRowElement {
    pub data_id: String,

    #[serde(default)]
    pub clone: bool,

    #[serde(default)]
    pub fields: Vec<WidgetElement>,
}

// ============================================================================
// Traversal helpers
// ============================================================================

/// Visit every widget of the page depth-first, clone rows excluded.
pub fn visit_widgets<'a>(page: &'a PageSnapshot, visit: &mut dyn FnMut(&'a WidgetElement)) {
    for group in &page.groups {
        for widget in &group.fields {
            visit_widget(widget, visit);
        }
    }
}

fn visit_widget<'a>(widget: &'a WidgetElement, visit: &mut dyn FnMut(&'a WidgetElement)) {
    visit(widget);
    for child in &widget.fields {
        visit_widget(child, visit);
    }
    for row in widget.rows.iter().filter(|r| !r.clone) {
        for child in &row.fields {
            visit_widget(child, visit);
        }
    }
}

/// Find a widget by its written-back full key.
pub fn find_widget_mut<'a>(page: &'a mut PageSnapshot, fkey: &str) -> Option<&'a mut WidgetElement> {
    page.groups
        .iter_mut()
        .flat_map(|g| g.fields.iter_mut())
        .find_map(|w| find_in_widget(w, fkey))
}

fn find_in_widget<'a>(widget: &'a mut WidgetElement, fkey: &str) -> Option<&'a mut WidgetElement> {
    if widget.data_fkey.as_deref() == Some(fkey) {
        return Some(widget);
    }
    for child in widget.fields.iter_mut() {
        if let Some(found) = find_in_widget(child, fkey) {
            return Some(found);
        }
    }
    for row in widget.rows.iter_mut().filter(|r| !r.clone) {
        for child in row.fields.iter_mut() {
            if let Some(found) = find_in_widget(child, fkey) {
                return Some(found);
            }
        }
    }
    None
}
