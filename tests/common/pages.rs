use serde_json::{Value, json};

use field_containers::{
    container::{registry::ContainerRegistry, resolver::{BindingResolver, TagClasses}},
    field::index::FieldIndex,
    page::{
        host::PageHost,
        page_model::{FieldGroupElement, PageSnapshot, RepeaterLayout, RepeaterRowElement, WidgetElement},
    },
    search::search_model::ResultEntry,
};

// =========================================================================
// Snapshot builders
// =========================================================================

pub fn widget(input_id: &str, label: &str, classes: &[&str], value: Value) -> WidgetElement {
    WidgetElement {
        input_id: Some(input_id.to_string()),
        name: None,
        field_type: "select".into(),
        label: Some(label.to_string()),
        classes: classes.iter().map(|c| c.to_string()).collect(),
        value,
        bindings: None,
        fields: vec![],
        rows: vec![],
        layout: RepeaterLayout::Table,
        data_fkey: None,
    }
}

pub fn repeater(input_id: &str, label: &str, rows: Vec<RepeaterRowElement>) -> WidgetElement {
    WidgetElement {
        field_type: "repeater".into(),
        value: Value::Null,
        rows,
        ..widget(input_id, label, &["acf-field"], Value::Null)
    }
}

pub fn sub_group(input_id: &str, label: &str, fields: Vec<WidgetElement>) -> WidgetElement {
    WidgetElement {
        field_type: "group".into(),
        fields,
        ..widget(input_id, label, &["acf-field"], Value::Null)
    }
}

pub fn row(data_id: &str, fields: Vec<WidgetElement>) -> RepeaterRowElement {
    RepeaterRowElement {
        data_id: data_id.to_string(),
        clone: false,
        fields,
    }
}

pub fn clone_row(fields: Vec<WidgetElement>) -> RepeaterRowElement {
    RepeaterRowElement {
        data_id: "acfcloneindex".into(),
        clone: true,
        fields,
    }
}

pub fn page(fields: Vec<WidgetElement>) -> PageSnapshot {
    PageSnapshot {
        title: "Edit Post".into(),
        groups: vec![FieldGroupElement {
            id: "acf-group_main".into(),
            fields,
        }],
    }
}

pub fn results(entries: &[(i64, &str)]) -> Vec<ResultEntry> {
    entries.iter().map(|(id, text)| ResultEntry::new(*id, text)).collect()
}

pub fn ids(entries: &[ResultEntry]) -> Vec<String> {
    entries.iter().map(|e| e.id_string()).collect()
}

/// Raw candidates used by most filter tests: ids 1..=4.
pub fn abcd() -> Vec<ResultEntry> {
    results(&[(1, "a"), (2, "b"), (3, "c"), (4, "d")])
}

// =========================================================================
// Pages
// =========================================================================

/// Authors (push people) = [1,2,3], Lead (include people) = [2],
/// Notes without any container.
pub fn reservation_page() -> PageSnapshot {
    page(vec![
        widget("acf-field_authors", "Authors", &["acf-field", "xtend-push-people"], json!([1, 2, 3])),
        widget("acf-field_lead", "Lead author", &["acf-field", "xtend-include-people"], json!([2])),
        widget("acf-field_notes", "Notes", &["acf-field"], Value::Null),
    ])
}

/// Index, resolve and wrap a page the way the engine does.
pub fn resolve(mut page: PageSnapshot) -> (FieldIndex, ContainerRegistry, PageHost) {
    let mut index = FieldIndex::build(&mut page);
    let mut registry = ContainerRegistry::new();
    let tags = TagClasses::default();
    BindingResolver::new(&tags).initialize_all(&mut index.roots, &mut registry);
    let host = PageHost::from_snapshot(&page);
    (index, registry, host)
}
