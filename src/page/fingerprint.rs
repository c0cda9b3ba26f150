use sha1::{Digest, Sha1};

use crate::page::page_model::{PageSnapshot, WidgetElement};

/// Digest of the page structure: groups, widgets, rows and classes.
///
/// Values are left out, so changing a selection never changes the
/// fingerprint while adding or removing a repeater row does.
pub fn structure_fingerprint(page: &PageSnapshot) -> String {
    let mut hasher = Sha1::new();

    for group in &page.groups {
        hasher.update(b"group:");
        hasher.update(group.id.as_bytes());
        hasher.update(b"\n");
        for widget in &group.fields {
            hash_widget(&mut hasher, widget, 1);
        }
    }

    format!("{:x}", hasher.finalize())
}

fn hash_widget(hasher: &mut Sha1, widget: &WidgetElement, depth: usize) {
    hasher.update(depth.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(widget.input_id.as_deref().unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(widget.field_type.as_bytes());
    hasher.update(b"|");
    hasher.update(widget.classes.join(" ").as_bytes());
    if let Some(bindings) = &widget.bindings {
        hasher.update(format!("|{:?}", bindings).as_bytes());
    }
    hasher.update(b"\n");

    for child in &widget.fields {
        hash_widget(hasher, child, depth + 1);
    }

    for row in widget.rows.iter().filter(|r| !r.clone) {
        hasher.update(b"row:");
        hasher.update(row.data_id.as_bytes());
        hasher.update(b"\n");
        for child in &row.fields {
            hash_widget(hasher, child, depth + 1);
        }
    }
}
