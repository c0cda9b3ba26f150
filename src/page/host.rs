use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::field_model::FieldValue;
use crate::page::page_model::{PageSnapshot, WidgetElement, visit_widgets};

/// Severity of a field notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Warning,
    Error,
    Success,
}

/// A notice displayed on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub lines: Vec<String>,
    pub dismiss: bool,
}

impl Notice {
    pub fn warning(lines: Vec<String>) -> Self {
        Notice {
            kind: NoticeKind::Warning,
            lines,
            dismiss: true,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// What the engine needs from the form framework hosting the fields.
pub trait FormHost {
    /// Current value of the field, None when the key does not resolve.
    fn field_value(&self, key: &str) -> Option<FieldValue>;

    fn field_label(&self, key: &str) -> Option<String>;

    fn show_notice(&mut self, key: &str, notice: Notice);

    fn remove_notice(&mut self, key: &str);

    fn close_option_panel(&mut self, key: &str);
}

/// Host-side state of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct HostWidget {
    pub label: Option<String>,
    pub value: Value,
    pub notice: Option<Notice>,
    pub panel_open: bool,
}

/// In-memory host backed by a page snapshot.
///
/// Widgets are looked up by the full key the field index wrote back,
/// so the snapshot must have been indexed first.
#[derive(Debug, Clone, Default)]
pub struct PageHost {
    widgets: HashMap<String, HostWidget>,
}

impl PageHost {
    pub fn from_snapshot(page: &PageSnapshot) -> Self {
        let mut host = PageHost::default();
        host.sync(page);
        host
    }

    /// Re-read the widget set after a structural change. Widgets that
    /// survive keep their current value and notice.
    pub fn sync(&mut self, page: &PageSnapshot) {
        let mut widgets = HashMap::new();
        visit_widgets(page, &mut |w: &WidgetElement| {
            if let Some(key) = &w.data_fkey {
                let state = match self.widgets.remove(key) {
                    Some(existing) => existing,
                    None => HostWidget {
                        label: w.label.clone(),
                        value: w.value.clone(),
                        notice: None,
                        panel_open: false,
                    },
                };
                widgets.entry(key.clone()).or_insert(state);
            }
        });
        self.widgets = widgets;
    }

    /// Replace the value of a widget. Returns false for unknown keys.
    pub fn set_value(&mut self, key: &str, value: Value) -> bool {
        match self.widgets.get_mut(key) {
            Some(w) => {
                w.value = value;
                true
            }
            None => false,
        }
    }

    pub fn open_panel(&mut self, key: &str) {
        if let Some(w) = self.widgets.get_mut(key) {
            w.panel_open = true;
        }
    }

    pub fn widget(&self, key: &str) -> Option<&HostWidget> {
        self.widgets.get(key)
    }

    pub fn notice(&self, key: &str) -> Option<&Notice> {
        self.widgets.get(key).and_then(|w| w.notice.as_ref())
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl FormHost for PageHost {
    fn field_value(&self, key: &str) -> Option<FieldValue> {
        self.widgets.get(key).map(|w| FieldValue::from_json(&w.value))
    }

    fn field_label(&self, key: &str) -> Option<String> {
        self.widgets.get(key).and_then(|w| w.label.clone())
    }

    fn show_notice(&mut self, key: &str, notice: Notice) {
        if let Some(w) = self.widgets.get_mut(key) {
            w.notice = Some(notice);
        }
    }

    fn remove_notice(&mut self, key: &str) {
        if let Some(w) = self.widgets.get_mut(key) {
            w.notice = None;
        }
    }

    fn close_option_panel(&mut self, key: &str) {
        if let Some(w) = self.widgets.get_mut(key) {
            w.panel_open = false;
        }
    }
}
