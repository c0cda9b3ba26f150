use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::container::guard::Blocker;
use crate::field::field_model::Action;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub command: String,
    pub field: Option<String>,

    pub action: Option<String>,
    pub container: Option<String>,

    pub raw_count: Option<usize>,
    pub filtered_count: Option<usize>,

    pub decision: Option<String>,
    pub blockers: Vec<String>,

    /// Rebuild only
    pub indexed_fields: Option<usize>,
    pub bound_fields: Option<usize>,
    pub skipped_widgets: Option<usize>,
}

impl TraceEvent {
    pub fn now(step: u64, command: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            command: command.to_string(),
            field: None,
            action: None,
            container: None,
            raw_count: None,
            filtered_count: None,
            decision: None,
            blockers: vec![],
            indexed_fields: None,
            bound_fields: None,
            skipped_widgets: None,
        }
    }

    pub fn with_field(mut self, key: &str) -> Self {
        self.field = Some(key.to_string());
        self
    }

    pub fn with_action(mut self, action: Option<Action>) -> Self {
        self.action = action.map(|a| a.to_string());
        self
    }

    pub fn with_container(mut self, container: Option<&str>) -> Self {
        self.container = container.map(str::to_string);
        self
    }

    pub fn with_index(mut self, indexed: usize, bound: usize, skipped: usize) -> Self {
        self.indexed_fields = Some(indexed);
        self.bound_fields = Some(bound);
        self.skipped_widgets = Some(skipped);
        self
    }

    pub fn with_counts(mut self, raw: usize, filtered: usize) -> Self {
        self.raw_count = Some(raw);
        self.filtered_count = Some(filtered);
        self
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_blockers(mut self, blockers: &[Blocker]) -> Self {
        self.blockers = blockers.iter().map(|b| b.key.clone()).collect();
        self
    }
}
