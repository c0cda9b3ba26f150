use crate::{
    container::guard::RemovalDecision,
    engine::{engine::XtendEngine, settings::EngineSettings},
    page::{host::PageHost, page_model::PageSnapshot},
    search::search_model::ResultEntry,
    trace::logger::TraceLogger,
};

pub mod cli;
pub mod container;
pub mod engine;
pub mod error;
pub mod field;
pub mod page;
pub mod report;
pub mod scenario;
pub mod search;
pub mod trace;

/// An engine and its in-memory host over one page snapshot.
///
/// Convenience for embedding: owns the page so structural changes can
/// be applied and re-indexed in one place.
pub struct PageSession {
    pub page: PageSnapshot,
    pub engine: XtendEngine,
    pub host: PageHost,
}

impl PageSession {
    pub fn open(mut page: PageSnapshot, settings: EngineSettings) -> Self {
        let engine = XtendEngine::initialize(&mut page, settings, TraceLogger::disabled());
        let host = PageHost::from_snapshot(&page);
        Self { page, engine, host }
    }

    /// Set a field's value and let the engine react. Returns false for
    /// unknown keys.
    pub fn select(&mut self, key: &str, value: serde_json::Value) -> bool {
        if !self.host.set_value(key, value) {
            return false;
        }
        self.engine.on_value_changed(&mut self.host, key);
        true
    }

    pub fn search(&mut self, key: &str, raw: Vec<ResultEntry>) -> Vec<ResultEntry> {
        self.engine.on_search_results(&self.host, key, raw)
    }

    pub fn deselect(&mut self, key: &str, value_id: &str, value_text: &str) -> RemovalDecision {
        self.engine.on_before_deselect(&mut self.host, key, value_id, value_text)
    }

    /// Re-index after the caller edited `self.page` structurally.
    pub fn restructure(&mut self) -> bool {
        let changed = self.engine.on_structure_changed(&mut self.page);
        if changed {
            self.host.sync(&self.page);
        }
        changed
    }
}
