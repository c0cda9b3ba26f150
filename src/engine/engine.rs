use crate::container::filter::filter_list;
use crate::container::guard::{RemovalDecision, check_before_remove};
use crate::container::registry::ContainerRegistry;
use crate::container::resolver::{BindingResolver, ResolveSummary};
use crate::engine::settings::EngineSettings;
use crate::field::field_model::Action;
use crate::field::index::FieldIndex;
use crate::page::fingerprint::structure_fingerprint;
use crate::page::host::FormHost;
use crate::page::page_model::PageSnapshot;
use crate::search::search_model::ResultEntry;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Container constraint engine for one page session.
///
/// All commands run synchronously on the caller's thread. The registry
/// lives as long as the engine; the field index is rebuilt wholesale
/// when the page structure changes.
pub struct XtendEngine {
    pub settings: EngineSettings,
    index: FieldIndex,
    registry: ContainerRegistry,
    fingerprint: String,
    last_resolve: ResolveSummary,
    tracer: TraceLogger,
    step: u64,
}

impl XtendEngine {
    /// Index the page and resolve every field's bindings.
    pub fn initialize(page: &mut PageSnapshot, settings: EngineSettings, tracer: TraceLogger) -> Self {
        let mut engine = XtendEngine {
            settings,
            index: FieldIndex::default(),
            registry: ContainerRegistry::new(),
            fingerprint: String::new(),
            last_resolve: ResolveSummary::default(),
            tracer,
            step: 0,
        };
        engine.rebuild(page);
        engine
    }

    fn rebuild(&mut self, page: &mut PageSnapshot) {
        self.index = FieldIndex::build(page);
        self.fingerprint = structure_fingerprint(page);

        if self.settings.enabled {
            let resolver = BindingResolver::new(&self.settings.tags);
            self.last_resolve = resolver.initialize_all(&mut self.index.roots, &mut self.registry);
        } else {
            self.last_resolve = ResolveSummary::default();
        }

        let event = TraceEvent::now(self.next_step(), "rebuild")
            .with_index(self.index.len(), self.last_resolve.bound_fields, self.index.skipped);
        self.tracer.log(&event);
    }

    /// Rebuild after a structural change. Returns whether the
    /// structure actually changed.
    pub fn on_structure_changed(&mut self, page: &mut PageSnapshot) -> bool {
        if structure_fingerprint(page) == self.fingerprint {
            return false;
        }
        self.rebuild(page);
        true
    }

    /// Whether any container work is needed on this page.
    pub fn use_containers(&self) -> bool {
        self.settings.enabled && self.index.leaves().iter().any(|f| f.is_bound())
    }

    /// A field's value changed: refresh its registration.
    pub fn on_value_changed(&mut self, host: &mut dyn FormHost, key: &str) {
        if !self.use_containers() {
            return;
        }
        let Some(field) = self.index.get(key) else {
            return;
        };

        let supplies = field.bindings.container_for(Action::Push).is_some();
        if supplies {
            host.remove_notice(key);
        }
        let added = self.registry.set(field);

        let event = TraceEvent::now(self.next_step(), "value_changed")
            .with_field(key)
            .with_decision(format!("registered={}", added));
        self.tracer.log(&event);
    }

    /// Filter an option-search response for a field.
    pub fn on_search_results(&mut self, host: &dyn FormHost, key: &str, raw: Vec<ResultEntry>) -> Vec<ResultEntry> {
        if !self.use_containers() {
            return raw;
        }
        let Some(field) = self.index.get(key) else {
            return raw;
        };

        let raw_count = raw.len();
        let outcome = filter_list(raw, field, &self.registry, host, self.settings.suppress_duplicates);
        let container = outcome
            .applied
            .and_then(|a| field.bindings.container_for(a))
            .map(str::to_string);

        let event = TraceEvent::now(self.next_step(), "search_results")
            .with_field(key)
            .with_action(outcome.applied)
            .with_container(container.as_deref())
            .with_counts(raw_count, outcome.results.len());
        self.tracer.log(&event);

        outcome.results
    }

    /// A value is about to be deselected. On deny the notice is shown
    /// on the field and its option panel is closed.
    pub fn on_before_deselect(
        &mut self,
        host: &mut dyn FormHost,
        key: &str,
        value_id: &str,
        value_text: &str,
    ) -> RemovalDecision {
        if !self.use_containers() {
            return RemovalDecision::Allow;
        }
        let Some(field) = self.index.get(key) else {
            return RemovalDecision::Allow;
        };

        let decision = check_before_remove(field, value_id, value_text, &self.index, host);
        let container = field.bindings.container_for(Action::Push).map(str::to_string);

        let mut event = TraceEvent::now(self.next_step(), "before_deselect")
            .with_field(key)
            .with_container(container.as_deref());
        match &decision {
            RemovalDecision::Allow => {
                event = event.with_decision("allow");
            }
            RemovalDecision::Deny { blockers, notice } => {
                host.show_notice(key, notice.clone());
                host.close_option_panel(key);
                event = event.with_decision("deny").with_blockers(blockers);
            }
        }
        self.tracer.log(&event);

        decision
    }

    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn last_resolve(&self) -> &ResolveSummary {
        &self.last_resolve
    }

    fn next_step(&mut self) -> u64 {
        self.step += 1;
        self.step
    }
}
