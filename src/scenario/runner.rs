use serde_json::Value;

use crate::container::guard::RemovalDecision;
use crate::engine::engine::XtendEngine;
use crate::engine::settings::EngineSettings;
use crate::error::XtendError;
use crate::page::host::PageHost;
use crate::page::page_model::{PageSnapshot, find_widget_mut};
use crate::scenario::scenario_model::{
    CheckResult, ExpectedDecision, Scenario, ScenarioResult, ScenarioStep,
};
use crate::trace::logger::TraceLogger;

/// Replays a scenario against a fresh engine and in-memory host.
pub struct ScenarioRunner;

struct Session {
    page: PageSnapshot,
    engine: XtendEngine,
    host: PageHost,
    checks: Vec<CheckResult>,
}

impl ScenarioRunner {
    pub fn run(scenario: &Scenario, defaults: &EngineSettings, tracer: TraceLogger) -> ScenarioResult {
        let settings = scenario.settings.clone().unwrap_or_else(|| defaults.clone());
        let mut page = scenario.page.clone();
        let engine = XtendEngine::initialize(&mut page, settings, tracer);
        let host = PageHost::from_snapshot(&page);

        let mut session = Session {
            page,
            engine,
            host,
            checks: Vec::new(),
        };

        for (i, step) in scenario.steps.iter().enumerate() {
            if let Err(e) = Self::execute_step(step, i, &mut session) {
                return ScenarioResult {
                    scenario_name: scenario.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    checks: session.checks,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            passed: session.checks.iter().all(|c| c.passed),
            steps_run: scenario.steps.len(),
            checks: session.checks,
            error: None,
        }
    }

    fn execute_step(step: &ScenarioStep, step_index: usize, s: &mut Session) -> Result<(), XtendError> {
        match step {
            ScenarioStep::SetValue { field, value } => {
                if !s.host.set_value(field, value.clone()) {
                    return Err(XtendError::FieldNotFound(field.clone()));
                }
                s.engine.on_value_changed(&mut s.host, field);
                Ok(())
            }

            ScenarioStep::Search {
                field,
                results,
                expect_ids,
            } => {
                let filtered = s.engine.on_search_results(&s.host, field, results.clone());
                if let Some(expected) = expect_ids {
                    let expected: Vec<String> = expected.iter().map(value_text).collect();
                    let actual: Vec<String> = filtered.iter().map(|r| r.id_string()).collect();
                    s.checks.push(CheckResult {
                        step_index,
                        check: "ids".into(),
                        passed: expected == actual,
                        expected: format!("[{}]", expected.join(", ")),
                        actual: format!("[{}]", actual.join(", ")),
                    });
                }
                Ok(())
            }

            ScenarioStep::Deselect {
                field,
                value,
                text,
                expect,
                expect_blockers,
            } => {
                s.host.open_panel(field);
                let decision = s.engine.on_before_deselect(&mut s.host, field, value, text);

                if let Some(expected) = expect {
                    let actual = match decision {
                        RemovalDecision::Allow => ExpectedDecision::Allow,
                        RemovalDecision::Deny { .. } => ExpectedDecision::Deny,
                    };
                    s.checks.push(CheckResult {
                        step_index,
                        check: "decision".into(),
                        passed: *expected == actual,
                        expected: format!("{:?}", expected),
                        actual: format!("{:?}", actual),
                    });
                }

                if !expect_blockers.is_empty() {
                    let actual: Vec<String> = match &decision {
                        RemovalDecision::Allow => vec![],
                        RemovalDecision::Deny { blockers, .. } => {
                            blockers.iter().map(|b| b.label.clone()).collect()
                        }
                    };
                    s.checks.push(CheckResult {
                        step_index,
                        check: "blockers".into(),
                        passed: &actual == expect_blockers,
                        expected: expect_blockers.join(", "),
                        actual: actual.join(", "),
                    });
                }
                Ok(())
            }

            ScenarioStep::AppendRow { repeater, row } => {
                let widget = find_widget_mut(&mut s.page, repeater)
                    .filter(|w| w.is_repeater())
                    .ok_or_else(|| XtendError::FieldNotFound(repeater.clone()))?;
                widget.rows.push(row.clone());
                Self::restructure(s);
                Ok(())
            }

            ScenarioStep::RemoveRow { repeater, row_id } => {
                let widget = find_widget_mut(&mut s.page, repeater)
                    .filter(|w| w.is_repeater())
                    .ok_or_else(|| XtendError::FieldNotFound(repeater.clone()))?;
                let before = widget.rows.len();
                widget.rows.retain(|r| &r.data_id != row_id);
                if widget.rows.len() == before {
                    return Err(XtendError::Scenario(format!(
                        "repeater '{}' has no row '{}'",
                        repeater, row_id
                    )));
                }
                Self::restructure(s);
                Ok(())
            }
        }
    }

    fn restructure(s: &mut Session) {
        s.engine.on_structure_changed(&mut s.page);
        s.host.sync(&s.page);
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
