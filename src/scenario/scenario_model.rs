use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::settings::EngineSettings;
use crate::page::page_model::{PageSnapshot, RepeaterRowElement};
use crate::search::search_model::ResultEntry;

/// A replayable editing session: a page plus the user interactions to
/// apply to it, with expectations. Deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,

    /// Overrides the configured engine settings for this scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<EngineSettings>,

    pub page: PageSnapshot,

    pub steps: Vec<ScenarioStep>,
}

/// A single interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Change a field's value and notify the engine
    SetValue { field: String, value: Value },

    /// Feed an option-search response through the engine
    Search {
        field: String,
        results: Vec<ResultEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expect_ids: Option<Vec<Value>>,
    },

    /// Attempt to deselect one value
    Deselect {
        field: String,
        value: String,
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expect: Option<ExpectedDecision>,
        /// Labels of the fields expected to block the removal
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        expect_blockers: Vec<String>,
    },

    /// Add a row to a repeater
    AppendRow { repeater: String, row: RepeaterRowElement },

    /// Remove a row from a repeater
    RemoveRow { repeater: String, row_id: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedDecision {
    Allow,
    Deny,
}

/// Result of one expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    /// Step the check belongs to (0-indexed)
    pub step_index: usize,

    /// Short check name: ids, decision, blockers
    pub check: String,

    pub passed: bool,

    pub expected: String,
    pub actual: String,
}

/// Result of replaying a complete scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,

    pub passed: bool,

    pub steps_run: usize,

    pub checks: Vec<CheckResult>,

    /// Set when a step could not be applied (not a failed expectation)
    pub error: Option<String>,
}
