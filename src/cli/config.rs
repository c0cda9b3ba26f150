use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::engine::settings::EngineSettings;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "field-containers",
    version,
    about = "Cross-field container constraints for multi-select form fields"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: field-containers.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append engine events as JSON lines to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Let push fields offer values already pushed into their container
    #[arg(long, global = true)]
    pub allow_duplicates: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the field tree, resolved bindings and container contents
    Inspect {
        /// Page snapshot JSON file
        #[arg(long)]
        page: String,
    },

    /// Filter an option-search response for one field
    Filter {
        /// Page snapshot JSON file
        #[arg(long)]
        page: String,

        /// Full key of the field being searched
        #[arg(long)]
        field: String,

        /// Search response JSON file (`{ "results": [...] }`)
        #[arg(long, conflicts_with = "endpoint")]
        results: Option<String>,

        /// Option-search endpoint to query instead of a results file
        #[arg(long)]
        endpoint: Option<String>,

        /// Search term sent to the endpoint
        #[arg(long, default_value = "")]
        term: String,
    },

    /// Check whether a value may be deselected from a field
    Deselect {
        /// Page snapshot JSON file
        #[arg(long)]
        page: String,

        /// Full key of the field losing the value
        #[arg(long)]
        field: String,

        /// Id of the value being removed
        #[arg(long)]
        value: String,

        /// Display text of the value
        #[arg(long)]
        text: Option<String>,
    },

    /// Replay scenario YAML files
    Replay {
        /// Scenario YAML file or directory of YAML files
        #[arg(long)]
        scenario: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `field-containers.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: Option<String>,

    /// Value of the `action` form parameter sent to the endpoint
    #[serde(default = "default_search_action")]
    pub action: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            action: default_search_action(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

fn default_search_action() -> String { "acf/fields/select/query".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("field-containers.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config file > defaults)
// ============================================================================

pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> EngineSettings {
    let mut settings = config.engine.clone();
    if cli.allow_duplicates {
        settings.suppress_duplicates = false;
    }
    settings
}

pub fn resolve_trace_path<'a>(cli: &'a Cli, config: &'a AppConfig) -> Option<&'a str> {
    cli.trace.as_deref().or(config.trace.path.as_deref())
}
