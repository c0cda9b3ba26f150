use crate::container::guard::RemovalDecision;
use crate::engine::engine::XtendEngine;
use crate::engine::settings::EngineSettings;
use crate::error::XtendError;
use crate::page::host::{FormHost, PageHost};
use crate::page::page_model::PageSnapshot;
use crate::report::console::{format_console_report, format_field_tree};
use crate::report::report_model::SuiteReport;
use crate::scenario::runner::ScenarioRunner;
use crate::scenario::scenario_model::Scenario;
use crate::search::client::SearchClient;
use crate::search::search_model::SearchResponse;
use crate::trace::logger::TraceLogger;

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(
    page_path: &str,
    settings: EngineSettings,
    tracer: TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = load_page(page_path)?;
    let engine = XtendEngine::initialize(&mut page, settings, tracer);

    if verbose > 0 {
        eprintln!(
            "Indexed {} fields ({} skipped without input id), {} bound",
            engine.index().len(),
            engine.index().skipped,
            engine.last_resolve().bound_fields
        );
    }

    if !engine.use_containers() {
        println!("No container bindings on this page.");
    }
    print!("{}", format_field_tree(&engine));
    Ok(())
}

// ============================================================================
// filter subcommand
// ============================================================================

pub struct FilterSource<'a> {
    pub results_path: Option<&'a str>,
    pub endpoint: Option<&'a str>,
    pub action: &'a str,
    pub term: &'a str,
}

pub fn cmd_filter(
    page_path: &str,
    field_key: &str,
    source: FilterSource<'_>,
    settings: EngineSettings,
    tracer: TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = load_page(page_path)?;
    let mut engine = XtendEngine::initialize(&mut page, settings, tracer);
    let host = PageHost::from_snapshot(&page);

    if !engine.index().contains(field_key) {
        return Err(Box::new(XtendError::FieldNotFound(field_key.to_string())));
    }

    let mut response = match (source.results_path, source.endpoint) {
        (Some(path), _) => load_search_response(path)?,
        (None, Some(endpoint)) => {
            if verbose > 0 {
                eprintln!("Querying {} for '{}'...", endpoint, source.term);
            }
            SearchClient::new(endpoint, source.action).search(field_key, source.term, 1)?
        }
        (None, None) => {
            return Err("either --results or --endpoint (or search.endpoint in config) is required".into());
        }
    };

    let raw_count = response.results.len();
    response.results = engine.on_search_results(&host, field_key, response.results);

    if verbose > 0 {
        eprintln!(
            "{} candidates in, {} out: [{}]",
            raw_count,
            response.results.len(),
            response.ids().join(", ")
        );
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

// ============================================================================
// deselect subcommand
// ============================================================================

/// Returns whether the removal is allowed.
pub fn cmd_deselect(
    page_path: &str,
    field_key: &str,
    value_id: &str,
    value_text: Option<&str>,
    settings: EngineSettings,
    tracer: TraceLogger,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut page = load_page(page_path)?;
    let mut engine = XtendEngine::initialize(&mut page, settings, tracer);
    let mut host = PageHost::from_snapshot(&page);

    if host.field_value(field_key).is_none() {
        return Err(Box::new(XtendError::FieldNotFound(field_key.to_string())));
    }

    match engine.on_before_deselect(&mut host, field_key, value_id, value_text.unwrap_or("")) {
        RemovalDecision::Allow => {
            println!("allow: '{}' may be removed from {}", value_id, field_key);
            Ok(true)
        }
        RemovalDecision::Deny { notice, .. } => {
            println!("deny: '{}' is still used", value_id);
            for line in &notice.lines {
                println!("  - {}", line);
            }
            Ok(false)
        }
    }
}

// ============================================================================
// replay subcommand
// ============================================================================

/// Replay scenarios and return whether all passed.
pub fn cmd_replay(
    scenario_path: &str,
    format: &str,
    output: Option<&str>,
    settings: &EngineSettings,
    trace_path: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scenarios = load_scenarios(scenario_path)?;

    if scenarios.is_empty() {
        eprintln!("No scenarios found at: {}", scenario_path);
        return Ok(true);
    }

    let start = std::time::Instant::now();
    let mut results = Vec::new();
    for scenario in &scenarios {
        if verbose > 0 {
            eprintln!("  Replaying: {}", scenario.name);
        }
        results.push(ScenarioRunner::run(scenario, settings, TraceLogger::from_path(trace_path)));
    }

    let report = SuiteReport::from_results("replay", results).with_duration(start.elapsed().as_millis());
    let all_passed = report.all_passed();

    let content = match format {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &content)?,
        None => print!("{}", content),
    }

    Ok(all_passed)
}

// ============================================================================
// Loaders
// ============================================================================

pub fn load_page(path: &str) -> Result<PageSnapshot, XtendError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| XtendError::JsonParse {
        context: format!("page snapshot {}", path),
        source: e,
    })
}

pub fn load_search_response(path: &str) -> Result<SearchResponse, XtendError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| XtendError::JsonParse {
        context: format!("search response {}", path),
        source: e,
    })
}

pub fn parse_scenario(content: &str, origin: &str) -> Result<Scenario, XtendError> {
    serde_yaml::from_str(content).map_err(|e| XtendError::YamlParse {
        context: format!("scenario {}", origin),
        source: e,
    })
}

/// Load scenarios from a single YAML file or a directory of YAML files.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, XtendError> {
    let metadata = std::fs::metadata(path).map_err(|e| XtendError::Io {
        context: path.to_string(),
        source: e,
    })?;

    if !metadata.is_dir() {
        return Ok(vec![parse_scenario(&read_file(path)?, path)?]);
    }

    let entries = std::fs::read_dir(path).map_err(|e| XtendError::Io {
        context: path.to_string(),
        source: e,
    })?;

    let mut scenarios = Vec::new();
    for entry in entries {
        let p = entry
            .map_err(|e| XtendError::Io {
                context: path.to_string(),
                source: e,
            })?
            .path();
        if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            let origin = p.display().to_string();
            scenarios.push(parse_scenario(&read_file(&origin)?, &origin)?);
        }
    }
    // Sort by name for deterministic order
    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scenarios)
}

fn read_file(path: &str) -> Result<String, XtendError> {
    std::fs::read_to_string(path).map_err(|e| XtendError::Io {
        context: path.to_string(),
        source: e,
    })
}
