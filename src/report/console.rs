use crate::engine::engine::XtendEngine;
use crate::field::field_model::{FieldKind, SelectableField};
use crate::report::report_model::SuiteReport;

/// Format a replay report for the terminal.
///
/// ```text
/// === Scenarios: replay ===
///
/// ✓ PASS  reserve authors (4 steps, 3 checks)
/// ✗ FAIL  include editors (2 steps, 1 checks)
///     [FAIL] Step 1: ids expected [3], actual [2, 3]
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Scenarios: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} checks)\n",
            marker,
            result.scenario_name,
            result.steps_run,
            result.checks.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for check in result.checks.iter().filter(|c| !c.passed) {
            out.push_str(&format!(
                "    [FAIL] Step {}: {} expected {}, actual {}\n",
                check.step_index, check.check, check.expected, check.actual
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}

/// Format the field tree with resolved bindings, then the registry.
pub fn format_field_tree(engine: &XtendEngine) -> String {
    let mut out = String::new();

    for root in &engine.index().roots {
        write_field(&mut out, root, 0);
    }

    let registry = engine.registry();
    out.push_str(&format!("\nContainers ({}):\n", registry.len()));
    for name in registry.names() {
        if let Some(container) = registry.container(name) {
            out.push_str(&format!(
                "  {}: push=[{}] exclude=[{}]\n",
                name,
                container.push.join(", "),
                container.exclude.join(", ")
            ));
        }
    }

    out
}

fn write_field(out: &mut String, field: &SelectableField, depth: usize) {
    let indent = "  ".repeat(depth);
    let kind = match &field.kind {
        FieldKind::Leaf => field.field_type.clone(),
        FieldKind::Group => "group".to_string(),
        FieldKind::Repeater { layout } => format!("repeater:{:?}", layout).to_lowercase(),
        FieldKind::RepeaterRow => "row".to_string(),
    };

    out.push_str(&format!("{}{} [{}] {}", indent, field.key, kind, field.display_label()));
    for (action, container) in field.bindings.iter() {
        out.push_str(&format!(" {}:{}", action, container));
    }
    out.push('\n');

    for child in &field.children {
        write_field(out, child, depth + 1);
    }
}
