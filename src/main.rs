use clap::Parser;
use field_containers::cli::commands::{FilterSource, cmd_deselect, cmd_filter, cmd_inspect, cmd_replay};
use field_containers::cli::config::{Cli, Commands, load_config, resolve_settings, resolve_trace_path};
use field_containers::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // CLI > config > defaults
    let settings = resolve_settings(&cli, &config);
    let trace_path = resolve_trace_path(&cli, &config);

    match &cli.command {
        Commands::Inspect { page } => {
            cmd_inspect(page, settings, TraceLogger::from_path(trace_path), cli.verbose)?;
        }
        Commands::Filter {
            page,
            field,
            results,
            endpoint,
            term,
        } => {
            let source = FilterSource {
                results_path: results.as_deref(),
                endpoint: endpoint.as_deref().or(config.search.endpoint.as_deref()),
                action: &config.search.action,
                term,
            };
            cmd_filter(page, field, source, settings, TraceLogger::from_path(trace_path), cli.verbose)?;
        }
        Commands::Deselect {
            page,
            field,
            value,
            text,
        } => {
            let allowed = cmd_deselect(
                page,
                field,
                value,
                text.as_deref(),
                settings,
                TraceLogger::from_path(trace_path),
            )?;
            if !allowed {
                std::process::exit(1);
            }
        }
        Commands::Replay {
            scenario,
            format,
            output,
        } => {
            let all_passed = cmd_replay(
                scenario,
                format,
                output.as_deref(),
                &settings,
                trace_path,
                cli.verbose,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
