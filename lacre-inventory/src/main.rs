use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use hostlist_core::{classify_all, parse_file};
use lacre_inventory::heuristics::{default_heuristics, load_heuristics, Heuristics};
use lacre_inventory::normalize::normalize_all;
use lacre_inventory::report::{render_classified, render_parse_stats, render_records};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod conflicts_cmd;
mod import_cmd;
mod path_guard;
mod resolve_cmd;

use cli::{Cli, Command, InspectArgs, NormalizeArgs, OutputFormat, ParseArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Parse(args) => run_parse(args),
        Command::Import(args) => import_cmd::run_import(args),
        Command::Export(args) => import_cmd::run_export(args),
        Command::CsvImport(args) => import_cmd::run_csv_import(args),
        Command::Conflicts(args) => conflicts_cmd::run_conflicts(args),
        Command::Resolve(args) => resolve_cmd::run_resolve(args),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut rows = classify_all(&text);
    if let Some(only) = &args.only {
        rows.retain(|(_, _, kind)| kind.tag() == only.as_str());
    }
    println!("{}", render_classified(&rows));
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let list = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let heuristics = resolve_heuristics(&args.normalize);
    let records = normalize_all(&list, &heuristics, args.normalize.section_source);

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_parse_stats(&list.stats));
            println!("{}", render_records(&records));
        }
        OutputFormat::Json => {
            let report = ParseReport {
                stats: list.stats,
                records,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

pub(crate) fn resolve_heuristics(args: &NormalizeArgs) -> Heuristics {
    let Some(path) = args.heuristics_file.as_deref() else {
        return default_heuristics();
    };
    load_or_default(path)
}

fn load_or_default(path: &Path) -> Heuristics {
    match load_heuristics(path) {
        Ok(tables) => tables,
        Err(err) => {
            warn!(
                "failed to load heuristics from {} ({err}); using embedded defaults",
                path.display()
            );
            default_heuristics()
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct ParseReport {
    stats: hostlist_core::ParseStats,
    records: Vec<lacre_inventory::equipment::EquipmentRecord>,
}
