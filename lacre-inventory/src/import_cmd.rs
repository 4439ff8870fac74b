use std::fs;

use anyhow::{Context, Result};
use hostlist_core::parse_file;
use lacre_inventory::csv_import::{import_csv, write_csv};
use lacre_inventory::export::generate;
use lacre_inventory::normalize::normalize_all;
use lacre_inventory::report::{render_csv_summary, render_equipment, render_parse_stats};
use lacre_inventory::store::{JsonFileStore, RecordStore};
use tracing::info;

use crate::cli::{CsvImportArgs, ExportArgs, ExportFormat, ImportArgs};
use crate::path_guard::{ensure_distinct_target, Protected};
use crate::resolve_heuristics;

pub fn run_import(args: ImportArgs) -> Result<()> {
    ensure_distinct_target(&args.store, &[Protected::new("host list", &args.file)])?;
    let list = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let heuristics = resolve_heuristics(&args.normalize);
    let records = normalize_all(&list, &heuristics, args.normalize.section_source);

    let mut store = JsonFileStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;
    let mut added = Vec::with_capacity(records.len());
    for record in records {
        added.push(store.add(record)?);
    }
    store
        .save()
        .with_context(|| format!("failed to save store {}", args.store.display()))?;

    info!(
        file = %args.file.display(),
        store = %args.store.display(),
        added = added.len(),
        "host list imported"
    );
    println!("{}", render_parse_stats(&list.stats));
    println!("import added={} total={}", added.len(), store.list().len());
    if !added.is_empty() {
        println!("{}", render_equipment(&added));
    }
    Ok(())
}

pub fn run_export(args: ExportArgs) -> Result<()> {
    ensure_distinct_target(&args.output, &[Protected::new("store", &args.store)])?;
    let store = JsonFileStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;
    let items = store.list();

    let text = match args.format {
        ExportFormat::Dhcp => generate(items.iter().map(|item| &item.record)),
        ExportFormat::Csv => write_csv(&items),
    };
    fs::write(&args.output, text)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(output = %args.output.display(), records = items.len(), "store exported");
    println!("export records={} output={}", items.len(), args.output.display());
    Ok(())
}

pub fn run_csv_import(args: CsvImportArgs) -> Result<()> {
    ensure_distinct_target(&args.store, &[Protected::new("csv file", &args.file)])?;
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut store = JsonFileStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;

    let summary = import_csv(&text, &mut store)?;
    store
        .save()
        .with_context(|| format!("failed to save store {}", args.store.display()))?;

    info!(
        imported = summary.imported,
        duplicates = summary.duplicates,
        malformed = summary.malformed,
        "csv imported"
    );
    println!("{}", render_csv_summary(&summary));
    Ok(())
}
