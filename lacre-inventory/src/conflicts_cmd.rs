use anyhow::{bail, Context, Result};
use lacre_inventory::conflicts::detect_conflicts;
use lacre_inventory::report::render_conflicts_text;
use lacre_inventory::store::{JsonFileStore, RecordStore};

use crate::cli::{ConflictsArgs, OutputFormat};

pub fn run_conflicts(args: ConflictsArgs) -> Result<()> {
    let store = JsonFileStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;
    let groups = detect_conflicts(&store.list());

    match args.format {
        OutputFormat::Text => println!("{}", render_conflicts_text(&groups)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
    }

    if args.strict && !groups.is_empty() {
        bail!("conflicts failed in strict mode: {} groups", groups.len());
    }
    Ok(())
}
