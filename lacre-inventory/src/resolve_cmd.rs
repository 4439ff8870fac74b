use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use lacre_inventory::conflicts::{find_group, validate_resolution, KeyType, MemberEdit};
use lacre_inventory::report::render_rejection;
use lacre_inventory::store::{ChangeEntry, JsonFileStore, RecordStore};
use tracing::info;

use crate::cli::ResolveArgs;

pub fn run_resolve(args: ResolveArgs) -> Result<()> {
    let mut store = JsonFileStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;
    let items = store.list();

    let group = find_group(&items, args.key, &args.value).with_context(|| {
        format!(
            "no {} conflict group for value '{}'",
            args.key,
            args.value.trim()
        )
    })?;
    let edits = parse_edits(&args.edits)?;

    let edited = match validate_resolution(&items, &group, &edits) {
        Ok(edited) => edited,
        Err(err) => {
            println!("{}", render_rejection(&err));
            bail!("resolve rejected: {err}");
        }
    };

    let mut changes = 0;
    for item in edited {
        let Some(before) = items.iter().find(|i| i.id == item.id) else {
            continue;
        };
        for key in KeyType::ALL {
            let old = field(&before.record, key);
            let new = field(&item.record, key);
            if old != new {
                store.record_change(ChangeEntry::now(&item.id, key.as_str(), old, new))?;
                changes += 1;
            }
        }
        store.update(item)?;
    }
    store
        .save()
        .with_context(|| format!("failed to save store {}", args.store.display()))?;

    info!(key = %args.key, value = %args.value, changes, "conflict group resolved");
    println!("resolve ok key={} value={} changes={changes}", args.key, args.value.trim());
    Ok(())
}

fn field(record: &lacre_inventory::equipment::EquipmentRecord, key: KeyType) -> &str {
    match key {
        KeyType::Ip => &record.ip,
        KeyType::Mac => &record.mac,
        KeyType::Seal => &record.seal,
    }
}

/// Parse `<id>:<field>=<value>` edits, merging repeated ids.
fn parse_edits(raw: &[String]) -> Result<Vec<MemberEdit>> {
    let mut out: Vec<MemberEdit> = Vec::new();
    for spec in raw {
        let (id, assignment) = spec
            .split_once(':')
            .ok_or_else(|| anyhow!("edit '{spec}' must look like <id>:<field>=<value>"))?;
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("edit '{spec}' must look like <id>:<field>=<value>"))?;
        let key = KeyType::from_str(name.trim(), true)
            .map_err(|_| anyhow!("edit '{spec}': unknown field '{name}' (expected ip, mac, seal)"))?;

        let id = id.trim();
        let slot = match out.iter().position(|e| e.id == id) {
            Some(pos) => &mut out[pos],
            None => {
                out.push(MemberEdit::new(id));
                let last = out.len() - 1;
                &mut out[last]
            }
        };
        slot.set(key, value.trim());
    }
    Ok(out)
}
