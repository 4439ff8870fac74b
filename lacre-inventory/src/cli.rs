use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use lacre_inventory::conflicts::KeyType;
use lacre_inventory::normalize::SectionSource;

#[derive(Parser, Debug)]
#[command(name = "lacre-inventory")]
#[command(about = "Import, export, and audit equipment kept in dhcpd host lists")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show how every statement of a host list is classified.
    Inspect(InspectArgs),
    /// Parse and normalize a host list without touching a store.
    Parse(ParseArgs),
    /// Parse a host list and add its equipment to a store.
    Import(ImportArgs),
    /// Write a store back out as a host list or CSV.
    Export(ExportArgs),
    /// Bulk-import equipment from a six-column CSV file.
    CsvImport(CsvImportArgs),
    /// Report equipment sharing an IP, MAC, or seal.
    Conflicts(ConflictsArgs),
    /// Apply edits to one conflict group after re-checking it.
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// Only show statements of this kind (for example open, address, section).
    #[arg(long)]
    pub only: Option<String>,
}

#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Which mechanism decides each record's section.
    #[arg(long, value_enum, default_value_t = SectionSource::Heuristic)]
    pub section_source: SectionSource,
    /// Optional heuristics TOML file. Defaults to the embedded tables.
    #[arg(long)]
    pub heuristics_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ParseArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[command(flatten)]
    pub normalize: NormalizeArgs,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    pub file: PathBuf,
    /// JSON store file (created if missing).
    #[arg(long, default_value = "inventory.json")]
    pub store: PathBuf,
    #[command(flatten)]
    pub normalize: NormalizeArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    Dhcp,
    Csv,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[arg(long, default_value = "inventory.json")]
    pub store: PathBuf,
    /// Output file path.
    #[arg(short, long)]
    pub output: PathBuf,
    #[arg(long, value_enum, default_value_t = ExportFormat::Dhcp)]
    pub format: ExportFormat,
}

#[derive(Parser, Debug)]
pub struct CsvImportArgs {
    pub file: PathBuf,
    #[arg(long, default_value = "inventory.json")]
    pub store: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ConflictsArgs {
    #[arg(long, default_value = "inventory.json")]
    pub store: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Fail when any conflict group exists.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[arg(long, default_value = "inventory.json")]
    pub store: PathBuf,
    /// Key type of the conflict group to resolve.
    #[arg(long, value_enum)]
    pub key: KeyType,
    /// Shared value identifying the conflict group.
    #[arg(long)]
    pub value: String,
    /// Edit as `<id>:<field>=<value>` with field ip, mac, or seal. Repeatable.
    #[arg(long = "edit", required = true)]
    pub edits: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
