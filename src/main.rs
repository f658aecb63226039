use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lista_brasoft::config::CategoryMap;
use lista_brasoft::{ListError, Result, fill};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    match cli.command {
        Command::Fill(args) => execute_fill(args),
        Command::InitMap(args) => execute_init_map(args),
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ListError::Logging(error.to_string()))
}

fn execute_fill(args: FillArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ListError::MissingInput(args.input));
    }
    let map = CategoryMap::load(&args.map)?;
    let output = args.output.unwrap_or_else(|| default_output(&args.input));
    fill::fill_workbook(&args.input, &output, &map, !args.no_diagnostics)?;
    println!("{}", output.display());
    Ok(())
}

fn execute_init_map(args: InitMapArgs) -> Result<()> {
    if args.path.exists() {
        return Err(ListError::AlreadyExists(args.path));
    }
    CategoryMap::default().save(&args.path)?;
    println!("{}", args.path.display());
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    input.with_file_name("preenchido.xlsx")
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Enrich Shopee order exports into the daily fill-in workbook."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse an orders export and generate the report workbook.
    Fill(FillArgs),
    /// Write the default category map for editing.
    InitMap(InitMapArgs),
}

#[derive(clap::Args)]
struct FillArgs {
    /// Orders export workbook (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Report destination. Defaults to `preenchido.xlsx` next to the input.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Category map JSON file.
    #[arg(long, default_value = "sku_map.json")]
    map: PathBuf,

    /// Skip the per-item diagnostics sheet.
    #[arg(long)]
    no_diagnostics: bool,
}

#[derive(clap::Args)]
struct InitMapArgs {
    /// Where to write the map.
    #[arg(long, default_value = "sku_map.json")]
    path: PathBuf,
}
