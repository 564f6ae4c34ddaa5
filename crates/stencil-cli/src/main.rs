//! Stencil CLI - merge CSV data into spreadsheet and document templates

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stencil::{DirAssets, MergeOptions, OutputDir, Stencil};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(author, version, about = "Merge CSV rows into XLSX and DOCX templates")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Directory templates and CSV files are read from
    #[arg(long, global = true, default_value = ".")]
    assets: PathBuf,

    /// Directory outputs are written to
    #[arg(long, global = true, default_value = ".")]
    out: PathBuf,

    /// CSV field delimiter (overrides the config file)
    #[arg(long, global = true)]
    delimiter: Option<char>,

    /// JSON file with merge options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill ${Name} placeholders in a spreadsheet from the first CSV row
    FillSheet {
        /// Template asset
        #[arg(short, long, default_value = "Template.xlsx")]
        template: String,

        /// CSV asset
        #[arg(short, long, default_value = "Data.csv")]
        csv: String,

        /// Output file name
        #[arg(short, long, default_value = "Output_Filled.xlsx")]
        output: String,
    },

    /// Append CSV rows below a sheet's header row
    AppendSheet {
        /// Template asset
        #[arg(short, long, default_value = "Template.xlsx")]
        template: String,

        /// CSV asset
        #[arg(short, long, default_value = "Data.csv")]
        csv: String,

        /// Output file name
        #[arg(short, long, default_value = "Output_Table.xlsx")]
        output: String,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Header row index (0-based)
        #[arg(long, default_value = "0")]
        header_row: u32,
    },

    /// Write one filled document per CSV row, named from the row's fields
    FillDocs {
        /// Template asset
        #[arg(short, long, default_value = "Template.docx")]
        template: String,

        /// CSV asset
        #[arg(short, long, default_value = "Data.csv")]
        csv: String,
    },

    /// Append CSV rows to a document table
    AppendDoc {
        /// Template asset
        #[arg(short, long, default_value = "Template.docx")]
        template: String,

        /// CSV asset
        #[arg(short, long, default_value = "Data.csv")]
        csv: String,

        /// Output file name
        #[arg(short, long, default_value = "Output_Table.docx")]
        output: String,

        /// Use the first table instead of matching table headers to the CSV header
        #[arg(long)]
        first_table: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    let options = load_options(&cli.common)?;
    let stencil = Stencil::with_options(
        DirAssets::new(&cli.common.assets),
        OutputDir::new(&cli.common.out),
        options,
    );

    let path = match &cli.command {
        Commands::FillSheet {
            template,
            csv,
            output,
        } => stencil
            .fill_spreadsheet_from_csv(template, csv, output)
            .with_context(|| format!("Failed to fill '{}'", template))?,
        Commands::AppendSheet {
            template,
            csv,
            output,
            sheet,
            header_row,
        } => stencil
            .append_spreadsheet_table_from_csv(template, csv, output, sheet.as_deref(), *header_row)
            .with_context(|| format!("Failed to append rows to '{}'", template))?,
        Commands::FillDocs { template, csv } => stencil
            .fill_document_placeholders_from_csv_batch(template, csv, &stencil.options().batch)
            .with_context(|| format!("Failed to fill '{}'", template))?,
        Commands::AppendDoc {
            template,
            csv,
            output,
            first_table,
        } => stencil
            .append_document_table_from_csv(template, csv, output, !first_table)
            .with_context(|| format!("Failed to append rows to '{}'", template))?,
    };

    println!("{}", path.display());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(common: &CommonArgs) -> Result<MergeOptions> {
    let mut options = match &common.config {
        Some(path) => read_config(path)?,
        None => MergeOptions::default(),
    };
    if let Some(delimiter) = common.delimiter {
        options.csv.delimiter = delimiter;
    }
    tracing::debug!(?options, "merge options");
    Ok(options)
}

fn read_config(path: &Path) -> Result<MergeOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config '{}'", path.display()))
}
