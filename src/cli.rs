//! Command-line glue: import a delimited file and summarize it.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use crate::codec::parse_range;
use crate::import::{build_extended_table, read_delimited_text, ImportSettings};
use crate::normalization::NormalizerRegistry;
use crate::transform::column_names;

/// Import a delimited data file with row/column metadata and print a
/// summary of the resulting annotated table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Delimited input file.
    pub input: PathBuf,

    /// JSON file with import settings; defaults apply when omitted.
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Restrict the summary to data columns given as a compact range,
    /// e.g. "A-C,F" or "1-3,6".
    #[arg(short, long)]
    pub columns: Option<String>,

    /// Interpret --columns as spreadsheet-style letters instead of
    /// 1-based numbers.
    #[arg(long)]
    pub alpha: bool,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings '{}'", path.display()))?;
            serde_json::from_str::<ImportSettings>(&text)
                .with_context(|| format!("parsing settings '{}'", path.display()))?
        }
        None => ImportSettings::default(),
    };
    info!("import settings: {settings:?}");

    let raw = read_delimited_text(&cli.input, &settings)?;
    info!(
        "read '{}': {} rows x {} columns",
        cli.input.display(),
        raw.nrows(),
        raw.ncols()
    );

    let registry = NormalizerRegistry::with_builtins();
    let extended = build_extended_table(&raw, &settings, &registry)?;

    println!(
        "data: {} rows x {} columns (grid {} x {})",
        extended.data().nrows(),
        extended.data().ncols(),
        extended.total_rows(),
        extended.total_columns()
    );
    println!(
        "column metadata kinds: {:?} (of interest: {:?})",
        extended.column_meta_data_labels(),
        extended.column_meta_data_type_of_interest()
    );
    println!(
        "row metadata kinds: {:?} (of interest: {:?})",
        extended.row_meta_data_labels(),
        extended.row_meta_data_type_of_interest()
    );

    let names = column_names(extended.data(), 0)?;
    match &cli.columns {
        Some(range) => {
            let selected = parse_range(range, cli.alpha)?;
            for index in selected {
                match names.get(index) {
                    Some(name) => println!("column {index}: {name}"),
                    None => println!("column {index}: (out of range)"),
                }
            }
        }
        None => {
            for (index, name) in names.iter().enumerate() {
                println!("column {index}: {name}");
            }
        }
    }

    Ok(())
}
