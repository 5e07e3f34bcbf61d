//! Binary entry point: import a delimited file and print a summary of
//! the annotated table. All of the interesting behavior lives in the
//! library modules.

use clap::Parser;
use log::error;

use omics_tables::cli::{run, Cli};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
