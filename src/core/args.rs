use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::kv::{ToValue, Value};

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the schema, row count and query of a table.
    Inspect { table: PathBuf },
    /// Scan every column of a table page by page.
    Scan {
        table: PathBuf,
        /// Rows per page, overrides `scan.page_rows` from the config.
        #[arg(long)]
        page_rows: Option<usize>,
        /// Load columns fully into memory before scanning.
        #[arg(long)]
        cached: bool,
    },
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
