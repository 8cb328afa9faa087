use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use colstore::cache::ReaderCache;
use colstore::conf::Config;
use colstore::core::{CliArgs, Command, setup_logging};
use colstore::io::stream::LocalStreamProvider;
use colstore::table::TableReader;

fn main() -> Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "colstore started");

    let config = Config::load(args.config.as_deref().map(Path::new))?;
    let streams = Arc::new(LocalStreamProvider::new(&config.storage.root));
    let cache = Arc::new(ReaderCache::new(&config.cache));

    match args.command {
        Command::Inspect { table } => {
            let reader = TableReader::open(streams, cache, &table)
                .with_context(|| format!("opening table {}", table.display()))?;
            inspect(reader)
        }
        Command::Scan {
            table,
            page_rows,
            cached,
        } => {
            let reader = TableReader::open(streams, cache, &table)
                .with_context(|| format!("opening table {}", table.display()))?;
            scan(reader, page_rows.unwrap_or(config.scan.page_rows), cached)
        }
    }
}

fn inspect(mut table: TableReader) -> Result<()> {
    println!("table:   {}", table.table_path().display());
    println!("query:   {}", table.query());
    println!("rows:    {}", table.row_count());
    println!("columns:");
    for index in 0..table.columns().len() {
        let column = table.columns()[index].clone();
        let stored = if column.dtype.is_primitive() {
            match table.column_reader(index)? {
                Some(reader) => format!("{} values", reader.count()),
                None => "not materialized".to_string(),
            }
        } else {
            "no binary codec".to_string()
        };
        println!("  {:<24} {:<10} {}", column.name, format!("{:?}", column.dtype), stored);
    }
    table.dispose();
    Ok(())
}

fn scan(mut table: TableReader, page_rows: usize, cached: bool) -> Result<()> {
    anyhow::ensure!(page_rows > 0, "page size must be positive");

    let mut columns = Vec::new();
    for (index, column) in table.columns().to_vec().into_iter().enumerate() {
        if !column.dtype.is_primitive() {
            warn!("skipping column '{}' of type {:?}", column.name, column.dtype);
            continue;
        }
        let reader = if cached {
            table.cached_column_reader(index)?
        } else {
            table.column_reader(index)?
        };
        match reader {
            Some(_) => columns.push(index),
            None => warn!("column '{}' is not materialized", column.name),
        }
    }

    let mut pages = 0usize;
    let mut rows = 0usize;
    loop {
        let count = table.next(page_rows);
        if count == 0 {
            break;
        }
        for &index in &columns {
            table.read_column(index)?;
        }
        pages += 1;
        rows += count;
    }

    info!(
        "scanned {} rows of {} columns in {} pages",
        rows,
        columns.len(),
        pages
    );
    println!("{rows} rows, {} columns, {pages} pages", columns.len());
    table.dispose();
    Ok(())
}
