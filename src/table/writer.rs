use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::array::ColumnArray;
use crate::core::ColstoreError;
use crate::io::column::ColumnWriter;
use crate::io::stream::StreamProvider;
use crate::types::TypeProvider;

use super::{ColumnSchema, TableMetadata};

/// Writes a table directory: one values file per column plus `table.json`.
///
/// Batches are appended column-aligned; the metadata (with the final row
/// count) is written by [`TableWriter::finish`].
pub struct TableWriter {
    streams: Arc<dyn StreamProvider>,
    table_path: PathBuf,
    metadata: TableMetadata,
    writers: Vec<Box<dyn ColumnWriter>>,
}

impl TableWriter {
    pub fn create(
        streams: Arc<dyn StreamProvider>,
        table_path: impl Into<PathBuf>,
        columns: Vec<ColumnSchema>,
        query: impl Into<String>,
    ) -> Result<Self, ColstoreError> {
        let table_path = table_path.into();

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(ColstoreError::MetadataError(format!(
                    "duplicate column '{}' in table {}",
                    column.name,
                    table_path.display()
                )));
            }
        }

        let providers = columns
            .iter()
            .map(|c| TypeProvider::for_dtype(&c.dtype))
            .collect::<Result<Vec<_>, _>>()?;
        let writers = columns
            .iter()
            .zip(&providers)
            .map(|(c, p)| p.open_writer(streams.as_ref(), &table_path.join(&c.name)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            streams,
            table_path,
            metadata: TableMetadata {
                query: query.into(),
                row_count: 0,
                columns,
            },
            writers,
        })
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Rows appended so far.
    pub fn row_count(&self) -> usize {
        self.metadata.row_count
    }

    /// Append one value array per column, in schema order. Every array must
    /// have the column's kind and the same row count.
    pub fn append(&mut self, batch: &[ColumnArray]) -> Result<usize, ColstoreError> {
        if batch.len() != self.writers.len() {
            return Err(ColstoreError::TypeMismatch(format!(
                "batch has {} columns, table {} has {}",
                batch.len(),
                self.table_path.display(),
                self.writers.len()
            )));
        }

        let rows = batch.first().map_or(0, ColumnArray::count);
        for ((array, writer), column) in batch
            .iter()
            .zip(&self.writers)
            .zip(&self.metadata.columns)
        {
            if array.kind() != writer.kind() {
                return Err(ColstoreError::TypeMismatch(format!(
                    "column '{}' expects {} values, got {}",
                    column.name,
                    writer.kind(),
                    array.kind()
                )));
            }
            if array.count() != rows {
                return Err(ColstoreError::OutOfRange(format!(
                    "column '{}' has {} rows, batch has {}",
                    column.name,
                    array.count(),
                    rows
                )));
            }
        }

        for (array, writer) in batch.iter().zip(self.writers.iter_mut()) {
            writer.append(array)?;
        }
        self.metadata.row_count += rows;
        Ok(rows)
    }

    /// Close every column writer and write the table metadata.
    pub fn finish(mut self) -> Result<TableMetadata, ColstoreError> {
        for writer in self.writers.iter_mut() {
            writer.close()?;
        }
        self.metadata
            .write(self.streams.as_ref(), &self.table_path)?;
        info!(
            "wrote table {} ({} rows, {} columns)",
            self.table_path.display(),
            self.metadata.row_count,
            self.metadata.columns.len()
        );
        Ok(self.metadata)
    }
}
