use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::array::{ColumnArray, Selector};
use crate::cache::{CacheMode, ReaderCache};
use crate::core::ColstoreError;
use crate::io::column::ColumnReader;
use crate::io::stream::StreamProvider;
use crate::types::TypeProvider;

use super::{ColumnSchema, TableMetadata};

/// Pageable, seekable reader over one table directory.
///
/// Column readers are opened lazily, on first access, through the shared
/// [`ReaderCache`]. Reads always happen at the current selector, which is
/// moved either by the forward scan cursor ([`TableReader::next`]) or by a
/// direct seek ([`TableReader::get`]).
///
/// A table reader is single-owner: the cursor methods take `&mut self`.
/// Disposing consumes it, so it cannot be used afterwards.
pub struct TableReader {
    streams: Arc<dyn StreamProvider>,
    cache: Arc<ReaderCache>,
    table_path: PathBuf,
    metadata: TableMetadata,
    readers: Vec<Option<Arc<dyn ColumnReader>>>,
    is_cached: Vec<bool>,
    current_selector: Selector,
    enumerate_selector: Selector,
}

impl TableReader {
    pub fn open(
        streams: Arc<dyn StreamProvider>,
        cache: Arc<ReaderCache>,
        table_path: impl Into<PathBuf>,
    ) -> Result<Self, ColstoreError> {
        let table_path = table_path.into();
        let metadata = TableMetadata::read(streams.as_ref(), &table_path)?;
        info!(
            "opened table {} ({} rows, {} columns)",
            table_path.display(),
            metadata.row_count,
            metadata.columns.len()
        );

        let columns = metadata.columns.len();
        let mut reader = Self {
            streams,
            cache,
            table_path,
            metadata,
            readers: vec![None; columns],
            is_cached: vec![false; columns],
            current_selector: Selector::default(),
            enumerate_selector: Selector::default(),
        };
        reader.reset();
        Ok(reader)
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    pub fn query(&self) -> &str {
        &self.metadata.query
    }

    pub fn row_count(&self) -> usize {
        self.metadata.row_count
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.metadata.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.metadata.column_index(name)
    }

    /// Rows visible through the current selector.
    pub fn current_row_count(&self) -> usize {
        self.current_selector.count()
    }

    pub fn current_selector(&self) -> &Selector {
        &self.current_selector
    }

    pub fn enumerate_selector(&self) -> &Selector {
        &self.enumerate_selector
    }

    /// Streaming reader for column `index`, built once and kept. `Ok(None)`
    /// when the column has no values file.
    pub fn column_reader(
        &mut self,
        index: usize,
    ) -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError> {
        self.check_column(index)?;
        if self.readers[index].is_none() {
            self.readers[index] = self.open_column(index, CacheMode::Streaming)?;
        }
        Ok(self.readers[index].clone())
    }

    /// Fully cached reader for column `index`, replacing a streaming reader
    /// built earlier.
    pub fn cached_column_reader(
        &mut self,
        index: usize,
    ) -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError> {
        self.check_column(index)?;
        if self.readers[index].is_none() || !self.is_cached[index] {
            self.readers[index] = self.open_column(index, CacheMode::FullyCached)?;
            self.is_cached[index] = self.readers[index].is_some();
        }
        Ok(self.readers[index].clone())
    }

    /// Values of column `index` at the current selector. `Ok(None)` when the
    /// column has no values file.
    pub fn read_column(&mut self, index: usize) -> Result<Option<ColumnArray>, ColstoreError> {
        match self.column_reader(index)? {
            Some(reader) => reader.read(&self.current_selector).map(Some),
            None => Ok(None),
        }
    }

    /// Advance the scan cursor by up to `desired_count` rows and make that
    /// page current. Returns the rows now available; 0 ends the scan.
    pub fn next(&mut self, desired_count: usize) -> usize {
        self.enumerate_selector = self
            .enumerate_selector
            .next_page(self.metadata.row_count, desired_count);
        self.current_selector = self.enumerate_selector.clone();
        self.current_selector.count()
    }

    /// Seek: read at `selector` from now on. The scan cursor is left where
    /// it was.
    pub fn get(&mut self, selector: Selector) {
        self.current_selector = selector;
    }

    /// Rewind the scan cursor to before the first row.
    pub fn reset(&mut self) {
        self.enumerate_selector = Selector::empty_at(0);
    }

    /// Release every column reader this table opened.
    pub fn dispose(mut self) {
        let opened = self.readers.iter().filter(|r| r.is_some()).count();
        self.readers.clear();
        self.is_cached.clear();
        debug!(
            "disposed table {} ({} column readers released)",
            self.table_path.display(),
            opened
        );
    }

    fn check_column(&self, index: usize) -> Result<(), ColstoreError> {
        if index >= self.metadata.columns.len() {
            return Err(ColstoreError::OutOfRange(format!(
                "column {} of table {} with {} columns",
                index,
                self.table_path.display(),
                self.metadata.columns.len()
            )));
        }
        Ok(())
    }

    fn open_column(
        &self,
        index: usize,
        mode: CacheMode,
    ) -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError> {
        let column = &self.metadata.columns[index];
        let column_path = self.table_path.join(&column.name);
        TypeProvider::for_dtype(&column.dtype)?.open_reader(
            self.streams.as_ref(),
            &self.cache,
            &column_path,
            mode,
        )
    }
}
