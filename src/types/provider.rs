use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::cache::{CacheMode, ReaderCache};
use crate::core::ColstoreError;
use crate::io::column::{
    CachedPrimitiveReader, ColumnReader, ColumnWriter, PrimitiveReader, PrimitiveWriter,
};
use crate::io::stream::StreamProvider;

use super::{DType, PrimitiveKind, ValueComparer, with_primitive};

pub const VALUES_FILE_EXTENSION: &str = "bin";

/// Values file for a column.
///
/// A path already ending in `.bin` names the values file itself; any other
/// path is a column directory holding `V.<tag>.bin` next to future sidecar
/// files.
pub fn values_file_path(column_path: &Path, kind: PrimitiveKind) -> PathBuf {
    if column_path
        .extension()
        .is_some_and(|ext| ext == VALUES_FILE_EXTENSION)
    {
        return column_path.to_path_buf();
    }
    column_path.join(format!("V.{}.{}", kind.tag(), VALUES_FILE_EXTENSION))
}

/// Codec factory for one primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeProvider {
    kind: PrimitiveKind,
}

impl TypeProvider {
    /// Fails for logical types that have no fixed-width binary codec.
    pub fn for_dtype(dtype: &DType) -> Result<Self, ColstoreError> {
        PrimitiveKind::try_from(dtype).map(Self::for_kind)
    }

    pub fn for_kind(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn comparer(&self) -> Option<ValueComparer> {
        self.kind.comparer()
    }

    pub fn values_file_path(&self, column_path: &Path) -> PathBuf {
        values_file_path(column_path, self.kind)
    }

    /// Reader for the column at `column_path`, shared through `cache`.
    ///
    /// Returns `Ok(None)` when the values file does not exist: the column is
    /// simply not materialized.
    pub fn open_reader(
        &self,
        streams: &dyn StreamProvider,
        cache: &ReaderCache,
        column_path: &Path,
        mode: CacheMode,
    ) -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError> {
        let kind = self.kind;
        cache.get_or_build(column_path, mode, || {
            let file_path = values_file_path(column_path, kind);
            if !streams.exists(&file_path) {
                debug!("no values file at {}", file_path.display());
                return Ok(None);
            }
            let stream = streams.open_read(&file_path)?;
            let name = file_path.display().to_string();
            let reader = with_primitive!(kind, T => match mode {
                CacheMode::Streaming => {
                    Arc::new(PrimitiveReader::<T>::new(name, stream)) as Arc<dyn ColumnReader>
                }
                CacheMode::FullyCached => {
                    Arc::new(CachedPrimitiveReader::<T>::load(name, stream)?) as Arc<dyn ColumnReader>
                }
            });
            Ok(Some(reader))
        })
    }

    /// Fresh writer for the column at `column_path`; never cached.
    pub fn open_writer(
        &self,
        streams: &dyn StreamProvider,
        column_path: &Path,
    ) -> Result<Box<dyn ColumnWriter>, ColstoreError> {
        let file_path = self.values_file_path(column_path);
        let stream = streams.open_write(&file_path)?;
        let name = file_path.display().to_string();
        Ok(with_primitive!(self.kind, T => {
            Box::new(PrimitiveWriter::<T>::new(name, stream)) as Box<dyn ColumnWriter>
        }))
    }
}
