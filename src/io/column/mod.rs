//! Fixed-width binary column codecs.
//!
//! A column's values file is a flat run of little-endian elements, one per
//! row, with no header: `byte_len = count * width`.

mod cached;
mod reader;
mod writer;

pub use cached::CachedPrimitiveReader;
pub use reader::{PrimitiveReader, READ_PAGE_SIZE};
pub use writer::PrimitiveWriter;

use crate::array::{ColumnArray, Selector};
use crate::cache::CacheMode;
use crate::core::ColstoreError;
use crate::types::PrimitiveKind;

/// Type-erased column reader. One instance may be shared by many table
/// readers through the reader cache.
pub trait ColumnReader: Send + Sync {
    fn kind(&self) -> PrimitiveKind;

    fn mode(&self) -> CacheMode;

    /// Number of values stored in the column.
    fn count(&self) -> usize;

    fn read(&self, selector: &Selector) -> Result<ColumnArray, ColstoreError>;

    /// Release the underlying stream. Idempotent.
    ///
    /// Readers handed out by the reader cache are shared: closing one closes
    /// it for every holder. Only the sole owner of a reader may call this;
    /// shared readers are released by dropping the handle.
    fn close(&self);
}

/// Type-erased sequential column writer.
pub trait ColumnWriter: Send {
    fn kind(&self) -> PrimitiveKind;

    fn append(&mut self, array: &ColumnArray) -> Result<(), ColstoreError>;

    /// Flush and release the underlying stream. Idempotent.
    fn close(&mut self) -> Result<(), ColstoreError>;
}
