//! Byte-stream provider boundary.
//!
//! Column codecs never touch files directly: they open streams through a
//! [`StreamProvider`], which resolves paths, reports existence and hands out
//! ranged readers and sequential writers.

mod heap;
mod local;

pub use heap::HeapStreamProvider;
pub use local::LocalStreamProvider;

use std::io::Write;
use std::path::Path;

use crate::core::ColstoreError;

/// Random-access reader over one stored file.
pub trait ReadStream: Send {
    /// Total byte length of the file.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), ColstoreError>;
}

/// Sequential writer; bytes land in file order.
pub type WriteStream = Box<dyn Write + Send>;

pub trait StreamProvider: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn open_read(&self, path: &Path) -> Result<Box<dyn ReadStream>, ColstoreError>;

    /// Create (or truncate) the file at `path`, creating parent directories.
    fn open_write(&self, path: &Path) -> Result<WriteStream, ColstoreError>;
}
