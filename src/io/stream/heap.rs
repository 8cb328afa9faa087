use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::ColstoreError;

use super::{ReadStream, StreamProvider, WriteStream};

#[derive(Default)]
struct HeapFiles {
    files: RwLock<HashMap<PathBuf, Arc<Vec<u8>>>>,
    reads: AtomicUsize,
}

impl HeapFiles {
    fn publish(&self, path: &Path, data: Vec<u8>) {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(path.to_path_buf(), Arc::new(data));
    }
}

/// In-memory provider backed by heap-allocated byte vectors.
///
/// Every `read_at` call on a stream it opened bumps a shared counter, which
/// makes physical reads observable in tests. Written bytes become visible to
/// readers on `flush` and when the writer is dropped.
#[derive(Clone, Default)]
pub struct HeapStreamProvider {
    inner: Arc<HeapFiles>,
}

impl HeapStreamProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` at `path`, replacing any previous file.
    pub fn put(&self, path: impl AsRef<Path>, data: Vec<u8>) {
        self.inner.publish(path.as_ref(), data);
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let files = self.inner.files.read().unwrap_or_else(PoisonError::into_inner);
        files.get(path.as_ref()).map(|data| data.as_ref().clone())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let files = self.inner.files.read().unwrap_or_else(PoisonError::into_inner);
        let mut paths: Vec<PathBuf> = files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Number of ranged reads served since creation or the last reset.
    pub fn read_count(&self) -> usize {
        self.inner.reads.load(Ordering::Relaxed)
    }

    pub fn reset_read_count(&self) {
        self.inner.reads.store(0, Ordering::Relaxed);
    }
}

impl StreamProvider for HeapStreamProvider {
    fn exists(&self, path: &Path) -> bool {
        let files = self.inner.files.read().unwrap_or_else(PoisonError::into_inner);
        files.contains_key(path)
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn ReadStream>, ColstoreError> {
        let files = self.inner.files.read().unwrap_or_else(PoisonError::into_inner);
        let data = files
            .get(path)
            .ok_or_else(|| ColstoreError::IoError(format!("file not found: {}", path.display())))?;
        Ok(Box::new(HeapReadStream {
            data: Arc::clone(data),
            files: Arc::clone(&self.inner),
        }))
    }

    fn open_write(&self, path: &Path) -> Result<WriteStream, ColstoreError> {
        self.inner.publish(path, Vec::new());
        Ok(Box::new(HeapWriteStream {
            path: path.to_path_buf(),
            buf: Vec::new(),
            files: Arc::clone(&self.inner),
        }))
    }
}

struct HeapReadStream {
    data: Arc<Vec<u8>>,
    files: Arc<HeapFiles>,
}

impl ReadStream for HeapReadStream {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), ColstoreError> {
        self.files.reads.fetch_add(1, Ordering::Relaxed);
        let start = offset as usize;
        let end = start + buf.len();
        let src = self.data.get(start..end).ok_or_else(|| {
            ColstoreError::IoError(format!(
                "read out of bounds: offset {start}, len {}, file len {}",
                buf.len(),
                self.data.len()
            ))
        })?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

struct HeapWriteStream {
    path: PathBuf,
    buf: Vec<u8>,
    files: Arc<HeapFiles>,
}

impl Write for HeapWriteStream {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.files.publish(&self.path, self.buf.clone());
        Ok(())
    }
}

impl Drop for HeapWriteStream {
    fn drop(&mut self) {
        self.files.publish(&self.path, std::mem::take(&mut self.buf));
    }
}
