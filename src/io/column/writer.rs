use std::io::Write;
use std::marker::PhantomData;

use log::{debug, warn};

use crate::array::{ArrayView, ColumnArray};
use crate::core::ColstoreError;
use crate::io::stream::WriteStream;
use crate::types::{Primitive, PrimitiveKind};

use super::ColumnWriter;

/// Appends views to one column's values file, in call order.
pub struct PrimitiveWriter<T: Primitive> {
    name: String,
    stream: Option<WriteStream>,
    // Grow-only scratch for one encoded append.
    scratch: Vec<u8>,
    written: usize,
    _values: PhantomData<T>,
}

impl<T: Primitive> PrimitiveWriter<T> {
    pub fn new(name: impl Into<String>, stream: WriteStream) -> Self {
        Self {
            name: name.into(),
            stream: Some(stream),
            scratch: Vec::new(),
            written: 0,
            _values: PhantomData,
        }
    }

    /// Values appended so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn append_view(&mut self, view: &ArrayView<T>) -> Result<(), ColstoreError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ColstoreError::Closed(format!("column writer {}", self.name)))?;

        let count = view.count();
        let byte_len = count * T::WIDTH;
        if self.scratch.len() < byte_len {
            self.scratch.resize(byte_len, 0);
        }
        let scratch = &mut self.scratch[..byte_len];

        let selector = view.selector();
        if selector.is_contiguous() {
            let start = selector.start_inclusive();
            T::encode(&view.values()[start..start + count], scratch);
        } else {
            let values = view.values();
            for (i, slot) in scratch.chunks_exact_mut(T::WIDTH).enumerate() {
                T::encode(std::slice::from_ref(&values[view.index(i)]), slot);
            }
        }

        stream.write_all(scratch).map_err(|e| {
            ColstoreError::IoError(format!("writing {} values to {}: {}", count, self.name, e))
        })?;
        self.written += count;
        Ok(())
    }

    /// Flush and release the stream. Idempotent.
    pub fn close(&mut self) -> Result<(), ColstoreError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        stream
            .flush()
            .map_err(|e| ColstoreError::IoError(format!("flushing {}: {}", self.name, e)))?;
        debug!(
            "closed {} writer for {} ({} values)",
            T::KIND,
            self.name,
            self.written
        );
        Ok(())
    }
}

impl<T: Primitive> ColumnWriter for PrimitiveWriter<T> {
    fn kind(&self) -> PrimitiveKind {
        T::KIND
    }

    fn append(&mut self, array: &ColumnArray) -> Result<(), ColstoreError> {
        let view = T::unwrap_array(array).ok_or_else(|| {
            ColstoreError::TypeMismatch(format!(
                "cannot append {} values to {} column {}",
                array.kind(),
                T::KIND,
                self.name
            ))
        })?;
        self.append_view(view)
    }

    fn close(&mut self) -> Result<(), ColstoreError> {
        PrimitiveWriter::close(self)
    }
}

impl<T: Primitive> Drop for PrimitiveWriter<T> {
    fn drop(&mut self) {
        if let Err(e) = PrimitiveWriter::close(self) {
            warn!("dropping column writer {}: {}", self.name, e);
        }
    }
}
