use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::array::{ArrayView, ColumnArray, Selector};
use crate::cache::CacheMode;
use crate::core::ColstoreError;
use crate::io::stream::ReadStream;
use crate::types::{Primitive, PrimitiveKind};

use super::ColumnReader;

/// Bytes fetched from the stream per ranged read.
pub const READ_PAGE_SIZE: usize = 64 * 1024;

struct ReaderState<T> {
    stream: Option<Box<dyn ReadStream>>,
    // Destination buffer, grow-only. Reused whenever no returned view still
    // shares it.
    buffer: Arc<Vec<T>>,
    // Page buffer, grow-only, at most READ_PAGE_SIZE bytes.
    page: Vec<u8>,
    last: Option<(Selector, ArrayView<T>)>,
}

/// Streaming reader: fetches the requested rows in 64 KiB pages on every
/// call, remembering only the last result.
pub struct PrimitiveReader<T: Primitive> {
    name: String,
    count: usize,
    state: Mutex<ReaderState<T>>,
}

impl<T: Primitive> PrimitiveReader<T> {
    pub fn new(name: impl Into<String>, stream: Box<dyn ReadStream>) -> Self {
        let name = name.into();
        let len = stream.len() as usize;
        if len % T::WIDTH != 0 {
            warn!(
                "column {} has {} trailing bytes past its last {} value",
                name,
                len % T::WIDTH,
                T::KIND
            );
        }
        let count = len / T::WIDTH;
        debug!("opened {} reader for {} ({} values)", T::KIND, name, count);
        Self {
            name,
            count,
            state: Mutex::new(ReaderState {
                stream: Some(stream),
                buffer: Arc::new(Vec::new()),
                page: Vec::new(),
                last: None,
            }),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn lock(&self) -> MutexGuard<'_, ReaderState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the rows named by `selector`.
    ///
    /// Gather selectors are rejected: the streaming path only reads
    /// contiguous ranges (or the single slot of a broadcast). Asking for the
    /// same selector twice in a row returns the previous view without I/O.
    pub fn read_view(&self, selector: &Selector) -> Result<ArrayView<T>, ColstoreError> {
        if selector.indices().is_some() {
            return Err(ColstoreError::UnsupportedRead(format!(
                "gather read of {} rows from streaming column {}",
                selector.count(),
                self.name
            )));
        }

        let mut state = self.lock();
        let ReaderState {
            stream,
            buffer,
            page,
            last,
        } = &mut *state;

        let stream = stream
            .as_mut()
            .ok_or_else(|| ColstoreError::Closed(format!("column reader {}", self.name)))?;

        if let Some((previous, view)) = last.as_ref() {
            if previous == selector {
                return Ok(view.clone());
            }
        }
        *last = None;

        let (first, end, result) = if selector.is_single_value() {
            let first = selector.start_inclusive();
            let end = if selector.is_empty() { first } else { first + 1 };
            (first, end, Selector::single(selector.count()))
        } else {
            let (first, end) = (selector.start_inclusive(), selector.end_exclusive());
            (first, end, Selector::all(end - first))
        };
        if end > self.count {
            return Err(ColstoreError::OutOfRange(format!(
                "rows {first}..{end} of column {} with {} values",
                self.name, self.count
            )));
        }

        if Arc::get_mut(buffer).is_none() {
            *buffer = Arc::new(Vec::new());
        }
        let values = Arc::make_mut(buffer);
        let len = end - first;
        if values.len() < len {
            values.resize(len, T::default());
        }

        let byte_start = first * T::WIDTH;
        let byte_end = end * T::WIDTH;
        let mut filled = 0;
        let mut pos = byte_start;
        while pos < byte_end {
            let page_end = byte_end.min(pos + READ_PAGE_SIZE);
            let page_len = page_end - pos;
            if page.len() < page_len {
                page.resize(page_len, 0);
            }
            stream.read_at(pos as u64, &mut page[..page_len])?;

            let items = page_len / T::WIDTH;
            T::decode(&page[..page_len], &mut values[filled..filled + items]);
            filled += items;
            pos = page_end;
        }

        let view = ArrayView::from_parts(Arc::clone(buffer), result);
        *last = Some((selector.clone(), view.clone()));
        Ok(view)
    }

    /// Release the stream and buffers. Idempotent.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.stream.take().is_some() {
            debug!("closed {} reader for {}", T::KIND, self.name);
        }
        state.last = None;
        state.buffer = Arc::new(Vec::new());
        state.page = Vec::new();
    }
}

impl<T: Primitive> ColumnReader for PrimitiveReader<T> {
    fn kind(&self) -> PrimitiveKind {
        T::KIND
    }

    fn mode(&self) -> CacheMode {
        CacheMode::Streaming
    }

    fn count(&self) -> usize {
        self.count
    }

    fn read(&self, selector: &Selector) -> Result<ColumnArray, ColstoreError> {
        self.read_view(selector).map(T::wrap_array)
    }

    fn close(&self) {
        PrimitiveReader::close(self)
    }
}
