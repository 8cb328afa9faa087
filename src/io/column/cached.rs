use std::sync::Arc;

use log::debug;

use crate::array::{ArrayView, ColumnArray, Selector};
use crate::cache::CacheMode;
use crate::core::ColstoreError;
use crate::io::stream::ReadStream;
use crate::types::{Primitive, PrimitiveKind};

use super::{ColumnReader, PrimitiveReader};

/// Fully cached reader: the whole column is decoded into memory once, at
/// construction, and the stream is released. Every read afterwards is a
/// zero-copy view, so gather and broadcast selectors are served too.
pub struct CachedPrimitiveReader<T: Primitive> {
    name: String,
    values: Arc<Vec<T>>,
}

impl<T: Primitive> CachedPrimitiveReader<T> {
    pub fn load(name: impl Into<String>, stream: Box<dyn ReadStream>) -> Result<Self, ColstoreError> {
        let name = name.into();
        let streaming = PrimitiveReader::<T>::new(name.clone(), stream);
        let count = streaming.count();
        let view = streaming.read_view(&Selector::all(count))?;
        streaming.close();

        let values = Arc::clone(view.shared_values());
        debug!("cached {} values of {} column {}", count, T::KIND, name);
        Ok(Self { name, values })
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn read_view(&self, selector: &Selector) -> Result<ArrayView<T>, ColstoreError> {
        ArrayView::with_selector(Arc::clone(&self.values), selector.clone()).map_err(|_| {
            ColstoreError::OutOfRange(format!(
                "selector reaches slot {} of cached column {} with {} values",
                selector.physical_extent().saturating_sub(1),
                self.name,
                self.values.len()
            ))
        })
    }
}

impl<T: Primitive> ColumnReader for CachedPrimitiveReader<T> {
    fn kind(&self) -> PrimitiveKind {
        T::KIND
    }

    fn mode(&self) -> CacheMode {
        CacheMode::FullyCached
    }

    fn count(&self) -> usize {
        self.values.len()
    }

    fn read(&self, selector: &Selector) -> Result<ColumnArray, ColstoreError> {
        self.read_view(selector).map(T::wrap_array)
    }

    // The stream was released at load time; the values live as long as the
    // reader and any view handed out.
    fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::stream::{HeapStreamProvider, StreamProvider};
    use std::path::Path;

    fn cached_over(values: &[u64]) -> (HeapStreamProvider, CachedPrimitiveReader<u64>) {
        let provider = HeapStreamProvider::new();
        let mut bytes = vec![0u8; values.len() * 8];
        u64::encode(values, &mut bytes);
        provider.put("c", bytes);
        let stream = provider.open_read(Path::new("c")).unwrap();
        let reader = CachedPrimitiveReader::load("c", stream).unwrap();
        (provider, reader)
    }

    #[test]
    fn test_reads_without_io_after_load() {
        let (provider, reader) = cached_over(&[4, 5, 6, 7]);
        let loads = provider.read_count();
        assert_eq!(loads, 1);

        let view = reader.read_view(&Selector::all(4).slice(1, 3).unwrap()).unwrap();
        assert_eq!(view.to_vec(), vec![5, 6]);
        assert_eq!(provider.read_count(), loads);
    }

    #[test]
    fn test_gather_supported() {
        let (_p, reader) = cached_over(&[10, 20, 30, 40, 50]);
        let view = reader.read_view(&Selector::gather(vec![4, 0, 2])).unwrap();
        assert_eq!(view.to_vec(), vec![50, 10, 30]);
    }

    #[test]
    fn test_out_of_range() {
        let (_p, reader) = cached_over(&[1, 2]);
        let err = reader.read_view(&Selector::gather(vec![2])).unwrap_err();
        assert!(matches!(err, ColstoreError::OutOfRange(_)));
    }

    #[test]
    fn test_empty_column() {
        let (provider, reader) = cached_over(&[]);
        assert_eq!(reader.count(), 0);
        assert_eq!(provider.read_count(), 0);
        assert!(reader.read_view(&Selector::all(0)).unwrap().is_empty());
    }
}
