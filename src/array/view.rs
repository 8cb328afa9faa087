use std::sync::Arc;

use crate::core::ColstoreError;

use super::Selector;

/// Typed backing buffer plus the [`Selector`] describing which of its slots
/// are visible. Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct ArrayView<T> {
    values: Arc<Vec<T>>,
    selector: Selector,
}

impl<T> ArrayView<T> {
    /// Every value of `values`, in order.
    pub fn all(values: Vec<T>) -> Self {
        let selector = Selector::all(values.len());
        Self {
            values: Arc::new(values),
            selector,
        }
    }

    /// Values of `values` at the given physical slots, in order.
    pub fn gather(values: Vec<T>, indices: Vec<usize>) -> Result<Self, ColstoreError> {
        Self::with_selector(Arc::new(values), Selector::gather(indices))
    }

    /// `value` repeated `count` times.
    pub fn single(value: T, count: usize) -> Self {
        Self {
            values: Arc::new(vec![value]),
            selector: Selector::single(count),
        }
    }

    /// View over a shared buffer; fails when the selector reaches past it.
    pub fn with_selector(values: Arc<Vec<T>>, selector: Selector) -> Result<Self, ColstoreError> {
        let extent = selector.physical_extent();
        if extent > values.len() {
            return Err(ColstoreError::OutOfRange(format!(
                "selector reaches slot {} of a {}-value buffer",
                extent - 1,
                values.len()
            )));
        }
        Ok(Self { values, selector })
    }

    /// Unchecked variant of [`ArrayView::with_selector`] for callers that
    /// sized the buffer themselves.
    pub(crate) fn from_parts(values: Arc<Vec<T>>, selector: Selector) -> Self {
        debug_assert!(selector.physical_extent() <= values.len());
        Self { values, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn count(&self) -> usize {
        self.selector.count()
    }

    pub fn is_empty(&self) -> bool {
        self.selector.is_empty()
    }

    /// Physical slot of logical position `i`.
    pub fn index(&self, i: usize) -> usize {
        self.selector.index(i)
    }

    /// The whole backing buffer, including slots outside the selector.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn shared_values(&self) -> &Arc<Vec<T>> {
        &self.values
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.count() {
            return None;
        }
        self.values.get(self.index(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.count()).map(move |i| &self.values[self.index(i)])
    }

    /// Same buffer and same selector.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values) && self.selector == other.selector
    }
}

impl<T: Clone> ArrayView<T> {
    /// Materialize the logical sequence.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_view() {
        let view = ArrayView::all(vec![1, 2, 3]);
        assert_eq!(view.count(), 3);
        assert_eq!(view.to_vec(), vec![1, 2, 3]);
        assert_eq!(view.get(3), None);
    }

    #[test]
    fn test_gather_view() {
        let view = ArrayView::gather(vec![10, 20, 30, 40, 50], vec![2, 0, 4]).unwrap();
        assert_eq!(view.to_vec(), vec![30, 10, 50]);
        assert_eq!(view.index(1), 0);
    }

    #[test]
    fn test_gather_view_out_of_bounds() {
        let err = ArrayView::gather(vec![1, 2], vec![0, 2]).unwrap_err();
        assert!(matches!(err, ColstoreError::OutOfRange(_)));
    }

    #[test]
    fn test_single_view() {
        let view = ArrayView::single(7u8, 4);
        assert_eq!(view.to_vec(), vec![7, 7, 7, 7]);
        assert_eq!(view.values().len(), 1);
    }

    #[test]
    fn test_with_selector_slice() {
        let values = Arc::new(vec![0, 1, 2, 3, 4, 5]);
        let selector = Selector::all(6).slice(2, 5).unwrap();
        let view = ArrayView::with_selector(values, selector).unwrap();
        assert_eq!(view.to_vec(), vec![2, 3, 4]);
        assert_eq!(view.get(0), Some(&2));
    }

    #[test]
    fn test_clone_shares_buffer() {
        let view = ArrayView::all(vec![1.0f32, 2.0]);
        let other = view.clone();
        assert!(view.ptr_eq(&other));
        assert!(!view.ptr_eq(&ArrayView::all(vec![1.0f32, 2.0])));
    }
}
