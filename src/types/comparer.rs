use std::cmp::Ordering;

use crate::array::{ColumnArray, Selector};
use crate::core::ColstoreError;

use super::{Primitive, PrimitiveKind, with_primitive};

/// Orders values of one primitive kind across column arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueComparer {
    kind: PrimitiveKind,
}

impl ValueComparer {
    pub(super) fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Compare logical position `i` of `left` with position `j` of `right`.
    pub fn compare(
        &self,
        left: &ColumnArray,
        i: usize,
        right: &ColumnArray,
        j: usize,
    ) -> Result<Ordering, ColstoreError> {
        with_primitive!(self.kind, T => {
            let a = value_at::<T>(self.kind, left, i)?;
            let b = value_at::<T>(self.kind, right, j)?;
            Ok(a.compare(&b))
        })
    }

    /// Stable ascending order of `array` as a gather selector over its
    /// backing buffer, ready to be written out with a column writer.
    pub fn sort_indices(&self, array: &ColumnArray) -> Result<Selector, ColstoreError> {
        with_primitive!(self.kind, T => {
            let view = typed::<T>(self.kind, array)?;
            let values = view.values();
            let mut slots: Vec<usize> = (0..view.count()).map(|i| view.index(i)).collect();
            slots.sort_by(|&a, &b| values[a].compare(&values[b]));
            Ok(Selector::gather(slots))
        })
    }
}

fn typed<T: Primitive>(
    kind: PrimitiveKind,
    array: &ColumnArray,
) -> Result<&crate::array::ArrayView<T>, ColstoreError> {
    T::unwrap_array(array).ok_or_else(|| {
        ColstoreError::TypeMismatch(format!(
            "{kind} comparer given a {} column",
            array.kind()
        ))
    })
}

fn value_at<T: Primitive>(
    kind: PrimitiveKind,
    array: &ColumnArray,
    i: usize,
) -> Result<T, ColstoreError> {
    typed::<T>(kind, array)?.get(i).copied().ok_or_else(|| {
        ColstoreError::OutOfRange(format!(
            "position {i} outside array of {} rows",
            array.count()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayView;

    #[test]
    fn test_compare_across_arrays() {
        let comparer = PrimitiveKind::Int64.comparer().unwrap();
        let left = ColumnArray::from(ArrayView::all(vec![5i64, 1]));
        let right = ColumnArray::from(ArrayView::single(3i64, 2));
        assert_eq!(comparer.compare(&left, 0, &right, 1).unwrap(), Ordering::Greater);
        assert_eq!(comparer.compare(&left, 1, &right, 0).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_compare_wrong_kind() {
        let comparer = PrimitiveKind::Float32.comparer().unwrap();
        let array = ColumnArray::from(ArrayView::all(vec![1u8]));
        let err = comparer.compare(&array, 0, &array, 0).unwrap_err();
        assert!(matches!(err, ColstoreError::TypeMismatch(_)));
    }

    #[test]
    fn test_compare_out_of_range() {
        let comparer = PrimitiveKind::UInt8.comparer().unwrap();
        let array = ColumnArray::from(ArrayView::all(vec![1u8]));
        let err = comparer.compare(&array, 0, &array, 1).unwrap_err();
        assert!(matches!(err, ColstoreError::OutOfRange(_)));
    }

    #[test]
    fn test_sort_indices_through_gather() {
        let comparer = PrimitiveKind::Float64.comparer().unwrap();
        let view = ArrayView::gather(vec![9.0, 3.0, 7.0, 1.0], vec![0, 2, 3]).unwrap();
        let array = ColumnArray::from(view.clone());

        let order = comparer.sort_indices(&array).unwrap();
        assert_eq!(order.indices(), Some(&[3, 2, 0][..]));

        let sorted = ArrayView::with_selector(view.shared_values().clone(), order).unwrap();
        assert_eq!(sorted.to_vec(), vec![1.0, 7.0, 9.0]);
    }
}
