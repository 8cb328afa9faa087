use std::sync::Arc;

use crate::core::ColstoreError;

/// Logical view into a conceptual array.
///
/// Exactly one mode is active:
/// - range: positions `start_inclusive..end_exclusive`
/// - gather: `indices[i]` for each logical position `i`
/// - broadcast: every position maps to slot `start_inclusive`
///
/// The default selector is the empty range at position 0, which is also the
/// starting point of a forward page scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    start_inclusive: usize,
    end_exclusive: usize,
    indices: Option<Arc<[usize]>>,
    is_single_value: bool,
    count: usize,
}

impl Selector {
    /// Full range `[0, n)`.
    pub fn all(n: usize) -> Self {
        Self::range(0, n)
    }

    /// Empty range positioned at `position`.
    pub fn empty_at(position: usize) -> Self {
        Self::range(position, position)
    }

    /// Explicit gather over the given physical slots, in order.
    pub fn gather(indices: impl Into<Arc<[usize]>>) -> Self {
        let indices: Arc<[usize]> = indices.into();
        let count = indices.len();
        Self {
            start_inclusive: 0,
            end_exclusive: count,
            indices: Some(indices),
            is_single_value: false,
            count,
        }
    }

    /// Broadcast of physical slot 0, repeated `count` times.
    pub fn single(count: usize) -> Self {
        Self {
            start_inclusive: 0,
            end_exclusive: 1,
            indices: None,
            is_single_value: true,
            count,
        }
    }

    pub(crate) fn range(start_inclusive: usize, end_exclusive: usize) -> Self {
        debug_assert!(start_inclusive <= end_exclusive);
        Self {
            start_inclusive,
            end_exclusive,
            indices: None,
            is_single_value: false,
            count: end_exclusive - start_inclusive,
        }
    }

    pub fn start_inclusive(&self) -> usize {
        self.start_inclusive
    }

    pub fn end_exclusive(&self) -> usize {
        self.end_exclusive
    }

    pub fn indices(&self) -> Option<&[usize]> {
        self.indices.as_deref()
    }

    pub fn is_single_value(&self) -> bool {
        self.is_single_value
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Plain range: neither a gather nor a broadcast.
    pub fn is_contiguous(&self) -> bool {
        self.indices.is_none() && !self.is_single_value
    }

    /// Physical slot for logical position `i`.
    ///
    /// Panics when `i` is past the end of a gather.
    pub fn index(&self, i: usize) -> usize {
        match &self.indices {
            Some(indices) => indices[i],
            None if self.is_single_value => self.start_inclusive,
            None => self.start_inclusive + i,
        }
    }

    /// One past the highest physical slot this selector can touch.
    pub fn physical_extent(&self) -> usize {
        if self.count == 0 {
            return 0;
        }
        match &self.indices {
            Some(indices) => indices.iter().max().map_or(0, |max| max + 1),
            None => self.end_exclusive,
        }
    }

    /// Logical positions `[a, b)` of this selector as a new selector.
    pub fn slice(&self, a: usize, b: usize) -> Result<Selector, ColstoreError> {
        if a > b || b > self.count {
            return Err(ColstoreError::OutOfRange(format!(
                "slice {a}..{b} outside selector of {} rows",
                self.count
            )));
        }

        if let Some(indices) = &self.indices {
            return Ok(Selector::gather(&indices[a..b]));
        }
        if self.is_single_value {
            return Ok(Selector {
                count: b - a,
                ..self.clone()
            });
        }
        Ok(Selector::range(
            self.start_inclusive + a,
            self.start_inclusive + b,
        ))
    }

    /// Next block of at most `desired` rows following this selector's end.
    ///
    /// Returns an empty selector at `total` once the end has been reached.
    pub fn next_page(&self, total: usize, desired: usize) -> Selector {
        let start = self.end_exclusive.min(total);
        let end = start.saturating_add(desired).min(total);
        Selector::range(start, end)
    }
}
