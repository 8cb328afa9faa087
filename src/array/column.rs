use crate::types::{Primitive, PrimitiveKind};

use super::{ArrayView, Selector};

/// Type-erased column values: one variant per primitive kind.
#[derive(Debug, Clone)]
pub enum ColumnArray {
    Bool(ArrayView<bool>),
    Int8(ArrayView<i8>),
    UInt8(ArrayView<u8>),
    Int16(ArrayView<i16>),
    UInt16(ArrayView<u16>),
    Int32(ArrayView<i32>),
    UInt32(ArrayView<u32>),
    Int64(ArrayView<i64>),
    UInt64(ArrayView<u64>),
    Float32(ArrayView<f32>),
    Float64(ArrayView<f64>),
}

macro_rules! each_view {
    ($array:expr, $view:ident => $body:expr) => {
        match $array {
            ColumnArray::Bool($view) => $body,
            ColumnArray::Int8($view) => $body,
            ColumnArray::UInt8($view) => $body,
            ColumnArray::Int16($view) => $body,
            ColumnArray::UInt16($view) => $body,
            ColumnArray::Int32($view) => $body,
            ColumnArray::UInt32($view) => $body,
            ColumnArray::Int64($view) => $body,
            ColumnArray::UInt64($view) => $body,
            ColumnArray::Float32($view) => $body,
            ColumnArray::Float64($view) => $body,
        }
    };
}

impl ColumnArray {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            ColumnArray::Bool(_) => PrimitiveKind::Bool,
            ColumnArray::Int8(_) => PrimitiveKind::Int8,
            ColumnArray::UInt8(_) => PrimitiveKind::UInt8,
            ColumnArray::Int16(_) => PrimitiveKind::Int16,
            ColumnArray::UInt16(_) => PrimitiveKind::UInt16,
            ColumnArray::Int32(_) => PrimitiveKind::Int32,
            ColumnArray::UInt32(_) => PrimitiveKind::UInt32,
            ColumnArray::Int64(_) => PrimitiveKind::Int64,
            ColumnArray::UInt64(_) => PrimitiveKind::UInt64,
            ColumnArray::Float32(_) => PrimitiveKind::Float32,
            ColumnArray::Float64(_) => PrimitiveKind::Float64,
        }
    }

    pub fn count(&self) -> usize {
        each_view!(self, view => view.count())
    }

    pub fn selector(&self) -> &Selector {
        each_view!(self, view => view.selector())
    }

    /// Typed view when the array holds values of type `T`.
    pub fn as_view<T: Primitive>(&self) -> Option<&ArrayView<T>> {
        T::unwrap_array(self)
    }
}

impl<T: Primitive> From<ArrayView<T>> for ColumnArray {
    fn from(view: ArrayView<T>) -> Self {
        T::wrap_array(view)
    }
}
