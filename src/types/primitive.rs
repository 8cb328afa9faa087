use std::cmp::Ordering;
use std::fmt::Debug;

use crate::array::{ArrayView, ColumnArray};

use super::PrimitiveKind;

/// Rust type stored as one fixed-width little-endian element per value.
pub trait Primitive: Copy + Default + Debug + Send + Sync + 'static {
    const KIND: PrimitiveKind;
    const WIDTH: usize;

    /// Encode `values` into `out`; `out.len()` must be `values.len() * WIDTH`.
    fn encode(values: &[Self], out: &mut [u8]);

    /// Decode `bytes` into `out`; `bytes.len()` must be `out.len() * WIDTH`.
    fn decode(bytes: &[u8], out: &mut [Self]);

    fn compare(&self, other: &Self) -> Ordering;

    fn wrap_array(view: ArrayView<Self>) -> ColumnArray;

    fn unwrap_array(array: &ColumnArray) -> Option<&ArrayView<Self>>;
}

macro_rules! numeric_primitive {
    ($ty:ty, $kind:ident, $cmp:ident) => {
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn encode(values: &[Self], out: &mut [u8]) {
                if cfg!(target_endian = "little") {
                    out.copy_from_slice(bytemuck::cast_slice(values));
                } else {
                    for (chunk, value) in out.chunks_exact_mut(Self::WIDTH).zip(values) {
                        chunk.copy_from_slice(&value.to_le_bytes());
                    }
                }
            }

            fn decode(bytes: &[u8], out: &mut [Self]) {
                if cfg!(target_endian = "little") {
                    bytemuck::cast_slice_mut::<$ty, u8>(out).copy_from_slice(bytes);
                } else {
                    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(Self::WIDTH)) {
                        let mut le = [0u8; std::mem::size_of::<$ty>()];
                        le.copy_from_slice(chunk);
                        *value = <$ty>::from_le_bytes(le);
                    }
                }
            }

            fn compare(&self, other: &Self) -> Ordering {
                <$ty>::$cmp(self, other)
            }

            fn wrap_array(view: ArrayView<Self>) -> ColumnArray {
                ColumnArray::$kind(view)
            }

            fn unwrap_array(array: &ColumnArray) -> Option<&ArrayView<Self>> {
                match array {
                    ColumnArray::$kind(view) => Some(view),
                    _ => None,
                }
            }
        }
    };
}

numeric_primitive!(i8, Int8, cmp);
numeric_primitive!(u8, UInt8, cmp);
numeric_primitive!(i16, Int16, cmp);
numeric_primitive!(u16, UInt16, cmp);
numeric_primitive!(i32, Int32, cmp);
numeric_primitive!(u32, UInt32, cmp);
numeric_primitive!(i64, Int64, cmp);
numeric_primitive!(u64, UInt64, cmp);
numeric_primitive!(f32, Float32, total_cmp);
numeric_primitive!(f64, Float64, total_cmp);

// One byte per value, 0 or 1. Any non-zero byte reads back as true.
impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;
    const WIDTH: usize = 1;

    fn encode(values: &[Self], out: &mut [u8]) {
        for (byte, value) in out.iter_mut().zip(values) {
            *byte = u8::from(*value);
        }
    }

    fn decode(bytes: &[u8], out: &mut [Self]) {
        for (value, byte) in out.iter_mut().zip(bytes) {
            *value = *byte != 0;
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn wrap_array(view: ArrayView<Self>) -> ColumnArray {
        ColumnArray::Bool(view)
    }

    fn unwrap_array(array: &ColumnArray) -> Option<&ArrayView<Self>> {
        match array {
            ColumnArray::Bool(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_match_kinds() {
        assert_eq!(<bool as Primitive>::WIDTH, PrimitiveKind::Bool.width());
        assert_eq!(<i16 as Primitive>::WIDTH, PrimitiveKind::Int16.width());
        assert_eq!(<u32 as Primitive>::WIDTH, PrimitiveKind::UInt32.width());
        assert_eq!(<f64 as Primitive>::WIDTH, PrimitiveKind::Float64.width());
    }

    #[test]
    fn test_encode_is_little_endian() {
        let mut out = [0u8; 8];
        i32::encode(&[1, -2], &mut out);
        assert_eq!(out, [1, 0, 0, 0, 0xFE, 0xFF, 0xFF, 0xFF]);

        let mut decoded = [0i32; 2];
        i32::decode(&out, &mut decoded);
        assert_eq!(decoded, [1, -2]);
    }

    #[test]
    fn test_bool_encoding() {
        let mut out = [9u8; 3];
        bool::encode(&[true, false, true], &mut out);
        assert_eq!(out, [1, 0, 1]);

        let mut decoded = [false; 3];
        bool::decode(&[0, 2, 1], &mut decoded);
        assert_eq!(decoded, [false, true, true]);
    }

    #[test]
    fn test_float_total_order() {
        assert_eq!((-0.0f64).compare(&0.0), Ordering::Less);
        assert_eq!(f32::NAN.compare(&f32::INFINITY), Ordering::Greater);
        assert_eq!(3u16.compare(&3), Ordering::Equal);
    }
}
