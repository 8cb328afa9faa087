mod comparer;
mod dtype;
mod primitive;
mod provider;

pub use comparer::ValueComparer;
pub use dtype::{DType, PrimitiveKind};
pub use primitive::Primitive;
pub use provider::{TypeProvider, VALUES_FILE_EXTENSION, values_file_path};

/// Expand `$body` once per primitive kind with `$t` bound to its Rust type.
macro_rules! with_primitive {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            $crate::types::PrimitiveKind::Bool => {
                type $t = bool;
                $body
            }
            $crate::types::PrimitiveKind::Int8 => {
                type $t = i8;
                $body
            }
            $crate::types::PrimitiveKind::UInt8 => {
                type $t = u8;
                $body
            }
            $crate::types::PrimitiveKind::Int16 => {
                type $t = i16;
                $body
            }
            $crate::types::PrimitiveKind::UInt16 => {
                type $t = u16;
                $body
            }
            $crate::types::PrimitiveKind::Int32 => {
                type $t = i32;
                $body
            }
            $crate::types::PrimitiveKind::UInt32 => {
                type $t = u32;
                $body
            }
            $crate::types::PrimitiveKind::Int64 => {
                type $t = i64;
                $body
            }
            $crate::types::PrimitiveKind::UInt64 => {
                type $t = u64;
                $body
            }
            $crate::types::PrimitiveKind::Float32 => {
                type $t = f32;
                $body
            }
            $crate::types::PrimitiveKind::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}

pub(crate) use with_primitive;
