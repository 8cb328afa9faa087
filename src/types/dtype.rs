use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ColstoreError;

use super::ValueComparer;

/// Logical column type as recorded in table metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Utf8,
    DateTime,
}

impl DType {
    pub fn is_primitive(&self) -> bool {
        PrimitiveKind::try_from(self).is_ok()
    }
}

/// Closed set of fixed-width kinds the binary codec can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 11] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int8,
        PrimitiveKind::UInt8,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
    ];

    /// Bytes per element on disk.
    pub fn width(self) -> usize {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::Int8 | PrimitiveKind::UInt8 => 1,
            PrimitiveKind::Int16 | PrimitiveKind::UInt16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::UInt32 | PrimitiveKind::Float32 => 4,
            PrimitiveKind::Int64 | PrimitiveKind::UInt64 | PrimitiveKind::Float64 => 8,
        }
    }

    /// Encoding tag used in the values file name, `V.<tag>.bin`.
    pub fn tag(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "b8",
            PrimitiveKind::Int8 => "i8",
            PrimitiveKind::UInt8 => "u8",
            PrimitiveKind::Int16 => "i16",
            PrimitiveKind::UInt16 => "u16",
            PrimitiveKind::Int32 => "i32",
            PrimitiveKind::UInt32 => "u32",
            PrimitiveKind::Int64 => "i64",
            PrimitiveKind::UInt64 => "u64",
            PrimitiveKind::Float32 => "f32",
            PrimitiveKind::Float64 => "f64",
        }
    }

    pub fn dtype(self) -> DType {
        match self {
            PrimitiveKind::Bool => DType::Bool,
            PrimitiveKind::Int8 => DType::Int8,
            PrimitiveKind::UInt8 => DType::UInt8,
            PrimitiveKind::Int16 => DType::Int16,
            PrimitiveKind::UInt16 => DType::UInt16,
            PrimitiveKind::Int32 => DType::Int32,
            PrimitiveKind::UInt32 => DType::UInt32,
            PrimitiveKind::Int64 => DType::Int64,
            PrimitiveKind::UInt64 => DType::UInt64,
            PrimitiveKind::Float32 => DType::Float32,
            PrimitiveKind::Float64 => DType::Float64,
        }
    }

    /// Comparer for sort and filter operators. Every kind in this set is
    /// totally ordered (floats by IEEE-754 total order); kinds without an
    /// order would return `None`.
    pub fn comparer(self) -> Option<ValueComparer> {
        match self {
            PrimitiveKind::Bool
            | PrimitiveKind::Int8
            | PrimitiveKind::UInt8
            | PrimitiveKind::Int16
            | PrimitiveKind::UInt16
            | PrimitiveKind::Int32
            | PrimitiveKind::UInt32
            | PrimitiveKind::Int64
            | PrimitiveKind::UInt64
            | PrimitiveKind::Float32
            | PrimitiveKind::Float64 => Some(ValueComparer::new(self)),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl TryFrom<&DType> for PrimitiveKind {
    type Error = ColstoreError;

    fn try_from(dtype: &DType) -> Result<Self, Self::Error> {
        match dtype {
            DType::Bool => Ok(PrimitiveKind::Bool),
            DType::Int8 => Ok(PrimitiveKind::Int8),
            DType::UInt8 => Ok(PrimitiveKind::UInt8),
            DType::Int16 => Ok(PrimitiveKind::Int16),
            DType::UInt16 => Ok(PrimitiveKind::UInt16),
            DType::Int32 => Ok(PrimitiveKind::Int32),
            DType::UInt32 => Ok(PrimitiveKind::UInt32),
            DType::Int64 => Ok(PrimitiveKind::Int64),
            DType::UInt64 => Ok(PrimitiveKind::UInt64),
            DType::Float32 => Ok(PrimitiveKind::Float32),
            DType::Float64 => Ok(PrimitiveKind::Float64),
            DType::Utf8 | DType::DateTime => Err(ColstoreError::ConfigParsingError(format!(
                "no binary codec for non-primitive type {dtype:?}"
            ))),
        }
    }
}
