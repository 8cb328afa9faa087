//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::array::{ArrayView, ColumnArray};
use crate::io::stream::StreamProvider;
use crate::table::{ColumnSchema, TableMetadata, TableWriter};
use crate::types::{Primitive, PrimitiveKind, with_primitive};

/// RNG seed for deterministic random columns.
pub const RNG_SEED: u64 = 42;

/// Deterministic value for row `i`: the row index cast to the type, and
/// `true` on odd rows for booleans.
pub trait FromRowIndex: Primitive {
    fn from_row_index(i: usize) -> Self;
}

macro_rules! from_row_index_cast {
    ($($ty:ty),*) => {
        $(impl FromRowIndex for $ty {
            fn from_row_index(i: usize) -> Self {
                i as $ty
            }
        })*
    };
}

from_row_index_cast!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl FromRowIndex for bool {
    fn from_row_index(i: usize) -> Self {
        i % 2 == 1
    }
}

pub fn sequence<T: FromRowIndex>(rows: usize) -> Vec<T> {
    (0..rows).map(T::from_row_index).collect()
}

/// Row-index values for any primitive kind.
pub fn sequence_array(kind: PrimitiveKind, rows: usize) -> ColumnArray {
    with_primitive!(kind, T => ArrayView::all(sequence::<T>(rows)).into())
}

/// Random slot indices into an array of `len` values.
pub fn random_indices(count: usize, len: usize) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    (0..count).map(|_| rng.gen_range(0..len)).collect()
}

/// Column name used for `kind` in [`write_sequence_table`].
pub fn column_name(kind: PrimitiveKind) -> String {
    format!("col_{}", kind.tag())
}

/// Write a table with one row-index column per kind, `rows` rows, appended
/// in batches of at most `batch_rows`.
pub fn write_sequence_table(
    streams: Arc<dyn StreamProvider>,
    table_path: &Path,
    kinds: &[PrimitiveKind],
    rows: usize,
    batch_rows: usize,
) -> TableMetadata {
    let columns = kinds
        .iter()
        .map(|k| ColumnSchema::new(column_name(*k), k.dtype()))
        .collect();
    let mut writer = TableWriter::create(streams, table_path, columns, "generated").unwrap();

    let batch_rows = batch_rows.max(1);
    let full: Vec<ColumnArray> = kinds.iter().map(|k| sequence_array(*k, rows)).collect();
    let mut start = 0;
    while start < rows {
        let end = rows.min(start + batch_rows);
        let batch: Vec<ColumnArray> = full.iter().map(|a| slice_array(a, start, end)).collect();
        writer.append(&batch).unwrap();
        start = end;
    }
    writer.finish().unwrap()
}

fn slice_array(array: &ColumnArray, start: usize, end: usize) -> ColumnArray {
    with_primitive!(array.kind(), T => {
        let view = array.as_view::<T>().unwrap();
        let selector = view.selector().slice(start, end).unwrap();
        ArrayView::with_selector(view.shared_values().clone(), selector)
            .unwrap()
            .into()
    })
}

/// A local stream provider rooted in a fresh temporary directory. Keep the
/// returned guard alive for as long as the provider is used.
pub fn temp_local_provider() -> (tempfile::TempDir, crate::io::stream::LocalStreamProvider) {
    let dir = tempfile::tempdir().unwrap();
    let streams = crate::io::stream::LocalStreamProvider::new(dir.path());
    (dir, streams)
}
