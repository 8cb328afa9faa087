use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::ColstoreError;
use crate::io::stream::StreamProvider;
use crate::types::DType;

pub const TABLE_JSON: &str = "table.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: DType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, dtype: DType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Schema handle of one table directory: ordered columns, row count and the
/// query that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableMetadata {
    #[serde(default)]
    pub query: String,
    pub row_count: usize,
    pub columns: Vec<ColumnSchema>,
}

impl TableMetadata {
    pub fn read(streams: &dyn StreamProvider, table_path: &Path) -> Result<Self, ColstoreError> {
        let path = table_path.join(TABLE_JSON);
        if !streams.exists(&path) {
            return Err(ColstoreError::MetadataError(format!(
                "no {} in {}",
                TABLE_JSON,
                table_path.display()
            )));
        }

        let mut stream = streams.open_read(&path)?;
        let mut data = vec![0u8; stream.len() as usize];
        stream.read_at(0, &mut data)?;

        serde_json::from_slice(&data).map_err(|e| {
            ColstoreError::MetadataError(format!("parsing {}: {}", path.display(), e))
        })
    }

    pub fn write(&self, streams: &dyn StreamProvider, table_path: &Path) -> Result<(), ColstoreError> {
        let path = table_path.join(TABLE_JSON);
        let data = serde_json::to_vec_pretty(self)?;
        let mut stream = streams.open_write(&path)?;
        stream
            .write_all(&data)
            .and_then(|_| stream.flush())
            .map_err(|e| ColstoreError::IoError(format!("writing {}: {}", path.display(), e)))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
