mod metadata;
mod reader;
mod writer;

pub use metadata::{ColumnSchema, TABLE_JSON, TableMetadata};
pub use reader::TableReader;
pub use writer::TableWriter;
