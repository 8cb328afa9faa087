pub mod array;
pub mod cache;
pub mod conf;
pub mod core;
pub mod io;
pub mod table;
pub mod types;

#[cfg(feature = "testutil")]
pub mod testutil;
