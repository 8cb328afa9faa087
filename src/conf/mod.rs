mod cache;
mod config;
mod scan;
mod storage;

pub use cache::CacheConfig;
pub use config::Config;
pub use scan::ScanConfig;
pub use storage::StorageConfig;
