mod reader_cache;

pub use reader_cache::ReaderCache;

/// How a column reader holds its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheMode {
    /// Pages are read from the stream on demand.
    Streaming,
    /// The whole column is materialized in memory.
    FullyCached,
}

impl CacheMode {
    pub fn from_require_cached(require_cached: bool) -> Self {
        if require_cached {
            CacheMode::FullyCached
        } else {
            CacheMode::Streaming
        }
    }

    /// Whether a reader built in this mode can serve a `required` request.
    pub fn satisfies(self, required: CacheMode) -> bool {
        self == CacheMode::FullyCached || required == CacheMode::Streaming
    }
}
