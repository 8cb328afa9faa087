use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Upper bound on live column readers kept by the reader cache.
    /// Zero disables eviction.
    #[serde(default = "CacheConfig::default_max_readers")]
    pub max_readers: usize,
}

impl CacheConfig {
    fn default_max_readers() -> usize {
        1024
    }

    pub fn unbounded() -> Self {
        Self { max_readers: 0 }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_readers: Self::default_max_readers(),
        }
    }
}
