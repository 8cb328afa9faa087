use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    #[serde(default = "ScanConfig::default_page_rows")]
    pub page_rows: usize,
}

impl ScanConfig {
    fn default_page_rows() -> usize {
        10_240
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_rows: Self::default_page_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_default() {
        assert_eq!(ScanConfig::default().page_rows, 10_240);
    }
}
