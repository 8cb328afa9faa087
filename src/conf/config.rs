use std::path::Path;

use crate::{
    conf::{CacheConfig, ScanConfig, StorageConfig},
    core::ColstoreError::{self, ConfigParsingError},
};
use config::Config as CConfig;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "COLSTORE";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, ColstoreError> {
        CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))
    }

    /// Load from an optional TOML file, then apply `COLSTORE_SECTION__KEY`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config, ColstoreError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [storage]
        root = "/var/lib/colstore"

        [cache]
        max_readers = 16

        [scan]
        page_rows = 4096
        "#;
        let conf = Config::from_str(toml);
        assert_eq!(
            conf,
            Ok(Config {
                storage: StorageConfig {
                    root: PathBuf::from("/var/lib/colstore")
                },
                cache: CacheConfig { max_readers: 16 },
                scan: ScanConfig { page_rows: 4096 },
            })
        );
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let conf = Config::from_str("").unwrap();
        assert_eq!(conf, Config::default());
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
        [cache]
        max_entries = 3
        "#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigParsingError(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("colstore.toml");
        std::fs::write(&path, "[scan]\npage_rows = 10\n").unwrap();

        let conf = Config::load(Some(&path)).unwrap();
        assert_eq!(conf.scan.page_rows, 10);
        assert_eq!(conf.cache, CacheConfig::default());
    }

    #[test]
    fn load_missing_file_fails() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigParsingError(_)));
    }
}
