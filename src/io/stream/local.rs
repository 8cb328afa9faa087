use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;

use crate::core::ColstoreError;

use super::{ReadStream, StreamProvider, WriteStream};

/// Filesystem provider. Relative paths resolve under `root`.
pub struct LocalStreamProvider {
    root: PathBuf,
}

impl LocalStreamProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl StreamProvider for LocalStreamProvider {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn ReadStream>, ColstoreError> {
        let full = self.resolve(path);
        let file = File::open(&full)
            .map_err(|e| ColstoreError::IoError(format!("opening {}: {}", full.display(), e)))?;
        let len = file
            .metadata()
            .map_err(|e| {
                ColstoreError::IoError(format!("reading metadata for {}: {}", full.display(), e))
            })?
            .len();
        debug!("opened {} for reading ({} bytes)", full.display(), len);
        Ok(Box::new(LocalReadStream {
            path: full,
            file,
            len,
        }))
    }

    fn open_write(&self, path: &Path) -> Result<WriteStream, ColstoreError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ColstoreError::IoError(format!("creating directory {}: {}", parent.display(), e))
            })?;
        }
        let file = File::create(&full)
            .map_err(|e| ColstoreError::IoError(format!("creating {}: {}", full.display(), e)))?;
        debug!("opened {} for writing", full.display());
        Ok(Box::new(BufWriter::new(file)))
    }
}

struct LocalReadStream {
    path: PathBuf,
    file: File,
    len: u64,
}

impl ReadStream for LocalReadStream {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), ColstoreError> {
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|e| {
                ColstoreError::IoError(format!(
                    "reading {} bytes at offset {} of {}: {}",
                    buf.len(),
                    offset,
                    self.path.display(),
                    e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = LocalStreamProvider::new(dir.path());
        assert!(!provider.exists(Path::new("nope.bin")));
        assert!(provider.open_read(Path::new("nope.bin")).is_err());
    }

    #[test]
    fn test_write_then_read_range() {
        let dir = TempDir::new().unwrap();
        let provider = LocalStreamProvider::new(dir.path());
        let path = Path::new("col/V.u8.bin");

        let mut writer = provider.open_write(path).unwrap();
        writer.write_all(&[1, 2, 3, 4, 5]).unwrap();
        writer.flush().unwrap();
        drop(writer);

        assert!(provider.exists(path));
        assert!(!provider.exists(Path::new("col")));

        let mut reader = provider.open_read(path).unwrap();
        assert_eq!(reader.len(), 5);
        let mut buf = [0u8; 2];
        reader.read_at(2, &mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn test_read_past_end_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("short.bin"), [1u8, 2]).unwrap();
        let provider = LocalStreamProvider::new(dir.path());

        let mut reader = provider.open_read(Path::new("short.bin")).unwrap();
        let mut buf = [0u8; 4];
        let err = reader.read_at(0, &mut buf).unwrap_err();
        assert!(matches!(err, ColstoreError::IoError(_)));
    }

    #[test]
    fn test_absolute_path_ignores_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("abs.bin");
        std::fs::write(&file, [7u8]).unwrap();

        let provider = LocalStreamProvider::new("/nonexistent-root");
        assert!(provider.exists(&file));
    }
}
