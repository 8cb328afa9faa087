use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use ahash::AHashMap;
use log::{debug, info};

use crate::conf::CacheConfig;
use crate::core::ColstoreError;
use crate::io::column::ColumnReader;

use super::CacheMode;

struct Slot {
    mode: CacheMode,
    reader: OnceLock<Arc<dyn ColumnReader>>,
    // Held while the builder runs so racing callers wait for one build.
    build: Mutex<()>,
    last_used: AtomicU64,
}

impl Slot {
    fn new(mode: CacheMode, tick: u64) -> Self {
        Self {
            mode,
            reader: OnceLock::new(),
            build: Mutex::new(()),
            last_used: AtomicU64::new(tick),
        }
    }
}

/// Shared map from column path to a live column reader.
///
/// Callers asking for the same column get the same reader instance, and the
/// builder for a given (path, mode) runs at most once even under concurrent
/// requests. Lookups of built entries only take the shared map lock. When
/// more than `max_readers` readers are cached, the least recently used ones
/// are dropped from the map; handles already given out stay valid.
pub struct ReaderCache {
    slots: RwLock<AHashMap<PathBuf, Arc<Slot>>>,
    clock: AtomicU64,
    max_readers: usize,
}

impl ReaderCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            slots: RwLock::new(AHashMap::new()),
            clock: AtomicU64::new(0),
            max_readers: config.max_readers,
        }
    }

    /// Number of cached readers, including builds in flight.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .is_some_and(|slot| slot.reader.get().is_some())
    }

    /// Drop the entry for `path`, if any.
    pub fn invalidate(&self, path: &Path) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.remove(path).is_some() {
            debug!("invalidated cached reader for {}", path.display());
        }
    }

    pub fn clear(&self) {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Return the cached reader for `path`, building it when there is none or
    /// when the cached one is streaming and `mode` asks for a fully cached
    /// reader (the new reader replaces the old entry).
    ///
    /// A builder result of `None` (no values file) or an error is returned
    /// as is and not cached.
    pub fn get_or_build<F>(
        &self,
        path: &Path,
        mode: CacheMode,
        builder: F,
    ) -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError>
    where
        F: FnOnce() -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError>,
    {
        loop {
            let slot = self.slot_for(path, mode);
            if let Some(reader) = slot.reader.get() {
                self.touch(&slot);
                return Ok(Some(Arc::clone(reader)));
            }

            let _building = slot.build.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(reader) = slot.reader.get() {
                self.touch(&slot);
                return Ok(Some(Arc::clone(reader)));
            }
            // A failed build discarded this slot, or a fully cached request
            // replaced it while we waited.
            if !self.is_current(path, &slot) {
                continue;
            }

            debug!("building {:?} reader for {}", slot.mode, path.display());
            let built = match builder() {
                Ok(Some(reader)) => reader,
                Ok(None) => {
                    self.discard(path, &slot);
                    return Ok(None);
                }
                Err(e) => {
                    self.discard(path, &slot);
                    return Err(e);
                }
            };

            let reader = Arc::clone(slot.reader.get_or_init(|| built));
            self.touch(&slot);
            self.evict_over_capacity(path);
            return Ok(Some(reader));
        }
    }

    fn slot_for(&self, path: &Path, mode: CacheMode) -> Arc<Slot> {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(path) {
                if slot.mode.satisfies(mode) {
                    return Arc::clone(slot);
                }
            }
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slots.get(path) {
            if previous.mode.satisfies(mode) {
                return Arc::clone(previous);
            }
            info!(
                "replacing {:?} reader for {} with {:?}",
                previous.mode,
                path.display(),
                mode
            );
        }
        let slot = Arc::new(Slot::new(mode, self.tick()));
        slots.insert(path.to_path_buf(), Arc::clone(&slot));
        slot
    }

    fn is_current(&self, path: &Path, slot: &Arc<Slot>) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(path).is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    // Remove `slot` unless another caller already replaced it.
    fn discard(&self, path: &Path, slot: &Arc<Slot>) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.get(path).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(path);
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn touch(&self, slot: &Slot) {
        slot.last_used.store(self.tick(), Ordering::Relaxed);
    }

    fn evict_over_capacity(&self, keep: &Path) {
        if self.max_readers == 0 {
            return;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.len() <= self.max_readers {
            return;
        }

        let mut candidates: Vec<(u64, PathBuf)> = slots
            .iter()
            .filter(|(path, slot)| path.as_path() != keep && slot.reader.get().is_some())
            .map(|(path, slot)| (slot.last_used.load(Ordering::Relaxed), path.clone()))
            .collect();
        candidates.sort();

        let excess = slots.len() - self.max_readers;
        for (_, path) in candidates.into_iter().take(excess) {
            slots.remove(&path);
            info!("evicted cached reader for {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{ArrayView, ColumnArray, Selector};
    use crate::types::PrimitiveKind;
    use std::sync::atomic::AtomicUsize;

    struct FakeReader {
        mode: CacheMode,
    }

    impl ColumnReader for FakeReader {
        fn kind(&self) -> PrimitiveKind {
            PrimitiveKind::UInt8
        }

        fn mode(&self) -> CacheMode {
            self.mode
        }

        fn count(&self) -> usize {
            0
        }

        fn read(&self, _selector: &Selector) -> Result<ColumnArray, ColstoreError> {
            Ok(ArrayView::<u8>::all(vec![]).into())
        }

        fn close(&self) {}
    }

    fn fake(mode: CacheMode) -> Result<Option<Arc<dyn ColumnReader>>, ColstoreError> {
        Ok(Some(Arc::new(FakeReader { mode })))
    }

    #[test]
    fn test_same_instance_and_single_build() {
        let cache = ReaderCache::new(&CacheConfig::default());
        let builds = AtomicUsize::new(0);
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            fake(CacheMode::Streaming)
        };

        let a = cache
            .get_or_build(Path::new("t/a"), CacheMode::Streaming, build)
            .unwrap()
            .unwrap();
        let b = cache
            .get_or_build(Path::new("t/a"), CacheMode::Streaming, || {
                builds.fetch_add(1, Ordering::SeqCst);
                fake(CacheMode::Streaming)
            })
            .unwrap()
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(cache.contains(Path::new("t/a")));
    }

    #[test]
    fn test_cached_request_rebuilds_streaming_entry() {
        let cache = ReaderCache::new(&CacheConfig::default());
        let path = Path::new("t/a");
        let streaming = cache
            .get_or_build(path, CacheMode::Streaming, || fake(CacheMode::Streaming))
            .unwrap()
            .unwrap();
        let cached = cache
            .get_or_build(path, CacheMode::FullyCached, || fake(CacheMode::FullyCached))
            .unwrap()
            .unwrap();
        assert!(!Arc::ptr_eq(&streaming, &cached));
        assert_eq!(cached.mode(), CacheMode::FullyCached);

        // A streaming request is now served by the fully cached reader.
        let again = cache
            .get_or_build(path, CacheMode::Streaming, || panic!("must not rebuild"))
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&cached, &again));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_is_not_cached() {
        let cache = ReaderCache::new(&CacheConfig::default());
        let path = Path::new("t/missing");
        assert!(
            cache
                .get_or_build(path, CacheMode::Streaming, || Ok(None))
                .unwrap()
                .is_none()
        );
        assert!(cache.is_empty());

        let built = cache
            .get_or_build(path, CacheMode::Streaming, || fake(CacheMode::Streaming))
            .unwrap();
        assert!(built.is_some());
    }

    #[test]
    fn test_error_is_not_cached() {
        let cache = ReaderCache::new(&CacheConfig::default());
        let path = Path::new("t/broken");
        let err = cache
            .get_or_build(path, CacheMode::Streaming, || {
                Err(ColstoreError::IoError("disk on fire".into()))
            })
            .err()
            .unwrap();
        assert_eq!(err, ColstoreError::IoError("disk on fire".into()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ReaderCache::new(&CacheConfig { max_readers: 2 });
        let get = |name: &str| {
            cache
                .get_or_build(Path::new(name), CacheMode::Streaming, || {
                    fake(CacheMode::Streaming)
                })
                .unwrap()
                .unwrap()
        };

        let a = get("a");
        get("b");
        // Touch "a" so "b" becomes the oldest.
        assert!(Arc::ptr_eq(&a, &get("a")));
        get("c");

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(Path::new("a")));
        assert!(!cache.contains(Path::new("b")));
        assert!(cache.contains(Path::new("c")));
    }

    #[test]
    fn test_unbounded() {
        let cache = ReaderCache::new(&CacheConfig::unbounded());
        for i in 0..50 {
            let path = PathBuf::from(format!("col{i}"));
            cache
                .get_or_build(&path, CacheMode::Streaming, || fake(CacheMode::Streaming))
                .unwrap();
        }
        assert_eq!(cache.len(), 50);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ReaderCache::new(&CacheConfig::default());
        for name in ["x", "y"] {
            cache
                .get_or_build(Path::new(name), CacheMode::Streaming, || {
                    fake(CacheMode::Streaming)
                })
                .unwrap();
        }
        cache.invalidate(Path::new("x"));
        assert!(!cache.contains(Path::new("x")));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_waiter_after_failed_build_is_cached() {
        let cache = ReaderCache::new(&CacheConfig::default());
        let path = Path::new("t/c");
        let builds = AtomicUsize::new(0);
        let (started, building) = std::sync::mpsc::channel();

        let waiter = std::thread::scope(|s| {
            let failing = s.spawn(|| {
                cache.get_or_build(path, CacheMode::Streaming, || {
                    started.send(()).unwrap();
                    std::thread::sleep(std::time::Duration::from_millis(200));
                    Err(ColstoreError::IoError("disk went away".to_string()))
                })
            });
            building.recv().unwrap();
            let waiting = s.spawn(|| {
                cache.get_or_build(path, CacheMode::Streaming, || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    fake(CacheMode::Streaming)
                })
            });
            assert!(failing.join().unwrap().is_err());
            waiting.join().unwrap().unwrap().unwrap()
        });

        assert!(cache.contains(path));
        let again = cache
            .get_or_build(path, CacheMode::Streaming, || {
                builds.fetch_add(1, Ordering::SeqCst);
                fake(CacheMode::Streaming)
            })
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&waiter, &again));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }
}
