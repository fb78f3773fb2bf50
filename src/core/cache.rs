//! Assembly cache
//!
//! Maps assembly identifiers to [`AssemblyStore`]s. A store is constructed
//! at most once per identifier, even when many threads ask for the same new
//! assembly at the same time: each identifier owns a slot guarded by its own
//! mutex, and the check-then-construct step runs under that mutex.
//!
//! Failed resolutions are not remembered. Callers already waiting on the
//! slot try again in turn, and the last of them removes the empty slot so
//! unknown identifiers do not accumulate.

use crate::core::error::{Result, StoreError, StoreResult};
use crate::core::location::{parse_location, Location};
use crate::core::store::{AssemblyStore, DnaSequence, FetchOptions, StoreConfig};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Finds the directory holding an assembly's packed files
pub trait AssemblyLocator: Send + Sync {
    fn locate(&self, assembly: &str) -> StoreResult<PathBuf>;
}

impl<F> AssemblyLocator for F
where
    F: Fn(&str) -> StoreResult<PathBuf> + Send + Sync,
{
    fn locate(&self, assembly: &str) -> StoreResult<PathBuf> {
        self(assembly)
    }
}

/// Locator for a genome root laid out as `<root>/<assembly>/`
#[derive(Debug, Clone)]
pub struct DirLocator {
    root: PathBuf,
}

impl DirLocator {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssemblyLocator for DirLocator {
    fn locate(&self, assembly: &str) -> StoreResult<PathBuf> {
        let mut components = Path::new(assembly).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(assembly)),
            _ => Err(StoreError::InvalidAssemblyId(assembly.to_string())),
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<AssemblyStore>>>>;

/// Lazily built, never evicted map of assembly id to store
pub struct AssemblyCache<L = DirLocator> {
    locator: L,
    config: StoreConfig,
    slots: Mutex<HashMap<String, Slot>>,
}

impl AssemblyCache<DirLocator> {
    /// Cache over a `<root>/<assembly>/` directory tree
    pub fn from_root<P: Into<PathBuf>>(root: P) -> Self {
        Self::new(DirLocator::new(root))
    }
}

impl<L: AssemblyLocator> AssemblyCache<L> {
    pub fn new(locator: L) -> Self {
        Self::with_config(locator, StoreConfig::default())
    }

    pub fn with_config(locator: L, config: StoreConfig) -> Self {
        Self {
            locator,
            config,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of assemblies held or being built
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the store for an assembly, building it on first use
    ///
    /// The first successful call verifies that the located directory
    /// exists. Later calls return the same store without checking again.
    pub fn resolve(&self, assembly: &str) -> StoreResult<Arc<AssemblyStore>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(assembly.to_string()).or_default())
        };

        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = entry.as_ref() {
            return Ok(Arc::clone(store));
        }

        match self.build(assembly) {
            Ok(store) => {
                *entry = Some(Arc::clone(&store));
                Ok(store)
            }
            Err(e) => {
                drop(entry);
                self.release(assembly, &slot);
                Err(e)
            }
        }
    }

    fn build(&self, assembly: &str) -> StoreResult<Arc<AssemblyStore>> {
        let dir = self.locator.locate(assembly)?;
        if !dir.is_dir() {
            return Err(StoreError::AssemblyNotFound(assembly.to_string()));
        }

        log::info!("loading assembly {} from {}", assembly, dir.display());
        Ok(Arc::new(AssemblyStore::new(assembly, dir, self.config)))
    }

    /// Drop an empty slot after a failed build
    ///
    /// Only the map and the caller may hold the slot. A waiter still holding
    /// a clone keeps it alive, so it never sees a second slot for the same id.
    fn release(&self, assembly: &str, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let unused = slots.get(assembly).is_some_and(|current| {
            Arc::ptr_eq(current, slot)
                && Arc::strong_count(slot) == 2
                && slot.lock().unwrap_or_else(PoisonError::into_inner).is_none()
        });

        if unused {
            slots.remove(assembly);
        }
    }

    /// Fetch the sequence of one location
    pub fn get_sequence(
        &self,
        assembly: &str,
        location: &Location,
        options: &FetchOptions,
    ) -> Result<DnaSequence> {
        Ok(self.resolve(assembly)?.fetch(location, options)?)
    }

    /// Parse `text` as a location, then fetch it
    pub fn get_sequence_str(
        &self,
        assembly: &str,
        text: &str,
        options: &FetchOptions,
    ) -> Result<DnaSequence> {
        let location = parse_location(text)?;
        self.get_sequence(assembly, &location, options)
    }

    /// Fetch many locations in parallel, failing if any one fails
    ///
    /// Results are returned in input order.
    pub fn get_sequences(
        &self,
        assembly: &str,
        locations: &[Location],
        options: &FetchOptions,
    ) -> Result<Vec<DnaSequence>> {
        let store = self.resolve(assembly)?;

        let sequences = locations
            .par_iter()
            .map(|location| store.fetch(location, options))
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_locator_rejects_traversal() {
        let locator = DirLocator::new("/data/genomes");
        assert_eq!(locator.locate("hg19").unwrap(), PathBuf::from("/data/genomes/hg19"));
        assert!(locator.locate("../etc").is_err());
        assert!(locator.locate("hg19/chr1").is_err());
        assert!(locator.locate("").is_err());
    }

    #[test]
    fn test_resolve_unknown_assembly() {
        let root = TempDir::new().unwrap();
        let cache = AssemblyCache::from_root(root.path());

        assert!(matches!(
            cache.resolve("hg00"),
            Err(StoreError::AssemblyNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_failure_not_cached() {
        let root = TempDir::new().unwrap();
        let cache = AssemblyCache::from_root(root.path());

        assert!(cache.resolve("mm10").is_err());
        fs::create_dir(root.path().join("mm10")).unwrap();
        assert!(cache.resolve("mm10").is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_resolves_leave_no_slots() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("hg19")).unwrap();
        let cache = AssemblyCache::from_root(root.path());

        for i in 0..1000 {
            assert!(cache.resolve(&format!("bogus{}", i)).is_err());
        }
        assert!(cache.resolve("../etc").is_err());
        assert!(cache.is_empty());

        cache.resolve("hg19").unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_resolve_returns_same_store() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("hg19")).unwrap();
        let cache = AssemblyCache::from_root(root.path());

        let a = cache.resolve("hg19").unwrap();
        let b = cache.resolve("hg19").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.assembly(), "hg19");
    }

    #[test]
    fn test_get_sequence_str_parse_error() {
        let root = TempDir::new().unwrap();
        let cache = AssemblyCache::from_root(root.path());

        let err = cache
            .get_sequence_str("hg19", "chr1:200-100", &FetchOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
