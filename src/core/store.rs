//! Chromosome and assembly stores
//!
//! A [`ChromosomeStore`] owns one packed file and turns a [`Location`] into
//! decoded sequence. An [`AssemblyStore`] is bound to an assembly directory
//! and opens chromosome stores lazily, reusing them across calls.

use crate::core::dna::{self, CaseMode, RepeatMask};
use crate::core::error::{StoreError, StoreResult};
use crate::core::io::{packed_file_name, IoStrategy, PackedReader, PACKED_EXTENSION, PACKED_HEADER_LEN};
use crate::core::location::{chromosome_sort_key, normalize_chromosome, Location};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Store-level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub io_strategy: IoStrategy,
}

/// Per-call transforms applied to a decoded sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub reverse: bool,
    pub complement: bool,
    pub case: CaseMode,
    pub repeat_mask: RepeatMask,
}

impl FetchOptions {
    /// Options for the reverse complement, no case or mask pass
    pub fn revcomp() -> Self {
        Self {
            reverse: true,
            complement: true,
            ..Self::default()
        }
    }

    /// Build from the textual case and mask modes used by callers
    pub fn from_modes(reverse: bool, complement: bool, case: &str, repeat_mask: &str) -> Self {
        Self {
            reverse,
            complement,
            case: CaseMode::parse(case),
            repeat_mask: RepeatMask::parse(repeat_mask),
        }
    }

    /// Reverse, complement, mask, then case, in that order
    pub fn apply(&self, seq: &mut [u8]) {
        if self.reverse {
            dna::reverse_in_place(seq);
        }
        if self.complement {
            dna::complement_in_place(seq);
        }
        dna::apply_repeat_mask(seq, self.repeat_mask);
        dna::apply_case(seq, self.case, self.repeat_mask);
    }
}

/// A fetched sequence and the location it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnaSequence {
    pub location: Location,
    pub sequence: String,
}

/// Byte window of a location inside a packed file
///
/// Returns `(file_offset, byte_count)`.
///
/// # Examples
/// ```
/// use fast_dna::core::{Location, packed_window};
///
/// // bases 1-2 share the first packed byte, right after the header
/// assert_eq!(packed_window(&Location::new("chr1", 1, 2).unwrap()), (1, 1));
/// // bases 2-3 straddle two bytes
/// assert_eq!(packed_window(&Location::new("chr1", 2, 3).unwrap()), (1, 2));
/// ```
pub fn packed_window(location: &Location) -> (u64, u64) {
    let s0 = location.start() - 1;
    let e0 = location.end() - 1;
    let byte_start = s0 / 2;
    let byte_end = e0 / 2;
    (PACKED_HEADER_LEN + byte_start, byte_end - byte_start + 1)
}

/// Accessor for one chromosome's packed file
#[derive(Debug)]
pub struct ChromosomeStore {
    chromosome: String,
    reader: PackedReader,
}

impl ChromosomeStore {
    /// Open the packed file for `chromosome`
    ///
    /// A missing file is reported as [`StoreError::ChromosomeNotFound`].
    pub fn open<P: AsRef<Path>>(
        chromosome: &str,
        path: P,
        strategy: IoStrategy,
    ) -> StoreResult<Self> {
        let path = path.as_ref();
        let chromosome = normalize_chromosome(chromosome);

        let reader = PackedReader::open(path, strategy).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::ChromosomeNotFound {
                    chrom: chromosome.clone(),
                    path: path.to_path_buf(),
                }
            } else {
                StoreError::Io(e)
            }
        })?;

        log::debug!(
            "opened {} ({} bytes, mapped={})",
            path.display(),
            reader.file_len(),
            reader.is_mapped()
        );

        Ok(Self { chromosome, reader })
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    /// Number of bases the file can address
    pub fn base_capacity(&self) -> u64 {
        self.reader.file_len().saturating_sub(PACKED_HEADER_LEN) * 2
    }

    /// Read and decode the bases of `location`, then apply `options`
    ///
    /// The returned location is the one passed in; transforms change the
    /// symbols, never the coordinates.
    pub fn fetch(&self, location: &Location, options: &FetchOptions) -> StoreResult<DnaSequence> {
        if location.chromosome() != self.chromosome {
            return Err(StoreError::ChromosomeNotFound {
                chrom: location.chromosome().to_string(),
                path: self.reader.path().to_path_buf(),
            });
        }

        let (offset, byte_count) = packed_window(location);
        let short_read = || StoreError::ShortRead {
            path: self.reader.path().to_path_buf(),
            offset,
            requested: byte_count,
        };

        let len = usize::try_from(byte_count).map_err(|_| short_read())?;
        let packed = self.reader.read_window(offset, len).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                short_read()
            } else {
                StoreError::Io(e)
            }
        })?;

        log::debug!("read {} bytes at {} for {}", byte_count, offset, location);

        // the window was read in full, so the base count fits in memory
        let mut bases = dna::unpack_bases(&packed, location.start() - 1, location.length() as usize);
        options.apply(&mut bases);

        Ok(DnaSequence {
            location: location.clone(),
            sequence: bases.into_iter().map(char::from).collect(),
        })
    }
}

/// All chromosome files of one assembly
#[derive(Debug)]
pub struct AssemblyStore {
    assembly: String,
    dir: PathBuf,
    config: StoreConfig,
    chromosomes: RwLock<HashMap<String, Arc<ChromosomeStore>>>,
}

impl AssemblyStore {
    pub fn new<P: Into<PathBuf>>(assembly: &str, dir: P, config: StoreConfig) -> Self {
        Self {
            assembly: assembly.to_string(),
            dir: dir.into(),
            config,
            chromosomes: RwLock::new(HashMap::new()),
        }
    }

    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get or open the store for a chromosome
    pub fn chromosome(&self, chromosome: &str) -> StoreResult<Arc<ChromosomeStore>> {
        let chromosome = normalize_chromosome(chromosome);

        if let Some(store) = self
            .chromosomes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chromosome)
        {
            return Ok(Arc::clone(store));
        }

        let mut stores = self
            .chromosomes
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(store) = stores.get(&chromosome) {
            return Ok(Arc::clone(store));
        }

        let path = self.dir.join(packed_file_name(&chromosome));
        let store = Arc::new(ChromosomeStore::open(&chromosome, path, self.config.io_strategy)?);
        stores.insert(chromosome, Arc::clone(&store));
        Ok(store)
    }

    /// Fetch a location from this assembly
    pub fn fetch(&self, location: &Location, options: &FetchOptions) -> StoreResult<DnaSequence> {
        self.chromosome(location.chromosome())?.fetch(location, options)
    }

    /// Chromosomes with a packed file in the assembly directory, in sort order
    pub fn chromosomes(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(PACKED_EXTENSION)) {
                names.push(normalize_chromosome(stem));
            }
        }

        names.sort_by(|a, b| {
            chromosome_sort_key(a)
                .cmp(&chromosome_sort_key(b))
                .then_with(|| a.cmp(b))
        });
        Ok(names)
    }
}
