//! FastDNA - Random-access nucleotide retrieval
//!
//! Extracts sub-sequences from whole-genome assemblies stored as one packed
//! 4-bit file per chromosome, without loading whole chromosomes into memory.
//!
//! # Features
//!
//! - 1-based inclusive coordinates with `chr` name canonicalization
//! - Reverse, complement, case and repeat-mask transforms
//! - Per-request reads or shared memory maps, safe under concurrent callers
//! - At-most-once assembly construction per identifier
//!
//! # Example
//!
//! ```
//! use fast_dna::core::dna::pack_bases;
//! use fast_dna::{AssemblyCache, FetchOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Assemblies live under <root>/<assembly>/, one packed file per chromosome
//! let root = tempfile::tempdir()?;
//! std::fs::create_dir(root.path().join("hg19"))?;
//! let mut packed = vec![0u8];
//! packed.extend(pack_bases(b"GATTACA"));
//! std::fs::write(root.path().join("hg19/chr1.dna.4bit"), packed)?;
//!
//! let cache = AssemblyCache::from_root(root.path());
//! let seq = cache.get_sequence_str("hg19", "chr1:2-5", &FetchOptions::revcomp())?;
//! assert_eq!(seq.sequence, "TAAT");
//! assert_eq!(seq.location.to_string(), "chr1:2-5");
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export commonly used types
pub use core::{
    parse_location, parse_locations, sort_locations, AssemblyCache, AssemblyLocator,
    AssemblyStore, CaseMode, ChromosomeStore, DirLocator, DnaError, DnaSequence, ErrorKind,
    FetchOptions, IoStrategy, Location, LocationError, RepeatMask, StoreConfig, StoreError,
    Strand,
};
