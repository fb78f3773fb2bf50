//! Core sequence retrieval functionality
//!
//! This module contains the coordinate model, the packed nucleotide
//! codec, the chromosome file readers and the assembly cache.

mod cache;
pub mod dna;
mod error;
pub mod io;
mod location;
mod store;

pub use cache::{AssemblyCache, AssemblyLocator, DirLocator};
pub use dna::{CaseMode, RepeatMask};
pub use error::{
    DnaError, ErrorKind, LocationError, LocationResult, Result, StoreError, StoreResult,
};
pub use io::{IoStrategy, PackedReader, MMAP_THRESHOLD, PACKED_EXTENSION, PACKED_HEADER_LEN};
pub use location::{
    chromosome_sort_key, compare_locations, location_less, normalize_chromosome,
    parse_location, parse_locations, sort_locations, Location, PromoterRegion, Strand,
    TssRegion, CHR_M_KEY, CHR_PREFIX, CHR_X_KEY, CHR_Y_KEY, DEFAULT_PROMOTER_REGION,
    UNKNOWN_CHR_KEY,
};
pub use store::{
    packed_window, AssemblyStore, ChromosomeStore, DnaSequence, FetchOptions, StoreConfig,
};
