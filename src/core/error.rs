//! Error types for FastDNA
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FastDNA operations
#[derive(Debug, Error)]
pub enum DnaError {
    /// Malformed coordinate input
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    /// Missing data or storage fault
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Broad category of a failure, for callers that only need to tell
/// a bad request apart from missing data and storage faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    NotFound,
    Io,
}

impl DnaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DnaError::Location(_) => ErrorKind::Parse,
            DnaError::Store(e) => e.kind(),
        }
    }
}

/// Errors that can occur while parsing or constructing a location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Text does not look like `chr<label>:<start>-<end>`
    #[error("'{0}' does not seem like a valid location")]
    InvalidFormat(String),

    /// Start or end is not a positive integer
    #[error("'{value}' does not seem like a valid coordinate: {message}")]
    InvalidCoordinate { value: String, message: String },

    /// Coordinates are 1-based
    #[error("Coordinate {0} is less than 1")]
    CoordinateBelowOne(u64),

    /// End before start in location text
    #[error("End position {end} is less than start position {start}")]
    EndBeforeStart { start: u64, end: u64 },

    /// Chromosome label is empty once the prefix is removed
    #[error("Chromosome name '{0}' is empty")]
    EmptyChromosome(String),
}

/// Errors raised while resolving assemblies or reading packed files
#[derive(Debug, Error)]
pub enum StoreError {
    /// No backing directory for the assembly
    #[error("Assembly not found: {0}")]
    AssemblyNotFound(String),

    /// Assembly identifier would escape the genome root
    #[error("Invalid assembly identifier: '{0}'")]
    InvalidAssemblyId(String),

    /// No packed file for the chromosome
    #[error("Chromosome {chrom} not found: {}", .path.display())]
    ChromosomeNotFound { chrom: String, path: PathBuf },

    /// Fewer bytes available than the location needs
    #[error("Short read from {}: wanted {requested} bytes at offset {offset}", .path.display())]
    ShortRead {
        path: PathBuf,
        offset: u64,
        requested: u64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::AssemblyNotFound(_) | StoreError::ChromosomeNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::InvalidAssemblyId(_) => ErrorKind::Parse,
            StoreError::ShortRead { .. } | StoreError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias for FastDNA operations
pub type Result<T> = std::result::Result<T, DnaError>;

/// Result type alias for location parsing
pub type LocationResult<T> = std::result::Result<T, LocationError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
