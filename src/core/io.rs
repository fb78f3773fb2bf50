//! Packed-file window reader
//!
//! Reads byte windows from a packed chromosome file, either by opening the
//! file for every request or through a shared memory map. Both paths are
//! safe to use from many threads at once: the per-request path owns its
//! file handle and cursor, and the mapped path only takes shared slices.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Bytes before the first packed base pair
pub const PACKED_HEADER_LEN: u64 = 1;

/// File extension of packed chromosome files
pub const PACKED_EXTENSION: &str = ".dna.4bit";

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// I/O strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Open, seek and read for every window
    PerRequest,
    /// Map the whole file once and slice windows out of it
    MemoryMapped,
    /// Map files at or above [`MMAP_THRESHOLD`], otherwise per request
    #[default]
    Auto,
}

impl IoStrategy {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(IoStrategy::Auto),
            "mmap" | "mapped" => Some(IoStrategy::MemoryMapped),
            "per-request" | "read" => Some(IoStrategy::PerRequest),
            _ => None,
        }
    }
}

/// Reader bound to one packed file
#[derive(Debug)]
pub enum PackedReader {
    PerRequest { path: PathBuf, file_len: u64 },
    Mapped { path: PathBuf, mmap: Mmap },
}

impl PackedReader {
    /// Open a packed file with the specified I/O strategy
    pub fn open<P: AsRef<Path>>(path: P, strategy: IoStrategy) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let file_len = file.metadata()?.len();

        let map = match strategy {
            IoStrategy::PerRequest => false,
            IoStrategy::MemoryMapped => true,
            IoStrategy::Auto => file_len >= MMAP_THRESHOLD,
        };

        if map {
            // SAFETY: packed files are read-only reference data and are not
            // modified while mapped
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(PackedReader::Mapped { path, mmap })
        } else {
            Ok(PackedReader::PerRequest { path, file_len })
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PackedReader::PerRequest { path, .. } | PackedReader::Mapped { path, .. } => path,
        }
    }

    /// File size in bytes, including the header
    pub fn file_len(&self) -> u64 {
        match self {
            PackedReader::PerRequest { file_len, .. } => *file_len,
            PackedReader::Mapped { mmap, .. } => mmap.len() as u64,
        }
    }

    /// Check if using memory mapping
    pub fn is_mapped(&self) -> bool {
        matches!(self, PackedReader::Mapped { .. })
    }

    /// Read exactly `len` bytes at absolute file `offset`
    ///
    /// A window that runs past the end of the file fails with
    /// [`io::ErrorKind::UnexpectedEof`]; there is no partial result.
    pub fn read_window(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let file_len = self.file_len();
        let in_bounds = u64::try_from(len)
            .ok()
            .and_then(|len| offset.checked_add(len))
            .is_some_and(|end| end <= file_len);

        if !in_bounds {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("window {}+{} past end of {} byte file", offset, len, file_len),
            ));
        }

        match self {
            PackedReader::PerRequest { path, .. } => {
                let mut file = File::open(path)?;
                file.seek(SeekFrom::Start(offset))?;
                let mut buf = vec![0u8; len];
                file.read_exact(&mut buf)?;
                Ok(buf)
            }
            PackedReader::Mapped { mmap, .. } => {
                // in bounds, so the offset fits in usize
                let start = offset as usize;
                Ok(mmap[start..start + len].to_vec())
            }
        }
    }
}

/// File name of a chromosome's packed file, e.g. `chrx.dna.4bit`
pub fn packed_file_name(chromosome: &str) -> String {
    format!("{}{}", chromosome.to_lowercase(), PACKED_EXTENSION)
}
